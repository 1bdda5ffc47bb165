use foundation::math::{Mat4, Vec3};

/// Node transform relative to the parent node.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Transform {
    pub local: Mat4,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            local: Mat4::IDENTITY,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            local: Mat4::from_translation(position),
        }
    }

    pub fn from_matrix(local: Mat4) -> Self {
        Self { local }
    }

    pub fn position(&self) -> Vec3 {
        self.local.translation()
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position(), Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn translate_sets_position() {
        let transform = Transform::translate(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform.position(), Vec3::new(1.0, -2.0, 3.0));
    }
}
