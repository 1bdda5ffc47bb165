use foundation::math::Mat4;

foundation::sequential_id! {
    /// Identity of an anchor, stable for the life of the process.
    pub struct AnchorId;
}

/// Origin of an anchor. Only `Geo` anchors are created by annotation
/// placement; the others come from the engine or the host application.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AnchorKind {
    Geo,
    Plane,
    Other,
}

/// An immutable pose tracked by the session.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TrackingAnchor {
    id: AnchorId,
    kind: AnchorKind,
    transform: Mat4,
}

impl TrackingAnchor {
    pub fn new(kind: AnchorKind, transform: Mat4) -> Self {
        Self {
            id: AnchorId::fresh(),
            kind,
            transform,
        }
    }

    pub fn geo(transform: Mat4) -> Self {
        Self::new(AnchorKind::Geo, transform)
    }

    pub fn id(&self) -> AnchorId {
        self.id
    }

    pub fn kind(&self) -> AnchorKind {
        self.kind
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::{AnchorKind, TrackingAnchor};
    use foundation::math::{Mat4, Vec3};

    #[test]
    fn anchors_get_distinct_identities() {
        let m = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        let a = TrackingAnchor::geo(m);
        let b = TrackingAnchor::geo(m);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
        assert_eq!(a.transform(), b.transform());
        assert_eq!(a.kind(), AnchorKind::Geo);
    }
}
