use foundation::math::Mat4;

use crate::components::{Drawable3D, Transform, Visibility};

/// Description of a node (and optional children) to be spawned into a scene.
///
/// Builders hand these to a [`SceneGraph`](crate::SceneGraph), which owns the
/// resulting nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub visibility: Visibility,
    pub drawable: Option<Drawable3D>,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// A node with no geometry; useful as a grouping or placeholder node.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_drawable(drawable: Drawable3D) -> Self {
        Self {
            drawable: Some(drawable),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, local: Mat4) -> Self {
        self.transform = Transform::from_matrix(local);
        self
    }

    pub fn with_child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes this description expands to.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(VisualNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::VisualNode;
    use crate::components::Drawable3D;

    #[test]
    fn node_count_includes_descendants() {
        let node = VisualNode::with_drawable(Drawable3D::sphere(1.0))
            .named("pin")
            .with_child(VisualNode::empty().with_child(VisualNode::empty()));
        assert_eq!(node.node_count(), 3);
        assert_eq!(node.name.as_deref(), Some("pin"));
    }
}
