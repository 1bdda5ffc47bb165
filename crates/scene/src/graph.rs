use crate::entity::NodeId;
use crate::node::VisualNode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    UnknownNode(NodeId),
    CycleDetected { parent: NodeId, child: NodeId },
    RootCannotBeDetached,
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownNode(id) => write!(f, "unknown scene node: {id}"),
            SceneError::CycleDetected { parent, child } => {
                write!(f, "attaching {child} under {parent} would create a cycle")
            }
            SceneError::RootCannotBeDetached => write!(f, "the scene root cannot be detached"),
        }
    }
}

impl std::error::Error for SceneError {}

/// The scene-graph operations annotation placement relies on.
///
/// Implementations own every node they spawn. A node removed with
/// [`detach_from_parent`](SceneGraph::detach_from_parent) is released along
/// with all of its descendants; its id is stale afterwards.
pub trait SceneGraph {
    fn root(&self) -> NodeId;

    /// Materialize `node` (and its children) as a detached subtree.
    fn spawn(&mut self, node: VisualNode) -> NodeId;

    fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError>;

    fn detach_from_parent(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Visit `root` and every descendant in pre-order. Unknown roots visit nothing.
    fn enumerate_subtree(&self, root: NodeId, visitor: &mut dyn FnMut(NodeId));

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), SceneError>;

    fn contains(&self, node: NodeId) -> bool;
}

impl<G: SceneGraph + ?Sized> SceneGraph for &mut G {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn spawn(&mut self, node: VisualNode) -> NodeId {
        (**self).spawn(node)
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        (**self).attach_child(parent, child)
    }

    fn detach_from_parent(&mut self, node: NodeId) -> Result<(), SceneError> {
        (**self).detach_from_parent(node)
    }

    fn enumerate_subtree(&self, root: NodeId, visitor: &mut dyn FnMut(NodeId)) {
        (**self).enumerate_subtree(root, visitor)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), SceneError> {
        (**self).set_hidden(node, hidden)
    }

    fn contains(&self, node: NodeId) -> bool {
        (**self).contains(node)
    }
}
