use scene::{NodeId, SceneGraph};

use crate::anchor::{AnchorId, TrackingAnchor};

/// "A node was added for this anchor": the engine materialized `anchor` and
/// parented `placeholder` (engine-owned) into the scene.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NodeAdded {
    pub anchor: AnchorId,
    pub placeholder: NodeId,
}

/// Anchor registration with a tracking engine.
pub trait TrackingSession {
    fn add_anchor(&mut self, anchor: TrackingAnchor);

    /// Stop tracking `anchor`. Unknown ids are ignored.
    fn remove_anchor(&mut self, anchor: AnchorId);
}

/// Engines that are polled for materialization instead of calling back.
pub trait MaterializationSource {
    /// Apply pending engine work to `scene` and return the notifications it
    /// produced, in the order the engine chose.
    fn drain_node_added<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> Vec<NodeAdded>;
}

impl<S: TrackingSession + ?Sized> TrackingSession for &mut S {
    fn add_anchor(&mut self, anchor: TrackingAnchor) {
        (**self).add_anchor(anchor)
    }

    fn remove_anchor(&mut self, anchor: AnchorId) {
        (**self).remove_anchor(anchor)
    }
}

impl<S: MaterializationSource + ?Sized> MaterializationSource for &mut S {
    fn drain_node_added<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> Vec<NodeAdded> {
        (**self).drain_node_added(scene)
    }
}
