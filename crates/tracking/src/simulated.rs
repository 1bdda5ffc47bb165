use std::collections::{BTreeMap, VecDeque};

use scene::{NodeId, SceneGraph, VisualNode};
use tracing::{debug, warn};

use crate::anchor::{AnchorId, TrackingAnchor};
use crate::session::{MaterializationSource, NodeAdded, TrackingSession};

/// Order in which a [`SimulatedSession`] materializes pending anchors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MaterializationOrder {
    /// Registration order.
    #[default]
    Fifo,
    /// Most recently registered first.
    Lifo,
}

#[derive(Debug, Clone)]
struct Tracked {
    anchor: TrackingAnchor,
    placeholder: Option<NodeId>,
}

/// Deterministic in-process tracking engine.
///
/// Anchors are materialized on [`drain_node_added`](MaterializationSource::drain_node_added):
/// each pending anchor gets a placeholder node, positioned at the anchor's
/// transform and parented to the scene root. Placeholders of removed anchors
/// are released on the next drain.
#[derive(Debug, Default)]
pub struct SimulatedSession {
    order: MaterializationOrder,
    tracked: BTreeMap<AnchorId, Tracked>,
    pending: VecDeque<AnchorId>,
    released: Vec<NodeId>,
}

impl SimulatedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(order: MaterializationOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn is_tracking(&self, anchor: AnchorId) -> bool {
        self.tracked.contains_key(&anchor)
    }

    pub fn anchor(&self, anchor: AnchorId) -> Option<&TrackingAnchor> {
        self.tracked.get(&anchor).map(|t| &t.anchor)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn placeholder(&self, anchor: AnchorId) -> Option<NodeId> {
        self.tracked.get(&anchor).and_then(|t| t.placeholder)
    }

    fn materialize<G: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut G,
        id: AnchorId,
    ) -> Option<NodeAdded> {
        let tracked = self.tracked.get_mut(&id)?;
        let placeholder = scene.spawn(
            VisualNode::empty()
                .named(format!("anchor {}", id.get()))
                .at(tracked.anchor.transform()),
        );
        let root = scene.root();
        if let Err(err) = scene.attach_child(root, placeholder) {
            warn!("failed to parent placeholder for anchor {}: {err}", id.get());
            let _ = scene.detach_from_parent(placeholder);
            return None;
        }
        tracked.placeholder = Some(placeholder);
        debug!("materialized anchor {} as {placeholder}", id.get());
        Some(NodeAdded {
            anchor: id,
            placeholder,
        })
    }
}

impl TrackingSession for SimulatedSession {
    fn add_anchor(&mut self, anchor: TrackingAnchor) {
        let id = anchor.id();
        if self.tracked.contains_key(&id) {
            debug!("anchor {} already tracked", id.get());
            return;
        }
        self.tracked.insert(
            id,
            Tracked {
                anchor,
                placeholder: None,
            },
        );
        self.pending.push_back(id);
    }

    fn remove_anchor(&mut self, anchor: AnchorId) {
        let Some(tracked) = self.tracked.remove(&anchor) else {
            return;
        };
        self.pending.retain(|id| *id != anchor);
        if let Some(placeholder) = tracked.placeholder {
            self.released.push(placeholder);
        }
        debug!("stopped tracking anchor {}", anchor.get());
    }
}

impl MaterializationSource for SimulatedSession {
    fn drain_node_added<G: SceneGraph + ?Sized>(&mut self, scene: &mut G) -> Vec<NodeAdded> {
        for placeholder in std::mem::take(&mut self.released) {
            if scene.contains(placeholder) {
                let _ = scene.detach_from_parent(placeholder);
            }
        }

        let mut batch: Vec<AnchorId> = self.pending.drain(..).collect();
        if self.order == MaterializationOrder::Lifo {
            batch.reverse();
        }
        batch
            .into_iter()
            .filter_map(|id| self.materialize(scene, id))
            .collect()
    }
}
