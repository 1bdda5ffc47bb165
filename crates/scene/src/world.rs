use crate::components::{Drawable3D, Transform, Visibility};
use crate::entity::NodeId;
use crate::graph::{SceneError, SceneGraph};
use crate::node::VisualNode;
use foundation::handles::Handle;
use foundation::math::Mat4;

#[derive(Debug, Clone)]
struct NodeData {
    name: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transform: Transform,
    visibility: Visibility,
    drawable: Option<Drawable3D>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<NodeData>,
}

/// In-memory scene graph with generational node ids.
///
/// Released slots are reused with a bumped generation, so a stale `NodeId`
/// never resolves to a newer node.
#[derive(Debug)]
pub struct World {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        let mut world = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId(Handle::new(0, 0)),
            live: 0,
        };
        world.root = world.alloc(NodeData {
            name: Some("root".to_string()),
            parent: None,
            children: Vec::new(),
            transform: Transform::identity(),
            visibility: Visibility::visible(),
            drawable: None,
        });
        world
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.live
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    pub fn spawn(&mut self, node: VisualNode) -> NodeId {
        let VisualNode {
            name,
            transform,
            visibility,
            drawable,
            children,
        } = node;
        let id = self.alloc(NodeData {
            name,
            parent: None,
            children: Vec::new(),
            transform,
            visibility,
            drawable,
        });
        for child in children {
            let child_id = self.spawn(child);
            self.link(id, child_id);
        }
        id
    }

    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if child == self.root || self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }
        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    /// Remove `node` from its parent and release it with all descendants.
    ///
    /// Spawned nodes that were never attached can be released the same way.
    pub fn detach_from_parent(&mut self, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootCannotBeDetached);
        }
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }
        self.unlink(node);
        self.release(node);
        Ok(())
    }

    /// Pre-order walk of `root` and its descendants.
    pub fn enumerate_subtree(&self, root: NodeId, mut visitor: impl FnMut(NodeId)) {
        if !self.contains(root) {
            return;
        }
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            visitor(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
    }

    pub fn subtree_len(&self, root: NodeId) -> usize {
        let mut count = 0;
        self.enumerate_subtree(root, |_| count += 1);
        count
    }

    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), SceneError> {
        let data = self.node_mut(node).ok_or(SceneError::UnknownNode(node))?;
        data.visibility = if hidden {
            Visibility::hidden()
        } else {
            Visibility::visible()
        };
        Ok(())
    }

    pub fn is_hidden(&self, node: NodeId) -> Option<bool> {
        self.node(node).map(|n| !n.visibility.visible)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).and_then(|n| n.name.as_deref())
    }

    pub fn drawable(&self, node: NodeId) -> Option<Drawable3D> {
        self.node(node).and_then(|n| n.drawable)
    }

    pub fn transform(&self, node: NodeId) -> Option<Transform> {
        self.node(node).map(|n| n.transform)
    }

    /// Transform of `node` in root space (parents applied first).
    pub fn world_transform(&self, node: NodeId) -> Option<Mat4> {
        let mut data = self.node(node)?;
        let mut m = data.transform.local;
        while let Some(parent) = data.parent {
            data = self.node(parent)?;
            m = data.transform.local * m;
        }
        Some(m)
    }

    /// Every drawable reachable from the root whose node and ancestors are
    /// all visible, with its root-space transform.
    pub fn drawables(&self) -> Vec<(NodeId, Mat4, Drawable3D)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Mat4::IDENTITY)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(data) = self.node(id) else { continue };
            if !data.visibility.visible {
                continue;
            }
            let world = parent_world * data.transform.local;
            if let Some(drawable) = data.drawable {
                out.push((id, world, drawable));
            }
            stack.extend(data.children.iter().rev().map(|c| (*c, world)));
        }
        out
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(data);
            return NodeId(Handle::new(index, slot.generation));
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(data),
        });
        NodeId(Handle::new(index, 0))
    }

    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self.slots.get_mut(next.index() as usize) else {
                continue;
            };
            if slot.generation != next.generation() {
                continue;
            }
            let Some(data) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(next.index());
            self.live -= 1;
            stack.extend(data.children);
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = self.node_mut(child).and_then(|c| c.parent.take());
        if let Some(parent) = parent
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != child);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

impl SceneGraph for World {
    fn root(&self) -> NodeId {
        World::root(self)
    }

    fn spawn(&mut self, node: VisualNode) -> NodeId {
        World::spawn(self, node)
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        World::attach_child(self, parent, child)
    }

    fn detach_from_parent(&mut self, node: NodeId) -> Result<(), SceneError> {
        World::detach_from_parent(self, node)
    }

    fn enumerate_subtree(&self, root: NodeId, visitor: &mut dyn FnMut(NodeId)) {
        World::enumerate_subtree(self, root, visitor)
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> Result<(), SceneError> {
        World::set_hidden(self, node, hidden)
    }

    fn contains(&self, node: NodeId) -> bool {
        World::contains(self, node)
    }
}
