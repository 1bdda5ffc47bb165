pub mod components;
pub mod entity;
pub mod graph;
pub mod node;
pub mod world;

pub use entity::NodeId;
pub use graph::*;
pub use node::VisualNode;
pub use world::*;
