//! Geo-anchored annotations for an AR scene.
//!
//! [`AnnotationManager`] turns geo-tagged [`Annotation`]s into tracking
//! anchors placed relative to an origin location, and binds a visual node to
//! each annotation once the tracking engine materializes its anchor.

pub mod annotation;
pub mod config;
pub mod diagnostics;
pub mod manager;
pub mod node_factory;
pub mod placement;

pub use annotation::*;
pub use config::*;
pub use diagnostics::*;
pub use manager::*;
pub use node_factory::*;
pub use placement::*;
