//! Spatial-tracking session seam.
//!
//! A tracking engine ingests anchors, decides on its own schedule when each
//! one becomes renderable, and reports that moment as a [`NodeAdded`]
//! notification carrying an engine-owned placeholder node.

pub mod anchor;
pub mod session;
pub mod simulated;

pub use anchor::*;
pub use session::*;
pub use simulated::*;
