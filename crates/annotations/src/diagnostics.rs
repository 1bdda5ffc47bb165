use std::collections::VecDeque;

use foundation::math::GeoCoordinate;
use scene::{NodeId, SceneError};
use tracing::{error, warn};
use tracking::AnchorId;

use crate::annotation::AnnotationId;

/// Conditions the manager recovers from locally instead of failing the call.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An annotation was submitted before any origin location was set.
    OriginNotSet { annotation: AnnotationId },
    /// The origin location is not a finite, in-range coordinate.
    InvalidOrigin {
        annotation: AnnotationId,
        origin: GeoCoordinate,
    },
    LocationMissing { annotation: AnnotationId },
    InvalidLocation {
        annotation: AnnotationId,
        location: GeoCoordinate,
    },
    AlreadyPlaced {
        annotation: AnnotationId,
        anchor: AnchorId,
    },
    /// The engine materialized an anchor this manager does not track.
    UnrecognizedAnchor { anchor: AnchorId },
    /// Internal bookkeeping disagreed with itself. A partially registered
    /// entry is cleaned up; an anchor mapped to another annotation is left alone.
    InvariantViolation { detail: String },
    SceneRejected {
        annotation: AnnotationId,
        node: NodeId,
        error: SceneError,
    },
}

/// Coarse grouping of [`Diagnostic`]s.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    PreconditionViolation,
    UnrecognizedAnchor,
    InvariantViolation,
    Scene,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::OriginNotSet { .. }
            | Diagnostic::InvalidOrigin { .. }
            | Diagnostic::LocationMissing { .. }
            | Diagnostic::InvalidLocation { .. }
            | Diagnostic::AlreadyPlaced { .. } => DiagnosticKind::PreconditionViolation,
            Diagnostic::UnrecognizedAnchor { .. } => DiagnosticKind::UnrecognizedAnchor,
            Diagnostic::InvariantViolation { .. } => DiagnosticKind::InvariantViolation,
            Diagnostic::SceneRejected { .. } => DiagnosticKind::Scene,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::OriginNotSet { annotation } => {
                write!(f, "{annotation} not placed: origin location is not set")
            }
            Diagnostic::InvalidOrigin { annotation, origin } => write!(
                f,
                "{annotation} not placed: invalid origin ({}, {})",
                origin.latitude, origin.longitude
            ),
            Diagnostic::LocationMissing { annotation } => {
                write!(f, "{annotation} not placed: location is missing")
            }
            Diagnostic::InvalidLocation {
                annotation,
                location,
            } => write!(
                f,
                "{annotation} not placed: invalid location ({}, {})",
                location.latitude, location.longitude
            ),
            Diagnostic::AlreadyPlaced { annotation, anchor } => {
                write!(f, "{annotation} already placed with {anchor}")
            }
            Diagnostic::UnrecognizedAnchor { anchor } => {
                write!(f, "ignoring node for unrecognized {anchor}")
            }
            Diagnostic::InvariantViolation { detail } => {
                write!(f, "annotation bookkeeping inconsistent: {detail}")
            }
            Diagnostic::SceneRejected {
                annotation,
                node,
                error,
            } => write!(f, "scene rejected {node} for {annotation}: {error}"),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Bounded record of recent diagnostics, newest last.
///
/// Every entry is also logged through `tracing` when emitted.
#[derive(Debug)]
pub struct DiagnosticLog {
    capacity: usize,
    entries: VecDeque<Diagnostic>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl DiagnosticLog {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` entries (at least one), dropping the oldest.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.kind() {
            DiagnosticKind::InvariantViolation => error!("{diagnostic}"),
            _ => warn!("{diagnostic}"),
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(diagnostic);
    }

    pub fn entries(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        self.entries.drain(..).collect()
    }
}
