//! Scenario runner: place a batch of geo annotations around an origin using
//! the simulated tracking session and report where each one landed.

use std::collections::BTreeMap;
use std::path::Path;

use annotations::{Annotation, AnnotationConfig, AnnotationManager, ConfigError, plan_placement};
use foundation::math::{GeoCoordinate, Mat4, Vec3};
use scene::World;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracking::{MaterializationOrder, SimulatedSession};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub origin: GeoCoordinate,
    #[serde(default)]
    pub config: Option<AnnotationConfig>,
    pub annotations: Vec<ScenarioAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScenarioAnnotation {
    #[serde(default)]
    pub title: Option<String>,
    pub location: Option<GeoCoordinate>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ToolError> {
        serde_json::from_str(json).map_err(|e| ToolError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ToolError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ToolError::Io(format!("read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }
}

/// Overrides applied on top of the scenario's own configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub min_distance_m: Option<f64>,
    pub max_distance_m: Option<f64>,
    pub order: MaterializationOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReport {
    pub title: Option<String>,
    pub placed: bool,
    pub materialized: bool,
    pub true_distance_m: Option<f64>,
    pub distance_m: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub position: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub origin: GeoCoordinate,
    pub min_distance_m: f64,
    pub max_distance_m: f64,
    pub placements: Vec<PlacementReport>,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    Io(String),
    Parse(String),
    Config(ConfigError),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Io(msg) => write!(f, "io error: {msg}"),
            ToolError::Parse(msg) => write!(f, "invalid scenario: {msg}"),
            ToolError::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        ToolError::Config(err)
    }
}

pub fn run_scenario(scenario: &Scenario, options: RunOptions) -> Result<Report, ToolError> {
    let config = scenario.config.unwrap_or_default();
    let mut manager = AnnotationManager::with_config(
        SimulatedSession::with_order(options.order),
        World::new(),
        config,
    )?;
    manager.set_anchor_distance_bounds(options.min_distance_m, options.max_distance_m)?;
    manager.set_origin(scenario.origin);

    let annotations: Vec<_> = scenario
        .annotations
        .iter()
        .map(|entry| {
            let mut annotation = match entry.location {
                Some(location) => Annotation::new(location),
                None => Annotation::unlocated(),
            };
            if let Some(title) = &entry.title {
                annotation = annotation.with_title(title.clone());
            }
            for (key, value) in &entry.properties {
                annotation = annotation.with_property(key.clone(), value.clone());
            }
            annotation.shared()
        })
        .collect();

    manager.add_annotations(&annotations);
    let materialized = manager.pump();
    info!(
        "placed {} of {} annotations, {materialized} materialized",
        manager.anchors().len(),
        annotations.len()
    );

    let bounds = manager.anchor_distance_bounds();
    let placements = annotations
        .iter()
        .map(|annotation| {
            let nodes = manager.nodes_for(annotation);
            let position = nodes
                .first()
                .and_then(|node| manager.scene().world_transform(*node))
                .map(|m| m.translation());
            let planned = annotation
                .location()
                .filter(|_| annotation.is_placed())
                .map(|target| plan_placement(&Mat4::IDENTITY, scenario.origin, target, bounds));
            PlacementReport {
                title: annotation.title().map(str::to_string),
                placed: annotation.is_placed(),
                materialized: !nodes.is_empty(),
                true_distance_m: planned.map(|p| p.true_distance_m),
                distance_m: planned.map(|p| p.distance_m),
                bearing_deg: planned.map(|p| p.bearing_rad.to_degrees()),
                position,
            }
        })
        .collect();

    Ok(Report {
        origin: scenario.origin,
        min_distance_m: bounds.min_m(),
        max_distance_m: bounds.max_m(),
        placements,
        diagnostics: manager
            .diagnostics_mut()
            .drain()
            .iter()
            .map(ToString::to_string)
            .collect(),
    })
}

pub fn render_text(report: &Report) -> String {
    let mut out = format!(
        "origin {:.6}, {:.6}  bounds {:.0}..{:.0} m\n",
        report.origin.latitude,
        report.origin.longitude,
        report.min_distance_m,
        report.max_distance_m
    );
    for (i, p) in report.placements.iter().enumerate() {
        let title = p.title.as_deref().unwrap_or("(untitled)");
        match (p.true_distance_m, p.distance_m, p.bearing_deg, p.position) {
            (Some(true_m), Some(used_m), Some(bearing), Some(pos)) => out.push_str(&format!(
                "{i:>3} {title}: {true_m:.1} m -> {used_m:.1} m @ {bearing:.1} deg  ({:.2}, {:.2}, {:.2})\n",
                pos.x, pos.y, pos.z
            )),
            (Some(true_m), Some(used_m), Some(bearing), None) => out.push_str(&format!(
                "{i:>3} {title}: {true_m:.1} m -> {used_m:.1} m @ {bearing:.1} deg  (pending)\n"
            )),
            _ => out.push_str(&format!("{i:>3} {title}: not placed\n")),
        }
    }
    for d in &report.diagnostics {
        out.push_str(&format!("warning: {d}\n"));
    }
    out
}
