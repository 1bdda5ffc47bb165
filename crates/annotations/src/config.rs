use scene::components::Color;
use serde::{Deserialize, Serialize};

/// Closest distance (meters) an anchor is placed from the origin.
pub const DEFAULT_MIN_DISTANCE_M: f64 = 120.0;
/// Farthest distance (meters) an anchor is placed from the origin.
pub const DEFAULT_MAX_DISTANCE_M: f64 = 250.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidBound { which: &'static str, value: f64 },
    InvertedBounds { min: f64, max: f64 },
    InvalidMarkerRadius(f64),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidBound { which, value } => {
                write!(f, "{which} anchor distance must be finite and >= 0, got {value}")
            }
            ConfigError::InvertedBounds { min, max } => {
                write!(f, "min anchor distance {min} exceeds max {max}")
            }
            ConfigError::InvalidMarkerRadius(r) => {
                write!(f, "marker radius must be finite and > 0, got {r}")
            }
            ConfigError::Parse(msg) => write!(f, "invalid annotation config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Range that true geographic distances are clamped into before placement.
///
/// Always satisfies `0 <= min_m <= max_m`, both finite.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDistanceBounds", into = "RawDistanceBounds")]
pub struct DistanceBounds {
    min_m: f64,
    max_m: f64,
}

#[derive(Serialize, Deserialize)]
struct RawDistanceBounds {
    min_m: f64,
    max_m: f64,
}

impl TryFrom<RawDistanceBounds> for DistanceBounds {
    type Error = ConfigError;

    fn try_from(raw: RawDistanceBounds) -> Result<Self, Self::Error> {
        DistanceBounds::new(raw.min_m, raw.max_m)
    }
}

impl From<DistanceBounds> for RawDistanceBounds {
    fn from(bounds: DistanceBounds) -> Self {
        Self {
            min_m: bounds.min_m,
            max_m: bounds.max_m,
        }
    }
}

impl Default for DistanceBounds {
    fn default() -> Self {
        Self {
            min_m: DEFAULT_MIN_DISTANCE_M,
            max_m: DEFAULT_MAX_DISTANCE_M,
        }
    }
}

impl DistanceBounds {
    pub fn new(min_m: f64, max_m: f64) -> Result<Self, ConfigError> {
        check_bound("min", min_m)?;
        check_bound("max", max_m)?;
        if min_m > max_m {
            return Err(ConfigError::InvertedBounds {
                min: min_m,
                max: max_m,
            });
        }
        Ok(Self { min_m, max_m })
    }

    pub fn min_m(&self) -> f64 {
        self.min_m
    }

    pub fn max_m(&self) -> f64 {
        self.max_m
    }

    /// Replace either bound, keeping the other. Fails if the merged pair is
    /// invalid; `self` is never modified.
    pub fn updated(&self, min_m: Option<f64>, max_m: Option<f64>) -> Result<Self, ConfigError> {
        Self::new(min_m.unwrap_or(self.min_m), max_m.unwrap_or(self.max_m))
    }

    pub fn clamp(&self, distance_m: f64) -> f64 {
        if distance_m.is_nan() {
            return self.min_m;
        }
        distance_m.clamp(self.min_m, self.max_m)
    }
}

fn check_bound(which: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidBound { which, value })
    }
}

/// Look of the marker used when no [`NodeFactory`](crate::NodeFactory)
/// supplies a node.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub radius_m: f64,
    pub color: Color,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius_m: 10.0,
            color: Color::RED,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub distance: DistanceBounds,
    pub marker: MarkerStyle,
}

impl AnnotationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        DistanceBounds::new(self.distance.min_m, self.distance.max_m)?;
        let r = self.marker.radius_m;
        if !(r.is_finite() && r > 0.0) {
            return Err(ConfigError::InvalidMarkerRadius(r));
        }
        Ok(())
    }
}
