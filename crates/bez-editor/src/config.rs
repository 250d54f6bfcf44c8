use bez_core::{CurveError, Result, Tolerance};
use bez_math::Plane;
use serde::{Deserialize, Serialize};

/// Session settings for a [`crate::CurveEditor`]. Fixed for the editor's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Samples per segment in the rendered polyline.
    pub resolution: usize,
    /// Plane every point is projected onto.
    pub plane: Plane,
    /// Perpendicular handle offset, as a fraction of the anchor distance.
    pub handle_offset: f64,
    pub tolerance: Tolerance,
}

impl EditorConfig {
    pub const DEFAULT_RESOLUTION: usize = 1000;
    pub const DEFAULT_HANDLE_OFFSET: f64 = 0.25;

    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(CurveError::Config("resolution must be at least 1".into()));
        }
        if !self.plane.is_normalized() {
            return Err(CurveError::Config(format!(
                "plane normal must have unit length, got {:?}",
                self.plane.normal
            )));
        }
        if !self.handle_offset.is_finite() {
            return Err(CurveError::Config("handle_offset must be finite".into()));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            resolution: Self::DEFAULT_RESOLUTION,
            plane: Plane::xy(),
            handle_offset: Self::DEFAULT_HANDLE_OFFSET,
            tolerance: Tolerance::default(),
        }
    }
}
