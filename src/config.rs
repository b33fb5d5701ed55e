use crate::error::ConfigError;
use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub rough: RoughConfig,
    pub freehand: FreehandConfig,
    pub viewport: ViewportConfig,
    pub flatten_tolerance: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rough: RoughConfig::default(),
            freehand: FreehandConfig::default(),
            viewport: ViewportConfig::default(),
            flatten_tolerance: 0.5,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid render configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.flatten_tolerance.is_finite() && self.flatten_tolerance > 0.0) {
            return Err(ConfigError::InvalidTolerance(self.flatten_tolerance));
        }
        self.viewport.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoughConfig {
    pub max_randomness_offset: f64,
    pub bowing: f64,
    pub curve_step_count: f64,
    pub curve_tightness: f64,
    pub curve_fitting: f64,
    pub hachure_angle: f64,
    /// Hachure gap as a multiple of the stroke width.
    pub hachure_gap_factor: f64,
}

impl Default for RoughConfig {
    fn default() -> Self {
        Self {
            max_randomness_offset: 2.0,
            bowing: 1.0,
            curve_step_count: 9.0,
            curve_tightness: 0.0,
            curve_fitting: 0.95,
            hachure_angle: -41.0,
            hachure_gap_factor: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FreehandConfig {
    pub size_multiplier: f64,
    pub thinning: f64,
    pub smoothing: f64,
    pub streamline: f64,
}

impl Default for FreehandConfig {
    fn default() -> Self {
        Self {
            size_multiplier: 4.25,
            thinning: 0.6,
            smoothing: 0.5,
            streamline: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewportConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_zoom, self.max_zoom);
        if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            Ok(())
        } else {
            Err(ConfigError::InvalidZoomRange { min, max })
        }
    }

    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let pick = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let min = pick(self.min_zoom, defaults.min_zoom);
        let max = pick(self.max_zoom, defaults.max_zoom);
        Self {
            min_zoom: min.min(max),
            max_zoom: min.max(max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json_str(r#"{ "freehand": { "thinning": 0.2 } }"#).unwrap();
        assert_eq!(config.freehand.thinning, 0.2);
        assert_eq!(config.freehand.size_multiplier, 4.25);
        assert_eq!(config.rough, RoughConfig::default());
    }

    #[test]
    fn test_reversed_zoom_range_is_rejected() {
        let err = RenderConfig::from_json_str(r#"{ "viewport": { "minZoom": 20, "maxZoom": 10 } }"#).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidZoomRange { min: 20.0, max: 10.0 })
        );
        let err = RenderConfig::from_json_str(r#"{ "flattenTolerance": 0 }"#).unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::InvalidTolerance(0.0)));
    }

    #[test]
    fn test_normalized_zoom_range() {
        let swapped = ViewportConfig { min_zoom: 20.0, max_zoom: 10.0 }.normalized();
        assert_eq!((swapped.min_zoom, swapped.max_zoom), (10.0, 20.0));
        let repaired = ViewportConfig { min_zoom: f64::NAN, max_zoom: -1.0 }.normalized();
        assert_eq!(repaired, ViewportConfig::default());
        assert!(repaired.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = RenderConfig::from_json_str("{ nope").unwrap_err();
        assert!(err.to_string().contains("invalid render configuration"));
    }
}
