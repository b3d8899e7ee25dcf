//! Scroll configuration
//!
//! Thresholds are stored in density-independent units and scaled to pixels on
//! read, so one config file serves every screen density.
//!
//! ```toml
//! density = 2.75
//! touch_slop_dp = 8
//! nested_scrolling_enabled = true
//! ```

use std::fs;
use std::path::Path;

use nestscroll_core::{Result, ScrollError};
use serde::{Deserialize, Serialize};

/// Gesture and fling tuning for one scroll view
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels per density-independent pixel
    pub density: f64,
    /// Movement before a touch becomes a drag, dp
    pub touch_slop_dp: f64,
    /// Slowest release that still flings, dp/s
    pub min_fling_velocity_dp: f64,
    /// Release velocity cap, dp/s
    pub max_fling_velocity_dp: f64,
    /// Spline fling friction
    pub scroll_friction: f64,
    /// Position slack past the content range when overscroll is allowed, px
    pub max_overscroll: i32,
    pub nested_scrolling_enabled: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            touch_slop_dp: 8.0,
            min_fling_velocity_dp: 50.0,
            max_fling_velocity_dp: 8000.0,
            scroll_friction: nestscroll_animation::DEFAULT_SCROLL_FRICTION,
            max_overscroll: 0,
            nested_scrolling_enabled: true,
        }
    }
}

impl ScrollConfig {
    /// Defaults for a screen of the given density
    pub fn with_density(density: f64) -> Self {
        Self {
            density,
            ..Default::default()
        }
    }

    /// Parse from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ScrollConfig =
            toml::from_str(text).map_err(|e| ScrollError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ScrollError::ConfigParse(e.to_string()))
    }

    /// Touch slop in whole pixels
    pub fn touch_slop(&self) -> i32 {
        (self.touch_slop_dp * self.density + 0.5) as i32
    }

    /// Minimum fling velocity, px/s
    pub fn min_fling_velocity(&self) -> f64 {
        (self.min_fling_velocity_dp * self.density + 0.5).floor()
    }

    /// Maximum fling velocity, px/s
    pub fn max_fling_velocity(&self) -> f64 {
        (self.max_fling_velocity_dp * self.density + 0.5).floor()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(invalid("density", format!("must be positive, got {}", self.density)));
        }
        if !(self.touch_slop_dp.is_finite() && self.touch_slop_dp >= 0.0) {
            return Err(invalid(
                "touch_slop_dp",
                format!("must be non-negative, got {}", self.touch_slop_dp),
            ));
        }
        if !(self.min_fling_velocity_dp >= 0.0) {
            return Err(invalid(
                "min_fling_velocity_dp",
                format!("must be non-negative, got {}", self.min_fling_velocity_dp),
            ));
        }
        if !(self.max_fling_velocity_dp >= self.min_fling_velocity_dp) {
            return Err(invalid(
                "max_fling_velocity_dp",
                format!(
                    "{} is below min_fling_velocity_dp {}",
                    self.max_fling_velocity_dp, self.min_fling_velocity_dp
                ),
            ));
        }
        if !(self.scroll_friction.is_finite() && self.scroll_friction > 0.0) {
            return Err(invalid(
                "scroll_friction",
                format!("must be positive, got {}", self.scroll_friction),
            ));
        }
        if self.max_overscroll < 0 {
            return Err(invalid(
                "max_overscroll",
                format!("must be non-negative, got {}", self.max_overscroll),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ScrollError {
    ScrollError::InvalidConfig { field, reason }
}
