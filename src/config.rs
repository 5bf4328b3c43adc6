//! Tunable parameters for launches, bursts, and drawing
//!
//! Defaults reproduce the site's New Year look. A page can override any
//! subset from YAML:
//!
//! ```yaml
//! launch:
//!   interval_ms: { min: 400, max: 900 }
//! burst:
//!   gravity: 0.05
//! themes: [theme-newyear]
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{FireworksError, Result};
use crate::random::RandomSource;
use crate::theme::Theme;

/// Half-open sampling interval `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.range(self.min, self.max)
    }

    fn check(&self, name: &str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(FireworksError::InvalidConfig(format!("{} must be finite", name)));
        }
        if self.min > self.max {
            return Err(FireworksError::InvalidConfig(format!(
                "{} min {} exceeds max {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Parameters controlling rocket launches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchParams {
    /// Delay between launches, re-rolled after every launch (ms)
    pub interval_ms: Span,
    /// Upward pixels per frame
    pub ascent_speed: Span,
    /// Burst altitude as a fraction of canvas height, from the top
    pub target_band: Span,
    /// Size multiplier applied to the rocket and its burst
    pub scale: Span,
    /// Trail points kept behind the rocket head
    pub trail_length: usize,
}

impl Default for LaunchParams {
    fn default() -> Self {
        Self {
            interval_ms: Span::new(250.0, 500.0),
            ascent_speed: Span::new(8.0, 12.0),
            target_band: Span::new(0.1, 0.4),
            scale: Span::new(0.5, 2.0),
            trail_length: 5,
        }
    }
}

/// Parameters controlling the spark burst and its physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstParams {
    /// Base spark count before the rocket's scale is applied
    pub count: Span,
    /// Initial spark speed before scaling (px per frame)
    pub speed: Span,
    /// Life lost per frame (life starts at 1.0)
    pub decay: Span,
    /// Spark radius before scaling (px)
    pub radius: Span,
    /// Extra random angle added to each evenly spaced spark (radians)
    pub angle_jitter: f64,
    /// Total per-channel color spread, split evenly above and below the base
    pub color_jitter: f64,
    /// Downward velocity added per frame
    pub gravity: f64,
    /// Velocity multiplier per frame
    pub air_resistance: f64,
}

impl Default for BurstParams {
    fn default() -> Self {
        Self {
            count: Span::new(50.0, 80.0),
            speed: Span::new(2.0, 6.0),
            decay: Span::new(0.015, 0.025),
            radius: Span::new(2.0, 4.0),
            angle_jitter: 0.5,
            color_jitter: 30.0,
            gravity: 0.1,
            air_resistance: 0.98,
        }
    }
}

/// Stroke and fill sizes for rockets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleParams {
    pub trail_alpha: f64,
    /// Trail stroke width before scaling
    pub trail_width: f64,
    /// Rocket head radius before scaling
    pub head_radius: f64,
}

impl Default for StyleParams {
    fn default() -> Self {
        Self {
            trail_alpha: 0.9,
            trail_width: 2.0,
            head_radius: 3.0,
        }
    }
}

/// Most sparks a single burst may produce
pub const MAX_BURST_SPARKS: usize = 2000;

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworksConfig {
    pub launch: LaunchParams,
    pub burst: BurstParams,
    pub style: StyleParams,
    /// Quiet period before a viewport resize is applied (ms)
    pub resize_debounce_ms: u32,
    /// Body themes that switch the fireworks on
    pub themes: Vec<Theme>,
}

impl Default for FireworksConfig {
    fn default() -> Self {
        Self {
            launch: LaunchParams::default(),
            burst: BurstParams::default(),
            style: StyleParams::default(),
            resize_debounce_ms: 150,
            themes: Theme::FIREWORKS.to_vec(),
        }
    }
}

impl FireworksConfig {
    /// Parse from YAML, filling omitted fields with defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: FireworksConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<()> {
        let launch = &self.launch;
        launch.interval_ms.check("launch.interval_ms")?;
        launch.ascent_speed.check("launch.ascent_speed")?;
        launch.target_band.check("launch.target_band")?;
        launch.scale.check("launch.scale")?;

        if launch.interval_ms.min < 1.0 {
            return Err(FireworksError::InvalidConfig(
                "launch.interval_ms must be at least 1ms".to_string(),
            ));
        }
        if launch.ascent_speed.min <= 0.0 {
            return Err(FireworksError::InvalidConfig(
                "launch.ascent_speed must be positive".to_string(),
            ));
        }
        if launch.target_band.min < 0.0 || launch.target_band.max > 1.0 {
            return Err(FireworksError::InvalidConfig(
                "launch.target_band must lie within [0, 1]".to_string(),
            ));
        }
        if launch.scale.min <= 0.0 {
            return Err(FireworksError::InvalidConfig(
                "launch.scale must be positive".to_string(),
            ));
        }
        if launch.trail_length == 0 {
            return Err(FireworksError::InvalidConfig(
                "launch.trail_length must be at least 1".to_string(),
            ));
        }

        let burst = &self.burst;
        burst.count.check("burst.count")?;
        burst.speed.check("burst.speed")?;
        burst.decay.check("burst.decay")?;
        burst.radius.check("burst.radius")?;

        // Sparks must always lose life or they never leave the active set
        if burst.decay.min <= 0.0 {
            return Err(FireworksError::InvalidConfig(
                "burst.decay must be positive".to_string(),
            ));
        }
        if burst.count.min < 0.0 || burst.radius.min < 0.0 || burst.speed.min < 0.0 {
            return Err(FireworksError::InvalidConfig(
                "burst count, speed and radius must not be negative".to_string(),
            ));
        }
        if burst.count.max * launch.scale.max > MAX_BURST_SPARKS as f64 {
            return Err(FireworksError::InvalidConfig(format!(
                "burst.count times launch.scale may not exceed {} sparks",
                MAX_BURST_SPARKS
            )));
        }
        if !(0.0..=1.0).contains(&burst.air_resistance) {
            return Err(FireworksError::InvalidConfig(
                "burst.air_resistance must lie within [0, 1]".to_string(),
            ));
        }
        for (name, value) in [
            ("burst.angle_jitter", burst.angle_jitter),
            ("burst.color_jitter", burst.color_jitter),
            ("burst.gravity", burst.gravity),
        ] {
            if !value.is_finite() {
                return Err(FireworksError::InvalidConfig(format!("{} must be finite", name)));
            }
        }

        if !(0.0..=1.0).contains(&self.style.trail_alpha) {
            return Err(FireworksError::InvalidConfig(
                "style.trail_alpha must lie within [0, 1]".to_string(),
            ));
        }

        Ok(())
    }
}
