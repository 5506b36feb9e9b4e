//! Tunable parameters for emissions, the caster and the operator.
//!
//! Every type here is `serde`-friendly so presets can be kept in JSON next to
//! the scene that uses them. An [`EmissionConfig`] is snapshotted per droplet:
//! the operator clones its default, layers an [`EmissionOverrides`] on top and
//! keeps the result until the droplet lands.
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::droplet::DropletTemplate;
use crate::error::ConfigError;
use crate::random::DropletRng;
use crate::{DEFAULT_CAPACITY, DEFAULT_CONTAINER_NAME, GRAVITY_PULL, MAX_CAST_DISTANCE};

/// Closed interval sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl FloatRange {
    /// Creates a range from its bounds.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always samples `value`.
    #[must_use]
    pub const fn constant(value: f32) -> Self {
        Self::new(value, value)
    }

    /// Draws a value from the range.
    pub fn sample(&self, rng: &mut DropletRng) -> f32 {
        rng.uniform(self.min, self.max)
    }

    const fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Timing curve applied to tween progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant rate.
    #[default]
    Linear,
    /// Accelerating quadratic.
    QuadIn,
    /// Decelerating quadratic.
    QuadOut,
    /// Quadratic ease in and out.
    QuadInOut,
    /// Decelerating cubic.
    CubicOut,
    /// Decelerating quarter sine.
    SineOut,
    /// Overshoots slightly before settling.
    BackOut,
}

impl Easing {
    /// Maps linear `progress` in `[0, 1]` to eased progress.
    ///
    /// Input outside the unit interval is clamped first.
    ///
    /// # Examples
    /// ```
    /// use droplets::config::Easing;
    /// assert_eq!(Easing::QuadOut.apply(0.0), 0.0);
    /// assert!((Easing::QuadOut.apply(0.5) - 0.75).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::SineOut => (t * FRAC_PI_2).sin(),
            Self::BackOut => {
                const OVERSHOOT: f32 = 1.701_58;
                let shifted = t - 1.0;
                1.0 + (OVERSHOOT + 1.0) * shifted.powi(3) + OVERSHOOT * shifted.powi(2)
            }
        }
    }

    /// Whether eased progress can leave `[0, 1]` before the end.
    #[must_use]
    pub const fn overshoots(self) -> bool {
        matches!(self, Self::BackOut)
    }
}

/// Duration and curve of one named transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TweenTiming {
    /// Seconds from start to completion.
    pub duration: f32,
    /// Curve applied to progress.
    pub easing: Easing,
}

impl TweenTiming {
    /// Creates a timing.
    #[must_use]
    pub const fn new(duration: f32, easing: Easing) -> Self {
        Self { duration, easing }
    }

    const fn validate(&self, curve: &'static str) -> Result<(), ConfigError> {
        if self.duration >= 0.0 && self.duration.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NegativeDuration {
                curve,
                duration: self.duration,
            })
        }
    }
}

/// Visual style of a droplet once it lands.
///
/// Only pools of the same kind merge with one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropletKind {
    /// A volumetric blob that keeps some height on the surface.
    #[default]
    Droplet,
    /// A flat projected splat with no height.
    Decal,
}

impl DropletKind {
    /// Returns `true` for flat decal droplets.
    #[must_use]
    pub const fn is_decal(self) -> bool {
        matches!(self, Self::Decal)
    }
}

/// Linear RGB tint applied to the droplet skin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Color {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.32, 0.52, 0.86)
    }
}

/// Snapshot of everything that shapes a single droplet's life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionConfig {
    /// Launch speed before [`crate::VELOCITY_MULTIPLIER`] is applied.
    pub velocity: FloatRange,
    /// Per-axis lateral jitter applied to the spawn origin.
    pub spawn_offset: FloatRange,
    /// Whether [`Self::spawn_offset`] is applied at all.
    pub random_offset: bool,
    /// Landed style.
    pub kind: DropletKind,
    /// Skin tint.
    pub color: Color,
    /// Resting size, sampled independently per axis.
    pub size: FloatRange,
    /// Initial transparency of a landed pool.
    pub transparency: FloatRange,
    /// Seconds a pool rests before it starts to decay.
    pub decay_delay: FloatRange,
    /// Splash particles emitted on impact.
    pub splash_amount: FloatRange,
    /// Derive the splash amount from impact speed instead of
    /// [`Self::splash_amount`].
    pub splash_from_velocity: bool,
    /// Whether landing droplets may merge into nearby pools.
    pub merge: bool,
    /// Search radius for merge candidates.
    pub merge_radius: f32,
    /// Largest horizontal extent a merged pool may grow to.
    pub max_size: f32,
    /// Divides impact speed when computing merge growth.
    pub expand_divisor: f32,
    /// Show a trail while in flight.
    pub trail: bool,
    /// Show the droplet mesh while in flight.
    pub visible_in_flight: bool,
    /// Shrink towards nothing while decaying instead of only fading.
    pub shrink_on_decay: bool,
    /// Sound names picked at random on impact. Empty means silent.
    pub impact_sounds: Vec<String>,
    /// Growth from flight size to resting size after landing.
    pub landed: TweenTiming,
    /// Shrink and fade before returning to the pool.
    pub decay: TweenTiming,
    /// Growth of a pool absorbing a merged droplet.
    pub expand: TweenTiming,
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            velocity: FloatRange::new(0.6, 1.0),
            spawn_offset: FloatRange::new(-0.25, 0.25),
            random_offset: true,
            kind: DropletKind::Droplet,
            color: Color::default(),
            size: FloatRange::new(0.4, 0.8),
            transparency: FloatRange::new(0.1, 0.3),
            decay_delay: FloatRange::new(8.0, 12.0),
            splash_amount: FloatRange::new(4.0, 8.0),
            splash_from_velocity: false,
            merge: true,
            merge_radius: 1.0,
            max_size: 2.5,
            expand_divisor: 10.0,
            trail: true,
            visible_in_flight: true,
            shrink_on_decay: true,
            impact_sounds: vec![
                "drip_1".to_owned(),
                "drip_2".to_owned(),
                "drip_3".to_owned(),
            ],
            landed: TweenTiming::new(0.35, Easing::QuadOut),
            decay: TweenTiming::new(1.5, Easing::Linear),
            expand: TweenTiming::new(0.5, Easing::CubicOut),
        }
    }
}

const fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

impl EmissionConfig {
    /// Checks ranges, curves and merge limits.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.velocity.validate("velocity")?;
        self.spawn_offset.validate("spawn_offset")?;
        self.size.validate("size")?;
        self.transparency.validate("transparency")?;
        self.decay_delay.validate("decay_delay")?;
        self.splash_amount.validate("splash_amount")?;
        self.landed.validate("landed")?;
        self.decay.validate("decay")?;
        self.expand.validate("expand")?;
        ensure_positive("expand_divisor", self.expand_divisor)?;
        if self.impact_sounds.iter().any(String::is_empty) {
            return Err(ConfigError::EmptySoundName);
        }
        if self.merge {
            ensure_positive("merge_radius", self.merge_radius)?;
            ensure_positive("max_size", self.max_size)?;
            if self.size.max > self.max_size {
                return Err(ConfigError::SizeExceedsMergeCap {
                    size_max: self.size.max,
                    max_size: self.max_size,
                });
            }
            // Merged pools tween straight towards their capped size.
            if self.expand.easing.overshoots() {
                return Err(ConfigError::OvershootingExpand {
                    easing: self.expand.easing,
                });
            }
        }
        Ok(())
    }

    /// Clones `self` and overwrites every field present in `overrides`.
    ///
    /// # Examples
    /// ```
    /// use droplets::config::{DropletKind, EmissionConfig, EmissionOverrides};
    /// let overrides = EmissionOverrides {
    ///     kind: Some(DropletKind::Decal),
    ///     ..EmissionOverrides::default()
    /// };
    /// let config = EmissionConfig::default().with_overrides(&overrides);
    /// assert_eq!(config.kind, DropletKind::Decal);
    /// assert!(config.merge);
    /// ```
    #[must_use]
    pub fn with_overrides(&self, overrides: &EmissionOverrides) -> Self {
        let mut config = self.clone();
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &overrides.$field {
                        config.$field = value.clone();
                    }
                )*
            };
        }
        overlay!(
            velocity,
            spawn_offset,
            random_offset,
            kind,
            color,
            size,
            transparency,
            decay_delay,
            splash_amount,
            splash_from_velocity,
            merge,
            merge_radius,
            max_size,
            expand_divisor,
            trail,
            visible_in_flight,
            shrink_on_decay,
            impact_sounds,
            landed,
            decay,
            expand,
        );
        config
    }
}

/// Caller-supplied changes to the default emission.
///
/// Unknown keys are rejected when deserialising so typos in presets surface
/// as errors instead of silently doing nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[expect(missing_docs, reason = "Fields mirror EmissionConfig one to one.")]
pub struct EmissionOverrides {
    pub velocity: Option<FloatRange>,
    pub spawn_offset: Option<FloatRange>,
    pub random_offset: Option<bool>,
    pub kind: Option<DropletKind>,
    pub color: Option<Color>,
    pub size: Option<FloatRange>,
    pub transparency: Option<FloatRange>,
    pub decay_delay: Option<FloatRange>,
    pub splash_amount: Option<FloatRange>,
    pub splash_from_velocity: Option<bool>,
    pub merge: Option<bool>,
    pub merge_radius: Option<f32>,
    pub max_size: Option<f32>,
    pub expand_divisor: Option<f32>,
    pub trail: Option<bool>,
    pub visible_in_flight: Option<bool>,
    pub shrink_on_decay: Option<bool>,
    pub impact_sounds: Option<Vec<String>>,
    pub landed: Option<TweenTiming>,
    pub decay: Option<TweenTiming>,
    pub expand: Option<TweenTiming>,
}

impl EmissionOverrides {
    /// Parses a preset from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Ballistics shared by every flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasterSettings {
    /// Constant acceleration applied during flight.
    pub gravity: Vec3,
    /// Travelled distance after which a flight is abandoned.
    pub max_distance: f32,
}

impl Default for CasterSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, GRAVITY_PULL, 0.0),
            max_distance: MAX_CAST_DISTANCE,
        }
    }
}

/// Everything needed to build a [`crate::operator::DropletOperator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorSettings {
    /// Number of pooled droplets.
    pub capacity: usize,
    /// Name of the container holding active droplets.
    pub container_name: String,
    /// State every pooled droplet is reset to.
    pub template: DropletTemplate,
    /// Flight ballistics.
    pub caster: CasterSettings,
    /// Default emission that overrides are layered on.
    pub emission: EmissionConfig,
}

impl Default for OperatorSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            container_name: DEFAULT_CONTAINER_NAME.to_owned(),
            template: DropletTemplate::default(),
            caster: CasterSettings::default(),
            emission: EmissionConfig::default(),
        }
    }
}

impl OperatorSettings {
    /// Checks the capacity, caster and default emission.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        ensure_positive("caster.max_distance", self.caster.max_distance)?;
        self.emission.validate()
    }

    /// Parses and validates settings from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any validation
    /// error.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] when the file cannot be read or parsed,
    /// or any validation error.
    pub fn from_json_file(file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = file.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Parse(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&text)
    }
}
