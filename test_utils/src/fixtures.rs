//! Deterministic settings and helpers that drive an operator through time.
use droplets::config::{EmissionConfig, FloatRange, OperatorSettings};
use droplets::{DropletOperator, EffectSink, StaticScene};
use glam::Vec3;

/// Fixed step used by [`run_for`].
pub const FRAME: f32 = 1.0 / 60.0;

/// A point one unit above the floor; straight-down drops land in ~0.17 s.
pub const SPOUT_HEIGHT: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Floor plane at `y = 0`.
pub fn floor_scene() -> StaticScene {
    StaticScene::with_floor(0.0)
}

/// Settings with every random range collapsed to a constant.
///
/// Droplets launch at 5 u/s without lateral jitter, land at size 0.5,
/// rest for one second and decay over half a second.
pub fn steady_settings(capacity: usize) -> OperatorSettings {
    let defaults = EmissionConfig::default();
    OperatorSettings {
        capacity,
        emission: EmissionConfig {
            velocity: FloatRange::constant(0.5),
            random_offset: false,
            size: FloatRange::constant(0.5),
            transparency: FloatRange::constant(0.2),
            decay_delay: FloatRange::constant(1.0),
            splash_amount: FloatRange::constant(5.0),
            decay: droplets::TweenTiming {
                duration: 0.5,
                ..defaults.decay
            },
            ..defaults
        },
        ..OperatorSettings::default()
    }
}

/// Builds a seeded operator over [`floor_scene`].
///
/// # Panics
/// Panics if `settings` are invalid.
pub fn build_operator(settings: OperatorSettings, effects: impl EffectSink + 'static) -> DropletOperator {
    DropletOperator::new(settings, floor_scene(), effects)
        .unwrap_or_else(|err| panic!("test settings should be valid: {err}"))
        .with_seed(42)
}

/// Advances `operator` in [`FRAME`] steps until `seconds` have passed.
pub fn run_for(operator: &mut DropletOperator, seconds: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds {
        operator.advance(FRAME);
        elapsed += FRAME;
    }
}
