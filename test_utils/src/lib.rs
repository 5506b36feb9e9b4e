//! Shared fixtures for droplet integration tests.
pub mod app;
pub mod effects;
pub mod fixtures;

pub use app::{headless_app, CapturedTeardowns};
pub use effects::{EffectCall, RecordingEffects};
pub use fixtures::{
    build_operator, floor_scene, run_for, steady_settings, FRAME, SPOUT_HEIGHT,
};
