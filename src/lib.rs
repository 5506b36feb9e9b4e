#![cfg_attr(docsrs, feature(doc_cfg))]
//! Pooled droplet projectiles that splash onto surfaces, merge into nearby
//! puddles and fade away.
//!
//! The [`DropletOperator`] owns a fixed pool of droplets. Each emission flies
//! a ballistic arc until it strikes scene geometry, then either settles into a
//! pool that later decays back into the object pool, or merges into a nearby
//! pool of the same kind. [`DropletPlugin`] runs the operator inside a Bevy
//! app.
pub mod cache;
pub mod config;
pub mod constants;
pub mod droplet;
pub mod effects;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod operator;
pub mod plugin;
pub mod random;
pub mod registry;
pub mod schedule;
pub mod search;
pub mod trajectory;
pub mod tween;
pub mod vector_math;
pub use constants::*;

// Re-export commonly used items
pub use cache::DropletCache;
pub use config::{
    CasterSettings, DropletKind, EmissionConfig, EmissionOverrides, FloatRange, OperatorSettings,
    TweenTiming,
};
pub use droplet::{Droplet, DropletState, DropletTemplate, SlotId};
pub use effects::{EffectSink, LogEffects};
pub use error::ConfigError;
pub use geometry::{RayHit, RaycastFilter, Raycaster, StaticScene, SurfaceId};
pub use logging::init as init_logging;
pub use operator::{DropletOperator, OperatorStats, TeardownReport};
pub use plugin::{DropletPlugin, DropletTeardown, Droplets, EmitDroplet};
pub use trajectory::{FlightEvent, TrajectoryCaster};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use droplets::prelude::*;
    //! ```

    pub use crate::config::{DropletKind, EmissionOverrides, OperatorSettings};
    pub use crate::effects::{EffectSink, LogEffects};
    pub use crate::geometry::{Raycaster, StaticScene};
    pub use crate::operator::DropletOperator;
    pub use crate::plugin::{DropletPlugin, EmitDroplet};
    pub use glam::Vec3;
}
