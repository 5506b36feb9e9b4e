//! Fixed tuning constants shared by the droplet systems.
//!
//! Everything tunable per emission lives in [`crate::config::EmissionConfig`];
//! the values here are the ones the simulation treats as part of its physics.
use std::f32::consts::FRAC_PI_2;

/// Scales the sampled velocity range into world units per second.
pub const VELOCITY_MULTIPLIER: f32 = 10.0;
/// Downward acceleration applied to every flight, in world units per second squared.
pub const GRAVITY_PULL: f32 = -9.81;
/// Distance after which a flight that has hit nothing is abandoned.
pub const MAX_CAST_DISTANCE: f32 = 500.0;
/// Lays template meshes (authored with their disc axis along local X) flat on
/// the struck surface. Decals use the negated angle.
pub const SURFACE_TILT: f32 = FRAC_PI_2;
/// Lift applied to decals along the surface normal so they do not z-fight.
pub const DECAL_SURFACE_OFFSET: f32 = 0.01;
/// Fraction of the landed size a shrinking pool decays towards.
pub const DECAY_SIZE_FLOOR: f32 = 0.01;
/// Final transparency of a decayed pool.
pub const FULLY_TRANSPARENT: f32 = 1.0;
/// Footprint lost per unit of impact speed when a droplet merges into a pool.
pub const MERGE_SHRINK_PER_SPEED: f32 = 0.02;
/// Height gained per unit of impact speed when a droplet merges into a pool.
pub const MERGE_RISE_PER_SPEED: f32 = 0.01;
/// Smallest footprint a pool may be squashed to by an impact.
pub const MIN_POOL_EXTENT: f32 = 0.05;
/// Splash particles produced per unit of impact speed when the splash amount
/// is derived from velocity.
pub const SPLASH_PER_SPEED: f32 = 0.5;
/// Name of the container that holds active droplets.
pub const DEFAULT_CONTAINER_NAME: &str = "ActiveDroplets";
/// Number of pooled droplets created by default.
pub const DEFAULT_CAPACITY: usize = 64;
