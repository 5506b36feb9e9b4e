//! Vector helpers for placing droplets in flight and on surfaces.
use glam::{Quat, Vec3};

use crate::{MERGE_RISE_PER_SPEED, MERGE_SHRINK_PER_SPEED, MIN_POOL_EXTENT, SURFACE_TILT};

/// Centre of a droplet whose front sits at the tip of a cast segment.
///
/// The droplet is `length_along_travel` long, so its centre trails the tip
/// by half that along `direction`.
///
/// # Examples
/// ```
/// use droplets::vector_math::trailing_center;
/// use glam::Vec3;
/// let centre = trailing_center(Vec3::ZERO, Vec3::X, 2.0, 0.5);
/// assert!((centre - Vec3::new(1.75, 0.0, 0.0)).length() < 1e-6);
/// ```
#[must_use]
pub fn trailing_center(origin: Vec3, direction: Vec3, length: f32, length_along_travel: f32) -> Vec3 {
    let heading = direction.normalize_or_zero();
    origin + heading * length - heading * (length_along_travel * 0.5)
}

/// Orientation pointing a droplet's local Z axis along `direction`.
#[must_use]
pub fn travel_rotation(direction: Vec3) -> Quat {
    direction
        .try_normalize()
        .map_or(Quat::IDENTITY, |heading| Quat::from_rotation_arc(Vec3::Z, heading))
}

/// Resting orientation on a surface with the given `normal`.
///
/// Local Y is aligned with the normal, the droplet is spun by `spin` radians
/// about it and finally tilted about local Z. Decals tilt the opposite way
/// so their projection faces into the surface.
#[must_use]
pub fn surface_rotation(normal: Vec3, spin: f32, decal: bool) -> Quat {
    let up = normal.normalize_or(Vec3::Y);
    let tilt = if decal { -SURFACE_TILT } else { SURFACE_TILT };
    Quat::from_rotation_arc(Vec3::Y, up) * Quat::from_rotation_y(spin) * Quat::from_rotation_z(tilt)
}

/// Footprint of a pool just after a droplet splashes into it.
///
/// The impact pushes the pool's horizontal extent in by an amount
/// proportional to `speed` and raises its height slightly. Decals stay
/// flat. Neither horizontal axis drops below [`MIN_POOL_EXTENT`].
///
/// # Examples
/// ```
/// use droplets::vector_math::merge_shrunk_size;
/// use glam::Vec3;
/// let shrunk = merge_shrunk_size(Vec3::new(2.0, 0.0, 2.0), 10.0, true);
/// assert!(shrunk.x < 2.0);
/// assert_eq!(shrunk.y, 0.0);
/// ```
#[must_use]
pub const fn merge_shrunk_size(size: Vec3, speed: f32, decal: bool) -> Vec3 {
    let shrink = speed * MERGE_SHRINK_PER_SPEED;
    let rise = if decal { 0.0 } else { speed * MERGE_RISE_PER_SPEED };
    Vec3::new(
        (size.x - shrink).max(MIN_POOL_EXTENT),
        size.y + rise,
        (size.z - shrink).max(MIN_POOL_EXTENT),
    )
}

/// Size a pool settles at after absorbing a droplet.
///
/// The growth term scales with the arrival's mean horizontal extent and
/// its impact `speed`, divided by `divisor`. Growth that would take the
/// horizontal extent to `max_size` or beyond is refused and `size` is
/// returned unchanged.
#[must_use]
pub fn merge_target_size(size: Vec3, arrival: Vec3, speed: f32, divisor: f32, max_size: f32) -> Vec3 {
    let growth = if divisor > 0.0 {
        (arrival.x + arrival.z) * 0.5 * speed / divisor
    } else {
        0.0
    };
    let grown = size + Vec3::new(growth, 0.0, growth);
    if horizontal_extent(grown) < max_size {
        grown
    } else {
        size
    }
}

/// Largest of the two horizontal axes of `size`.
#[must_use]
pub const fn horizontal_extent(size: Vec3) -> f32 {
    size.x.max(size.z)
}
