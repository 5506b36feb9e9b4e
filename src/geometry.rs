//! Scene geometry that flights can collide with.
//!
//! The operator only needs "what does this segment hit first", expressed by
//! the [`Raycaster`] trait. [`StaticScene`] is a small implementation over
//! planes and axis-aligned boxes, enough for headless runs and tests; hosts
//! with a physics engine implement [`Raycaster`] over their own world.
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Identifier of a collidable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// Shape of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    /// Infinite plane through `point`.
    Plane {
        /// Any point on the plane.
        point: Vec3,
        /// Unit normal.
        normal: Vec3,
    },
    /// Axis-aligned box.
    Cuboid {
        /// Box centre.
        center: Vec3,
        /// Half the box size along each axis.
        half_extents: Vec3,
    },
}

/// A collidable piece of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Identifier reported in hits.
    pub id: SurfaceId,
    /// Shape.
    pub collider: Collider,
    /// Non-colliding surfaces are skipped by casts.
    pub can_collide: bool,
}

/// First obstruction along a cast segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Intersection point.
    pub position: Vec3,
    /// Unit surface normal facing the incoming segment.
    pub normal: Vec3,
    /// Surface that was struck.
    pub surface: SurfaceId,
    /// Distance from the segment origin.
    pub distance: f32,
}

/// Surfaces a cast must ignore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RaycastFilter {
    /// Excluded surfaces.
    pub exclude: Vec<SurfaceId>,
}

impl RaycastFilter {
    fn admits(&self, surface: &Surface) -> bool {
        surface.can_collide && !self.exclude.contains(&surface.id)
    }
}

/// Segment queries against scene geometry.
pub trait Raycaster: Send + Sync {
    /// Returns the nearest hit on the segment from `origin` to
    /// `origin + displacement`, ignoring surfaces rejected by `filter`.
    fn cast(&self, origin: Vec3, displacement: Vec3, filter: &RaycastFilter) -> Option<RayHit>;
}

const PARALLEL_EPSILON: f32 = 1e-6;

impl Collider {
    /// Fraction of `displacement` at which the segment enters this shape,
    /// together with the entry normal.
    fn intersect(&self, origin: Vec3, displacement: Vec3) -> Option<(f32, Vec3)> {
        match *self {
            Self::Plane { point, normal } => intersect_plane(origin, displacement, point, normal),
            Self::Cuboid {
                center,
                half_extents,
            } => intersect_cuboid(
                origin,
                displacement,
                center - half_extents,
                center + half_extents,
            ),
        }
    }
}

fn intersect_plane(origin: Vec3, displacement: Vec3, point: Vec3, normal: Vec3) -> Option<(f32, Vec3)> {
    let unit = normal.try_normalize()?;
    let denom = unit.dot(displacement);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = unit.dot(point - origin) / denom;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }
    let facing = if denom < 0.0 { unit } else { -unit };
    Some((t, facing))
}

/// Slab test; segments starting inside the box report no hit.
fn intersect_cuboid(origin: Vec3, displacement: Vec3, min: Vec3, max: Vec3) -> Option<(f32, Vec3)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;

    let axes = [
        (origin.x, displacement.x, min.x, max.x, Vec3::X),
        (origin.y, displacement.y, min.y, max.y, Vec3::Y),
        (origin.z, displacement.z, min.z, max.z, Vec3::Z),
    ];
    for (o, d, lo, hi, axis) in axes {
        if d.abs() < PARALLEL_EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let (near, far) = {
            let a = (lo - o) / d;
            let b = (hi - o) / d;
            if a <= b { (a, b) } else { (b, a) }
        };
        if near > t_enter {
            t_enter = near;
            enter_normal = axis * -d.signum();
        }
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_enter < 0.0 || t_enter > 1.0 {
        return None;
    }
    Some((t_enter, enter_normal))
}

/// A fixed list of surfaces checked in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticScene {
    surfaces: Vec<Surface>,
    next_id: u32,
}

impl StaticScene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A scene with a single horizontal floor at height `y`.
    #[must_use]
    pub fn with_floor(y: f32) -> Self {
        let mut scene = Self::new();
        scene.add_plane(Vec3::new(0.0, y, 0.0), Vec3::Y);
        scene
    }

    fn push(&mut self, collider: Collider) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        self.surfaces.push(Surface {
            id,
            collider,
            can_collide: true,
        });
        id
    }

    /// Adds an infinite plane.
    pub fn add_plane(&mut self, point: Vec3, normal: Vec3) -> SurfaceId {
        self.push(Collider::Plane { point, normal })
    }

    /// Adds an axis-aligned box.
    pub fn add_cuboid(&mut self, center: Vec3, half_extents: Vec3) -> SurfaceId {
        self.push(Collider::Cuboid {
            center,
            half_extents: half_extents.abs(),
        })
    }

    /// Removes a surface. Returns `false` if it was not present.
    pub fn remove(&mut self, id: SurfaceId) -> bool {
        let before = self.surfaces.len();
        self.surfaces.retain(|surface| surface.id != id);
        self.surfaces.len() != before
    }

    /// Toggles whether casts consider a surface.
    pub fn set_can_collide(&mut self, id: SurfaceId, can_collide: bool) {
        if let Some(surface) = self.surfaces.iter_mut().find(|candidate| candidate.id == id) {
            surface.can_collide = can_collide;
        }
    }

    /// All surfaces, in insertion order.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }
}

impl Raycaster for StaticScene {
    fn cast(&self, origin: Vec3, displacement: Vec3, filter: &RaycastFilter) -> Option<RayHit> {
        let length = displacement.length();
        self.surfaces
            .iter()
            .filter(|surface| filter.admits(surface))
            .filter_map(|surface| {
                surface
                    .collider
                    .intersect(origin, displacement)
                    .map(|(t, normal)| (surface.id, t, normal))
            })
            // Strict comparison keeps the first-added surface on ties.
            .fold(None, |best: Option<(SurfaceId, f32, Vec3)>, candidate| match best {
                Some(current) if current.1 <= candidate.1 => Some(current),
                _ => Some(candidate),
            })
            .map(|(surface, t, normal)| RayHit {
                position: origin + displacement * t,
                normal,
                surface,
                distance: length * t,
            })
    }
}
