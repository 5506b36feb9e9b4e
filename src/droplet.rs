//! Pooled droplet instances and the handles that address them.
use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{Color, DropletKind};
use crate::geometry::SurfaceId;

/// Generational handle to a pool slot.
///
/// The generation changes every time the slot is released, so a handle kept
/// past its droplet's lifetime no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SlotId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl SlotId {
    /// Position of the slot in the pool.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Reuse count of the slot when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Lifecycle position of a slot, tracked by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DropletState {
    /// Owned by the pool and available for reuse.
    #[default]
    Pooled,
    /// Riding a trajectory.
    Flying,
    /// Resting on a surface, waiting for its decay timer.
    Landed,
    /// Resting and growing after absorbing a merged droplet.
    Expanding,
    /// Shrinking and fading on its way back to the pool.
    Decaying,
}

impl DropletState {
    /// Whether a landing droplet may merge into a pool in this state.
    #[must_use]
    pub const fn accepts_merge(self) -> bool {
        matches!(self, Self::Landed)
    }
}

/// Default look of a pooled droplet.
///
/// Released droplets are reset to exactly this state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropletTemplate {
    /// Size while in flight; `z` is the length along the direction of travel.
    pub size: Vec3,
    /// Transparency in flight (0 opaque, 1 invisible).
    pub transparency: f32,
}

impl Default for DropletTemplate {
    fn default() -> Self {
        Self {
            size: Vec3::new(0.1, 0.1, 0.4),
            transparency: 0.0,
        }
    }
}

impl DropletTemplate {
    /// Builds a fresh droplet in its pooled state.
    #[must_use]
    pub fn instantiate(&self) -> Droplet {
        Droplet {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: self.size,
            transparency: self.transparency,
            visible: false,
            trail_enabled: false,
            anchored: true,
            weld: None,
            kind: DropletKind::Droplet,
            color: Color::default(),
            velocity: Vec3::ZERO,
        }
    }
}

/// A reusable visual droplet.
///
/// Size is expressed in the surface frame once landed: `x` and `z` are the
/// footprint and `y` the height along the surface normal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Droplet {
    /// World-space centre.
    pub position: Vec3,
    /// Mesh orientation. Templates are authored with their disc axis along
    /// local X.
    pub rotation: Quat,
    /// Current extents.
    pub size: Vec3,
    /// 0 is opaque, 1 invisible.
    pub transparency: f32,
    /// Whether the mesh is drawn.
    pub visible: bool,
    /// Whether the flight trail is drawn.
    pub trail_enabled: bool,
    /// Held fixed in place rather than attached to anything.
    pub anchored: bool,
    /// Surface this droplet is welded to after landing.
    pub weld: Option<SurfaceId>,
    /// Landed style; pools only merge with the same kind.
    pub kind: DropletKind,
    /// Skin tint.
    pub color: Color,
    /// Velocity at impact.
    pub velocity: Vec3,
}

impl Droplet {
    /// Largest horizontal extent of the footprint.
    #[must_use]
    pub const fn horizontal_extent(&self) -> f32 {
        crate::vector_math::horizontal_extent(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn template_instances_start_hidden_and_unwelded() {
        let droplet = DropletTemplate::default().instantiate();
        assert!(!droplet.visible);
        assert!(!droplet.trail_enabled);
        assert!(droplet.anchored);
        assert!(droplet.weld.is_none());
        assert_eq!(droplet.size, DropletTemplate::default().size);
    }

    #[rstest]
    #[case(DropletState::Landed, true)]
    #[case(DropletState::Expanding, false)]
    #[case(DropletState::Decaying, false)]
    #[case(DropletState::Flying, false)]
    #[case(DropletState::Pooled, false)]
    fn only_idle_pools_accept_merges(#[case] state: DropletState, #[case] accepts: bool) {
        assert_eq!(state.accepts_merge(), accepts);
    }

    #[rstest]
    fn slot_ids_display_index_and_generation() {
        let slot = SlotId {
            index: 3,
            generation: 2,
        };
        assert_eq!(slot.to_string(), "#3v2");
    }
}
