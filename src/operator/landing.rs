//! What happens when a flight ends: settle on the surface or merge into a
//! nearby pool.
use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use log::debug;

use super::{DecayPlan, DropletOperator};
use crate::config::{DropletKind, EmissionConfig};
use crate::droplet::{DropletState, SlotId};
use crate::geometry::SurfaceId;
use crate::schedule::DeferredAction;
use crate::search::find_nearest;
use crate::tween::{TweenGoal, TweenPurpose};
use crate::vector_math::{
    merge_shrunk_size, merge_target_size, surface_rotation, trailing_center, travel_rotation,
};
use crate::{DECAL_SURFACE_OFFSET, SPLASH_PER_SPEED};

/// Collision details reported by the caster.
#[derive(Debug, Clone, Copy)]
pub(super) struct Impact {
    pub(super) position: Vec3,
    pub(super) normal: Vec3,
    pub(super) surface: SurfaceId,
    pub(super) velocity: Vec3,
}

/// Resting transform and size of a landing droplet.
#[derive(Debug, Clone, Copy)]
struct Placement {
    position: Vec3,
    rotation: Quat,
    size: Vec3,
}

impl DropletOperator {
    pub(super) fn follow_flight(&mut self, slot: SlotId, origin: Vec3, direction: Vec3, length: f32) {
        if self.state(slot) != DropletState::Flying {
            return;
        }
        let Some(droplet) = self.cache.get_mut(slot) else {
            return;
        };
        droplet.position = trailing_center(origin, direction, length, droplet.size.z);
        droplet.rotation = travel_rotation(direction);
    }

    pub(super) fn expire_flight(&mut self, slot: SlotId) {
        if self.state(slot) != DropletState::Flying {
            return;
        }
        debug!("droplet {slot} flew out of range without landing");
        self.reclaim(slot);
    }

    /// Runs exactly once per flight: the registry entry is taken before the
    /// merge-or-settle decision and the state leaves `Flying` in both
    /// branches.
    pub(super) fn handle_collision(&mut self, slot: SlotId, impact: Impact) {
        if self.state(slot) != DropletState::Flying {
            debug!("ignored collision for droplet {slot}: not in flight");
            return;
        }
        let Some(kind) = self.cache.get(slot).map(|droplet| droplet.kind) else {
            return;
        };
        self.caster.cancel(slot);
        let config = self.registry.take(slot).unwrap_or_else(|| {
            debug!("no emission recorded for droplet {slot}; using defaults");
            self.settings.emission.clone()
        });

        let decal = kind.is_decal();
        let mut size = Vec3::new(
            config.size.sample(&mut self.rng),
            config.size.sample(&mut self.rng),
            config.size.sample(&mut self.rng),
        );
        if decal {
            size.y = 0.0;
        }
        let normal = impact.normal.normalize_or(Vec3::Y);
        let spin = self.rng.uniform(0.0, TAU);
        let position = if decal {
            impact.position + normal * DECAL_SURFACE_OFFSET
        } else {
            impact.position
        };
        let placement = Placement {
            position,
            rotation: surface_rotation(normal, spin, decal),
            size,
        };

        let target = if config.merge {
            self.merge_candidate(slot, position, config.merge_radius, kind)
        } else {
            None
        };
        if let Some(pool) = target {
            self.merge_into(pool, size, impact, &config);
            self.reclaim(slot);
            debug!("droplet {slot} merged into pool {pool}");
        } else {
            self.settle(slot, placement, impact, &config);
        }
    }

    /// Nearest pool around `position` that may absorb an arrival of `kind`.
    ///
    /// Only the nearest pool is considered. If it is expanding, decaying or
    /// of another kind the arrival settles on its own.
    fn merge_candidate(
        &self,
        arrival: SlotId,
        position: Vec3,
        radius: f32,
        kind: DropletKind,
    ) -> Option<SlotId> {
        let children = self
            .container
            .children()
            .iter()
            .filter_map(|&child| self.cache.get(child).map(|droplet| (child, droplet)));
        let nearest = find_nearest(arrival, position, radius, children)?;
        let same_kind = self
            .cache
            .get(nearest)
            .is_some_and(|pool| pool.kind == kind);
        let state = self.state(nearest);
        if state.accepts_merge() && same_kind {
            Some(nearest)
        } else {
            debug!("nearest pool {nearest} cannot absorb droplet {arrival} ({state:?})");
            None
        }
    }

    fn merge_into(&mut self, pool: SlotId, arrival_size: Vec3, impact: Impact, config: &EmissionConfig) {
        let speed = impact.velocity.length();
        let Some(droplet) = self.cache.get_mut(pool) else {
            return;
        };
        let original = droplet.size;
        droplet.size = merge_shrunk_size(original, speed, droplet.kind.is_decal());
        let goal = merge_target_size(
            original,
            arrival_size,
            speed,
            config.expand_divisor,
            config.max_size,
        );
        let position = droplet.position;
        self.tweens.play(
            pool,
            droplet,
            config.expand,
            TweenGoal {
                size: Some(goal),
                transparency: None,
            },
            TweenPurpose::Expand,
        );
        self.set_state(pool, DropletState::Expanding);
        self.impact_effects(pool, position, impact.normal, speed, config);
    }

    fn settle(&mut self, slot: SlotId, placement: Placement, impact: Impact, config: &EmissionConfig) {
        let speed = impact.velocity.length();
        let Some(droplet) = self.cache.get_mut(slot) else {
            return;
        };
        droplet.anchored = true;
        droplet.position = placement.position;
        droplet.rotation = placement.rotation;
        droplet.velocity = impact.velocity;
        droplet.visible = true;
        droplet.transparency = config.transparency.sample(&mut self.rng);
        self.tweens.play(
            slot,
            droplet,
            config.landed,
            TweenGoal {
                size: Some(placement.size),
                transparency: None,
            },
            TweenPurpose::Landed,
        );
        droplet.weld = Some(impact.surface);
        droplet.anchored = false;
        droplet.trail_enabled = false;

        self.impact_effects(slot, placement.position, impact.normal, speed, config);
        self.effects.set_trail(slot, false);
        if let Some(record) = self.record_mut(slot) {
            record.state = DropletState::Landed;
            record.decay = Some(DecayPlan {
                timing: config.decay,
                shrink: config.shrink_on_decay,
            });
        }
        let delay = config.decay_delay.sample(&mut self.rng);
        self.timers
            .schedule(self.now + f64::from(delay), DeferredAction::BeginDecay(slot));
        debug!(
            "droplet {slot} landed on surface {}; decays in {delay:.2}s",
            impact.surface.0
        );
    }

    fn impact_effects(
        &mut self,
        slot: SlotId,
        position: Vec3,
        normal: Vec3,
        speed: f32,
        config: &EmissionConfig,
    ) {
        let amount = if config.splash_from_velocity {
            speed * SPLASH_PER_SPEED
        } else {
            config.splash_amount.sample(&mut self.rng)
        };
        self.effects.emit_splash(slot, position, normal, amount);
        if let Some(name) = self.rng.pick(&config.impact_sounds) {
            self.effects.play_sound(slot, name, position);
        }
    }
}
