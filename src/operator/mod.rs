//! Lifecycle orchestration: emit, land, merge, decay and teardown.
//!
//! [`DropletOperator`] owns the pool, the trajectory caster, the registry,
//! the tweens and the decay timers. Everything that happens to a droplet
//! after it is emitted passes through [`DropletOperator::dispatch`], one
//! event at a time, on the caller's thread.
mod container;
mod decay;
mod landing;

use std::fmt;

use glam::Vec3;
use log::{debug, info, warn};

use crate::cache::DropletCache;
use crate::config::{EmissionConfig, EmissionOverrides, OperatorSettings, TweenTiming};
use crate::droplet::{Droplet, DropletState, SlotId};
use crate::effects::EffectSink;
use crate::error::ConfigError;
use crate::geometry::{RaycastFilter, Raycaster};
use crate::random::DropletRng;
use crate::registry::EmissionRegistry;
use crate::schedule::{DeferredAction, DeferredQueue};
use crate::trajectory::{FlightEvent, TrajectoryCaster};
use crate::tween::{TweenCompletion, TweenSample, TweenService};
use crate::vector_math::travel_rotation;
use crate::VELOCITY_MULTIPLIER;

pub use container::DropletContainer;

/// Input to the operator's state-transition function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropletEvent {
    /// Notification from the trajectory caster.
    Flight(FlightEvent),
    /// A deferred action came due.
    Timer(DeferredAction),
    /// New animated values for a droplet.
    TweenSampled(TweenSample),
    /// An animation ran to completion.
    TweenCompleted(TweenCompletion),
}

/// Snapshot of how the pool's slots are being used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorStats {
    /// Total number of pooled droplets.
    pub capacity: usize,
    /// Droplets ready to be emitted.
    pub available: usize,
    /// Droplets in the air.
    pub flying: usize,
    /// Resting pools waiting for their decay timer.
    pub landed: usize,
    /// Pools growing after a merge.
    pub expanding: usize,
    /// Pools fading out.
    pub decaying: usize,
}

impl OperatorStats {
    /// Droplets not currently owned by the pool.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.capacity - self.available
    }
}

/// Outcome of [`DropletOperator::destroy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Droplets that were still active and had to be reclaimed.
    pub reclaimed: usize,
    /// Size of the disposed pool.
    pub capacity: usize,
}

#[derive(Debug, Clone, Copy)]
struct DecayPlan {
    timing: TweenTiming,
    shrink: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct SlotRecord {
    state: DropletState,
    decay: Option<DecayPlan>,
}

/// Coordinates the full droplet lifecycle.
///
/// Runtime operations never fail: an exhausted pool, a missing droplet or a
/// repeated notification simply does nothing.
pub struct DropletOperator {
    settings: OperatorSettings,
    cache: DropletCache,
    caster: TrajectoryCaster,
    registry: EmissionRegistry,
    tweens: TweenService,
    timers: DeferredQueue,
    records: Vec<SlotRecord>,
    container: DropletContainer,
    raycaster: Box<dyn Raycaster>,
    effects: Box<dyn EffectSink>,
    rng: DropletRng,
    now: f64,
}

impl fmt::Debug for DropletOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropletOperator")
            .field("container", &self.container.name())
            .field("stats", &self.stats())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl DropletOperator {
    /// Validates `settings` and allocates the pool.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] reported by [`OperatorSettings::validate`].
    pub fn new(
        settings: OperatorSettings,
        raycaster: impl Raycaster + 'static,
        effects: impl EffectSink + 'static,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let cache = DropletCache::new(settings.capacity, settings.template.clone());
        let caster = TrajectoryCaster::new(settings.caster, RaycastFilter::default());
        let container = DropletContainer::new(settings.container_name.clone());
        info!(
            "droplet operator ready: {} pooled droplets in {}",
            settings.capacity, settings.container_name
        );
        Ok(Self {
            records: vec![SlotRecord::default(); settings.capacity],
            settings,
            cache,
            caster,
            registry: EmissionRegistry::default(),
            tweens: TweenService::new(),
            timers: DeferredQueue::new(),
            container,
            raycaster: Box::new(raycaster),
            effects: Box::new(effects),
            rng: DropletRng::from_entropy(),
            now: 0.0,
        })
    }

    /// Replaces the entropy-seeded generator with a seeded one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = DropletRng::seeded(seed);
        self
    }

    /// Launches a droplet from `origin` along `direction`.
    ///
    /// `overrides` are layered over the default emission; if the result is
    /// invalid the default is used instead. Returns `None` without side
    /// effects when every droplet is already in use. A zero `direction`
    /// launches straight down.
    pub fn emit(
        &mut self,
        origin: Vec3,
        direction: Vec3,
        overrides: Option<&EmissionOverrides>,
    ) -> Option<SlotId> {
        if self.cache.available() == 0 {
            debug!("droplet pool exhausted; emission dropped");
            return None;
        }
        let config = self.resolve_config(overrides);
        let speed = config.velocity.sample(&mut self.rng) * VELOCITY_MULTIPLIER;
        let launch = if config.random_offset {
            let offset_x = config.spawn_offset.sample(&mut self.rng);
            let offset_z = config.spawn_offset.sample(&mut self.rng);
            origin + Vec3::new(offset_x, 0.0, offset_z)
        } else {
            origin
        };
        let heading = direction.try_normalize().unwrap_or(Vec3::NEG_Y);

        let slot = self.cache.acquire()?;
        self.caster.fire(launch, heading, speed, slot);
        if let Some(droplet) = self.cache.get_mut(slot) {
            droplet.kind = config.kind;
            droplet.color = config.color;
            droplet.position = launch;
            droplet.rotation = travel_rotation(heading);
            droplet.visible = config.visible_in_flight;
            droplet.trail_enabled = config.trail;
            droplet.anchored = true;
        }
        self.effects.apply_skin(slot, config.kind, config.color);
        self.effects.set_trail(slot, config.trail);
        if let Some(record) = self.record_mut(slot) {
            *record = SlotRecord {
                state: DropletState::Flying,
                decay: None,
            };
        }
        self.registry.insert(slot, config);
        self.container.push(slot);
        debug!("emitted droplet {slot} at {speed:.2} u/s");
        Some(slot)
    }

    fn resolve_config(&self, overrides: Option<&EmissionOverrides>) -> EmissionConfig {
        let defaults = &self.settings.emission;
        let Some(changes) = overrides else {
            return defaults.clone();
        };
        let config = defaults.with_overrides(changes);
        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!("ignoring invalid emission overrides: {err}");
                defaults.clone()
            }
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Flights move first, then due decay timers fire, then tweens are
    /// sampled. Non-positive or non-finite steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.now += f64::from(dt);

        for event in self.caster.advance(dt, &*self.raycaster) {
            self.dispatch(DropletEvent::Flight(event));
        }
        for action in self.timers.drain_due(self.now) {
            self.dispatch(DropletEvent::Timer(action));
        }
        let frame = self.tweens.advance(dt);
        for sample in frame.samples {
            self.dispatch(DropletEvent::TweenSampled(sample));
        }
        for completion in frame.completed {
            self.dispatch(DropletEvent::TweenCompleted(completion));
        }
    }

    /// Delivers a trajectory notification from outside the tick.
    ///
    /// Notifications for droplets that are no longer in flight, including a
    /// second collision for the same flight, are ignored.
    pub fn handle_flight_event(&mut self, event: FlightEvent) {
        self.dispatch(DropletEvent::Flight(event));
    }

    /// Applies one event to the droplet it concerns.
    pub fn dispatch(&mut self, event: DropletEvent) {
        match event {
            DropletEvent::Flight(FlightEvent::Step {
                slot,
                origin,
                direction,
                length,
                ..
            }) => self.follow_flight(slot, origin, direction, length),
            DropletEvent::Flight(FlightEvent::Hit {
                slot,
                position,
                normal,
                surface,
                velocity,
                ..
            }) => self.handle_collision(
                slot,
                landing::Impact {
                    position,
                    normal,
                    surface,
                    velocity,
                },
            ),
            DropletEvent::Flight(FlightEvent::Expired { slot, .. }) => self.expire_flight(slot),
            DropletEvent::Timer(DeferredAction::BeginDecay(slot)) => self.begin_decay(slot),
            DropletEvent::TweenSampled(sample) => {
                if let Some(droplet) = self.cache.get_mut(sample.slot) {
                    sample.apply_to(droplet);
                }
            }
            DropletEvent::TweenCompleted(completion) => self.finish_tween(completion),
        }
    }

    /// Looks up an active droplet. Stale handles resolve to `None`.
    #[must_use]
    pub fn droplet(&self, slot: SlotId) -> Option<&Droplet> {
        self.cache.get(slot)
    }

    /// Lifecycle state of `slot`; stale handles report [`DropletState::Pooled`].
    #[must_use]
    pub fn state(&self, slot: SlotId) -> DropletState {
        self.record(slot)
            .map_or(DropletState::Pooled, |record| record.state)
    }

    /// Counts of droplets per lifecycle state.
    #[must_use]
    pub fn stats(&self) -> OperatorStats {
        let mut stats = OperatorStats {
            capacity: self.cache.capacity(),
            available: self.cache.available(),
            ..OperatorStats::default()
        };
        for slot in self.cache.active_slots() {
            match self.state(slot) {
                DropletState::Flying => stats.flying += 1,
                DropletState::Landed => stats.landed += 1,
                DropletState::Expanding => stats.expanding += 1,
                DropletState::Decaying => stats.decaying += 1,
                DropletState::Pooled => {}
            }
        }
        stats
    }

    /// Container holding every active droplet.
    #[must_use]
    pub const fn container(&self) -> &DropletContainer {
        &self.container
    }

    /// Settings the operator was built with.
    #[must_use]
    pub const fn settings(&self) -> &OperatorSettings {
        &self.settings
    }

    /// Simulated seconds since construction.
    #[must_use]
    pub const fn elapsed(&self) -> f64 {
        self.now
    }

    /// Reclaims every active droplet and disposes of the pool.
    ///
    /// Flights, timers, tweens and registry entries are dropped first so
    /// nothing can touch a droplet after it is returned.
    pub fn destroy(mut self) -> TeardownReport {
        let grounded = self.caster.cancel_all().len();
        self.timers.clear();
        self.tweens.cancel_all();
        self.registry.clear();

        let mut reclaimed = 0;
        for slot in self.cache.active_slots() {
            if self.reclaim(slot) {
                reclaimed += 1;
            }
        }
        let capacity = self.cache.capacity();
        let outstanding = self.cache.dispose();
        if outstanding > 0 {
            warn!("{outstanding} droplets were still active when the pool was disposed");
        }
        info!(
            "destroyed {}: reclaimed {reclaimed} droplets ({grounded} in flight)",
            self.container.name()
        );
        TeardownReport {
            reclaimed,
            capacity,
        }
    }

    fn record(&self, slot: SlotId) -> Option<&SlotRecord> {
        self.cache.get(slot)?;
        self.records.get(slot.index() as usize)
    }

    fn record_mut(&mut self, slot: SlotId) -> Option<&mut SlotRecord> {
        self.cache.get(slot)?;
        self.records.get_mut(slot.index() as usize)
    }

    fn set_state(&mut self, slot: SlotId, state: DropletState) {
        if let Some(record) = self.record_mut(slot) {
            record.state = state;
        }
    }

    /// Detaches `slot` from every subsystem and returns it to the pool.
    fn reclaim(&mut self, slot: SlotId) -> bool {
        self.caster.cancel(slot);
        self.tweens.cancel(slot);
        self.registry.take(slot);
        self.container.remove(slot);
        if let Some(record) = self.record_mut(slot) {
            *record = SlotRecord::default();
        }
        self.cache.release(slot)
    }
}
