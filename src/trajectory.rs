//! Ballistic flights advanced one frame at a time.
//!
//! Each fired projectile follows `p(t) = p0 + v0 t + g t² / 2`. Every frame
//! the segment travelled is cast against the scene; the first obstruction
//! ends the flight with a [`FlightEvent::Hit`]. A flight that travels the
//! maximum distance without hitting anything ends with
//! [`FlightEvent::Expired`]. Either way exactly one terminal event is
//! produced and the flight is forgotten.
use glam::Vec3;
use log::debug;

use crate::config::CasterSettings;
use crate::droplet::SlotId;
use crate::geometry::{RaycastFilter, Raycaster, SurfaceId};

/// Identifier of a fired projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId(pub u64);

/// Notifications raised while advancing flights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightEvent {
    /// The projectile moved along a segment without hitting anything.
    Step {
        /// Flight that moved.
        flight: FlightId,
        /// Droplet riding the flight.
        slot: SlotId,
        /// Segment start.
        origin: Vec3,
        /// Unit direction of travel.
        direction: Vec3,
        /// Segment length.
        length: f32,
    },
    /// The projectile struck scene geometry.
    Hit {
        /// Flight that ended.
        flight: FlightId,
        /// Droplet riding the flight.
        slot: SlotId,
        /// Intersection point.
        position: Vec3,
        /// Surface normal at the intersection.
        normal: Vec3,
        /// Surface that was struck.
        surface: SurfaceId,
        /// Velocity at impact.
        velocity: Vec3,
    },
    /// The projectile reached the maximum distance without hitting anything.
    Expired {
        /// Flight that ended.
        flight: FlightId,
        /// Droplet riding the flight.
        slot: SlotId,
    },
}

#[derive(Debug, Clone)]
struct Flight {
    id: FlightId,
    slot: SlotId,
    position: Vec3,
    velocity: Vec3,
    travelled: f32,
}

/// Simulates every active flight.
#[derive(Debug)]
pub struct TrajectoryCaster {
    settings: CasterSettings,
    filter: RaycastFilter,
    flights: Vec<Flight>,
    next_id: u64,
}

impl TrajectoryCaster {
    /// Creates a caster with no active flights.
    #[must_use]
    pub const fn new(settings: CasterSettings, filter: RaycastFilter) -> Self {
        Self {
            settings,
            filter,
            flights: Vec::new(),
            next_id: 0,
        }
    }

    /// Launches `slot` from `origin` along `direction` at `speed`.
    ///
    /// A zero `direction` launches with no initial velocity, so the droplet
    /// simply falls.
    pub fn fire(&mut self, origin: Vec3, direction: Vec3, speed: f32, slot: SlotId) -> FlightId {
        let id = FlightId(self.next_id);
        self.next_id += 1;
        self.flights.push(Flight {
            id,
            slot,
            position: origin,
            velocity: direction.normalize_or_zero() * speed,
            travelled: 0.0,
        });
        debug!("fired flight {} carrying droplet {slot}", id.0);
        id
    }

    /// Advances all flights by `dt` seconds, returning events in firing order.
    pub fn advance(&mut self, dt: f32, raycaster: &dyn Raycaster) -> Vec<FlightEvent> {
        let mut events = Vec::new();
        if dt <= 0.0 {
            return events;
        }
        let gravity = self.settings.gravity;
        let max_distance = self.settings.max_distance;
        let filter = &self.filter;

        self.flights.retain_mut(|flight| {
            let mut displacement = flight.velocity * dt + gravity * (0.5 * dt * dt);
            let remaining = (max_distance - flight.travelled).max(0.0);
            let mut length = displacement.length();
            let reaches_cap = length >= remaining;
            if reaches_cap && length > 0.0 {
                displacement *= remaining / length;
                length = remaining;
            }

            if let Some(hit) = raycaster.cast(flight.position, displacement, filter) {
                let fraction = if length > 0.0 { hit.distance / length } else { 0.0 };
                events.push(FlightEvent::Hit {
                    flight: flight.id,
                    slot: flight.slot,
                    position: hit.position,
                    normal: hit.normal,
                    surface: hit.surface,
                    velocity: flight.velocity + gravity * (dt * fraction),
                });
                return false;
            }

            let direction = displacement
                .try_normalize()
                .unwrap_or_else(|| flight.velocity.normalize_or_zero());
            events.push(FlightEvent::Step {
                flight: flight.id,
                slot: flight.slot,
                origin: flight.position,
                direction,
                length,
            });
            flight.position += displacement;
            flight.velocity += gravity * dt;
            flight.travelled += length;

            if reaches_cap {
                debug!("flight {} expired after {max_distance} units", flight.id.0);
                events.push(FlightEvent::Expired {
                    flight: flight.id,
                    slot: flight.slot,
                });
                return false;
            }
            true
        });
        events
    }

    /// Number of flights still in the air.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.flights.len()
    }

    /// Drops the flight carrying `slot`, if any, without raising events.
    pub fn cancel(&mut self, slot: SlotId) -> bool {
        let before = self.flights.len();
        self.flights.retain(|flight| flight.slot != slot);
        self.flights.len() != before
    }

    /// Drops every flight without raising terminal events.
    pub fn cancel_all(&mut self) -> Vec<SlotId> {
        self.flights.drain(..).map(|flight| flight.slot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StaticScene;
    use approx::assert_relative_eq;
    use rstest::rstest;

    const DT: f32 = 1.0 / 60.0;

    const fn slot(index: u32) -> SlotId {
        SlotId {
            index,
            generation: 0,
        }
    }

    fn caster() -> TrajectoryCaster {
        TrajectoryCaster::new(CasterSettings::default(), RaycastFilter::default())
    }

    fn run_until_terminal(caster: &mut TrajectoryCaster, scene: &StaticScene) -> Vec<FlightEvent> {
        let mut all = Vec::new();
        for _ in 0..10_000 {
            all.extend(caster.advance(DT, scene));
            if caster.active() == 0 {
                break;
            }
        }
        all
    }

    #[rstest]
    fn dropped_projectile_hits_floor_once() {
        let scene = StaticScene::with_floor(0.0);
        let mut caster = caster();
        caster.fire(Vec3::new(0.0, 5.0, 0.0), Vec3::X, 2.0, slot(0));
        let events = run_until_terminal(&mut caster, &scene);

        let hits: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, FlightEvent::Hit { .. }))
            .collect();
        assert_eq!(hits.len(), 1);
        let Some(FlightEvent::Hit { position, normal, velocity, .. }) = events.last() else {
            panic!("last event should be the hit");
        };
        assert_relative_eq!(position.y, 0.0, epsilon = 1e-4);
        assert!(position.x > 0.0);
        assert_eq!(*normal, Vec3::Y);
        assert!(velocity.y < 0.0);
        assert_eq!(caster.active(), 0);
    }

    #[rstest]
    fn steps_are_contiguous() {
        let scene = StaticScene::new();
        let mut caster = caster();
        caster.fire(Vec3::ZERO, Vec3::Z, 5.0, slot(0));
        let first = caster.advance(DT, &scene);
        let second = caster.advance(DT, &scene);
        let (
            Some(FlightEvent::Step { origin: o1, direction: d1, length: l1, .. }),
            Some(FlightEvent::Step { origin: o2, .. }),
        ) = (first.first(), second.first())
        else {
            panic!("expected two steps");
        };
        let tip = *o1 + *d1 * *l1;
        assert_relative_eq!(tip.x, o2.x, epsilon = 1e-5);
        assert_relative_eq!(tip.y, o2.y, epsilon = 1e-5);
        assert_relative_eq!(tip.z, o2.z, epsilon = 1e-5);
    }

    #[rstest]
    fn flight_without_obstruction_expires() {
        let scene = StaticScene::new();
        let mut caster = TrajectoryCaster::new(
            CasterSettings {
                max_distance: 3.0,
                ..CasterSettings::default()
            },
            RaycastFilter::default(),
        );
        caster.fire(Vec3::ZERO, Vec3::X, 10.0, slot(4));
        let events = run_until_terminal(&mut caster, &scene);
        assert!(matches!(events.last(), Some(FlightEvent::Expired { .. })));
        let travelled: f32 = events
            .iter()
            .filter_map(|event| match event {
                FlightEvent::Step { length, .. } => Some(*length),
                _ => None,
            })
            .sum();
        assert_relative_eq!(travelled, 3.0, epsilon = 1e-4);
    }

    #[rstest]
    fn zero_dt_does_nothing() {
        let scene = StaticScene::with_floor(0.0);
        let mut caster = caster();
        caster.fire(Vec3::Y, Vec3::NEG_Y, 1.0, slot(0));
        assert!(caster.advance(0.0, &scene).is_empty());
        assert_eq!(caster.active(), 1);
    }

    #[rstest]
    fn cancel_all_returns_riders() {
        let mut caster = caster();
        caster.fire(Vec3::ZERO, Vec3::X, 1.0, slot(1));
        caster.fire(Vec3::ZERO, Vec3::X, 1.0, slot(2));
        assert_eq!(caster.cancel_all(), vec![slot(1), slot(2)]);
        assert_eq!(caster.active(), 0);
    }
}
