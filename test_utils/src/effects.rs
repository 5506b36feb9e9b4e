//! Effect sink that records every trigger for later inspection.
use std::sync::{Arc, Mutex, PoisonError};

use droplets::config::{Color, DropletKind};
use droplets::{EffectSink, SlotId};
use glam::Vec3;

/// One recorded trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectCall {
    /// `apply_skin`
    Skin {
        /// Target droplet.
        slot: SlotId,
        /// Applied kind.
        kind: DropletKind,
    },
    /// `play_sound`
    Sound {
        /// Target droplet.
        slot: SlotId,
        /// Sound name.
        name: String,
    },
    /// `emit_splash`
    Splash {
        /// Target droplet.
        slot: SlotId,
        /// Where the burst was emitted.
        position: Vec3,
        /// Particle count.
        amount: f32,
    },
    /// `set_trail`
    Trail {
        /// Target droplet.
        slot: SlotId,
        /// New trail state.
        enabled: bool,
    },
}

/// Clonable recorder; every clone shares the same log.
///
/// # Examples
/// ```
/// use test_utils::RecordingEffects;
/// let effects = RecordingEffects::default();
/// let handle = effects.clone();
/// assert!(handle.calls().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    calls: Arc<Mutex<Vec<EffectCall>>>,
}

impl RecordingEffects {
    fn record(&self, call: EffectCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Snapshot of every call so far, in order.
    pub fn calls(&self) -> Vec<EffectCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Splash triggers aimed at `slot`.
    pub fn splashes_on(&self, slot: SlotId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, EffectCall::Splash { slot: target, .. } if *target == slot))
            .count()
    }

    /// Sounds played on `slot`.
    pub fn sounds_on(&self, slot: SlotId) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, EffectCall::Sound { slot: target, .. } if *target == slot))
            .count()
    }
}

impl EffectSink for RecordingEffects {
    fn apply_skin(&self, slot: SlotId, kind: DropletKind, _color: Color) {
        self.record(EffectCall::Skin { slot, kind });
    }

    fn play_sound(&self, slot: SlotId, name: &str, _position: Vec3) {
        self.record(EffectCall::Sound {
            slot,
            name: name.to_owned(),
        });
    }

    fn emit_splash(&self, slot: SlotId, position: Vec3, _normal: Vec3, amount: f32) {
        self.record(EffectCall::Splash {
            slot,
            position,
            amount,
        });
    }

    fn set_trail(&self, slot: SlotId, enabled: bool) {
        self.record(EffectCall::Trail { slot, enabled });
    }
}
