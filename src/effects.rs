//! Fire-and-forget visual and audio triggers.
//!
//! The operator never waits on, or hears back from, an effect. Hosts wire
//! these calls to their renderer, audio mixer and particle system.
use glam::Vec3;
use log::debug;

use crate::config::{Color, DropletKind};
use crate::droplet::SlotId;

/// Receives the cosmetic side effects of the droplet lifecycle.
#[cfg_attr(test, mockall::automock)]
pub trait EffectSink: Send + Sync {
    /// Switches the droplet mesh to the skin for `kind`, tinted `color`.
    fn apply_skin(&self, slot: SlotId, kind: DropletKind, color: Color);
    /// Plays a one-shot sound attached to the droplet.
    fn play_sound(&self, slot: SlotId, name: &str, position: Vec3);
    /// Bursts `amount` splash particles from the droplet's attachment point.
    fn emit_splash(&self, slot: SlotId, position: Vec3, normal: Vec3, amount: f32);
    /// Shows or hides the flight trail.
    fn set_trail(&self, slot: SlotId, enabled: bool);
}

/// Sink that only logs each trigger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffects;

impl EffectSink for LogEffects {
    fn apply_skin(&self, slot: SlotId, kind: DropletKind, color: Color) {
        debug!("skin {kind:?} ({:.2}, {:.2}, {:.2}) on {slot}", color.r, color.g, color.b);
    }

    fn play_sound(&self, slot: SlotId, name: &str, position: Vec3) {
        debug!("sound {name} on {slot} at {position}");
    }

    fn emit_splash(&self, slot: SlotId, position: Vec3, normal: Vec3, amount: f32) {
        debug!("splash x{amount:.1} on {slot} at {position} facing {normal}");
    }

    fn set_trail(&self, slot: SlotId, enabled: bool) {
        debug!("trail {} on {slot}", if enabled { "on" } else { "off" });
    }
}
