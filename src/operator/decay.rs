//! Timed decay of landed pools and the tween completion handlers.
use log::debug;

use super::DropletOperator;
use crate::droplet::{DropletState, SlotId};
use crate::tween::{TweenCompletion, TweenGoal, TweenPurpose};
use crate::{DECAY_SIZE_FLOOR, FULLY_TRANSPARENT};

impl DropletOperator {
    /// Starts fading a pool once its decay delay has passed.
    ///
    /// A pool that is still expanding from a merge decays anyway; the decay
    /// tween replaces the expansion.
    pub(super) fn begin_decay(&mut self, slot: SlotId) {
        let state = self.state(slot);
        if !matches!(state, DropletState::Landed | DropletState::Expanding) {
            debug!("ignored decay timer for droplet {slot} ({state:?})");
            return;
        }
        let Some(plan) = self.record(slot).and_then(|record| record.decay) else {
            return;
        };
        let Some(droplet) = self.cache.get(slot) else {
            return;
        };
        let size = if plan.shrink {
            droplet.size * DECAY_SIZE_FLOOR
        } else {
            droplet.size
        };
        self.tweens.play(
            slot,
            droplet,
            plan.timing,
            TweenGoal {
                size: Some(size),
                transparency: Some(FULLY_TRANSPARENT),
            },
            TweenPurpose::Decay,
        );
        self.set_state(slot, DropletState::Decaying);
        debug!("droplet {slot} started decaying");
    }

    pub(super) fn finish_tween(&mut self, completion: TweenCompletion) {
        let TweenCompletion { slot, purpose, .. } = completion;
        match (purpose, self.state(slot)) {
            (TweenPurpose::Expand, DropletState::Expanding) => {
                self.set_state(slot, DropletState::Landed);
            }
            (TweenPurpose::Decay, DropletState::Decaying) => {
                self.reclaim(slot);
                debug!("droplet {slot} decayed and returned to the pool");
            }
            _ => {}
        }
    }
}
