//! Size and transparency animations with completion notifications.
//!
//! One tween runs per droplet at a time: playing a new tween on a slot
//! replaces the running one, and the replaced tween never reports
//! completion.
use glam::Vec3;

use crate::config::TweenTiming;
use crate::droplet::{Droplet, SlotId};

/// Identifier of a played tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u64);

/// Which transition a tween animates; selects the completion handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenPurpose {
    /// Growth from flight size to resting size.
    Landed,
    /// Growth of a pool absorbing a merged droplet.
    Expand,
    /// Shrink and fade before returning to the pool.
    Decay,
}

/// Property targets. `None` leaves a property alone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TweenGoal {
    /// Target size.
    pub size: Option<Vec3>,
    /// Target transparency.
    pub transparency: Option<f32>,
}

/// Animated values for one droplet this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSample {
    /// Animated droplet.
    pub slot: SlotId,
    /// New size, when animated.
    pub size: Option<Vec3>,
    /// New transparency, when animated.
    pub transparency: Option<f32>,
}

impl TweenSample {
    /// Writes the sampled properties onto `droplet`.
    pub const fn apply_to(&self, droplet: &mut Droplet) {
        if let Some(size) = self.size {
            droplet.size = size;
        }
        if let Some(transparency) = self.transparency {
            droplet.transparency = transparency;
        }
    }
}

/// A tween that ran to the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenCompletion {
    /// Completed tween.
    pub tween: TweenId,
    /// Animated droplet.
    pub slot: SlotId,
    /// Transition that finished.
    pub purpose: TweenPurpose,
}

/// Output of [`TweenService::advance`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TweenFrame {
    /// Values to write this frame, final values included.
    pub samples: Vec<TweenSample>,
    /// Tweens that finished this frame, in start order.
    pub completed: Vec<TweenCompletion>,
}

#[derive(Debug, Clone)]
struct Tween {
    id: TweenId,
    slot: SlotId,
    timing: TweenTiming,
    purpose: TweenPurpose,
    elapsed: f32,
    start_size: Vec3,
    start_transparency: f32,
    goal: TweenGoal,
}

impl Tween {
    fn sample(&self, progress: f32) -> TweenSample {
        let eased = self.timing.easing.apply(progress);
        let finished = progress >= 1.0;
        TweenSample {
            slot: self.slot,
            size: self.goal.size.map(|target| {
                if finished {
                    target
                } else {
                    self.start_size.lerp(target, eased)
                }
            }),
            transparency: self.goal.transparency.map(|target| {
                if finished {
                    target
                } else {
                    self.start_transparency + (target - self.start_transparency) * eased
                }
            }),
        }
    }
}

/// Runs droplet tweens.
#[derive(Debug, Default)]
pub struct TweenService {
    tweens: Vec<Tween>,
    next_id: u64,
}

impl TweenService {
    /// Creates an idle service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts animating `droplet` (stored at `slot`) towards `goal`.
    ///
    /// Start values are captured from `droplet` now. Any tween already
    /// running on `slot` is dropped.
    pub fn play(
        &mut self,
        slot: SlotId,
        droplet: &Droplet,
        timing: TweenTiming,
        goal: TweenGoal,
        purpose: TweenPurpose,
    ) -> TweenId {
        self.cancel(slot);
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            slot,
            timing,
            purpose,
            elapsed: 0.0,
            start_size: droplet.size,
            start_transparency: droplet.transparency,
            goal,
        });
        id
    }

    /// Advances every tween by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> TweenFrame {
        let mut frame = TweenFrame::default();
        self.tweens.retain_mut(|tween| {
            tween.elapsed += dt.max(0.0);
            let progress = if tween.timing.duration > 0.0 {
                (tween.elapsed / tween.timing.duration).min(1.0)
            } else {
                1.0
            };
            frame.samples.push(tween.sample(progress));
            if progress >= 1.0 {
                frame.completed.push(TweenCompletion {
                    tween: tween.id,
                    slot: tween.slot,
                    purpose: tween.purpose,
                });
                return false;
            }
            true
        });
        frame
    }

    /// Purpose of the tween running on `slot`, if any.
    #[cfg(test)]
    pub(crate) fn running(&self, slot: SlotId) -> Option<TweenPurpose> {
        self.tweens
            .iter()
            .find(|tween| tween.slot == slot)
            .map(|tween| tween.purpose)
    }

    /// Stops the tween on `slot` without reporting completion.
    pub fn cancel(&mut self, slot: SlotId) {
        self.tweens.retain(|tween| tween.slot != slot);
    }

    /// Stops every tween.
    pub fn cancel_all(&mut self) {
        self.tweens.clear();
    }

    /// Number of running tweens.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether nothing is animating.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Easing;
    use crate::droplet::DropletTemplate;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const fn slot(index: u32) -> SlotId {
        SlotId {
            index,
            generation: 0,
        }
    }

    #[fixture]
    fn droplet() -> Droplet {
        let mut droplet = DropletTemplate::default().instantiate();
        droplet.size = Vec3::ONE;
        droplet.transparency = 0.0;
        droplet
    }

    #[rstest]
    fn linear_tween_interpolates_then_completes(droplet: Droplet) {
        let mut service = TweenService::new();
        let goal = TweenGoal {
            size: Some(Vec3::splat(3.0)),
            transparency: Some(1.0),
        };
        service.play(slot(0), &droplet, TweenTiming::new(1.0, Easing::Linear), goal, TweenPurpose::Decay);

        let half = service.advance(0.5);
        assert!(half.completed.is_empty());
        let sample = half.samples.first().expect("sample");
        assert_relative_eq!(sample.size.expect("size").x, 2.0);
        assert_relative_eq!(sample.transparency.expect("transparency"), 0.5);

        let end = service.advance(0.75);
        assert_eq!(end.completed.len(), 1);
        assert_eq!(end.completed.first().map(|c| c.purpose), Some(TweenPurpose::Decay));
        assert_eq!(end.samples.first().and_then(|s| s.size), Some(Vec3::splat(3.0)));
        assert!(service.is_empty());
    }

    #[rstest]
    fn replacing_a_tween_suppresses_its_completion(droplet: Droplet) {
        let mut service = TweenService::new();
        let timing = TweenTiming::new(0.2, Easing::QuadOut);
        let goal = TweenGoal {
            size: Some(Vec3::splat(2.0)),
            transparency: None,
        };
        service.play(slot(1), &droplet, timing, goal, TweenPurpose::Expand);
        service.play(slot(1), &droplet, timing, goal, TweenPurpose::Decay);
        assert_eq!(service.len(), 1);

        let frame = service.advance(1.0);
        let purposes: Vec<_> = frame.completed.iter().map(|c| c.purpose).collect();
        assert_eq!(purposes, vec![TweenPurpose::Decay]);
    }

    #[rstest]
    fn zero_duration_completes_on_next_advance(droplet: Droplet) {
        let mut service = TweenService::new();
        let goal = TweenGoal {
            transparency: Some(0.4),
            ..TweenGoal::default()
        };
        service.play(slot(2), &droplet, TweenTiming::new(0.0, Easing::Linear), goal, TweenPurpose::Landed);
        let frame = service.advance(0.0);
        assert_eq!(frame.completed.len(), 1);
        assert_eq!(frame.samples.first().and_then(|s| s.transparency), Some(0.4));
    }

    #[rstest]
    fn samples_leave_unanimated_properties_alone(mut droplet: Droplet) {
        let sample = TweenSample {
            slot: slot(0),
            size: None,
            transparency: Some(0.7),
        };
        sample.apply_to(&mut droplet);
        assert_eq!(droplet.size, Vec3::ONE);
        assert_relative_eq!(droplet.transparency, 0.7);
    }

    #[rstest]
    fn cancel_reports_nothing(droplet: Droplet) {
        let mut service = TweenService::new();
        service.play(slot(3), &droplet, TweenTiming::new(0.1, Easing::Linear), TweenGoal::default(), TweenPurpose::Landed);
        assert_eq!(service.running(slot(3)), Some(TweenPurpose::Landed));
        service.cancel(slot(3));
        assert!(service.advance(1.0).completed.is_empty());
    }
}
