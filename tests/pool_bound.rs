//! The pool never hands out more droplets than its capacity.

use droplets::{DropletState, LogEffects};
use glam::Vec3;
use rstest::rstest;
use test_utils::{build_operator, run_for, steady_settings, FRAME, SPOUT_HEIGHT};

#[rstest]
fn second_emit_before_landing_is_a_no_op() {
    let mut operator = build_operator(steady_settings(1), LogEffects);
    let first = operator.emit(SPOUT_HEIGHT, Vec3::NEG_Y, None);
    let second = operator.emit(SPOUT_HEIGHT, Vec3::NEG_Y, None);

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(operator.stats().active(), 1);
    assert_eq!(operator.container().len(), 1);
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn active_droplets_never_exceed_capacity(#[case] capacity: usize) {
    let mut operator = build_operator(steady_settings(capacity), LogEffects);
    for frame in 0..240_u16 {
        let x = f32::from(frame % 7) * 0.9;
        operator.emit(Vec3::new(x, 1.0, 0.0), Vec3::NEG_Y, None);
        operator.advance(FRAME);

        let stats = operator.stats();
        assert!(stats.active() <= capacity);
        assert_eq!(stats.active(), operator.container().len());
        assert_eq!(
            stats.flying + stats.landed + stats.expanding + stats.decaying,
            stats.active()
        );
    }
}

#[rstest]
fn reclaimed_droplets_can_be_emitted_again() {
    let mut operator = build_operator(steady_settings(1), LogEffects);
    let first = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 2.5);
    assert_eq!(operator.state(first), DropletState::Pooled);

    let second = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, None)
        .expect("decayed droplet was returned");
    assert_eq!(second.index(), first.index());
    assert_ne!(second, first);
}
