//! Destroying the operator reclaims everything it still holds.

use droplets::LogEffects;
use glam::Vec3;
use rstest::rstest;
use test_utils::{build_operator, run_for, steady_settings, RecordingEffects, SPOUT_HEIGHT};

#[rstest]
fn destroy_reclaims_flying_and_landed_droplets() {
    let mut operator = build_operator(steady_settings(5), LogEffects);
    operator.emit(SPOUT_HEIGHT, Vec3::NEG_Y, None);
    operator.emit(SPOUT_HEIGHT + Vec3::X * 2.0, Vec3::NEG_Y, None);
    run_for(&mut operator, 0.5);
    operator.emit(SPOUT_HEIGHT * 10.0, Vec3::NEG_Y, None);

    let stats = operator.stats();
    assert_eq!(stats.landed, 2);
    assert_eq!(stats.flying, 1);

    let report = operator.destroy();
    assert_eq!(report.reclaimed, 3);
    assert_eq!(report.capacity, 5);
}

#[rstest]
fn destroying_an_idle_operator_reclaims_nothing() {
    let operator = build_operator(steady_settings(3), LogEffects);
    let report = operator.destroy();
    assert_eq!(report.reclaimed, 0);
    assert_eq!(report.capacity, 3);
}

#[rstest]
fn destroy_triggers_no_effects() {
    let effects = RecordingEffects::default();
    let mut operator = build_operator(steady_settings(2), effects.clone());
    operator.emit(SPOUT_HEIGHT, Vec3::NEG_Y, None);
    run_for(&mut operator, 0.5);
    let before = effects.calls().len();

    operator.destroy();
    assert_eq!(effects.calls().len(), before);
}
