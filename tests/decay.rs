//! Landed pools fade out and return their slot to the pool.

use droplets::config::EmissionOverrides;
use droplets::{DropletState, DropletTemplate, LogEffects};
use glam::Vec3;
use rstest::rstest;
use test_utils::{build_operator, run_for, steady_settings, SPOUT_HEIGHT};

#[rstest]
fn pool_fades_then_returns_to_the_pool() {
    let mut operator = build_operator(steady_settings(2), LogEffects);
    let slot = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, None)
        .expect("pool has room");

    run_for(&mut operator, 1.4);
    assert_eq!(operator.state(slot), DropletState::Decaying);
    let fading = operator.droplet(slot).expect("decaying pool");
    assert!(fading.transparency > 0.2);
    assert!(fading.transparency < 1.0);
    assert!(fading.size.x < 0.5);

    run_for(&mut operator, 0.5);
    assert!(operator.droplet(slot).is_none());
    assert_eq!(operator.state(slot), DropletState::Pooled);
    assert_eq!(operator.stats().available, 2);
    assert!(operator.container().is_empty());
}

#[rstest]
fn reused_slot_starts_from_the_template() {
    let mut operator = build_operator(steady_settings(1), LogEffects);
    let first = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 2.5);

    let second = operator
        .emit(SPOUT_HEIGHT * 5.0, Vec3::NEG_Y, None)
        .expect("decayed droplet is back in the pool");
    assert_eq!(second.index(), first.index());

    let template = DropletTemplate::default();
    let droplet = operator.droplet(second).expect("fresh droplet");
    assert_eq!(droplet.size, template.size);
    assert!(droplet.transparency.abs() < f32::EPSILON);
    assert!(droplet.weld.is_none());
    assert!(droplet.anchored);
    assert_eq!(operator.state(second), DropletState::Flying);
}

#[rstest]
fn pools_can_fade_without_shrinking() {
    let mut operator = build_operator(steady_settings(1), LogEffects);
    let keep_size = EmissionOverrides {
        shrink_on_decay: Some(false),
        ..EmissionOverrides::default()
    };
    let slot = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&keep_size))
        .expect("pool has room");

    run_for(&mut operator, 1.4);
    assert_eq!(operator.state(slot), DropletState::Decaying);
    let droplet = operator.droplet(slot).expect("decaying pool");
    assert_eq!(droplet.size, Vec3::splat(0.5));
    assert!(droplet.transparency > 0.2);
}

#[rstest]
fn every_emission_eventually_returns() {
    let mut operator = build_operator(steady_settings(6), LogEffects);
    for step in 0..6_u8 {
        let x = f32::from(step) * 1.5;
        operator.emit(Vec3::new(x, 1.0, 0.0), Vec3::NEG_Y, None);
    }
    assert_eq!(operator.stats().flying, 6);

    run_for(&mut operator, 3.0);
    let stats = operator.stats();
    assert_eq!(stats.available, stats.capacity);
    assert_eq!(stats.active(), 0);
}
