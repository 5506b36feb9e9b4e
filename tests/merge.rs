//! Merging landing droplets into nearby pools.

use droplets::config::{DropletKind, Easing, EmissionOverrides, FloatRange, TweenTiming};
use droplets::{DropletState, LogEffects};
use glam::Vec3;
use rstest::{fixture, rstest};
use test_utils::{
    build_operator, run_for, steady_settings, RecordingEffects, FRAME, SPOUT_HEIGHT,
};

const BESIDE: Vec3 = Vec3::new(0.4, 1.0, 0.0);
const OTHER_SIDE: Vec3 = Vec3::new(-0.4, 1.0, 0.0);

fn long_lived() -> EmissionOverrides {
    EmissionOverrides {
        decay_delay: Some(FloatRange::constant(5.0)),
        ..EmissionOverrides::default()
    }
}

fn decal_overrides() -> EmissionOverrides {
    EmissionOverrides {
        kind: Some(DropletKind::Decal),
        size: Some(FloatRange::constant(2.0)),
        max_size: Some(3.0),
        ..long_lived()
    }
}

#[fixture]
fn effects() -> RecordingEffects {
    RecordingEffects::default()
}

#[rstest]
fn nearby_arrival_merges_into_pool(effects: RecordingEffects) {
    let mut operator = build_operator(steady_settings(4), effects.clone());
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&long_lived()))
        .expect("pool has room");
    run_for(&mut operator, 0.8);
    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 0.3);

    assert_eq!(operator.state(pool), DropletState::Expanding);
    assert!(operator.droplet(arrival).is_none());
    assert_eq!(operator.stats().available, 3);
    assert_eq!(operator.container().children(), &[pool]);
    assert_eq!(effects.splashes_on(pool), 2);
    assert_eq!(effects.splashes_on(arrival), 0);

    run_for(&mut operator, 0.6);
    assert_eq!(operator.state(pool), DropletState::Landed);
    let size = operator.droplet(pool).expect("merged pool").size;
    assert!(size.x > 0.5);
    assert!(size.z > 0.5);
    assert!((size.y - 0.5).abs() < 1e-4);
}

#[rstest]
fn different_kind_is_never_a_merge_target() {
    let mut operator = build_operator(steady_settings(4), LogEffects);
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&long_lived()))
        .expect("pool has room");
    run_for(&mut operator, 0.8);
    let decal = EmissionOverrides {
        kind: Some(DropletKind::Decal),
        ..EmissionOverrides::default()
    };
    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, Some(&decal))
        .expect("pool has room");
    run_for(&mut operator, 0.3);

    assert_eq!(operator.state(pool), DropletState::Landed);
    assert_eq!(operator.state(arrival), DropletState::Landed);
    assert_eq!(operator.stats().landed, 2);
}

#[rstest]
fn expanding_pool_is_never_a_merge_target() {
    let mut operator = build_operator(steady_settings(4), LogEffects);
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&long_lived()))
        .expect("pool has room");
    run_for(&mut operator, 0.8);

    // Both land in the same frame; the first merges and leaves the pool
    // expanding when the second looks for a target.
    let merged = operator
        .emit(BESIDE, Vec3::NEG_Y, None)
        .expect("pool has room");
    let late = operator
        .emit(OTHER_SIDE, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 0.25);

    assert_eq!(operator.state(pool), DropletState::Expanding);
    assert!(operator.droplet(merged).is_none());
    assert_eq!(operator.state(late), DropletState::Landed);
}

#[rstest]
fn decaying_pool_is_never_a_merge_target() {
    let mut operator = build_operator(steady_settings(4), LogEffects);
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 1.1);
    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, None)
        .expect("pool has room");
    run_for(&mut operator, 0.25);

    assert_eq!(operator.state(pool), DropletState::Decaying);
    assert_eq!(operator.state(arrival), DropletState::Landed);
}

#[rstest]
fn merging_disabled_lands_independently() {
    let mut operator = build_operator(steady_settings(4), LogEffects);
    operator.emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&long_lived()));
    run_for(&mut operator, 0.8);
    let solo = EmissionOverrides {
        merge: Some(false),
        ..EmissionOverrides::default()
    };
    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, Some(&solo))
        .expect("pool has room");
    run_for(&mut operator, 0.3);

    assert_eq!(operator.state(arrival), DropletState::Landed);
    assert_eq!(operator.stats().landed, 2);
}

#[rstest]
fn decal_growth_is_capped_at_max_size() {
    let mut operator = build_operator(steady_settings(4), LogEffects);
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&decal_overrides()))
        .expect("pool has room");
    run_for(&mut operator, 0.8);
    let before = operator.droplet(pool).expect("decal pool").size;
    assert_eq!(before, Vec3::new(2.0, 0.0, 2.0));

    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, Some(&decal_overrides()))
        .expect("pool has room");
    let mut elapsed = 0.0;
    while elapsed < 1.0 {
        operator.advance(FRAME);
        elapsed += FRAME;
        let droplet = operator.droplet(pool).expect("decal pool");
        assert!(droplet.horizontal_extent() <= 3.0);
        assert!(droplet.size.y.abs() < f32::EPSILON);
    }

    assert!(operator.droplet(arrival).is_none());
    assert_eq!(operator.state(pool), DropletState::Landed);
    assert_eq!(operator.droplet(pool).map(|settled| settled.size), Some(before));
    assert_eq!(operator.stats().available, 3);
}

#[rstest]
#[case::overshooting_curve(Easing::BackOut)]
#[case::settling_curve(Easing::QuadOut)]
fn expanding_pool_never_passes_the_cap(#[case] easing: Easing) {
    const CAP: f32 = 0.85;
    let mut operator = build_operator(steady_settings(4), LogEffects);
    let pool = operator
        .emit(SPOUT_HEIGHT, Vec3::NEG_Y, Some(&long_lived()))
        .expect("pool has room");
    run_for(&mut operator, 0.8);

    let tight = EmissionOverrides {
        max_size: Some(CAP),
        expand: Some(TweenTiming::new(0.5, easing)),
        ..EmissionOverrides::default()
    };
    let arrival = operator
        .emit(BESIDE, Vec3::NEG_Y, Some(&tight))
        .expect("pool has room");
    let mut peak: f32 = 0.0;
    let mut elapsed = 0.0;
    while elapsed < 1.0 {
        operator.advance(FRAME);
        elapsed += FRAME;
        let extent = operator.droplet(pool).expect("merged pool").horizontal_extent();
        peak = peak.max(extent);
    }

    assert!(operator.droplet(arrival).is_none());
    assert_eq!(operator.state(pool), DropletState::Landed);
    assert!(peak > 0.5);
    assert!(peak <= CAP, "peak extent {peak} passed cap {CAP}");
}
