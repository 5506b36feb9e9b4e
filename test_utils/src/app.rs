//! Headless Bevy apps for plugin tests.
use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use droplets::plugin::DropletsDestroyed;
use droplets::{DropletPlugin, TeardownReport};

/// Teardown reports observed during a test.
#[derive(Resource, Default, Debug)]
pub struct CapturedTeardowns(pub Vec<TeardownReport>);

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must take On<T> by value."
)]
fn record_teardown(event: On<DropletsDestroyed>, mut captured: ResMut<CapturedTeardowns>) {
    captured.0.push(event.event().report);
}

/// App with `MinimalPlugins`, a fixed 60 Hz clock and `plugin` installed.
///
/// Teardown reports are collected in [`CapturedTeardowns`].
pub fn headless_app(plugin: DropletPlugin) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs(1) / 60))
        .insert_resource(CapturedTeardowns::default())
        .add_plugins(plugin);
    app.world_mut().add_observer(record_teardown);
    app
}
