//! Bevy plugin driving a [`DropletOperator`] from the app schedule.
//!
//! The operator lives in the [`Droplets`] resource. Emissions and teardown
//! are requested by triggering [`EmitDroplet`] and [`DropletTeardown`]; the
//! simulation advances once per `Update` by the frame's delta time.
use std::sync::Mutex;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use glam::Vec3;
use log::{debug, error, info};

use crate::config::{EmissionOverrides, OperatorSettings};
use crate::effects::LogEffects;
use crate::geometry::StaticScene;
use crate::operator::{DropletOperator, TeardownReport};

/// Resource owning the droplet operator.
#[derive(Resource, Deref, DerefMut)]
pub struct Droplets(pub DropletOperator);

/// Requests a droplet launch.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EmitDroplet {
    /// Launch point.
    pub origin: Vec3,
    /// Launch direction; zero means straight down.
    pub direction: Vec3,
    /// Changes layered over the default emission.
    pub overrides: Option<EmissionOverrides>,
}

impl EmitDroplet {
    /// Launch with the default emission.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            overrides: None,
        }
    }
}

/// Requests destruction of the operator and every active droplet.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropletTeardown;

/// Raised once the operator has been destroyed.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropletsDestroyed {
    /// What the teardown reclaimed.
    pub report: TeardownReport,
}

/// Installs the droplet operator and its systems.
pub struct DropletPlugin {
    /// Settings used when no operator is supplied.
    pub settings: OperatorSettings,
    /// Scene used when no operator is supplied.
    pub scene: StaticScene,
    operator: Mutex<Option<DropletOperator>>,
}

impl Default for DropletPlugin {
    fn default() -> Self {
        Self::new(OperatorSettings::default())
    }
}

impl DropletPlugin {
    /// Builds the operator from `settings` over a floor at height zero.
    #[must_use]
    pub fn new(settings: OperatorSettings) -> Self {
        Self {
            settings,
            scene: StaticScene::with_floor(0.0),
            operator: Mutex::new(None),
        }
    }

    /// Uses `scene` instead of the default floor.
    #[must_use]
    pub fn with_scene(mut self, scene: StaticScene) -> Self {
        self.scene = scene;
        self
    }

    /// Installs a ready-made operator instead of building one.
    #[must_use]
    pub fn with_operator(operator: DropletOperator) -> Self {
        Self {
            settings: operator.settings().clone(),
            scene: StaticScene::new(),
            operator: Mutex::new(Some(operator)),
        }
    }

    fn take_operator(&self) -> Option<DropletOperator> {
        let supplied = self.operator.lock().ok().and_then(|mut slot| slot.take());
        supplied.or_else(|| {
            DropletOperator::new(self.settings.clone(), self.scene.clone(), LogEffects)
                .inspect_err(|err| error!("droplet plugin disabled: {err}"))
                .ok()
        })
    }
}

impl Plugin for DropletPlugin {
    fn build(&self, app: &mut App) {
        let Some(operator) = self.take_operator() else {
            return;
        };
        app.insert_resource(Droplets(operator));
        app.add_observer(emit_droplet);
        app.add_observer(teardown_droplets);
        app.add_systems(Update, advance_droplets_system);
    }
}

/// Advances the simulation by the frame's delta time.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn advance_droplets_system(time: Res<Time>, operator: Option<ResMut<Droplets>>) {
    if let Some(mut droplets) = operator {
        droplets.advance(time.delta_secs());
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn emit_droplet(event: On<EmitDroplet>, operator: Option<ResMut<Droplets>>) {
    let EmitDroplet {
        origin,
        direction,
        overrides,
    } = event.event();
    let Some(mut droplets) = operator else {
        debug!("emission requested after droplet teardown");
        return;
    };
    droplets.emit(*origin, *direction, overrides.as_ref());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn teardown_droplets(_event: On<DropletTeardown>, mut commands: Commands) {
    commands.queue(|world: &mut World| {
        let Some(Droplets(operator)) = world.remove_resource::<Droplets>() else {
            return;
        };
        let report = operator.destroy();
        info!("droplet teardown reclaimed {} droplets", report.reclaimed);
        world.trigger(DropletsDestroyed { report });
    });
}
