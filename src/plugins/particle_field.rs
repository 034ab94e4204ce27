//! Particle field plugin: rebuilds fields when their container is re-measured
//! and advances their animation every frame.

use bevy::prelude::*;

use crate::components::ParticleField;
use crate::resources::{FxRng, FxSettings, RegionSet};

/// The hosting container reported a size for a field's drawing surface.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FieldSurfaceMeasured {
    pub entity: Entity,
    pub size: Vec2,
}

pub struct ParticleFieldPlugin;

impl Plugin for ParticleFieldPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FieldSurfaceMeasured>().add_systems(
            Update,
            (
                resize_particle_fields,
                animate_particle_fields.after(resize_particle_fields),
            ),
        );
    }
}

/// Rebuilds a field when its measured size changes. Repeated reports of the
/// same size are ignored.
fn resize_particle_fields(
    mut events: EventReader<FieldSurfaceMeasured>,
    mut fields: Query<&mut ParticleField>,
    regions: Res<RegionSet>,
    settings: Res<FxSettings>,
    mut rng: ResMut<FxRng>,
) {
    for event in events.read() {
        let Ok(mut field) = fields.get_mut(event.entity) else {
            continue;
        };
        if field.resize(event.size, &regions, &settings.field, &mut rng.0) {
            debug!("Field {:?} resized to {:?}", event.entity, field.surface());
        }
    }
}

/// Advances every live field by one frame.
fn animate_particle_fields(time: Res<Time>, mut fields: Query<&mut ParticleField>) {
    let delta = time.delta_secs();
    for mut field in &mut fields {
        field.tick(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(16)));
        app.insert_resource(RegionSet::single(
            "Box",
            vec![vec![[-11.0, -11.0], [11.0, -11.0], [11.0, 11.0], [-11.0, 11.0]]],
        ));
        app.init_resource::<FxSettings>();
        app.insert_resource(FxRng::seeded(21));
        app.add_plugins(ParticleFieldPlugin);
        app
    }

    fn spawn_field(app: &mut App, size: Vec2) -> Entity {
        let world = app.world_mut();
        let regions = world.resource::<RegionSet>().clone();
        let settings = world.resource::<FxSettings>().field.clone();
        let field = {
            let mut rng = world.resource_mut::<FxRng>();
            ParticleField::new(&regions, size, &settings, &mut rng.0)
        };
        world.spawn(field).id()
    }

    #[test]
    fn test_resize_event_rebuilds_once() {
        let mut app = test_app();
        let entity = spawn_field(&mut app, Vec2::new(360.0, 180.0));

        app.world_mut().send_event(FieldSurfaceMeasured {
            entity,
            size: Vec2::new(720.0, 360.0),
        });
        app.update();
        {
            let field = app.world().get::<ParticleField>(entity).unwrap();
            assert_eq!(field.surface(), Vec2::new(720.0, 360.0));
            assert_eq!(field.generation(), 2);
        }

        // Same size again is a no-op.
        app.world_mut().send_event(FieldSurfaceMeasured {
            entity,
            size: Vec2::new(720.0, 360.0),
        });
        app.update();
        let field = app.world().get::<ParticleField>(entity).unwrap();
        assert_eq!(field.generation(), 2);
        assert!(field.is_running());
    }

    #[test]
    fn test_animation_advances_elapsed() {
        let mut app = test_app();
        let entity = spawn_field(&mut app, Vec2::new(360.0, 180.0));

        for _ in 0..5 {
            app.update();
        }
        let field = app.world().get::<ParticleField>(entity).unwrap();
        assert!(field.elapsed() > 0.0);
    }

    #[test]
    fn test_despawn_cancels_ticker() {
        let mut app = test_app();
        let entity = spawn_field(&mut app, Vec2::new(360.0, 180.0));
        let ticker = app.world().get::<ParticleField>(entity).unwrap().ticker();

        app.update();
        app.world_mut().despawn(entity);
        app.update();
        assert!(ticker.is_cancelled());
    }

    #[test]
    fn test_event_for_missing_entity_is_ignored() {
        let mut app = test_app();
        let entity = spawn_field(&mut app, Vec2::new(360.0, 180.0));
        app.world_mut().despawn(entity);
        app.world_mut().send_event(FieldSurfaceMeasured {
            entity,
            size: Vec2::new(100.0, 100.0),
        });
        app.update();
    }
}
