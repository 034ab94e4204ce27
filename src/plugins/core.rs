use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::components::{
    fallback_surface, Oscilloscope, ParticleField, PixelDebris, TextRevealer,
};
use crate::plugins::input::get_default_input_map;
use crate::resources::{CliArgs, FxRng, FxSettings, RegionSet};

/// Script revealed when `--text` is not given.
pub const DEFAULT_SCRIPT: &str = "> SIGNAL LAB {shi yan shi|实验室} // field survey online";

/// Loads settings and region data, then spawns the showcase entities.
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let cli = app
            .world()
            .get_resource::<CliArgs>()
            .cloned()
            .unwrap_or_default();

        let settings = FxSettings::load_or_default(cli.settings.as_deref());
        let regions = load_regions(&cli);

        app.insert_resource(settings)
            .insert_resource(regions)
            .insert_resource(FxRng::from_seed_or_entropy(cli.seed))
            .insert_resource(cli)
            .add_systems(Startup, (spawn_camera, spawn_showcase));
    }
}

fn load_regions(cli: &CliArgs) -> RegionSet {
    let Some(path) = &cli.regions else {
        return RegionSet::bundled();
    };
    match RegionSet::load_from(path) {
        Ok(set) if !set.is_empty() => {
            info!("Loaded {} regions from {:?}", set.regions.len(), path);
            set
        }
        Ok(_) => {
            warn!("Region file {:?} is empty, using bundled outlines", path);
            RegionSet::bundled()
        }
        Err(e) => {
            warn!("{}, using bundled outlines", e);
            RegionSet::bundled()
        }
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        InputManagerBundle::with_map(get_default_input_map()),
    ));
}

fn spawn_showcase(
    mut commands: Commands,
    cli: Res<CliArgs>,
    regions: Res<RegionSet>,
    settings: Res<FxSettings>,
    mut rng: ResMut<FxRng>,
) {
    // Real size arrives with the first layout pass.
    let field = ParticleField::new(
        &regions,
        fallback_surface(Vec2::ZERO),
        &settings.field,
        &mut rng.0,
    );
    commands.spawn((Name::new("Particle Field"), field));

    let script = cli.text.clone().unwrap_or_else(|| DEFAULT_SCRIPT.to_string());
    let mut revealer = TextRevealer::new(settings.reveal.clone());
    revealer.start(script, &mut rng.0);
    commands.spawn((Name::new("Text Revealer"), revealer));

    commands.spawn((Name::new("Oscilloscope"), Oscilloscope::default()));
    commands.spawn((
        Name::new("Pixel Debris"),
        PixelDebris::scatter(PixelDebris::DEFAULT_COUNT, &mut rng.0),
    ));
}
