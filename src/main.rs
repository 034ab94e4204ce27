use bevy::prelude::*;
use bevy::window::CursorOptions;
use bevy_egui::EguiPlugin;
use lab_portfolio::plugins::core::CorePlugin;
use lab_portfolio::plugins::debug_ui::DebugUiPlugin;
use lab_portfolio::plugins::decor::DecorPlugin;
use lab_portfolio::plugins::input::InputPlugin;
use lab_portfolio::plugins::particle_field::ParticleFieldPlugin;
use lab_portfolio::plugins::showcase::ShowcaseUiPlugin;
use lab_portfolio::plugins::text_reveal::TextRevealPlugin;
use lab_portfolio::resources::CliArgs;

fn main() {
    App::new()
        .insert_resource(CliArgs::parse())
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Lab Portfolio".to_string(),
                // The showcase draws its own cursor.
                cursor_options: CursorOptions {
                    visible: false,
                    ..default()
                },
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .add_plugins(CorePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(DebugUiPlugin)
        .add_plugins(ParticleFieldPlugin)
        .add_plugins(TextRevealPlugin)
        .add_plugins(DecorPlugin)
        .add_plugins(ShowcaseUiPlugin)
        .run();
}
