use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

use crate::components::{ParticleField, TextRevealer};
use crate::plugins::debug_ui::DebugToggles;
use crate::resources::{FxRng, FxSettings, RegionSet};

#[derive(Actionlike, PartialEq, Eq, Clone, Copy, Hash, Debug, Reflect)]
pub enum PortfolioAction {
    /// Restart the text reveal from the beginning.
    ReplayReveal,
    /// Rebuild the particle field with fresh random attributes.
    Reseed,
    ToggleDebug,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputManagerPlugin::<PortfolioAction>::default())
            .init_resource::<DebugToggles>()
            .add_systems(Update, handle_portfolio_actions);
    }
}

pub fn get_default_input_map() -> InputMap<PortfolioAction> {
    let mut input_map = InputMap::default();

    input_map.insert(PortfolioAction::ReplayReveal, KeyCode::KeyR);
    input_map.insert(PortfolioAction::Reseed, KeyCode::Space);
    input_map.insert(PortfolioAction::ToggleDebug, KeyCode::F3);

    input_map
}

fn handle_portfolio_actions(
    actions: Query<&ActionState<PortfolioAction>>,
    mut revealers: Query<&mut TextRevealer>,
    mut fields: Query<&mut ParticleField>,
    regions: Res<RegionSet>,
    settings: Res<FxSettings>,
    mut rng: ResMut<FxRng>,
    mut toggles: ResMut<DebugToggles>,
) {
    let Ok(action_state) = actions.get_single() else {
        return;
    };

    if action_state.just_pressed(&PortfolioAction::ReplayReveal) {
        for mut revealer in &mut revealers {
            let source = revealer.source().to_string();
            revealer.start(source, &mut rng.0);
        }
    }

    if action_state.just_pressed(&PortfolioAction::Reseed) {
        for mut field in &mut fields {
            let surface = field.surface();
            field.reinitialize(&regions, surface, &settings.field, &mut rng.0);
        }
    }

    if action_state.just_pressed(&PortfolioAction::ToggleDebug) {
        toggles.show_panel = !toggles.show_panel;
    }
}
