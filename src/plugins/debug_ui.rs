use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::components::{ParticleField, PointerState, TextRevealer};
use crate::plugins::text_reveal::RevealFinished;

/// Runtime switches for debug overlays.
#[derive(Resource, Debug, Default)]
pub struct DebugToggles {
    pub show_panel: bool,
    /// Reveals that played to the end since startup.
    pub completed_reveals: u32,
}

pub struct DebugUiPlugin;

impl Plugin for DebugUiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<FrameTimeDiagnosticsPlugin>() {
            app.add_plugins(FrameTimeDiagnosticsPlugin::default());
        }

        app.init_resource::<DebugToggles>()
            .add_event::<RevealFinished>()
            .add_systems(Update, (count_finished_reveals, debug_panel));
    }
}

fn count_finished_reveals(
    mut events: EventReader<RevealFinished>,
    mut toggles: ResMut<DebugToggles>,
) {
    for event in events.read() {
        toggles.completed_reveals += 1;
        info!("Reveal on {:?} finished", event.entity);
    }
}

fn debug_panel(
    mut contexts: EguiContexts,
    mut toggles: ResMut<DebugToggles>,
    diagnostics: Res<DiagnosticsStore>,
    fields: Query<&ParticleField>,
    revealers: Query<&TextRevealer>,
    pointer: Res<PointerState>,
) {
    if !toggles.show_panel {
        return;
    }
    let completed = toggles.completed_reveals;

    egui::Window::new("Debug Panel")
        .open(&mut toggles.show_panel)
        .show(contexts.ctx_mut(), |ui| {
            if let Some(fps) = diagnostics
                .get(&FrameTimeDiagnosticsPlugin::FPS)
                .and_then(|diag| diag.smoothed())
            {
                ui.label(format!("FPS: {:.1}", fps));
            }

            ui.separator();
            ui.heading("Particle Fields");
            for field in &fields {
                let surface = field.surface();
                ui.label(format!(
                    "{} samples on {}x{} (gen {}, {})",
                    field.samples().len(),
                    surface.x,
                    surface.y,
                    field.generation(),
                    if field.is_running() { "running" } else { "stopped" }
                ));
            }

            ui.separator();
            ui.heading("Text Reveal");
            for revealer in &revealers {
                ui.label(format!(
                    "{} / {} chars{}",
                    revealer.visible_text().chars().count(),
                    revealer.final_len(),
                    if revealer.is_complete() { " (done)" } else { "" }
                ));
            }
            ui.label(format!("Completed runs: {}", completed));

            ui.separator();
            ui.label(format!(
                "Pointer: {:?} {:?}",
                pointer.position, pointer.variant
            ));
        });
}
