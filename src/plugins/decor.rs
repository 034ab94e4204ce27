//! Pointer tracking and the small ambient animations around the map.

use bevy::prelude::*;

use crate::components::{Oscilloscope, PointerState};

pub struct DecorPlugin;

impl Plugin for DecorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>().add_systems(
            Update,
            (
                track_pointer,
                resolve_cursor_variant.after(track_pointer),
                animate_oscilloscopes,
            ),
        );
    }
}

/// Follows the OS cursor and mouse button.
fn track_pointer(
    mut moves: EventReader<CursorMoved>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut pointer: ResMut<PointerState>,
) {
    if let Some(last) = moves.read().last() {
        pointer.position = last.position;
    }
    if let Some(buttons) = buttons {
        if buttons.just_pressed(MouseButton::Left) {
            pointer.pressed = true;
        }
        if buttons.just_released(MouseButton::Left) {
            pointer.pressed = false;
        }
    }
}

fn resolve_cursor_variant(mut pointer: ResMut<PointerState>) {
    pointer.resolve_variant();
}

fn animate_oscilloscopes(time: Res<Time>, mut scopes: Query<&mut Oscilloscope>) {
    let delta = time.delta_secs();
    for mut scope in &mut scopes {
        scope.tick(delta);
    }
}
