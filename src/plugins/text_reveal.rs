//! Text reveal plugin: ticks every `TextRevealer` and reports each change of
//! its display text.

use bevy::prelude::*;

use crate::components::{RevealStatus, TextRevealer};
use crate::resources::FxRng;

/// Emitted after every mutation of a revealer's display text.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct RevealProgress {
    pub entity: Entity,
    pub text: String,
}

/// Emitted once when a revealer plays its last step.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealFinished {
    pub entity: Entity,
}

/// Asks a revealer to restart with a new script.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct StartReveal {
    pub entity: Entity,
    pub source: String,
}

pub struct TextRevealPlugin;

impl Plugin for TextRevealPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RevealProgress>()
            .add_event::<RevealFinished>()
            .add_event::<StartReveal>()
            .add_systems(
                Update,
                (start_reveals, tick_revealers.after(start_reveals)),
            );
    }
}

fn start_reveals(
    mut requests: EventReader<StartReveal>,
    mut revealers: Query<&mut TextRevealer>,
    mut rng: ResMut<FxRng>,
) {
    for request in requests.read() {
        if let Ok(mut revealer) = revealers.get_mut(request.entity) {
            revealer.start(request.source.clone(), &mut rng.0);
        } else {
            warn!("StartReveal for {:?} which has no TextRevealer", request.entity);
        }
    }
}

fn tick_revealers(
    time: Res<Time>,
    mut revealers: Query<(Entity, &mut TextRevealer)>,
    mut progress: EventWriter<RevealProgress>,
    mut finished: EventWriter<RevealFinished>,
) {
    let delta = time.delta();
    for (entity, mut revealer) in &mut revealers {
        if revealer.is_complete() {
            continue;
        }
        let status = revealer.tick(delta, |text| {
            progress.send(RevealProgress {
                entity,
                text: text.to_string(),
            });
        });
        if status == RevealStatus::Finished {
            finished.send(RevealFinished { entity });
        }
    }
}
