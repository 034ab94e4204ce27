//! Oscilloscope strip: two beating sine waves scrolling across a grid.

use bevy::prelude::*;

/// Strip height in pixels.
pub const STRIP_HEIGHT: f32 = 80.0;
/// Distance between vertical grid lines.
pub const GRID_STEP: f32 = 15.0;
/// Scroll advance per 60 Hz frame.
const SCROLL_PER_FRAME: f32 = 1.5;

#[derive(Component, Debug, Clone, Default)]
pub struct Oscilloscope {
    /// Scroll position in pixels.
    pub time: f32,
}

impl Oscilloscope {
    pub fn tick(&mut self, delta_secs: f32) {
        self.time += SCROLL_PER_FRAME * delta_secs * 60.0;
    }

    /// Height of the trace at column `x`.
    pub fn sample(&self, x: f32, height: f32) -> f32 {
        let t = self.time;
        height / 2.0 + ((x + t) * 0.08).sin() * 15.0 + ((x - t * 1.5) * 0.03).sin() * 8.0
    }

    /// One point per whole pixel column, left to right.
    pub fn trace(&self, width: f32, height: f32) -> Vec<Vec2> {
        let columns = width.max(0.0).floor() as usize;
        (0..columns)
            .map(|x| {
                let x = x as f32;
                Vec2::new(x, self.sample(x, height))
            })
            .collect()
    }

    /// X positions of the vertical grid lines.
    pub fn grid_lines(width: f32) -> impl Iterator<Item = f32> {
        let count = (width.max(0.0) / GRID_STEP).ceil() as usize;
        (0..count).map(|i| i as f32 * GRID_STEP)
    }
}
