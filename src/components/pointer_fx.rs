//! Cursor-driven decoration: parallax layers, card tilt, magnetic buttons and
//! the custom cursor ring.

use bevy::prelude::*;
use rand::Rng;

/// Backdrop drifts against the pointer.
pub const BACKDROP_PARALLAX: f32 = -0.03;
/// Title follows the pointer slightly.
pub const TITLE_PARALLAX: f32 = 1.0 / 80.0;
/// Debris squares alternate direction by index.
pub const DEBRIS_PARALLAX: f32 = 0.02;
/// Maximum card tilt in degrees.
pub const MAX_TILT_DEG: f32 = 3.0;
/// Button pull toward the pointer.
pub const MAGNETIC_PULL: f32 = 0.2;

/// Shape of the custom cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorVariant {
    #[default]
    Default,
    /// Over an interactive surface.
    Hover,
    /// Mouse button held.
    Click,
}

impl CursorVariant {
    /// Ring scale relative to the default cursor.
    pub fn ring_scale(&self) -> f32 {
        match self {
            CursorVariant::Hover => 1.5,
            CursorVariant::Default | CursorVariant::Click => 1.0,
        }
    }

    /// Ring diameter in pixels; the click state collapses to a filled dot.
    pub fn ring_diameter(&self) -> f32 {
        match self {
            CursorVariant::Click => 8.0,
            CursorVariant::Default | CursorVariant::Hover => 16.0,
        }
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, CursorVariant::Click)
    }
}

/// Last known pointer position and cursor shape.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub position: Vec2,
    pub variant: CursorVariant,
    /// Mouse button held; takes precedence over hover.
    pub pressed: bool,
    /// Pointer is over an interactive surface this frame.
    pub hovering: bool,
}

impl PointerState {
    /// Resolves the cursor shape from the press and hover flags.
    pub fn resolve_variant(&mut self) {
        self.variant = if self.pressed {
            CursorVariant::Click
        } else if self.hovering {
            CursorVariant::Hover
        } else {
            CursorVariant::Default
        };
    }
}

/// Offset of a layer that moves `factor` times the pointer's distance from
/// the viewport centre.
pub fn parallax_offset(pointer: Vec2, viewport: Vec2, factor: f32) -> Vec2 {
    (pointer - viewport * 0.5) * factor
}

/// Card rotation `(rotate_x, rotate_y)` in degrees for a pointer given in card
/// coordinates. Edges map to ±3°; a degenerate card does not tilt.
pub fn tilt_angles(pointer_in_card: Vec2, card_size: Vec2) -> (f32, f32) {
    let center = card_size * 0.5;
    if center.x <= 0.0 || center.y <= 0.0 {
        return (0.0, 0.0);
    }
    let rotate_x = ((pointer_in_card.y - center.y) / center.y) * -MAX_TILT_DEG;
    let rotate_y = ((pointer_in_card.x - center.x) / center.x) * MAX_TILT_DEG;
    (rotate_x, rotate_y)
}

/// Translation that pulls a button toward the pointer.
pub fn magnetic_offset(pointer: Vec2, button_center: Vec2) -> Vec2 {
    (pointer - button_center) * MAGNETIC_PULL
}

/// `X:0042 Y:0100` style pointer readout.
pub fn coordinate_readout(pointer: Vec2) -> String {
    format!(
        "X:{:04} Y:{:04}",
        pointer.x.max(0.0).round() as u32,
        pointer.y.max(0.0).round() as u32
    )
}

/// A floating square in the backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebrisPiece {
    /// Position as a fraction of the viewport, 0..1 on both axes.
    pub anchor: Vec2,
    /// Side length in pixels.
    pub size: f32,
}

/// Scattered squares that drift with the pointer.
#[derive(Component, Debug, Clone, Default)]
pub struct PixelDebris {
    pub pieces: Vec<DebrisPiece>,
}

impl PixelDebris {
    pub const DEFAULT_COUNT: usize = 12;

    pub fn scatter(count: usize, rng: &mut impl Rng) -> Self {
        let pieces = (0..count)
            .map(|_| DebrisPiece {
                anchor: Vec2::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
                size: rng.gen_range(5.0..25.0),
            })
            .collect();
        Self { pieces }
    }

    /// On-screen top-left corner of each piece for the current pointer.
    pub fn layout(&self, pointer: Vec2, viewport: Vec2) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        let drift = pointer - viewport * 0.5;
        self.pieces.iter().enumerate().map(move |(i, piece)| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let offset = Vec2::new(drift.x * DEBRIS_PARALLAX * sign, drift.y * DEBRIS_PARALLAX);
            (piece.anchor * viewport + offset, piece.size)
        })
    }
}
