//! Particle Field Component
//!
//! Stipples region outlines into a shimmering field of dots. Positions are
//! fixed once the field is built; only opacity and colour change over time.

use std::f32::consts::TAU;

use bevy::prelude::*;
use rand::Rng;

use crate::resources::{FieldSettings, RegionSet};
use crate::utils::cancel::CancelToken;
use crate::utils::geometry::{project_ring, sample_ring};

/// Fallback width used when the host reports a zero-sized container.
pub const MIN_SURFACE_WIDTH: f32 = 320.0;
/// Fallback height used when the host reports a zero-sized container.
pub const MIN_SURFACE_HEIGHT: f32 = 160.0;
/// Samples dimmer than this are not drawn.
pub const VISIBILITY_EPSILON: f32 = 0.01;
/// Phase speeds are expressed per frame at this rate.
const REFERENCE_FRAME_SECS: f32 = 1.0 / 60.0;

/// A single stipple dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Projected position in surface pixels.
    pub position: Vec2,
    pub base_opacity: f32,
    /// Current flicker phase in radians, kept within `[0, TAU)`.
    pub phase: f32,
    /// Phase advance per reference frame.
    pub speed: f32,
    pub radius: f32,
}

/// What to draw for one sample on the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStyle {
    pub position: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub color: [u8; 3],
}

/// Replaces zero, negative, or non-finite dimensions with the minimum surface.
pub fn fallback_surface(measured: Vec2) -> Vec2 {
    let pick = |value: f32, min: f32| {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            min
        }
    };
    Vec2::new(
        pick(measured.x, MIN_SURFACE_WIDTH),
        pick(measured.y, MIN_SURFACE_HEIGHT),
    )
}

/// Opacity multiplier for a phase.
///
/// Zero while the sine sits below `threshold`, then rising linearly to 1 at
/// the crest.
pub fn flicker(phase: f32, threshold: f32) -> f32 {
    let wave = phase.sin();
    if wave < threshold || threshold >= 1.0 {
        return 0.0;
    }
    ((wave - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)
}

/// Colour of a sample at `elapsed` seconds.
///
/// A slow sine keyed on time and position walks the four palette stops, so
/// neighbouring dots shift hue together while distant ones drift apart.
pub fn wave_color(elapsed: f32, position: Vec2, settings: &FieldSettings) -> [u8; 3] {
    let wave = (elapsed * settings.color_speed
        + (position.x + position.y) * settings.color_spatial_scale)
        .sin();
    palette_at(&settings.palette, (wave + 1.0) * 0.5)
}

/// Piecewise-linear lookup across three segments of a four-stop palette.
pub fn palette_at(palette: &[[u8; 3]; 4], t: f32) -> [u8; 3] {
    let scaled = t.clamp(0.0, 1.0) * 3.0;
    let segment = (scaled.floor() as usize).min(2);
    let local = scaled - segment as f32;
    lerp_rgb(palette[segment], palette[segment + 1], local)
}

fn lerp_rgb(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    [mix(a[0], b[0]), mix(a[1], b[1]), mix(a[2], b[2])]
}

/// Draws from `[lo, hi)`, or returns `lo` when the range is empty.
fn draw_in(rng: &mut impl Rng, [lo, hi]: [f32; 2]) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

/// Rasterizes every polygon of `regions` onto a surface and assigns each hit
/// its random attributes. Positions never depend on `rng`.
pub fn build_samples(
    regions: &RegionSet,
    surface: Vec2,
    settings: &FieldSettings,
    rng: &mut impl Rng,
) -> Vec<SamplePoint> {
    let spacing = settings.spacing();
    let radius = settings.particle_diameter * 0.5;

    let mut samples = Vec::new();
    for ring in regions.polygons() {
        if ring.len() < 3 {
            continue;
        }
        let projected = project_ring(ring, surface);
        for position in sample_ring(&projected, spacing) {
            samples.push(SamplePoint {
                position,
                base_opacity: draw_in(rng, settings.opacity_range),
                phase: rng.gen_range(0.0..TAU),
                speed: draw_in(rng, settings.speed_range),
                radius,
            });
        }
    }
    samples
}

/// Animated stipple rendering of a region set inside a drawing surface.
///
/// Each (re)initialization issues a fresh frame ticker and cancels the one
/// before it, so the animation system never advances a stale sample set.
#[derive(Component, Debug)]
pub struct ParticleField {
    samples: Vec<SamplePoint>,
    surface: Vec2,
    /// Seconds of animation since the field was created. Survives rebuilds so
    /// the colour wave does not jump on resize or reseed.
    elapsed: f32,
    ticker: CancelToken,
    /// Number of times the field has been built.
    generation: u32,
}

impl ParticleField {
    /// Builds a field for `measured` container size.
    pub fn new(
        regions: &RegionSet,
        measured: Vec2,
        settings: &FieldSettings,
        rng: &mut impl Rng,
    ) -> Self {
        let mut field = Self {
            samples: Vec::new(),
            surface: Vec2::ZERO,
            elapsed: 0.0,
            ticker: CancelToken::new(),
            generation: 0,
        };
        field.reinitialize(regions, measured, settings, rng);
        field
    }

    /// Discards every sample and rebuilds from scratch.
    pub fn reinitialize(
        &mut self,
        regions: &RegionSet,
        measured: Vec2,
        settings: &FieldSettings,
        rng: &mut impl Rng,
    ) {
        self.ticker.cancel();
        self.ticker = CancelToken::new();

        self.surface = fallback_surface(measured);
        self.samples = build_samples(regions, self.surface, settings, rng);
        self.generation += 1;

        info!(
            "Particle field built: {} samples on {}x{} (generation {})",
            self.samples.len(),
            self.surface.x,
            self.surface.y,
            self.generation
        );
    }

    /// Rebuilds only if the effective surface size changed.
    /// Returns true when a rebuild happened.
    pub fn resize(
        &mut self,
        measured: Vec2,
        regions: &RegionSet,
        settings: &FieldSettings,
        rng: &mut impl Rng,
    ) -> bool {
        if fallback_surface(measured) == self.surface && self.is_running() {
            return false;
        }
        self.reinitialize(regions, measured, settings, rng);
        true
    }

    /// Advances every phase by one frame worth of `delta_secs`.
    /// Does nothing once the ticker has been cancelled.
    pub fn tick(&mut self, delta_secs: f32) -> bool {
        if self.ticker.is_cancelled() {
            return false;
        }
        let frames = delta_secs / REFERENCE_FRAME_SECS;
        for sample in &mut self.samples {
            sample.phase = (sample.phase + sample.speed * frames).rem_euclid(TAU);
        }
        self.elapsed += delta_secs;
        true
    }

    /// Samples worth drawing this frame, with their resolved style.
    pub fn visible_samples<'a>(
        &'a self,
        settings: &'a FieldSettings,
    ) -> impl Iterator<Item = SampleStyle> + 'a {
        self.samples.iter().filter_map(move |sample| {
            let opacity =
                sample.base_opacity * flicker(sample.phase, settings.flicker_threshold);
            if opacity < VISIBILITY_EPSILON {
                return None;
            }
            Some(SampleStyle {
                position: sample.position,
                radius: sample.radius,
                opacity,
                color: wave_color(self.elapsed, sample.position, settings),
            })
        })
    }

    /// Stops the animation. The samples stay until the field is dropped or
    /// rebuilt.
    pub fn teardown(&mut self) {
        self.ticker.cancel();
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn surface(&self) -> Vec2 {
        self.surface
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Handle to the current frame ticker.
    pub fn ticker(&self) -> CancelToken {
        self.ticker.clone()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_live()
    }
}

impl Drop for ParticleField {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}
