//! Paints the showcase: backdrop, reveal line, oscilloscope strip, stippled
//! map and the custom cursor.

use std::time::Duration;

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::components::{
    coordinate_readout, fallback_surface, magnetic_offset, parallax_offset, tilt_angles,
    Oscilloscope, ParticleField, PixelDebris, PointerState, TextRevealer, BACKDROP_PARALLAX,
    STRIP_HEIGHT, TITLE_PARALLAX,
};
use crate::plugins::particle_field::FieldSurfaceMeasured;
use crate::plugins::text_reveal::StartReveal;
use crate::resources::FxSettings;

/// Phosphor green used for text and strokes.
const INK: egui::Color32 = egui::Color32::from_rgb(31, 51, 34);
const ACCENT: egui::Color32 = egui::Color32::from_rgb(211, 84, 0);
const BACKDROP_TEXT: egui::Color32 = egui::Color32::from_rgb(204, 214, 204);
/// Clear colour behind the egui layers.
pub const BACKGROUND: Color = Color::srgb(0.878, 0.902, 0.878);

pub struct ShowcaseUiPlugin;

impl Plugin for ShowcaseUiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(BACKGROUND)).add_systems(
            Update,
            (
                configure_ui_theme,
                draw_backdrop,
                draw_showcase,
                draw_cursor,
            )
                .chain(),
        );
    }
}

fn configure_ui_theme(mut contexts: EguiContexts, mut configured: Local<bool>) {
    if *configured {
        return;
    }
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    style.visuals.override_text_color = Some(INK);
    style.visuals.hyperlink_color = ACCENT;
    style.visuals.panel_fill = egui::Color32::TRANSPARENT;
    style.visuals.window_fill = egui::Color32::from_rgb(219, 228, 219);
    style.visuals.window_stroke = egui::Stroke::new(2.0, INK);

    ctx.set_style(style);
    *configured = true;
}

fn to_pos(v: Vec2) -> egui::Pos2 {
    egui::pos2(v.x, v.y)
}

fn viewport_of(ctx: &egui::Context) -> Vec2 {
    let screen = ctx.screen_rect();
    Vec2::new(screen.width(), screen.height())
}

/// Giant lab tag and drifting debris behind everything else.
fn draw_backdrop(
    mut contexts: EguiContexts,
    pointer: Res<PointerState>,
    debris: Query<&PixelDebris>,
) {
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();
    let viewport = viewport_of(ctx);
    let painter = ctx.layer_painter(egui::LayerId::background());

    let shift = parallax_offset(pointer.position, viewport, BACKDROP_PARALLAX);
    painter.text(
        screen.center() + egui::vec2(shift.x, shift.y),
        egui::Align2::CENTER_CENTER,
        "LAB_01",
        egui::FontId::monospace(screen.width() * 0.18),
        BACKDROP_TEXT,
    );

    let square = egui::Color32::from_rgba_unmultiplied(31, 51, 34, 13);
    for field in &debris {
        for (corner, size) in field.layout(pointer.position, viewport) {
            painter.rect_filled(
                egui::Rect::from_min_size(to_pos(corner), egui::vec2(size, size)),
                0.0,
                square,
            );
        }
    }
}

fn draw_showcase(
    mut contexts: EguiContexts,
    time: Res<Time>,
    settings: Res<FxSettings>,
    mut pointer: ResMut<PointerState>,
    fields: Query<(Entity, &ParticleField)>,
    revealers: Query<(Entity, &TextRevealer)>,
    scopes: Query<&Oscilloscope>,
    mut measured: EventWriter<FieldSurfaceMeasured>,
    mut replays: EventWriter<StartReveal>,
) {
    let ctx = contexts.ctx_mut();
    let viewport = viewport_of(ctx);
    let caret_period = Duration::from_millis(settings.reveal.caret_period_ms);
    let cursor = pointer.position;
    let mut hovering = false;

    egui::CentralPanel::default()
        .frame(egui::Frame::none().inner_margin(24.0))
        .show(ctx, |ui| {
            let title_shift = parallax_offset(cursor, viewport, TITLE_PARALLAX);
            for (_, revealer) in &revealers {
                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(ui.available_width(), 28.0),
                    egui::Sense::hover(),
                );
                ui.painter().text(
                    rect.left_center() + egui::vec2(title_shift.x, title_shift.y),
                    egui::Align2::LEFT_CENTER,
                    revealer.text_with_caret(time.elapsed(), caret_period),
                    egui::FontId::monospace(18.0),
                    INK,
                );
            }

            // Replay button leans toward the pointer while hovered.
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(120.0, 28.0), egui::Sense::click());
            let pull = if response.hovered() {
                magnetic_offset(cursor, Vec2::new(rect.center().x, rect.center().y))
            } else {
                Vec2::ZERO
            };
            let button = rect.translate(egui::vec2(pull.x, pull.y));
            ui.painter().rect_filled(
                button,
                0.0,
                if response.hovered() { ACCENT } else { INK },
            );
            ui.painter().text(
                button.center(),
                egui::Align2::CENTER_CENTER,
                "REPLAY",
                egui::FontId::monospace(11.0),
                egui::Color32::from_rgb(224, 230, 224),
            );
            hovering |= response.hovered();
            if response.clicked() {
                for (entity, revealer) in &revealers {
                    replays.send(StartReveal {
                        entity,
                        source: revealer.source().to_string(),
                    });
                }
            }

            ui.add_space(12.0);
            for scope in &scopes {
                draw_oscilloscope(ui, scope);
            }
            ui.add_space(12.0);

            for (entity, field) in &fields {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
                let size = Vec2::new(rect.width(), rect.height());
                if fallback_surface(size) != field.surface() {
                    measured.send(FieldSurfaceMeasured { entity, size });
                }

                // The map card tilts a couple of pixels toward the pointer.
                let lean = if response.hovered() {
                    let local = cursor - Vec2::new(rect.min.x, rect.min.y);
                    let (rotate_x, rotate_y) = tilt_angles(local, size);
                    egui::vec2(rotate_y, -rotate_x)
                } else {
                    egui::Vec2::ZERO
                };
                hovering |= response.hovered();

                let painter = ui.painter_at(rect);
                let origin = rect.min + lean;
                for sample in field.visible_samples(&settings.field) {
                    let [r, g, b] = sample.color;
                    let alpha = (sample.opacity * 255.0).round() as u8;
                    painter.circle_filled(
                        origin + egui::vec2(sample.position.x, sample.position.y),
                        sample.radius,
                        egui::Color32::from_rgba_unmultiplied(r, g, b, alpha),
                    );
                }
            }
        });

    pointer.hovering = hovering;
}

fn draw_oscilloscope(ui: &mut egui::Ui, scope: &Oscilloscope) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), STRIP_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);

    let grid = egui::Stroke::new(1.0, INK.gamma_multiply(0.15));
    for x in Oscilloscope::grid_lines(rect.width()) {
        painter.line_segment(
            [rect.min + egui::vec2(x, 0.0), rect.min + egui::vec2(x, rect.height())],
            grid,
        );
    }

    let points: Vec<egui::Pos2> = scope
        .trace(rect.width(), rect.height())
        .into_iter()
        .map(|p| rect.min + egui::vec2(p.x, p.y))
        .collect();
    painter.add(egui::Shape::line(points, egui::Stroke::new(2.0, INK)));
}

fn draw_cursor(mut contexts: EguiContexts, pointer: Res<PointerState>) {
    let ctx = contexts.ctx_mut();
    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("custom_cursor"),
    ));

    let center = to_pos(pointer.position);
    let scale = pointer.variant.ring_scale();
    let arm = 16.0 * scale;
    let stroke = egui::Stroke::new(1.0, INK);

    painter.line_segment([center - egui::vec2(arm, 0.0), center + egui::vec2(arm, 0.0)], stroke);
    painter.line_segment([center - egui::vec2(0.0, arm), center + egui::vec2(0.0, arm)], stroke);

    let radius = pointer.variant.ring_diameter() * 0.5 * scale;
    if pointer.variant.is_filled() {
        painter.circle_filled(center, radius, INK);
    } else {
        painter.circle_stroke(center, radius, stroke);
    }

    painter.text(
        screen.right_bottom() - egui::vec2(24.0, 24.0),
        egui::Align2::RIGHT_BOTTOM,
        coordinate_readout(pointer.position),
        egui::FontId::monospace(11.0),
        INK.gamma_multiply(0.4),
    );
}
