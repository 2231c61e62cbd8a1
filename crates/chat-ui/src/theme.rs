//! Palette, spacing and the small widget helpers shared by the panels

use egui::{Color32, CornerRadius, RichText, Stroke, Vec2, Visuals};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(22, 24, 29);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(33, 37, 44);
pub const BG_SURFACE: Color32 = Color32::from_rgb(47, 52, 61);
pub const BG_ERROR: Color32 = Color32::from_rgb(58, 24, 28);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(230, 232, 236);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(148, 155, 168);
pub const ACCENT: Color32 = Color32::from_rgb(20, 160, 145);
pub const SUCCESS: Color32 = Color32::from_rgb(74, 200, 120);
pub const ERROR: Color32 = Color32::from_rgb(235, 87, 87);
pub const DANGER: Color32 = Color32::from_rgb(190, 55, 65);
pub const WARNING: Color32 = Color32::from_rgb(230, 170, 40);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(6);
pub const PANEL_PADDING: Vec2 = Vec2::new(12.0, 8.0);
pub const SIDEBAR_WIDTH: f32 = 240.0;
pub const BUTTON_HEIGHT: f32 = 28.0;

/// Dark visuals with the chat palette on top
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_SECONDARY;
    visuals.extreme_bg_color = BG_SECONDARY;
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.45);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    let widgets = &mut visuals.widgets;
    for (state, fill, text) in [
        (&mut widgets.inactive, BG_SURFACE, TEXT_SECONDARY),
        (&mut widgets.hovered, BG_SURFACE, TEXT_PRIMARY),
        (&mut widgets.active, ACCENT, TEXT_PRIMARY),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.fg_stroke = Stroke::new(1.0, text);
    }

    ctx.set_visuals(visuals);
    ctx.style_mut(|style| style.spacing.item_spacing = Vec2::new(8.0, 6.0));
}

/// Accent-colored group heading
pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(text).color(ACCENT).strong());
    ui.add_space(2.0);
}

/// Small caption above an input
pub fn field_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).color(TEXT_SECONDARY).small());
}

/// Full-width filled button as used for the sidebar and settings actions
pub fn filled_button(text: &str, fill: Color32, width: f32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).color(TEXT_PRIMARY).strong())
        .fill(fill)
        .corner_radius(PANEL_ROUNDING)
        .min_size(Vec2::new(width, BUTTON_HEIGHT))
}
