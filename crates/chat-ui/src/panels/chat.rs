//! Chat panel. Displays the active thread and the input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use crate::state::{ChatEntry, EntryKind, UiState};
use crate::theme::*;

/// Render the chat panel. Returns Some(message) when user submits input.
///
/// The submitted text is not added to the display here; it shows up once
/// the session appends it.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<String> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    let title = state.active_title().unwrap_or("Chat").to_string();
                    ui.heading(RichText::new(title).color(TEXT_PRIMARY).strong());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status_color = if state.is_busy() {
                            WARNING
                        } else if state.status_text.starts_with("Error") {
                            ERROR
                        } else {
                            SUCCESS
                        };
                        ui.label(
                            RichText::new(&state.status_text)
                                .color(status_color)
                                .small(),
                        );
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for entry in &state.messages {
                            render_message(ui, entry);
                            ui.add_space(4.0);
                        }

                        if !state.streaming_text.is_empty() {
                            egui::Frame::default()
                                .fill(BG_SECONDARY)
                                .corner_radius(PANEL_ROUNDING)
                                .inner_margin(8.0)
                                .show(ui, |ui| {
                                    ui.label(
                                        RichText::new("Assistant")
                                            .color(SUCCESS)
                                            .strong()
                                            .small(),
                                    );
                                    ui.label(
                                        RichText::new(format!("{}▌", state.streaming_text))
                                            .color(TEXT_PRIMARY),
                                    );
                                });
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let input = egui::TextEdit::singleline(&mut state.input_text)
                        .hint_text("Type your message here...")
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));

                    let response = ui.add(input);

                    let can_send = !state.input_text.trim().is_empty() && !state.is_busy();
                    let send_btn = ui.add_enabled(
                        can_send,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if can_send { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    let entered =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if can_send && (entered || send_btn.clicked()) {
                        submitted = Some(std::mem::take(&mut state.input_text));
                        response.request_focus();
                    }
                });
            });
        });

    submitted
}

fn render_message(ui: &mut egui::Ui, entry: &ChatEntry) {
    let (label, label_color, bg) = match entry.kind {
        EntryKind::User => ("You", ACCENT, BG_SECONDARY),
        EntryKind::Assistant => ("Assistant", SUCCESS, BG_SECONDARY),
        EntryKind::Error => ("Error", ERROR, BG_ERROR),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.label(RichText::new(label).color(label_color).strong().small());
            ui.label(RichText::new(&entry.content).color(TEXT_PRIMARY));
        });
}
