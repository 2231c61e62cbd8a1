//! Settings panel: provider connection, models, title generation, storage.

use egui::{self, RichText};
use chat_types::config::{ChatConfig, LlmConfig, LlmProvider, StorageBackendType};
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    /// A field was edited; the edit is not applied until saved
    Changed,
    SaveClicked,
    /// Ask the configured provider for its model list
    FetchModels,
}

/// Outcome of the last save, shown next to the Save button
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel. `models` is the last fetched model list and
/// may be empty, in which case model ids are typed by hand.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut ChatConfig,
    models: &[String],
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut action = SettingsAction::None;
    let mut changed = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            changed |= provider_section(ui, &mut config.llm);

            section_heading(ui, "Models");
            if ui
                .add(filled_button("Fetch models", BG_SURFACE, ui.available_width()))
                .on_hover_text("List the models served by the endpoint above")
                .clicked()
            {
                action = SettingsAction::FetchModels;
            }
            field_label(ui, "Chat model");
            changed |= model_picker(ui, "chat_model", &mut config.llm.model, models);
            field_label(ui, "Title model");
            changed |= model_picker(ui, "title_model", &mut config.title.model, models);

            section_heading(ui, "Generation");
            field_label(ui, "Temperature");
            changed |= ui
                .add(egui::Slider::new(&mut config.llm.temperature, 0.0..=2.0))
                .changed();
            field_label(ui, "Max reply tokens");
            changed |= ui
                .add(egui::Slider::new(&mut config.llm.max_tokens, 256..=32768).logarithmic(true))
                .changed();
            field_label(ui, "Max title length");
            changed |= ui
                .add(egui::Slider::new(&mut config.title.max_chars, 10..=120).suffix(" chars"))
                .changed();

            section_heading(ui, "Storage");
            changed |= storage_section(ui, &mut config.storage.backend);

            ui.add_space(12.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.add(filled_button("Save Settings", ACCENT, 120.0)).clicked() {
                    action = SettingsAction::SaveClicked;
                }
                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if action == SettingsAction::None && changed {
        SettingsAction::Changed
    } else {
        action
    }
}

/// Provider buttons, key and endpoint override. Returns true on any edit.
fn provider_section(ui: &mut egui::Ui, llm: &mut LlmConfig) -> bool {
    let mut changed = false;
    section_heading(ui, "Provider");

    ui.horizontal_wrapped(|ui| {
        for provider in LlmProvider::all() {
            let selected = &llm.provider == provider;
            if ui.add(egui::Button::selectable(selected, provider.label())).clicked() && !selected {
                llm.provider = provider.clone();
                changed = true;
            }
        }
    });

    field_label(ui, "API key");
    changed |= ui
        .add(
            egui::TextEdit::singleline(&mut llm.api_key)
                .password(true)
                .hint_text(key_hint(&llm.provider)),
        )
        .changed();

    field_label(ui, "Endpoint override");
    let mut base_url = llm.api_base.clone().unwrap_or_default();
    if ui
        .add(egui::TextEdit::singleline(&mut base_url).hint_text(llm.provider.default_base_url()))
        .changed()
    {
        llm.api_base = Some(base_url).filter(|url| !url.trim().is_empty());
        changed = true;
    }

    let endpoint = llm.base_url();
    let (text, color) = if endpoint.is_empty() {
        ("No endpoint: Custom needs an override".to_string(), WARNING)
    } else {
        (format!("Requests go to {}", endpoint), TEXT_SECONDARY)
    };
    ui.label(RichText::new(text).color(color).small().italics());

    changed
}

/// Free-text model id with a drop-down of fetched ids beside it.
fn model_picker(ui: &mut egui::Ui, id: &str, model: &mut String, models: &[String]) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        let width = if models.is_empty() {
            ui.available_width()
        } else {
            ui.available_width() - 36.0
        };
        changed |= ui
            .add(egui::TextEdit::singleline(model).desired_width(width))
            .changed();
        if !models.is_empty() {
            egui::ComboBox::from_id_salt(id)
                .selected_text("")
                .width(24.0)
                .show_ui(ui, |ui| {
                    for candidate in models {
                        let selected = model.as_str() == candidate.as_str();
                        if ui.selectable_label(selected, candidate).clicked() && !selected {
                            *model = candidate.clone();
                            changed = true;
                        }
                    }
                });
        }
    });
    changed
}

fn storage_section(ui: &mut egui::Ui, backend: &mut StorageBackendType) -> bool {
    let mut changed = false;
    for option in storage_options() {
        changed |= ui
            .radio_value(backend, option.clone(), storage_label(&option))
            .changed();
    }
    ui.label(
        RichText::new(storage_description(backend))
            .color(TEXT_SECONDARY)
            .small()
            .italics(),
    );
    changed
}

/// Placeholder for the API key field, shaped like the provider's keys
pub fn key_hint(provider: &LlmProvider) -> &'static str {
    match provider {
        LlmProvider::Groq => "gsk_...",
        LlmProvider::DeepSeek | LlmProvider::OpenAI => "sk-...",
        LlmProvider::Custom => "Bearer token, if the endpoint needs one",
    }
}

pub fn storage_label(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Auto-detect",
        StorageBackendType::Memory => "Memory",
        StorageBackendType::LocalStorage => "localStorage",
    }
}

fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "localStorage when the browser allows it, memory otherwise.",
        StorageBackendType::Memory => "Threads live until the page reloads.",
        StorageBackendType::LocalStorage => "Threads survive page reloads.",
    }
}

fn storage_options() -> [StorageBackendType; 3] {
    [
        StorageBackendType::Auto,
        StorageBackendType::Memory,
        StorageBackendType::LocalStorage,
    ]
}
