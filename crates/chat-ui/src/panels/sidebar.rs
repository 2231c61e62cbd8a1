//! Sidebar: new chat, thread history, clear history.

use egui::{self, RichText, ScrollArea};
use chat_types::thread::ThreadId;
use crate::state::{display_label, UiState};
use crate::theme::*;

/// What the user asked for in the sidebar this frame
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarAction {
    None,
    NewChat,
    Select(ThreadId),
    ClearHistory,
}

pub fn sidebar_panel(ui: &mut egui::Ui, state: &UiState) -> SidebarAction {
    let mut action = SidebarAction::None;
    let enabled = !state.is_busy();

    ui.vertical(|ui| {
        ui.heading(RichText::new("Threadline").color(TEXT_PRIMARY).strong());
        ui.add_space(6.0);

        let new_chat = ui.add_enabled(
            enabled,
            filled_button("+ New Chat", ACCENT, ui.available_width()),
        );
        if new_chat.clicked() {
            action = SidebarAction::NewChat;
        }

        ui.add_space(8.0);
        ui.separator();
        ui.label(RichText::new("History").color(TEXT_SECONDARY).strong());

        let list_height = ui.available_height() - 48.0;
        ScrollArea::vertical()
            .max_height(list_height)
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for entry in state.threads_newest_first() {
                    let selected = state.active.as_ref() == Some(&entry.thread_id);
                    let label = RichText::new(display_label(&entry.title)).color(if selected {
                        TEXT_PRIMARY
                    } else {
                        TEXT_SECONDARY
                    });
                    let row = ui
                        .add_enabled(enabled, egui::Button::selectable(selected, label))
                        .on_hover_text(&entry.title);
                    if row.clicked() && !selected {
                        action = SidebarAction::Select(entry.thread_id.clone());
                    }
                }
            });

        ui.separator();
        let clear = ui.add_enabled(
            enabled,
            filled_button("Clear History", DANGER, ui.available_width()),
        );
        if clear.clicked() {
            action = SidebarAction::ClearHistory;
        }
    });

    action
}
