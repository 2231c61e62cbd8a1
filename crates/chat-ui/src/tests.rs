#[cfg(test)]
mod tests {
    use crate::panels::settings::{key_hint, storage_label};
    use crate::state::*;
    use chat_types::config::{LlmProvider, StorageBackendType};
    use chat_types::event::ChatEvent;
    use chat_types::message::ChatMessage;
    use chat_types::thread::{ThreadEntry, ThreadId, PLACEHOLDER_TITLE};

    fn entry(id: &str, title: &str) -> ThreadEntry {
        ThreadEntry {
            thread_id: ThreadId::from(id),
            title: title.to_string(),
        }
    }

    fn with_thread(id: &str) -> UiState {
        let mut state = UiState::new();
        state.process_events(vec![
            ChatEvent::ThreadListUpdated {
                active: ThreadId::from(id),
                threads: vec![ThreadEntry::new(ThreadId::from(id))],
            },
            ChatEvent::HistoryReplaced {
                thread_id: ThreadId::from(id),
                messages: vec![],
            },
        ]);
        state
    }

    // ─── UiState Tests ───────────────────────────────────────

    #[test]
    fn test_ui_state_initial() {
        let state = UiState::new();
        assert!(state.threads.is_empty());
        assert!(state.active.is_none());
        assert!(state.messages.is_empty());
        assert!(state.streaming_text.is_empty());
        assert!(state.input_text.is_empty());
        assert!(!state.show_settings);
        assert_eq!(state.status_text, "Ready");
        assert!(!state.is_busy());
        assert!(state.active_title().is_none());
        assert!(state.models.is_empty());
    }

    #[test]
    fn test_thread_list_updated() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::ThreadListUpdated {
            active: ThreadId::from("b"),
            threads: vec![entry("a", "Trip Ideas"), entry("b", PLACEHOLDER_TITLE)],
        }]);

        assert_eq!(state.threads.len(), 2);
        assert_eq!(state.active, Some(ThreadId::from("b")));
        assert_eq!(state.active_title(), Some(PLACEHOLDER_TITLE));
    }

    #[test]
    fn test_history_replaced() {
        let mut state = with_thread("a");
        state.streaming_text = "stale".to_string();
        state.process_events(vec![ChatEvent::HistoryReplaced {
            thread_id: ThreadId::from("a"),
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")],
        }]);

        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].kind, EntryKind::User);
        assert_eq!(state.messages[1].kind, EntryKind::Assistant);
        assert_eq!(state.messages[1].content, "hello");
        assert!(state.streaming_text.is_empty());
    }

    #[test]
    fn test_title_updated_in_place() {
        let mut state = with_thread("a");
        state.process_events(vec![ChatEvent::TitleUpdated {
            thread_id: ThreadId::from("a"),
            title: "Trip Ideas".to_string(),
        }]);

        assert_eq!(state.threads.len(), 1);
        assert_eq!(state.active_title(), Some("Trip Ideas"));
    }

    #[test]
    fn test_message_appended_only_for_active_thread() {
        let mut state = with_thread("a");
        state.process_events(vec![
            ChatEvent::MessageAppended {
                thread_id: ThreadId::from("a"),
                message: ChatMessage::user("hi"),
            },
            ChatEvent::MessageAppended {
                thread_id: ThreadId::from("other"),
                message: ChatMessage::user("elsewhere"),
            },
        ]);

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].content, "hi");
    }

    #[test]
    fn test_streaming_lifecycle() {
        let mut state = with_thread("a");
        state.process_events(vec![ChatEvent::StreamStart {
            thread_id: ThreadId::from("a"),
        }]);
        assert_eq!(state.status_text, "Thinking...");

        state.process_events(vec![
            ChatEvent::StreamDelta { fragment: "Hello".to_string() },
            ChatEvent::StreamDelta { fragment: " world".to_string() },
        ]);
        assert_eq!(state.streaming_text, "Hello world");

        state.process_events(vec![
            ChatEvent::StreamComplete { text: "Hello world".to_string() },
            ChatEvent::MessageAppended {
                thread_id: ThreadId::from("a"),
                message: ChatMessage::assistant("Hello world"),
            },
        ]);
        assert!(state.streaming_text.is_empty());
        assert_eq!(state.status_text, "Ready");
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].kind, EntryKind::Assistant);
    }

    #[test]
    fn test_error_event() {
        let mut state = with_thread("a");
        state.streaming_text = "partial".to_string();
        state.process_events(vec![ChatEvent::Error {
            message: "HTTP 401".to_string(),
        }]);

        assert!(state.streaming_text.is_empty());
        assert!(state.status_text.contains("HTTP 401"));
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].kind, EntryKind::Error);
    }

    #[test]
    fn test_models_listed_replaces_list() {
        let mut state = with_thread("a");
        state.models = vec!["stale".to_string()];
        state.process_events(vec![ChatEvent::ModelsListed {
            models: vec!["gpt-4o-mini".to_string(), "llama-3.3-70b".to_string()],
        }]);

        assert_eq!(state.models, vec!["gpt-4o-mini", "llama-3.3-70b"]);
        assert_eq!(state.status_text, "2 models available");
        // the conversation is untouched
        assert!(state.messages.is_empty());
        assert_eq!(state.active, Some(ThreadId::from("a")));
    }

    #[test]
    fn test_session_cleared() {
        let mut state = with_thread("a");
        state.process_events(vec![ChatEvent::MessageAppended {
            thread_id: ThreadId::from("a"),
            message: ChatMessage::user("hi"),
        }]);
        state.process_events(vec![ChatEvent::SessionCleared]);

        assert!(state.threads.is_empty());
        assert!(state.active.is_none());
        assert!(state.messages.is_empty());
    }

    #[test]
    fn test_threads_newest_first() {
        let mut state = UiState::new();
        state.process_events(vec![ChatEvent::ThreadListUpdated {
            active: ThreadId::from("c"),
            threads: vec![entry("a", "A"), entry("b", "B"), entry("c", "C")],
        }]);

        let order: Vec<&str> = state
            .threads_newest_first()
            .map(|t| t.thread_id.as_str())
            .collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    // ─── Labels ──────────────────────────────────────────────

    #[test]
    fn test_display_label_short_title_unchanged() {
        assert_eq!(display_label("Trip Ideas"), "Trip Ideas");
        let exact = "x".repeat(SIDEBAR_LABEL_CHARS);
        assert_eq!(display_label(&exact), exact);
    }

    #[test]
    fn test_display_label_long_title_cut() {
        let long = "a".repeat(45);
        let label = display_label(&long);
        assert_eq!(label, format!("{}...", "a".repeat(30)));
    }

    #[test]
    fn test_display_label_counts_chars() {
        let long = "é".repeat(31);
        assert_eq!(display_label(&long).chars().count(), 33);
    }

    #[test]
    fn test_storage_labels() {
        assert_eq!(storage_label(&StorageBackendType::Auto), "Auto-detect");
        assert_eq!(storage_label(&StorageBackendType::LocalStorage), "localStorage");
    }

    #[test]
    fn test_key_hints_follow_provider() {
        assert_eq!(key_hint(&LlmProvider::Groq), "gsk_...");
        assert_eq!(key_hint(&LlmProvider::OpenAI), "sk-...");
        assert_eq!(key_hint(&LlmProvider::DeepSeek), "sk-...");
    }
}
