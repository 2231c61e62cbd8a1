//! Main egui application. Composes all panels and drives the session.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};

use chat_core::event_bus::EventBus;
use chat_core::models::refresh_models;
use chat_core::ports::{LlmPort, StoragePort};
use chat_core::session::SessionCoordinator;
use chat_platform::llm::OpenAiCompatProvider;
use chat_platform::storage::{auto_detect_storage, MemoryStorage};
use chat_platform::{CheckpointStore, CheckpointedEngine};
use chat_types::config::{ChatConfig, StorageBackendType};
use chat_types::{ChatError, Result, ThreadId};
use chat_ui::panels::settings::{SaveFeedback, SettingsAction};
use chat_ui::panels::sidebar::SidebarAction;
use chat_ui::panels::{chat, settings, sidebar};
use chat_ui::state::UiState;
use chat_ui::theme;

const CONFIG_STORAGE_KEY: &str = "chat:config";

/// One user-initiated session operation
enum Action {
    Initialize,
    NewChat,
    Select(ThreadId),
    Send(String),
    ClearHistory,
}

/// Everything wired from one configuration
struct Session {
    coordinator: Rc<RefCell<SessionCoordinator>>,
    llm: Rc<dyn LlmPort>,
    checkpoints: CheckpointStore,
    backend: StorageBackendType,
}

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    config: ChatConfig,
    event_bus: EventBus,
    /// Where the configuration itself is kept
    settings_store: Rc<dyn StoragePort>,
    /// Built once the saved configuration has been read
    session: Option<Session>,
    restored: Rc<RefCell<Option<ChatConfig>>>,
    in_flight: Rc<Cell<bool>>,
    save_feedback: Option<SaveFeedback>,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_store: Rc<dyn StoragePort> =
            match auto_detect_storage(&StorageBackendType::Auto) {
                Ok(storage) => storage,
                Err(e) => {
                    log::warn!("Settings storage unavailable ({}), using memory", e);
                    Rc::new(MemoryStorage::new())
                }
            };
        let restored = Rc::new(RefCell::new(None));

        Self::restore_config(settings_store.clone(), restored.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            config: ChatConfig::default(),
            event_bus: EventBus::new(),
            settings_store,
            session: None,
            restored,
            in_flight: Rc::new(Cell::new(false)),
            save_feedback: None,
            first_frame: true,
        }
    }

    /// Restore config from storage (async). The slot is always filled,
    /// with defaults when nothing usable is stored.
    fn restore_config(
        storage: Rc<dyn StoragePort>,
        slot: Rc<RefCell<Option<ChatConfig>>>,
        ctx: egui::Context,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let config = match storage.get(CONFIG_STORAGE_KEY).await {
                Ok(Some(data)) => match serde_json::from_slice::<ChatConfig>(&data) {
                    Ok(config) => {
                        log::info!("Config restored from storage");
                        config
                    }
                    Err(e) => {
                        log::warn!("Stored config unreadable, using defaults: {}", e);
                        ChatConfig::default()
                    }
                },
                Ok(None) => ChatConfig::default(),
                Err(e) => {
                    log::warn!("Config restore failed, using defaults: {}", e);
                    ChatConfig::default()
                }
            };
            *slot.borrow_mut() = Some(config);
            ctx.request_repaint();
        });
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: &ChatConfig) -> Result<()> {
        let json = serde_json::to_vec(config)?;
        wasm_bindgen_futures::spawn_local(async move {
            match storage.set(CONFIG_STORAGE_KEY, &json).await {
                Ok(()) => log::info!("Config saved to storage"),
                Err(e) => log::error!("Config save failed: {}", e),
            }
        });
        Ok(())
    }

    fn build_session(config: &ChatConfig, event_bus: &EventBus) -> Result<Session> {
        let storage = auto_detect_storage(&config.storage.backend)?;
        let checkpoints = CheckpointStore::new(storage);
        let llm: Rc<dyn LlmPort> = Rc::new(OpenAiCompatProvider::new(config.llm.clone()));
        let engine = Rc::new(CheckpointedEngine::new(llm.clone(), checkpoints.clone(), config));
        let coordinator = SessionCoordinator::new(
            Rc::new(checkpoints.clone()),
            engine,
            config.title.clone(),
            event_bus.clone(),
        );
        Ok(Session {
            coordinator: Rc::new(RefCell::new(coordinator)),
            llm,
            checkpoints,
            backend: config.storage.backend.clone(),
        })
    }

    fn start_session(&mut self, ctx: &egui::Context) {
        match Self::build_session(&self.config, &self.event_bus) {
            Ok(session) => {
                self.session = Some(session);
                self.dispatch(Action::Initialize, ctx);
            }
            Err(e) => {
                log::error!("Session setup failed: {}", e);
                self.event_bus.emit_error(&e);
            }
        }
    }

    /// Apply edited settings. A storage change starts a new session on the
    /// new backend; anything else swaps the engine and keeps the session.
    fn apply_config(&mut self, ctx: &egui::Context) -> Result<()> {
        if self.in_flight.get() {
            return Err(ChatError::Config(
                "wait for the current response to finish".to_string(),
            ));
        }
        Self::save_config(self.settings_store.clone(), &self.config)?;

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if session.backend != self.config.storage.backend {
            log::info!("Storage backend changed, restarting session");
            self.start_session(ctx);
            return Ok(());
        }

        let llm: Rc<dyn LlmPort> = Rc::new(OpenAiCompatProvider::new(self.config.llm.clone()));
        let engine = Rc::new(CheckpointedEngine::new(
            llm.clone(),
            session.checkpoints.clone(),
            &self.config,
        ));
        let mut coordinator = session
            .coordinator
            .try_borrow_mut()
            .map_err(|_| ChatError::Config("session is busy".to_string()))?;
        coordinator.replace_engine(engine);
        coordinator.set_title_config(self.config.title.clone());
        drop(coordinator);
        session.llm = llm;
        Ok(())
    }

    /// Run a session operation in the background. Refused while another
    /// one is still running.
    fn dispatch(&mut self, action: Action, ctx: &egui::Context) {
        if self.in_flight.get() {
            log::warn!("Busy, action ignored");
            return;
        }
        let Some(session) = &self.session else {
            return;
        };

        let coordinator = session.coordinator.clone();
        let llm = session.llm.clone();
        let bus = self.event_bus.clone();
        let in_flight = self.in_flight.clone();
        let ctx = ctx.clone();

        in_flight.set(true);
        self.ui_state.busy = true;

        wasm_bindgen_futures::spawn_local(async move {
            let result = match coordinator.try_borrow_mut() {
                Ok(mut session) => run_action(&mut session, llm.as_ref(), action).await,
                Err(_) => Err(ChatError::Other("session is busy".to_string())),
            };
            if let Err(e) = result {
                log::error!("Session operation failed: {}", e);
                // Stream failures are already reported by the coordinator
                if !matches!(e, ChatError::Stream(_)) {
                    bus.emit_error(&e);
                }
            }
            in_flight.set(false);
            ctx.request_repaint();
        });
    }

    /// Fetch the model list with the settings as currently edited, so a
    /// new key or endpoint can be checked before it is saved.
    fn fetch_models(&mut self, ctx: &egui::Context) {
        let llm = OpenAiCompatProvider::new(self.config.llm.clone());
        let bus = self.event_bus.clone();
        let ctx = ctx.clone();
        self.ui_state.status_text = "Fetching models...".to_string();

        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = refresh_models(&llm, &bus).await {
                log::error!("Model listing failed: {}", e);
                bus.emit_error(&e);
            }
            ctx.request_repaint();
        });
    }
}

async fn run_action(session: &mut SessionCoordinator, llm: &dyn LlmPort, action: Action) -> Result<()> {
    match action {
        Action::Initialize => session.initialize().await,
        Action::NewChat => session.new_thread().await.map(|_| ()),
        Action::Select(thread_id) => session.switch_thread(&thread_id).await,
        Action::Send(text) => session.send_message(&text, llm).await,
        Action::ClearHistory => {
            session.clear_all().await?;
            session.initialize().await
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        if self.session.is_none() {
            let restored = self.restored.borrow_mut().take();
            if let Some(config) = restored {
                self.config = config;
                self.start_session(ctx);
            }
        }

        // Drain events from the session coordinator
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }

        self.ui_state.busy = self.in_flight.get();
        if self.ui_state.is_busy() {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Threadline")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(format!(
                        "Provider: {} | Model: {}",
                        self.config.llm.provider.label(),
                        self.config.llm.model
                    ))
                    .color(theme::TEXT_SECONDARY)
                    .small(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add(egui::Button::selectable(self.ui_state.show_settings, "Settings"))
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                });
            });
        });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            let mut action = SettingsAction::None;
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    action = settings::settings_panel(
                        ui,
                        &mut self.config,
                        &self.ui_state.models,
                        self.save_feedback.as_ref(),
                    );
                });
            match action {
                SettingsAction::SaveClicked => {
                    self.save_feedback = Some(match self.apply_config(ctx) {
                        Ok(()) => SaveFeedback {
                            message: "Saved".to_string(),
                            success: true,
                        },
                        Err(e) => SaveFeedback {
                            message: e.to_string(),
                            success: false,
                        },
                    });
                }
                SettingsAction::FetchModels => self.fetch_models(ctx),
                SettingsAction::Changed => self.save_feedback = None,
                SettingsAction::None => {}
            }
        }

        // ── Thread sidebar ───────────────────────────────────
        let mut sidebar_action = SidebarAction::None;
        SidePanel::left("thread_sidebar")
            .exact_width(theme::SIDEBAR_WIDTH)
            .show(ctx, |ui| {
                sidebar_action = sidebar::sidebar_panel(ui, &self.ui_state);
            });
        match sidebar_action {
            SidebarAction::NewChat => self.dispatch(Action::NewChat, ctx),
            SidebarAction::Select(thread_id) => self.dispatch(Action::Select(thread_id), ctx),
            SidebarAction::ClearHistory => self.dispatch(Action::ClearHistory, ctx),
            SidebarAction::None => {}
        }

        // ── Main content ─────────────────────────────────────
        let mut submitted = None;
        CentralPanel::default().show(ctx, |ui| {
            submitted = chat::chat_panel(ui, &mut self.ui_state);
        });
        if let Some(text) = submitted {
            self.dispatch(Action::Send(text), ctx);
        }
    }
}
