//! Model discovery for the settings panel.

use chat_types::{Result, event::ChatEvent};
use crate::event_bus::EventBus;
use crate::ports::LlmPort;

/// Ask the provider which models it serves and publish them as
/// [`ChatEvent::ModelsListed`], sorted with blanks and duplicates removed.
pub async fn refresh_models(llm: &dyn LlmPort, bus: &EventBus) -> Result<usize> {
    let mut models: Vec<String> = llm
        .list_models()
        .await?
        .into_iter()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    models.sort();
    models.dedup();

    let count = models.len();
    log::info!("Provider lists {} models", count);
    bus.emit(ChatEvent::ModelsListed { models });
    Ok(count)
}
