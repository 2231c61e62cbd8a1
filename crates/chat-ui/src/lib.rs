//! egui panels for the chat client.
//!
//! Panels render from [`state::UiState`] and report user intent back to the
//! app as return values; they never touch the session directly.

pub mod state;
pub mod theme;
pub mod panels;

#[cfg(test)]
mod tests;
