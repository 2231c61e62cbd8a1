//! Thread lifecycle and streaming-response coordination for the chat client.

pub mod ports;
pub mod event_bus;
pub mod registry;
pub mod store;
pub mod title;
pub mod assembler;
pub mod models;
pub mod session;
