//! Pick the storage backend the configuration asks for.
//!
//! `Auto` prefers localStorage (persistent) and falls back to memory.

use std::rc::Rc;
use chat_core::ports::StoragePort;
use chat_types::{Result, config::StorageBackendType};
use super::{LocalStorage, MemoryStorage};

/// Returns a trait object so callers are backend-agnostic.
/// An explicit `LocalStorage` request fails loudly instead of degrading.
pub fn auto_detect_storage(backend: &StorageBackendType) -> Result<Rc<dyn StoragePort>> {
    match backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory");
            Ok(Rc::new(MemoryStorage::new()))
        }
        StorageBackendType::LocalStorage => {
            let local = LocalStorage::open()?;
            log::info!("Storage backend: localStorage");
            Ok(Rc::new(local))
        }
        StorageBackendType::Auto => match LocalStorage::open() {
            Ok(local) => {
                log::info!("Storage backend: localStorage");
                Ok(Rc::new(local))
            }
            Err(e) => {
                log::warn!("localStorage unavailable ({}), falling back to memory", e);
                Ok(Rc::new(MemoryStorage::new()))
            }
        },
    }
}
