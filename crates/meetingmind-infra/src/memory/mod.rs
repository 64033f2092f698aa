//! Memory store backends.
//!
//! The local index lives in `meetingmind-core`; this module adds the hosted
//! service client and picks a backend from configuration.

pub mod hosted;

use meetingmind_core::memory::local::LocalMemoryIndex;
use meetingmind_core::memory::store::BoxMemoryStore;
use meetingmind_types::config::{MemoryBackend, MemoryConfig};
use meetingmind_types::error::MemoryStoreError;

use self::hosted::HostedMemoryStore;

/// Build the configured backend. Selection happens once, at startup.
pub fn create_memory_store(config: &MemoryConfig) -> Result<BoxMemoryStore, MemoryStoreError> {
    match config.backend {
        MemoryBackend::Local => Ok(BoxMemoryStore::new(LocalMemoryIndex::new())),
        MemoryBackend::Hosted => {
            if config.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
                tracing::warn!("hosted memory backend selected without an API key");
            }
            Ok(BoxMemoryStore::new(HostedMemoryStore::new(config)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let store = create_memory_store(&MemoryConfig::default()).unwrap();
        assert_eq!(store.backend(), "local");

        let config = MemoryConfig {
            backend: MemoryBackend::Hosted,
            ..MemoryConfig::default()
        };
        assert_eq!(create_memory_store(&config).unwrap().backend(), "hosted");
    }
}
