#![allow(dead_code)]

use secret_santa::SantaService;
use secret_santa::config::{CredentialConfig, SantaConfig};
use secret_santa::repository::{InMemoryRepository, SledRepository};
use std::sync::Arc;
use tempfile::TempDir;

// argon2 at its cheapest so hashing does not dominate test time
pub fn cheap_config() -> SantaConfig {
    SantaConfig {
        credentials: CredentialConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
            ..CredentialConfig::default()
        },
        ..SantaConfig::default()
    }
}

pub fn memory_service() -> SantaService<InMemoryRepository> {
    SantaService::from_config(Arc::new(InMemoryRepository::new()), &cheap_config())
        .expect("cheap argon2 params are valid")
}

/// Sled uses file-based locking, so every test opens its own database inside
/// a temp dir. Keep the `TempDir` alive for as long as the service is used.
pub fn sled_service(name: &str) -> anyhow::Result<(TempDir, SantaService<SledRepository>)> {
    let temp_dir = tempfile::tempdir()?;
    let repo = SledRepository::open(&temp_dir.path().join(name))?;
    let service = SantaService::from_config(Arc::new(repo), &cheap_config())?;
    Ok((temp_dir, service))
}
