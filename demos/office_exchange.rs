//! Runs one santa from creation to draw against a sled database.
//!
//! `cargo run --example office_exchange [config.toml]`
use secret_santa::SantaService;
use secret_santa::config::SantaConfig;
use secret_santa::repository::SledRepository;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn main() -> anyhow::Result<()> {
    secret_santa::telemetry::init_tracing()?;

    let config = match std::env::args().nth(1) {
        Some(path) => SantaConfig::load(Path::new(&path))?,
        None => {
            let mut config = SantaConfig::default();
            config.apply_env_overrides();
            config
        }
    };

    let repo = Arc::new(SledRepository::open(&config.storage.path)?);
    let service = SantaService::from_config(Arc::clone(&repo), &config)?;

    let (group, organiser_secret) = service.create_group_with_issued_secret("Office", "Alice")?;
    let id = group.id().clone();
    info!(group_id = %id, secret = organiser_secret.expose(), "give this secret to Alice");

    for name in ["Bob", "Carol", "Dave"] {
        let (_, secret) = service.add_participant_with_issued_secret(&id, name)?;
        info!(participant = name, secret = secret.expose(), "participant joined");
    }

    let group = service.draw(&id)?;
    for m in group.matches().unwrap_or_default() {
        info!(giver = %m.giver_name, receiver = %m.receiver_name, "matched");
    }

    repo.flush()?;
    Ok(())
}
