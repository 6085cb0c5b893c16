//! Opens the configured backend and identity provider.

use magi_core::storage::data_dir;
use magi_core::{
    BackendKind, Config, LocalIdentity, RemoteIdentity, RestStore, SnapshotStore, SqliteStore,
    Tracker,
};
use tracing::{debug, warn};

pub enum Workspace {
    Local(Tracker<SnapshotStore, LocalIdentity>),
    Sqlite(Tracker<SqliteStore, LocalIdentity>),
    Remote(Tracker<RestStore, RemoteIdentity>),
}

pub fn open() -> Result<Workspace, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let dir = data_dir()?;
    let horizon = config.streak.horizon_days;
    debug!(backend = ?config.storage.backend, dir = %dir.display(), "opening workspace");

    let workspace = match config.storage.backend {
        BackendKind::Local => {
            let store = SnapshotStore::open(&dir)?;
            Workspace::Local(Tracker::new(store, LocalIdentity::open(&dir)).with_horizon(horizon))
        }
        BackendKind::Sqlite => {
            let store = SqliteStore::open(&dir)?;
            Workspace::Sqlite(Tracker::new(store, LocalIdentity::open(&dir)).with_horizon(horizon))
        }
        BackendKind::Remote => {
            let (url, api_key) = config.remote_endpoint()?;
            let mut identity =
                RemoteIdentity::new(url.clone(), api_key.as_str(), Some(dir.join("session.json")))?;
            // Non-fatal: `auth signin` must still run.
            if let Err(e) = identity.ensure_fresh(chrono::Utc::now()) {
                warn!(error = %e, "could not refresh session");
            }
            let mut store = RestStore::new(url, api_key)?;
            if let Some(token) = identity.access_token() {
                store = store.with_access_token(token);
            }
            Workspace::Remote(Tracker::new(store, identity).with_horizon(horizon))
        }
    };
    Ok(workspace)
}
