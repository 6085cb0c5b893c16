//! # MAGI Core Library
//!
//! Core logic for the MAGI personal life tracker: habits with daily, weekly
//! and monthly schedules, a 52-week reading plan, a phased exercise program,
//! annual goals and mood logs. The `magi` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Engine**: pure schedule, streak and aggregate computations over a
//!   state snapshot and an explicit reference date
//! - **Storage**: one [`Backend`] contract with a local JSON snapshot, a
//!   SQLite store and a PostgREST client, plus TOML configuration
//! - **Identity**: sign-in collaborators scoping all data to one owner
//! - **Tracker**: the service that owns a backend and an identity, caches
//!   the snapshot and invalidates it after every successful write
//!
//! ## Key Components
//!
//! - [`Tracker`]: read and write operations over the current user's data
//! - [`compute_streak`]: current streak of a habit as of a date
//! - [`Config`]: application configuration management

pub mod engine;
pub mod error;
pub mod identity;
pub mod model;
pub mod seed;
pub mod storage;
pub mod tracker;

pub use engine::{
    compute_streak, current_by_date_range, is_due, today_completion, weekly_completion,
    CompletionLog, Dashboard,
};
pub use error::{ConfigError, CoreError, IdentityError, Result, StoreError, ValidationError};
pub use identity::{Identity, LocalIdentity, RemoteIdentity, User};
pub use model::AppState;
pub use seed::{seed_if_empty, SeedPlan, SeedReport};
pub use storage::{Backend, BackendKind, Config, RestStore, SnapshotStore, SqliteStore};
pub use tracker::Tracker;
