//! Passgate Core - account registration and password authentication
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account) and the error taxonomy
//! - **ports**: Trait definitions for external dependencies (AccountStore, CredentialHasher)
//! - **services**: Business logic orchestration (registration, authentication, logging)
//! - **adapters**: Concrete implementations (DuckDB, in-memory, Argon2id)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::argon2_hasher::Argon2Hasher;
use adapters::duckdb::DuckDbAccountStore;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{CredentialError, OperationResult};
pub use domain::{Account, AccountView, HasherParams, NewAccount};
pub use ports::{AccountStore, CredentialHasher};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Account database filename inside the data directory
pub const DB_FILENAME: &str = "passgate.duckdb";

/// Main context for Passgate operations
///
/// This is the primary entry point for all business logic. It holds
/// the store, configuration, and both credential services.
pub struct PassgateContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<DuckDbAccountStore>,
    pub hasher: Arc<Argon2Hasher>,
    pub registration_service: RegistrationService,
    pub authentication_service: AuthenticationService,
}

impl PassgateContext {
    /// Create a new Passgate context rooted at a data directory
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(DB_FILENAME);
        let store = Arc::new(DuckDbAccountStore::new(&db_path)?);

        // Initialize schema
        store.ensure_schema()?;

        let hasher = Arc::new(
            Argon2Hasher::new(config.hasher).context("Invalid hasher settings")?,
        );

        let registration_service = RegistrationService::new(store.clone(), hasher.clone());
        let authentication_service = AuthenticationService::new(store.clone(), hasher.clone());

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            store,
            hasher,
            registration_service,
            authentication_service,
        })
    }
}
