//! Shared process state handed to every request handler.
//!
//! The knowledge base and auth keys are immutable after construction.
//! The SQLite connection sits behind a `Mutex`; guards are never held
//! across an `.await`.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::auth::AuthKeys;
use crate::config::ServerConfig;
use crate::db::{self, DatabaseError};
use crate::knowledge::{KnowledgeBase, KnowledgeError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("State lock poisoned")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Failures while assembling state at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
    #[error("Server error: {0}")]
    Serve(String),
}

pub struct CoreState {
    db: Mutex<Connection>,
    knowledge: Arc<KnowledgeBase>,
    auth: AuthKeys,
}

impl CoreState {
    pub fn new(conn: Connection, knowledge: Arc<KnowledgeBase>, auth: AuthKeys) -> Self {
        Self {
            db: Mutex::new(conn),
            knowledge,
            auth,
        }
    }

    /// Build state from runtime configuration: open the database, load
    /// the knowledge base and derive auth keys.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let knowledge = match &config.knowledge_base_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading knowledge base");
                KnowledgeBase::load(path)?
            }
            None => KnowledgeBase::bundled()?,
        };
        tracing::info!(entries = knowledge.len(), "Knowledge base ready");

        let auth = match &config.jwt_secret {
            Some(secret) => AuthKeys::from_secret(secret.as_bytes()),
            None => {
                tracing::warn!(
                    "HEALTHGUIDE_JWT_SECRET not set; using an ephemeral secret. \
                     Tokens from the identity service will be rejected."
                );
                AuthKeys::ephemeral()
            }
        };

        let conn = db::open_database(&config.db_path)?;
        tracing::info!(path = %config.db_path.display(), "Database ready");

        Ok(Self::new(conn, Arc::new(knowledge), auth))
    }

    /// In-memory database with the given knowledge base (tests, demos).
    pub fn in_memory(knowledge: KnowledgeBase, auth: AuthKeys) -> Result<Self, CoreError> {
        let conn = db::open_memory_database()?;
        Ok(Self::new(conn, Arc::new(knowledge), auth))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn auth_keys(&self) -> &AuthKeys {
        &self.auth
    }

    /// Run `f` with exclusive access to the database connection.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, CoreError> {
        let conn = self.db.lock().map_err(|_| CoreError::LockPoisoned)?;
        Ok(f(&conn)?)
    }
}
