//! tubetool — authenticated task orchestration for YouTube content tooling.
//!
//! The tool adapters an LLM agent calls for YouTube workflows mostly reduce
//! to single-request API wrappers; this crate implements the parts that
//! don't: the OAuth credential lifecycle behind uploads (store, silent
//! refresh, interactive authorization with a local callback listener), the
//! submit-then-poll orchestration for asynchronous generation jobs, and the
//! multipart upload flow with best-effort thumbnail attachment.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tubetool::auth::{ClientSecrets, CredentialManager, FileCredentialStore};
//!
//! # async fn example() -> Result<(), tubetool::auth::AuthError> {
//! let secrets = ClientSecrets::load("client_secret.json")?;
//! let store = Arc::new(FileCredentialStore::new_default());
//! let manager = CredentialManager::new(store, secrets);
//! let credential = manager.obtain_valid_credential().await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod generation;
pub mod task;
pub mod upload;

pub use error::{Result, TubetoolError};
