//! OAuth credential lifecycle: storage, refresh, and interactive authorization.

pub mod credential;
pub mod error;
pub mod interactive;
pub mod manager;
pub mod refresh;
pub mod secrets;
pub mod store;

pub use credential::Credential;
pub use error::AuthError;
pub use interactive::InteractiveAuthorizer;
pub use manager::{CredentialManager, InteractiveFlow};
pub use refresh::TokenRefresher;
pub use secrets::ClientSecrets;
pub use store::{CredentialStore, FileCredentialStore};
