use std::fs;
use std::path::{Path, PathBuf};

use super::credential::Credential;
use super::error::AuthError;

/// Storage abstraction for the persisted OAuth credential.
///
/// The crate manages exactly one credential, so the store holds at most one
/// record. Injected into [`CredentialManager`](super::CredentialManager) so
/// tests can substitute an in-memory fake.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, AuthError>;
    fn save(&self, credential: &Credential) -> Result<(), AuthError>;
}

/// File-backed credential store holding a single JSON document.
///
/// Saves are atomic: the document is written to a sibling temp file and
/// renamed over the target, so a crash mid-write never leaves torn JSON.
///
/// # Example
/// ```no_run
/// use tubetool::auth::{Credential, CredentialStore, FileCredentialStore};
///
/// let store = FileCredentialStore::new("/tmp/token.json");
/// let cred = Credential {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     expires_at: None,
/// };
/// store.save(&cred)?;
/// # Ok::<(), tubetool::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's tubetool directory.
    pub fn new_default() -> Self {
        Self {
            path: default_tubetool_dir().join("token.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent(path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Io(err.to_string())),
        };
        let credential: Credential = serde_json::from_str(&raw)?;
        Ok(Some(credential))
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        Self::ensure_parent(&self.path)?;
        let serialized = serde_json::to_string_pretty(credential)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serialized)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

pub(crate) fn default_tubetool_dir() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".tubetool"))
        .unwrap_or_else(|| PathBuf::from(".tubetool"))
}
