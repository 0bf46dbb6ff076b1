use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::error::AuthError;

/// OAuth client identifier and secret, read from a Google-style client
/// secrets file once per refresh/authorization attempt.
///
/// The console exports the pair nested under `installed` (desktop apps) or
/// `web`; both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    #[serde(default)]
    installed: Option<ClientSecrets>,
    #[serde(default)]
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Load client secrets from a JSON file.
    ///
    /// A missing file or a document without an `installed`/`web` section is
    /// a fatal configuration error; there is nothing to retry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| AuthError::Config(format!("{}: {err}", path.display())))?;
        let file: ClientSecretsFile = serde_json::from_str(&raw)
            .map_err(|err| AuthError::Config(format!("{}: {err}", path.display())))?;
        file.installed.or(file.web).ok_or_else(|| {
            AuthError::Config(format!(
                "{}: no `installed` or `web` client entry",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_secrets(contents: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("client_secret.json");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_installed_entry() {
        let (_dir, path) = write_secrets(
            r#"{"installed":{"client_id":"id-1","client_secret":"sec-1","token_uri":"https://oauth2.googleapis.com/token"}}"#,
        );
        let secrets = ClientSecrets::load(&path).unwrap();
        assert_eq!(secrets.client_id, "id-1");
        assert_eq!(secrets.client_secret, "sec-1");
    }

    #[test]
    fn loads_web_entry() {
        let (_dir, path) =
            write_secrets(r#"{"web":{"client_id":"id-2","client_secret":"sec-2"}}"#);
        let secrets = ClientSecrets::load(&path).unwrap();
        assert_eq!(secrets.client_id, "id-2");
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let result = ClientSecrets::load(dir.path().join("absent.json"));
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn document_without_client_entry_is_config_error() {
        let (_dir, path) = write_secrets(r#"{"something_else":{}}"#);
        let result = ClientSecrets::load(&path);
        assert!(matches!(result, Err(AuthError::Config(_))));
    }
}
