#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tubetool::auth::{AuthError, Credential, CredentialStore};

#[derive(Default)]
pub struct InMemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
    saves: Mutex<u32>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, credential: Credential) {
        *self.credential.lock().expect("store lock poisoned") = Some(credential);
    }

    pub fn get(&self) -> Option<Credential> {
        self.credential.lock().expect("store lock poisoned").clone()
    }

    pub fn save_count(&self) -> u32 {
        *self.saves.lock().expect("store lock poisoned")
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, credential: &Credential) -> Result<(), AuthError> {
        *self.credential.lock().expect("store lock poisoned") = Some(credential.clone());
        *self.saves.lock().expect("store lock poisoned") += 1;
        Ok(())
    }
}

pub fn credential(access_token: &str, expires_at: Option<DateTime<Utc>>) -> Credential {
    Credential {
        access_token: access_token.to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at,
    }
}

pub fn valid_credential(access_token: &str) -> Credential {
    credential(access_token, Some(Utc::now() + Duration::hours(1)))
}

pub fn expired_credential(access_token: &str) -> Credential {
    credential(access_token, Some(Utc::now() - Duration::seconds(1)))
}
