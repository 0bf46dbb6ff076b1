use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth credential persisted by a [`CredentialStore`](super::CredentialStore).
///
/// At rest this is a JSON document with `access_token`, an optional
/// `refresh_token`, and an optional `expiry` in epoch milliseconds.
///
/// # Example
/// ```
/// use chrono::Utc;
/// use tubetool::auth::Credential;
///
/// let cred = Credential {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
/// };
/// assert!(!cred.is_expired(Utc::now()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(
        rename = "expiry",
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether this credential must not be used without a refresh attempt.
    ///
    /// A credential with no recorded expiry is treated as still valid.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => expiry <= now,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn credential(expires_at: Option<DateTime<Utc>>) -> Credential {
        Credential {
            access_token: "access".to_string(),
            refresh_token: None,
            expires_at,
        }
    }

    #[test]
    fn absent_expiry_is_not_expired() {
        assert!(!credential(None).is_expired(Utc::now()));
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let now = Utc::now();
        assert!(!credential(Some(now + Duration::hours(1))).is_expired(now));
    }

    #[test]
    fn past_expiry_is_expired() {
        let now = Utc::now();
        assert!(credential(Some(now - Duration::seconds(1))).is_expired(now));
    }

    #[test]
    fn expiry_serializes_as_epoch_millis() {
        let now = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let cred = Credential {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: Some(now),
        };
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(json["expiry"], 1_700_000_000_000i64);
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
    }

    #[test]
    fn minimal_document_deserializes() {
        let cred: Credential = serde_json::from_str(r#"{"access_token":"a"}"#).unwrap();
        assert_eq!(cred.access_token, "a");
        assert!(cred.refresh_token.is_none());
        assert!(cred.expires_at.is_none());
    }
}
