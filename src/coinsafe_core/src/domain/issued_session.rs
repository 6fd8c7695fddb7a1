use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::email::Email;

/// Identity of the signed-in user, either supplied by the backend alongside
/// the tokens or decoded from the access token itself.
#[derive(Debug, Clone, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(deserialize_with = "deserialize_email")]
    pub email: Email,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserIdentity {
    /// Identity carrying only the email, used when the backend omits a user
    /// object and the access token cannot be decoded.
    pub fn email_only(email: Email) -> Self {
        Self {
            user_id: None,
            email,
            display_name: None,
        }
    }
}

fn deserialize_email<'de, D>(deserializer: D) -> Result<Email, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Email::try_from(Secret::from(raw)).map_err(serde::de::Error::custom)
}

/// Session material handed to the session establisher exactly once after a
/// successful verification. The verification session holds no reference to
/// it afterwards.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    pub user: UserIdentity,
    pub remember_me: bool,
    pub established_at: DateTime<Utc>,
}

impl IssuedSession {
    pub fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_identity_deserializes_from_backend_payload() {
        let identity: UserIdentity = serde_json::from_str(
            r#"{"user_id":"u-1","email":"user@example.com","display_name":"User"}"#,
        )
        .unwrap();
        assert_eq!(identity.user_id.as_deref(), Some("u-1"));
        assert_eq!(identity.email.as_str(), "user@example.com");
        assert_eq!(identity.display_name.as_deref(), Some("User"));
    }

    #[test]
    fn user_identity_rejects_invalid_email() {
        let result: Result<UserIdentity, _> =
            serde_json::from_str(r#"{"email":"not-an-email"}"#);
        assert!(result.is_err());
    }
}

