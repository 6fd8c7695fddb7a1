use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

use coinsafe_core::{Email, IdentityDecoder, UserIdentity};

/// Decodes a display identity from the access token's claims.
///
/// The signature is deliberately not verified: this runs on the client and
/// the token is only used to show who is signed in; the backend remains the
/// authority on its validity. Any decode failure falls back to an identity
/// carrying only the login email.
#[derive(Debug, Clone, Default)]
pub struct JwtIdentityDecoder;

impl JwtIdentityDecoder {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl IdentityDecoder for JwtIdentityDecoder {
    fn decode_user(&self, access_token: &str, fallback_email: &Email) -> UserIdentity {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        match decode::<IdentityClaims>(access_token, &DecodingKey::from_secret(&[]), &validation) {
            Ok(data) => {
                let claims = data.claims;
                let email = claims
                    .email
                    .and_then(|raw| Email::try_from(raw.as_str()).ok())
                    .unwrap_or_else(|| fallback_email.clone());
                UserIdentity {
                    user_id: claims.sub,
                    email,
                    display_name: claims.name,
                }
            }
            Err(error) => {
                tracing::debug!(%error, "could not decode identity from access token");
                UserIdentity::email_only(fallback_email.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fake::Fake;
    use fake::faker::internet::en::SafeEmail;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: String,
        name: String,
        exp: usize,
    }

    fn token(claims: &TestClaims) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(b"secret")).unwrap()
    }

    #[test]
    fn decodes_identity_claims_from_the_token() {
        let claim_email: String = SafeEmail().fake();
        let jwt = token(&TestClaims {
            sub: "u-1".to_owned(),
            email: claim_email.clone(),
            name: "User".to_owned(),
            exp: 0,
        });
        let fallback = Email::try_from("fallback@example.com").unwrap();

        let identity = JwtIdentityDecoder::new().decode_user(&jwt, &fallback);
        assert_eq!(identity.user_id.as_deref(), Some("u-1"));
        assert_eq!(identity.email.as_str(), claim_email);
        assert_eq!(identity.display_name.as_deref(), Some("User"));
    }

    #[test]
    fn garbage_token_falls_back_to_the_login_email() {
        let fallback = Email::try_from("fallback@example.com").unwrap();
        let identity = JwtIdentityDecoder::new().decode_user("not-a-jwt", &fallback);
        assert_eq!(identity.email.as_str(), "fallback@example.com");
        assert!(identity.user_id.is_none());
    }
}
