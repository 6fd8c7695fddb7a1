use reqwest::{Client, Url};
use secrecy::Secret;

use coinsafe_core::{
    Email, GatewayError, UserIdentity, VerificationCredential, VerificationGateway,
    VerificationReply, VerificationRequest,
};

const TOTP_VERIFY_PATH: &str = "/auth/2fa/verify";
const BACKUP_VERIFY_PATH: &str = "/auth/2fa/backup-codes/verify";
const DEFAULT_REJECTION: &str = "Verification failed. Please try again";

/// HTTP implementation of the verification gateway. One instance per backend;
/// the underlying `reqwest::Client` is shared and cheap to clone.
#[derive(Clone)]
pub struct ApiVerificationGateway {
    http_client: Client,
    base_url: String,
}

impl ApiVerificationGateway {
    pub fn new(base_url: String, http_client: Client) -> Self {
        Self {
            http_client,
            base_url,
        }
    }
}

#[async_trait::async_trait]
impl VerificationGateway for ApiVerificationGateway {
    #[tracing::instrument(name = "Verifying 2FA code", skip_all, fields(mode = ?request.credential.mode()))]
    async fn verify(
        &self,
        request: &VerificationRequest,
    ) -> Result<VerificationReply, GatewayError> {
        let base = Url::parse(&self.base_url).map_err(|e| GatewayError::Network(e.to_string()))?;

        let (path, body) = match &request.credential {
            VerificationCredential::Totp(code) => (
                TOTP_VERIFY_PATH,
                VerifyRequestBody {
                    code: Some(code.as_str()),
                    backup_code: None,
                    temp_token: request.temp_token.expose(),
                    remember_me: request.remember_me,
                    device_fingerprint: request
                        .device_fingerprint
                        .as_ref()
                        .map(|fp| fp.as_str()),
                },
            ),
            VerificationCredential::Backup(code) => (
                BACKUP_VERIFY_PATH,
                VerifyRequestBody {
                    code: None,
                    backup_code: Some(code.as_str()),
                    temp_token: request.temp_token.expose(),
                    remember_me: request.remember_me,
                    device_fingerprint: request
                        .device_fingerprint
                        .as_ref()
                        .map(|fp| fp.as_str()),
                },
            ),
        };

        let url = base
            .join(path)
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let response = self
            .http_client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let failure: FailureBody = response.json().await.unwrap_or_default();
            let message = failure
                .message
                .or(failure.error)
                .unwrap_or_else(|| DEFAULT_REJECTION.to_owned());
            return Err(GatewayError::Rejected { message });
        }

        let reply: ReplyBody = response
            .json()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(reply.into())
    }
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VerifyRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backup_code: Option<&'a str>,
    temp_token: &'a str,
    remember_me: bool,
    device_fingerprint: Option<&'a str>,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ReplyBody {
    access_token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserBody>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct UserBody {
    #[serde(default, alias = "userId")]
    id: Option<String>,
    email: String,
    #[serde(default, alias = "displayName")]
    name: Option<String>,
}

#[derive(serde::Deserialize, Debug, Default)]
struct FailureBody {
    error: Option<String>,
    message: Option<String>,
}

impl From<ReplyBody> for VerificationReply {
    fn from(body: ReplyBody) -> Self {
        // A user object with an unparsable email is dropped; the controller
        // falls back to decoding the identity from the access token.
        let user = body.user.and_then(|user| {
            let email = Email::try_from(Secret::from(user.email)).ok()?;
            Some(UserIdentity {
                user_id: user.id,
                email,
                display_name: user.name,
            })
        });
        VerificationReply {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            user,
        }
    }
}
