use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use tokio::task::JoinError;
use tokio::task::JoinHandle;

use super::claims::AccessClaims;
use super::claims::BaseClaims;
use super::claims::IdentityClaims;
use super::claims::RefreshClaims;
use super::claims::TokenType;
use super::errors::JwtError;
use super::handler::JwtHandler;
use super::handler::TokenSigner;

/// Default upper bound on how long one login may wait for its tokens.
pub const DEFAULT_ISSUE_DEADLINE: Duration = Duration::from_secs(5);

/// The three tokens issued for one login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues identity, access and refresh tokens for a session.
///
/// Each variant is built from its own copy of one base claim and signed on a
/// separate task. The three tasks meet at a single join point bounded by a
/// deadline; either all three tokens are returned or none are.
pub struct TokenIssuer<S: TokenSigner = JwtHandler> {
    signer: Arc<S>,
    deadline: Duration,
}

impl<S: TokenSigner> TokenIssuer<S> {
    pub fn new(signer: Arc<S>) -> Self {
        Self {
            signer,
            deadline: DEFAULT_ISSUE_DEADLINE,
        }
    }

    /// Override the join deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Issue the token bundle for one login.
    ///
    /// # Arguments
    /// * `principal_id` - Principal id as rendered into the access token's `user_id`
    /// * `username` - Username carried by the identity token
    /// * `role` - Role carried by the identity and access tokens
    /// * `jti` - Session activity id shared by all three tokens
    ///
    /// # Errors
    /// * `Timeout` - Tasks did not all finish within the deadline (all are aborted)
    /// * `EncodingFailed` - A variant failed to sign; when several fail, the
    ///   first in identity, access, refresh order is reported
    /// * `TaskFailed` - A signing task panicked or was cancelled
    pub async fn issue_all(
        &self,
        principal_id: &str,
        username: &str,
        role: &str,
        jti: &str,
    ) -> Result<TokenBundle, JwtError> {
        let base = BaseClaims::new(Utc::now().timestamp(), jti);

        let identity = {
            let base = base.clone();
            let username = username.to_owned();
            let role = role.to_owned();
            self.spawn_variant(move || IdentityClaims::new(base, username, role))
        };
        let access = {
            let base = base.clone();
            let role = role.to_owned();
            let principal_id = principal_id.to_owned();
            self.spawn_variant(move || AccessClaims::new(base, role, principal_id))
        };
        let refresh = self.spawn_variant(move || RefreshClaims::new(base));

        let abort_handles = [
            identity.abort_handle(),
            access.abort_handle(),
            refresh.abort_handle(),
        ];

        let joined = tokio::time::timeout(self.deadline, async {
            tokio::join!(identity, access, refresh)
        })
        .await;

        let (identity, access, refresh) = match joined {
            Ok(results) => results,
            Err(_) => {
                for handle in &abort_handles {
                    handle.abort();
                }
                tracing::warn!(
                    session_id = %jti,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "token issuance timed out"
                );
                return Err(JwtError::Timeout(self.deadline));
            }
        };

        // Field order fixes which failure is reported first.
        Ok(TokenBundle {
            id_token: collect(identity, TokenType::Id)?,
            access_token: collect(access, TokenType::Access)?,
            refresh_token: collect(refresh, TokenType::Refresh)?,
        })
    }

    fn spawn_variant<C, F>(&self, build: F) -> JoinHandle<Result<String, JwtError>>
    where
        C: Serialize,
        F: FnOnce() -> C + Send + 'static,
    {
        let signer = Arc::clone(&self.signer);
        tokio::spawn(async move {
            let claims = build();
            signer.sign(&claims)
        })
    }
}

fn collect(
    joined: Result<Result<String, JwtError>, JoinError>,
    typ: TokenType,
) -> Result<String, JwtError> {
    joined.map_err(|e| JwtError::TaskFailed(format!("{}: {}", typ, e)))?
}
