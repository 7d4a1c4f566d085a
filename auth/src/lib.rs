//! Authentication utilities library
//!
//! Provides the credential and session-token infrastructure of the account service:
//! - Password hashing (Argon2id)
//! - Session claims (identity, access, refresh) built from one base claim
//! - Concurrent issuance of the three session tokens
//! - Token validation
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("secret123").unwrap();
//! assert!(hasher.verify("secret123", &hash).unwrap());
//! assert!(!hasher.verify("wrong", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{AccessClaims, Authenticator};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! let hash = auth.hash_password("secret123").unwrap();
//! auth.verify_password("secret123", &hash).unwrap();
//!
//! let bundle = auth.issue_tokens("42", "alice", "normal", "session-id").await.unwrap();
//! let access: AccessClaims = auth.validate_access_token(&bundle.access_token).unwrap();
//! assert_eq!(access.user_id, "42");
//! assert_eq!(access.base.jti, "session-id");
//! # }
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::AccessClaims;
pub use jwt::BaseClaims;
pub use jwt::IdentityClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenBundle;
pub use jwt::TokenIssuer;
pub use jwt::TokenSigner;
pub use jwt::TokenType;
pub use password::PasswordError;
pub use password::PasswordHasher;
