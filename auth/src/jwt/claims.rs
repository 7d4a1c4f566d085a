use serde::Deserialize;
use serde::Serialize;

/// Issuer stamped on every session token.
pub const ISSUER: &str = "http://account-service";

/// Audience stamped on every session token.
pub const AUDIENCE: &str = "http://mygram";

/// Lifetime of the identity token in seconds (also the default base lifetime).
pub const IDENTITY_TOKEN_TTL: i64 = 24 * 60 * 60;

/// Lifetime of the access token in seconds.
pub const ACCESS_TOKEN_TTL: i64 = 20 * 60;

/// Lifetime of the refresh token in seconds.
pub const REFRESH_TOKEN_TTL: i64 = 60 * 60;

/// Discriminates the three tokens issued for one login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    #[serde(rename = "ID_TOKEN")]
    Id,
    #[serde(rename = "ACCESS_TOKEN")]
    Access,
    #[serde(rename = "REFRESH_TOKEN")]
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Id => "ID_TOKEN",
            TokenType::Access => "ACCESS_TOKEN",
            TokenType::Refresh => "REFRESH_TOKEN",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered claims shared by every token of a session.
///
/// Built once per login. Each token variant receives its own copy, so
/// overriding `exp` or `typ` for one variant never leaks into another.
/// All timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseClaims {
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    /// Session activity id; identical across the three tokens of one login.
    pub jti: String,
    pub typ: TokenType,
}

impl BaseClaims {
    /// Create the base claim for a session started at `now` (Unix seconds).
    pub fn new(now: i64, jti: impl Into<String>) -> Self {
        Self {
            exp: now + IDENTITY_TOKEN_TTL,
            nbf: now,
            iat: now,
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            jti: jti.into(),
            typ: TokenType::Id,
        }
    }

    /// Consume this copy, overriding expiry (`ttl` seconds after issue) and token type.
    pub fn specialize(mut self, ttl: i64, typ: TokenType) -> Self {
        self.exp = self.iat + ttl;
        self.typ = typ;
        self
    }
}

/// Identity token payload: who logged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    #[serde(flatten)]
    pub base: BaseClaims,
    pub username: String,
    pub role: String,
}

impl IdentityClaims {
    pub fn new(base: BaseClaims, username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            base,
            username: username.into(),
            role: role.into(),
        }
    }
}

/// Access token payload: what the bearer may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(flatten)]
    pub base: BaseClaims,
    pub role: String,
    /// Principal id rendered as a string.
    pub user_id: String,
}

impl AccessClaims {
    pub fn new(base: BaseClaims, role: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            base: base.specialize(ACCESS_TOKEN_TTL, TokenType::Access),
            role: role.into(),
            user_id: user_id.into(),
        }
    }
}

/// Refresh token payload: the base claim alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    #[serde(flatten)]
    pub base: BaseClaims,
}

impl RefreshClaims {
    pub fn new(base: BaseClaims) -> Self {
        Self {
            base: base.specialize(REFRESH_TOKEN_TTL, TokenType::Refresh),
        }
    }
}
