pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::AccessClaims;
pub use claims::BaseClaims;
pub use claims::IdentityClaims;
pub use claims::RefreshClaims;
pub use claims::TokenType;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use handler::TokenSigner;
pub use issuer::TokenBundle;
pub use issuer::TokenIssuer;
