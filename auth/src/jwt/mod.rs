pub mod claims;
pub mod errors;
pub mod handler;
pub mod issuer;

pub use claims::Claims;
pub use claims::Principal;
pub use claims::TokenSubject;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use issuer::TokenIssuer;
pub use issuer::TokenKind;
pub use issuer::TokenLifetimes;
pub use issuer::TokenPair;
