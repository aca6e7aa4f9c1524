pub mod token;

pub use token::{AccessClaims, RefreshTokenRecord, RefreshTokensRequest, TokenPairResponse};
