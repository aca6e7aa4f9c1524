pub mod hashing;
pub mod jwt;
pub mod secret;

pub use jwt::AccessTokenCodec;
