pub mod jwt_identity_decoder;

pub use jwt_identity_decoder::JwtIdentityDecoder;
