pub mod api_verification_gateway;

pub use api_verification_gateway::ApiVerificationGateway;
