pub mod gateway;
pub mod services;
