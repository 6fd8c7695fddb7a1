pub mod backup_code;
pub mod device_fingerprint;
pub mod email;
pub mod issued_session;
pub mod temp_token;
pub mod totp_code;
pub mod verification;
