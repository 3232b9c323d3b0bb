//! Credential loading for the CTHRU portal

pub mod credentials;

pub use credentials::Credentials;
