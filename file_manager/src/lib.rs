pub mod aws_config;
pub mod aws_credentials;
pub mod serde_support;
