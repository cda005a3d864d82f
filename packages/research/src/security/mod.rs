//! Credential handling and URL validation.

mod credentials;
mod url_validator;

pub use credentials::{SearchCredentials, SecretString};
pub use url_validator::{is_valid, UrlValidator};
