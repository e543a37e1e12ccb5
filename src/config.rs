//! Runtime configuration bundles.
//!
//! Endpoints and credentials for the external collaborators, assembled by
//! the CLI layer from the environment and handed to the concrete
//! collaborator implementations. Secrets are held as [`SecretString`] and
//! are never logged.

use std::time::Duration;

use secrecy::SecretString;

/// An SSH endpoint with password credentials.
#[derive(Debug, Clone)]
pub struct SshEndpoint {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Password for authentication.
    pub password: SecretString,

    /// Connection timeout.
    pub timeout: Duration,
}

impl SshEndpoint {
    /// Create an endpoint on the default SSH port with a 30 second timeout.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            password,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Inventory service endpoint.
#[derive(Debug, Clone)]
pub struct InventorySettings {
    /// Base URL of the inventory API.
    pub url: String,

    /// API token.
    pub token: SecretString,

    /// Whether to verify TLS certificates. Disable for self-signed labs.
    pub verify_tls: bool,
}

/// File-staging endpoint on the jump path.
#[derive(Debug, Clone)]
pub struct StagingSettings {
    /// Staging server address as the *device* will reach it, embedded in
    /// the transfer URL.
    pub server: String,

    /// Username for the transfer URL.
    pub username: String,

    /// Password for the transfer URL. Masked in every log line.
    pub password: SecretString,

    /// Directory on the jump host where staged files are written.
    pub directory: String,
}
