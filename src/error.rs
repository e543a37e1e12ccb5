//! Error types for zerotouch.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::parse::markers::VerificationMarker;

/// Top-level provisioning error.
///
/// Every step-level failure is wrapped into one of these variants so the
/// caller sees a single coherent failure alongside the workflow state.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or authentication failure to the jump host or terminal server.
    #[error("Connection failure: {0}")]
    Connection(#[from] ConnectionError),

    /// A console interaction did not behave as expected.
    #[error("Command execution failure: {0}")]
    Command(#[from] CommandError),

    /// Device identity check failed. Always fatal, never retried.
    #[error("Device verification error: {0}")]
    Verification(#[from] VerificationError),

    /// Staging, transfer, activation, or post-activation verification failed.
    #[error("Configuration deployment error: {0}")]
    Deployment(#[from] DeploymentError),

    /// Inventory lookup failed or returned an unusable record.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// The run was aborted by the user.
    #[error("Provisioning interrupted by user")]
    Interrupted,
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Failed to reach the host at the socket level.
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connection attempt timed out.
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// Authentication was rejected. Never retried.
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH protocol error. Likely a protocol mismatch, not transience.
    #[error("SSH error: {0}")]
    Ssh(russh::Error),

    /// All retry attempts were used up.
    #[error("Failed to connect to {host} after {attempts} attempts")]
    AttemptsExhausted { host: String, attempts: u32 },

    /// Connection was closed unexpectedly.
    #[error("Connection disconnected")]
    Disconnected,
}

impl ConnectionError {
    /// Whether the retry policy may try this failure again.
    ///
    /// Only socket-level connect failures and timeouts qualify. Auth
    /// rejections and protocol errors are fatal on first sight.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectionError::ConnectionFailed { .. } | ConnectionError::Timeout(_)
        )
    }
}

/// Console session errors (handshake, channel I/O, privilege entry).
#[derive(Error, Debug)]
pub enum CommandError {
    /// Console channel closed while a command was in flight.
    #[error("Console channel closed")]
    ChannelClosed,

    /// SSH protocol error on the console channel.
    #[error("Console channel SSH error: {0}")]
    Ssh(russh::Error),

    /// Could not reach privileged mode on the device.
    #[error("Unable to enter privileged mode: {detail}")]
    PrivilegedModeUnavailable { detail: String },
}

/// Device identity verification errors.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// No serial number could be extracted from the version output.
    #[error("Failed to extract a serial number from the device's version output")]
    SerialNotFound,

    /// The device reports a different serial than the inventory expects.
    #[error(
        "Serial number mismatch: expected '{expected}', device reports '{observed}'. \
         Aborting to prevent misconfiguration."
    )]
    SerialMismatch { expected: String, observed: String },
}

/// Configuration deployment errors (staging, transfer, activation, verify).
#[derive(Error, Debug)]
pub enum DeploymentError {
    /// Writing the staged file failed.
    #[error("Failed to stage configuration file '{path}': {detail}")]
    StagingWrite { path: String, detail: String },

    /// The staged file could not be confirmed to exist.
    #[error("Staged file verification failed for '{path}': {detail}")]
    StagingVerify { path: String, detail: String },

    /// The staged file exists but is empty.
    #[error("Staged file '{path}' is empty")]
    EmptyStagedFile { path: String },

    /// The copy-to-storage command reported an error.
    #[error("Failed to copy configuration to device storage: {detail}")]
    CopyFailed { detail: String },

    /// The activation command reported an error.
    #[error("Errors occurred while applying configuration: {detail}")]
    ApplyFailed { detail: String },

    /// Post-activation verification found markers missing from the
    /// running configuration.
    #[error("Configuration verification failed; markers not found in running-config: {}",
        format_markers(missing))]
    VerificationFailed { missing: Vec<VerificationMarker> },

    /// Removing the staged file during cleanup failed.
    #[error("Failed to remove staged file '{path}': {detail}")]
    CleanupFailed { path: String, detail: String },

    /// Stager used before connect() or after close().
    #[error("Stager not connected")]
    NotConnected,
}

fn format_markers(missing: &[VerificationMarker]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inventory collaborator errors.
///
/// Not-found conditions are distinguishable from transport faults so the
/// orchestrator can report them precisely; all of them are fatal there.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The device does not exist in the inventory.
    #[error("Device '{name}' not found in inventory")]
    DeviceNotFound { name: String },

    /// The device exists but carries no usable configuration.
    #[error("No configuration available for device '{name}'")]
    ConfigMissing { name: String },

    /// The device exists but has no serial number recorded.
    #[error("Serial number not available for device '{name}'; required for verification")]
    SerialMissing { name: String },

    /// The inventory API answered with a non-success status.
    #[error("Inventory API request failed with status {status}")]
    Api { status: u16 },

    /// HTTP transport failure.
    #[error("Inventory HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API response could not be decoded.
    #[error("Malformed inventory response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type alias using zerotouch's top-level error.
pub type Result<T> = std::result::Result<T, Error>;
