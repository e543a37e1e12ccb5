//! Provisioning workflow state.

use std::fmt;

use serde::Serialize;

/// Where a provisioning run currently stands.
///
/// States advance strictly forward; any failure moves to `Failed`, which
/// is terminal. There is no retry-from-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningState {
    Initialized,
    InventoryConnected,
    ConfigRetrieved,
    StagingFileCreated,
    ConsoleConnected,
    DeviceVerified,
    ConfigCopiedToStorage,
    ConfigApplied,
    Completed,
    Failed,
}

impl ProvisioningState {
    /// Whether the run has, at some point, created a staged file that
    /// may need cleanup.
    ///
    /// Deliberately an explicit list rather than an ordering comparison:
    /// `Failed` is reachable from anywhere, so position in the sequence
    /// says nothing about what was created.
    pub fn has_staged_file(self) -> bool {
        matches!(
            self,
            ProvisioningState::StagingFileCreated
                | ProvisioningState::ConsoleConnected
                | ProvisioningState::DeviceVerified
                | ProvisioningState::ConfigCopiedToStorage
                | ProvisioningState::ConfigApplied
                | ProvisioningState::Completed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProvisioningState::Initialized => "initialized",
            ProvisioningState::InventoryConnected => "inventory_connected",
            ProvisioningState::ConfigRetrieved => "config_retrieved",
            ProvisioningState::StagingFileCreated => "staging_file_created",
            ProvisioningState::ConsoleConnected => "console_connected",
            ProvisioningState::DeviceVerified => "device_verified",
            ProvisioningState::ConfigCopiedToStorage => "config_copied_to_storage",
            ProvisioningState::ConfigApplied => "config_applied",
            ProvisioningState::Completed => "completed",
            ProvisioningState::Failed => "failed",
        }
    }
}

impl fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything one run knows about its device, filled in as steps
/// complete.
#[derive(Debug)]
pub struct ProvisioningContext {
    pub device_name: String,
    pub console_port: u16,
    pub state: ProvisioningState,

    pub config_text: Option<String>,
    pub expected_serial: Option<String>,
    pub observed_serial: Option<String>,
    pub staged_filename: Option<String>,
}

impl ProvisioningContext {
    pub fn new(device_name: impl Into<String>, console_port: u16) -> Self {
        Self {
            device_name: device_name.into(),
            console_port,
            state: ProvisioningState::Initialized,
            config_text: None,
            expected_serial: None,
            observed_serial: None,
            staged_filename: None,
        }
    }
}

/// Point-in-time snapshot of a run, for status output.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningStatus {
    pub device_name: String,
    pub console_port: u16,
    pub state: ProvisioningState,
    pub expected_serial: Option<String>,
    pub observed_serial: Option<String>,
    pub staged_filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_file_lookup_matches_creation_point() {
        assert!(!ProvisioningState::Initialized.has_staged_file());
        assert!(!ProvisioningState::InventoryConnected.has_staged_file());
        assert!(!ProvisioningState::ConfigRetrieved.has_staged_file());
        assert!(ProvisioningState::StagingFileCreated.has_staged_file());
        assert!(ProvisioningState::Completed.has_staged_file());
        // Failed alone says nothing about what was created.
        assert!(!ProvisioningState::Failed.has_staged_file());
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&ProvisioningState::ConfigCopiedToStorage).unwrap();
        assert_eq!(json, "\"config_copied_to_storage\"");
    }
}
