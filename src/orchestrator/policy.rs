//! Platform-specific command vocabulary and timing for the target
//! device family.

use std::time::Duration;

/// Commands, markers, and delays used when driving the device.
///
/// Defaults target IOS-style platforms; other families get their own
/// policy value rather than conditionals in the workflow.
#[derive(Debug, Clone)]
pub struct DevicePolicy {
    /// Disables the output pager for the session.
    pub paging_off_command: String,

    /// Prints the platform serial, among other things.
    pub version_command: String,

    /// Storage target for the configuration copy.
    pub storage_target: String,

    /// VRF the copy command routes through, when management traffic is
    /// VRF-separated.
    pub copy_vrf: Option<String>,

    /// Lowercase substrings indicating a transfer or apply succeeded.
    pub success_markers: Vec<String>,

    /// Lowercase substrings indicating a transfer or apply failed.
    pub failure_markers: Vec<String>,

    /// How long to let the device settle after the configuration is
    /// applied, before verification commands run.
    pub settle_delay: Duration,

    /// Ceiling for the copy-to-storage transfer.
    pub copy_timeout: Duration,

    /// Ceiling for configuration activation.
    pub apply_timeout: Duration,
}

impl Default for DevicePolicy {
    fn default() -> Self {
        Self {
            paging_off_command: "terminal length 0".to_string(),
            version_command: "show version".to_string(),
            storage_target: "flash:".to_string(),
            copy_vrf: Some("Mgmt-vrf".to_string()),
            success_markers: vec![
                "bytes copied".to_string(),
                "ok".to_string(),
                "success".to_string(),
                "completed".to_string(),
            ],
            failure_markers: vec!["error".to_string(), "fail".to_string()],
            settle_delay: Duration::from_secs(10),
            copy_timeout: Duration::from_secs(300),
            apply_timeout: Duration::from_secs(600),
        }
    }
}

impl DevicePolicy {
    /// Whether output contains any success marker (case-insensitive).
    pub fn indicates_success(&self, output: &str) -> bool {
        let lowered = output.to_lowercase();
        self.success_markers.iter().any(|m| lowered.contains(m))
    }

    /// Whether output contains any failure marker (case-insensitive).
    pub fn indicates_failure(&self, output: &str) -> bool {
        let lowered = output.to_lowercase();
        self.failure_markers.iter().any(|m| lowered.contains(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_markers_case_insensitive() {
        let policy = DevicePolicy::default();
        assert!(policy.indicates_success("3001 bytes copied in 2.1 secs"));
        assert!(policy.indicates_success("Copy OK"));
        assert!(policy.indicates_failure("%Error opening ftp://..."));
        assert!(policy.indicates_failure("Transfer FAILED"));
        assert!(!policy.indicates_failure("nothing of note"));
    }
}
