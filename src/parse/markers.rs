//! Verification markers: distinctive fragments of an intended
//! configuration whose presence in the device's running configuration
//! confirms the configuration actually applied.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// What kind of configuration fragment a marker refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Hostname,
    Interface,
    Vlan,
    IpAddress,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MarkerKind::Hostname => "hostname",
            MarkerKind::Interface => "interface",
            MarkerKind::Vlan => "vlan",
            MarkerKind::IpAddress => "ip address",
        };
        f.write_str(name)
    }
}

/// One checkable fragment of an intended configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationMarker {
    pub kind: MarkerKind,
    pub value: String,
}

impl VerificationMarker {
    pub fn new(kind: MarkerKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for VerificationMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.value)
    }
}

// Caps per kind keep the post-apply verification pass short even for
// large configurations.
const MAX_INTERFACES: usize = 3;
const MAX_VLANS: usize = 3;
const MAX_IP_ADDRESSES: usize = 2;

static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^hostname\s+(\S+)").expect("hostname pattern is valid"));

static VLAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^vlan\s+(\d+)\s*$").expect("vlan pattern is valid"));

static IP_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*ip\s+address\s+(\d{1,3}(?:\.\d{1,3}){3})\s+\d")
        .expect("ip address pattern is valid")
});

/// Pick a bounded set of markers out of an intended configuration.
///
/// The hostname (at most one), interfaces that carry a description (at
/// most three), VLAN definitions (at most three), and interface IP
/// addresses (at most two). An empty result means the configuration had
/// nothing distinctive to check, which callers treat as "verified".
pub fn extract_markers(config: &str) -> Vec<VerificationMarker> {
    let mut markers = Vec::new();

    if let Some(captures) = HOSTNAME.captures(config) {
        markers.push(VerificationMarker::new(
            MarkerKind::Hostname,
            &captures[1],
        ));
    }

    for name in described_interfaces(config).into_iter().take(MAX_INTERFACES) {
        markers.push(VerificationMarker::new(MarkerKind::Interface, name));
    }

    for captures in VLAN.captures_iter(config).take(MAX_VLANS) {
        markers.push(VerificationMarker::new(MarkerKind::Vlan, &captures[1]));
    }

    for captures in IP_ADDRESS.captures_iter(config).take(MAX_IP_ADDRESSES) {
        markers.push(VerificationMarker::new(MarkerKind::IpAddress, &captures[1]));
    }

    markers
}

/// Interfaces whose block carries a non-empty `description` line.
///
/// A bare interface stanza proves nothing: most platforms list every
/// physical port in `show running-config` whether configured or not.
fn described_interfaces(config: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut current: Option<String> = None;

    for line in config.lines() {
        if let Some(rest) = line.strip_prefix("interface ") {
            current = Some(rest.trim().to_string());
            continue;
        }

        // Block ends at the next top-level line.
        if !line.starts_with(' ') && !line.starts_with('\t') {
            current = None;
            continue;
        }

        if let Some(name) = &current {
            let trimmed = line.trim_start();
            if let Some(description) = trimmed.strip_prefix("description ") {
                if !description.trim().is_empty() {
                    found.push(name.clone());
                    current = None;
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "\
hostname edge-sw-01
!
vlan 10
 name users
vlan 20
 name voice
vlan 30
 name mgmt
vlan 40
 name spare
!
interface GigabitEthernet1/0/1
 description uplink to core
 switchport mode trunk
!
interface GigabitEthernet1/0/2
 switchport mode access
!
interface Vlan30
 description management SVI
 ip address 10.30.0.5 255.255.255.0
!
interface Vlan40
 description spare SVI
 ip address 10.40.0.5 255.255.255.0
!
interface Vlan50
 description third described SVI
 ip address 10.50.0.5 255.255.255.0
!
";

    fn values(markers: &[VerificationMarker], kind: MarkerKind) -> Vec<&str> {
        markers
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.value.as_str())
            .collect()
    }

    #[test]
    fn hostname_extracted_once() {
        let markers = extract_markers(CONFIG);
        assert_eq!(values(&markers, MarkerKind::Hostname), ["edge-sw-01"]);
    }

    #[test]
    fn only_described_interfaces_and_capped() {
        let markers = extract_markers(CONFIG);
        let interfaces = values(&markers, MarkerKind::Interface);
        assert_eq!(
            interfaces,
            ["GigabitEthernet1/0/1", "Vlan30", "Vlan40"]
        );
        // The undescribed port never qualifies.
        assert!(!interfaces.contains(&"GigabitEthernet1/0/2"));
    }

    #[test]
    fn vlans_capped_at_three() {
        let markers = extract_markers(CONFIG);
        assert_eq!(values(&markers, MarkerKind::Vlan), ["10", "20", "30"]);
    }

    #[test]
    fn ip_addresses_capped_at_two() {
        let markers = extract_markers(CONFIG);
        assert_eq!(
            values(&markers, MarkerKind::IpAddress),
            ["10.30.0.5", "10.40.0.5"]
        );
    }

    #[test]
    fn empty_config_yields_no_markers() {
        assert!(extract_markers("").is_empty());
        assert!(extract_markers("! comment only\n").is_empty());
    }

    #[test]
    fn marker_display_names_kind_and_value() {
        let marker = VerificationMarker::new(MarkerKind::Vlan, "30");
        assert_eq!(marker.to_string(), "vlan '30'");
        let marker = VerificationMarker::new(MarkerKind::IpAddress, "10.0.0.1");
        assert_eq!(marker.to_string(), "ip address '10.0.0.1'");
    }
}
