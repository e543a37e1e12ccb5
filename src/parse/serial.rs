//! Serial number extraction from `show version` output.
//!
//! Console output reaches this module noisy: pager banners, backspace
//! runs from the terminal redrawing the prompt, and occasionally escape
//! sequences the transport layer did not see as a complete sequence.
//! Everything is scrubbed before the patterns run.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

/// Platform serial patterns in priority order. The first pattern whose
/// capture survives placeholder rejection wins.
static SERIAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Stacked-switch inventory block: model line directly above the
        // system serial line. Most specific, so it goes first.
        // The capture takes the whole token so placeholder rejection sees
        // all of it, and hyphenated serials survive. The colon is
        // optional; some platforms omit it.
        r"(?i)Model\s+Number\s*:?\s*\S+\s*\r?\n\s*System\s+Serial\s+Number\s*:?\s*(\S+)",
        r"(?i)System\s+Serial\s+Number\s*:?\s*(\S+)",
        r"(?i)\bSerial\s+Number\s*:?\s*(\S+)",
        r"(?i)Processor\s+Board\s+ID\s*:?\s*(\S+)",
        r"(?i)Chassis\s+Serial\s+Number\s*:?\s*(\S+)",
        r"(?i)Serial\s+Num\s*:?\s*(\S+)",
        r"(?i)\bSN[:\s]+(\S+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("serial pattern is valid"))
    .collect()
});

static BACKSPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x08+").expect("backspace pattern is valid"));

static ANSI_ESCAPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("ansi pattern is valid"));

/// Values a device prints where a real serial should be.
const PLACEHOLDERS: [&str; 3] = ["none", "n/a", "unknown"];

/// Pull the platform serial number out of `show version` output.
///
/// Patterns are tried in priority order; a match whose value is a known
/// placeholder is skipped and the search continues with the next
/// pattern. Returns `None` when nothing usable was found.
pub fn extract_serial(output: &str) -> Option<String> {
    let cleaned = sanitize(output);

    for pattern in SERIAL_PATTERNS.iter() {
        let Some(captures) = pattern.captures(&cleaned) else {
            continue;
        };
        let Some(value) = captures.get(1) else {
            continue;
        };

        let value = value.as_str();
        if is_placeholder(value) {
            debug!("Skipping placeholder serial value: {}", value);
            continue;
        }

        debug!("Extracted serial number: {}", value);
        return Some(value.to_string());
    }

    None
}

/// Remove console artifacts that would split a serial line in two.
fn sanitize(output: &str) -> String {
    let mut text = output.replace("-- More --", "").replace("--More--", "");
    text = BACKSPACES.replace_all(&text, "").into_owned();
    ANSI_ESCAPES.replace_all(&text, "").into_owned()
}

fn is_placeholder(value: &str) -> bool {
    let lowered = value.to_lowercase();
    lowered.is_empty() || PLACEHOLDERS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_VERSION_3850: &str = "\
Cisco IOS Software, IOS-XE Software, Catalyst L3 Switch Software\r\n\
Switch Ports Model              SW Version        SW Image\r\n\
*    1 32    WS-C3850-24T       16.12.04          CAT3K_CAA-UNIVERSALK9\r\n\
\r\n\
Model Number                       : WS-C3850-24T\r\n\
System Serial Number               : FOC2345ABCD\r\n";

    #[test]
    fn stacked_inventory_block() {
        assert_eq!(
            extract_serial(SHOW_VERSION_3850).as_deref(),
            Some("FOC2345ABCD")
        );
    }

    #[test]
    fn processor_board_id() {
        let output = "\
Cisco IOS Software, C2960X Software\n\
Processor board ID FCW1234A5BC\n\
Last reset from power-on\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FCW1234A5BC"));
    }

    #[test]
    fn plain_serial_number_field() {
        let output = "Hardware revision 2.1\nSerial Number: SN123456789\n";
        assert_eq!(extract_serial(output).as_deref(), Some("SN123456789"));
    }

    #[test]
    fn survives_pager_banner_and_backspaces() {
        let output = "\
Switch uptime is 4 weeks\n\
 --More-- \x08\x08\x08\x08\x08\x08\x08\x08\x08\
System Serial Number : FOC9876XYZA\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FOC9876XYZA"));
    }

    #[test]
    fn survives_ansi_sequences() {
        let output = "\x1b[2KSystem Serial Number: \x1b[1mFOC9876XYZA\x1b[0m\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FOC9876XYZA"));
    }

    #[test]
    fn system_serial_preferred_over_board_id() {
        let output = "\
Processor board ID FCW0000ZZZZ\n\
System Serial Number: FOC2345ABCD\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FOC2345ABCD"));
    }

    #[test]
    fn placeholder_falls_through_to_next_pattern() {
        let output = "\
System Serial Number: N/A\n\
Processor board ID FCW1234A5BC\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FCW1234A5BC"));
    }

    #[test]
    fn multicharacter_placeholder_rejected_whole() {
        // The whole token is rejected, not a truncated prefix of it.
        assert_eq!(extract_serial("System Serial Number: N/A\n"), None);
    }

    #[test]
    fn hyphenated_serial_survives() {
        let output = "Serial Number: ABC-1234-XYZ\n";
        assert_eq!(extract_serial(output).as_deref(), Some("ABC-1234-XYZ"));
    }

    #[test]
    fn colon_is_optional() {
        let output = "System Serial Number FOC2345ABCD\n";
        assert_eq!(extract_serial(output).as_deref(), Some("FOC2345ABCD"));
    }

    #[test]
    fn all_placeholders_rejected() {
        for placeholder in ["none", "N/A", "Unknown", "NONE"] {
            let output = format!("System Serial Number: {}\n", placeholder);
            assert_eq!(extract_serial(&output), None, "{}", placeholder);
        }
    }

    #[test]
    fn no_serial_present() {
        assert_eq!(extract_serial("Cisco IOS Software, nothing else\n"), None);
    }

    #[test]
    fn extraction_is_noise_invariant() {
        let clean = "System Serial Number : FOC9876XYZA\n";
        let noisy = " --More-- \x08\x08\x1b[2KSystem Serial Number : FOC9876XYZA\n";
        assert_eq!(extract_serial(clean), extract_serial(noisy));
        // Re-extracting from sanitized text changes nothing.
        assert_eq!(
            extract_serial(&sanitize(noisy)).as_deref(),
            Some("FOC9876XYZA")
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let output = "system serial number : foc2345abcd\n";
        assert_eq!(extract_serial(output).as_deref(), Some("foc2345abcd"));
    }
}
