//! Per-chunk classification for the quiescence read loop.
//!
//! The read loop is driven by explicit state (pagination count,
//! confirmation-sent flag) and a small tagged decision per received
//! chunk, rather than implicit control flow.

use std::sync::LazyLock;

use regex::Regex;

use super::result::RunOptions;

/// Ceiling on pager advances within one `run` call, so a misbehaving
/// device cannot hold the loop open forever.
pub const MAX_PAGINATION: u32 = 50;

/// Vendor "more" banners, in both spacing variants seen in the field.
const PAGER_MARKERS: [&str; 2] = ["--More--", "-- More --"];

static CONFIRMATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)Destination filename \[.*?\]\?",
        r"(?i)\[confirm\]",
        r"(?i)\(y/n\)",
        r"(?i)\[yes/no\]",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("confirmation pattern is valid"))
    .collect()
});

/// Decision for one received chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkAction {
    /// Pager banner seen: send a space, reset the idle clock, and skip
    /// the remaining checks for this chunk.
    AdvancePager,

    /// Confirmation prompt seen and not yet answered: send a bare
    /// newline and reset the idle clock.
    Confirm,

    /// Ordinary output; fall through to quiescence accounting.
    Continue,
}

/// Mutable state of one `run` call's read loop.
#[derive(Debug)]
pub struct RunState {
    handle_pagination: bool,
    auto_confirm: bool,

    /// Pager advances sent so far, bounded by [`MAX_PAGINATION`].
    pub pagination_count: u32,

    /// Whether the single allowed confirmation has been sent.
    pub confirmation_sent: bool,
}

impl RunState {
    pub fn new(opts: &RunOptions) -> Self {
        Self {
            handle_pagination: opts.handle_pagination,
            auto_confirm: opts.auto_confirm,
            pagination_count: 0,
            confirmation_sent: false,
        }
    }

    /// Classify one cleaned chunk. Checks run in priority order:
    /// pagination, then confirmation, then plain continuation.
    pub fn inspect(&mut self, chunk: &str) -> ChunkAction {
        if self.handle_pagination
            && self.pagination_count < MAX_PAGINATION
            && contains_pager_marker(chunk)
        {
            self.pagination_count += 1;
            return ChunkAction::AdvancePager;
        }

        if self.auto_confirm
            && !self.confirmation_sent
            && CONFIRMATION_PATTERNS.iter().any(|p| p.is_match(chunk))
        {
            self.confirmation_sent = true;
            return ChunkAction::Confirm;
        }

        ChunkAction::Continue
    }
}

/// Whether the text contains a vendor pager banner.
pub fn contains_pager_marker(text: &str) -> bool {
    PAGER_MARKERS.iter().any(|m| text.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(pagination: bool, confirm: bool) -> RunState {
        RunState::new(&RunOptions {
            handle_pagination: pagination,
            auto_confirm: confirm,
            ..RunOptions::default()
        })
    }

    #[test]
    fn pager_chunk_advances() {
        let mut s = state(true, false);
        assert_eq!(s.inspect("line one\n --More-- "), ChunkAction::AdvancePager);
        assert_eq!(s.pagination_count, 1);
    }

    #[test]
    fn pager_both_spacings_detected() {
        assert!(contains_pager_marker("x --More-- y"));
        assert!(contains_pager_marker("x -- More -- y"));
        assert!(!contains_pager_marker("no banner here"));
    }

    #[test]
    fn pagination_is_bounded() {
        let mut s = state(true, false);
        for _ in 0..MAX_PAGINATION {
            assert_eq!(s.inspect("--More--"), ChunkAction::AdvancePager);
        }
        // Past the ceiling, pager chunks are ordinary output.
        assert_eq!(s.inspect("--More--"), ChunkAction::Continue);
        assert_eq!(s.pagination_count, MAX_PAGINATION);
    }

    #[test]
    fn confirmation_sent_at_most_once() {
        let mut s = state(true, true);
        assert_eq!(
            s.inspect("Destination filename [startup-config]?"),
            ChunkAction::Confirm
        );
        assert_eq!(
            s.inspect("Destination filename [startup-config]?"),
            ChunkAction::Continue
        );
        assert!(s.confirmation_sent);
    }

    #[test]
    fn confirmation_patterns_case_insensitive() {
        let mut s = state(false, true);
        assert_eq!(s.inspect("Proceed? [CONFIRM]"), ChunkAction::Confirm);

        let mut s = state(false, true);
        assert_eq!(s.inspect("overwrite? (y/n)"), ChunkAction::Confirm);

        let mut s = state(false, true);
        assert_eq!(s.inspect("reload now? [yes/no]"), ChunkAction::Confirm);
    }

    #[test]
    fn pagination_takes_priority_over_confirmation() {
        let mut s = state(true, true);
        assert_eq!(
            s.inspect("--More-- [confirm]"),
            ChunkAction::AdvancePager
        );
        assert!(!s.confirmation_sent);
    }

    #[test]
    fn disabled_checks_pass_through() {
        let mut s = state(false, false);
        assert_eq!(s.inspect("--More--"), ChunkAction::Continue);
        assert_eq!(s.inspect("[confirm]"), ChunkAction::Continue);
    }
}
