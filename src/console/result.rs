//! Command result and run options for console commands.

use std::time::Duration;

/// Options controlling one `run` call.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The command is complete once no bytes have arrived for this long.
    pub idle_timeout: Duration,

    /// Unconditional ceiling on the whole call, regardless of activity.
    pub hard_timeout: Duration,

    /// Answer pager banners with a space (bounded).
    pub handle_pagination: bool,

    /// Answer the first confirmation prompt with a bare newline.
    pub auto_confirm: bool,

    /// Optional literal substring that short-circuits completion the
    /// moment it appears in the accumulated output.
    pub expect: Option<String>,

    /// Secret to mask in log lines and scrub from the returned output,
    /// for commands that embed credentials. The device still receives
    /// the command verbatim.
    pub redact: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(5),
            hard_timeout: Duration::from_secs(120),
            handle_pagination: true,
            auto_confirm: false,
            expect: None,
            redact: None,
        }
    }
}

impl RunOptions {
    /// Set the idle (quiescence) timeout.
    pub fn idle(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Set the hard timeout.
    pub fn hard(mut self, timeout: Duration) -> Self {
        self.hard_timeout = timeout;
        self
    }

    /// Enable auto-confirmation of the first confirmation prompt.
    pub fn auto_confirm(mut self) -> Self {
        self.auto_confirm = true;
        self
    }

    /// Disable pager handling.
    pub fn no_pagination(mut self) -> Self {
        self.handle_pagination = false;
        self
    }

    /// Complete as soon as `needle` appears in the accumulated output.
    pub fn expect(mut self, needle: impl Into<String>) -> Self {
        self.expect = Some(needle.into());
        self
    }

    /// Mask `secret` in log lines and scrub it from the returned output.
    pub fn redact(mut self, secret: impl Into<String>) -> Self {
        self.redact = Some(secret.into());
        self
    }
}

/// Accumulated output of one device command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Everything the device printed, ANSI-stripped.
    pub output: String,

    /// Wall time the call took.
    pub elapsed: Duration,

    /// Pager advances that were sent.
    pub pagination_count: u32,

    /// Whether the one allowed confirmation was sent.
    pub confirmation_sent: bool,

    /// Whether the hard timeout cut the call off. Not an error at this
    /// layer; callers decide significance from the content.
    pub timed_out: bool,

    /// Whether the `expect` substring short-circuited completion.
    pub matched_expect: bool,
}

impl CommandResult {
    /// Case-sensitive containment check on the output.
    pub fn contains(&self, needle: &str) -> bool {
        self.output.contains(needle)
    }

    /// Case-insensitive containment check on the output.
    pub fn contains_ci(&self, needle: &str) -> bool {
        self.output.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Iterator over output lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }
}

impl std::fmt::Display for CommandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.output)
    }
}
