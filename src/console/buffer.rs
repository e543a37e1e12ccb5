//! Pending buffer for bytes received but not yet classified.
//!
//! All console input passes through here so that ANSI escape sequences
//! never reach the pattern checks or the accumulated command output.

/// Accumulates console output, stripping ANSI escape codes on the way in.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    buffer: Vec<u8>,
}

impl PendingBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Append raw bytes, stripping ANSI escape codes, and return the
    /// cleaned chunk as text for per-chunk classification.
    pub fn extend(&mut self, data: &[u8]) -> String {
        let cleaned = strip_ansi_escapes::strip(data);
        let chunk = String::from_utf8_lossy(&cleaned).into_owned();
        self.buffer.extend_from_slice(&cleaned);
        chunk
    }

    /// The accumulated text so far (lossy UTF-8).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// The last non-empty line of the accumulated text, if any.
    ///
    /// Used for trailing-prompt checks: the privileged-mode marker is
    /// only meaningful at the end of what the device last printed.
    pub fn last_line(&self) -> Option<String> {
        let text = self.as_str_lossy();
        text.lines()
            .rev()
            .map(str::trim_end)
            .find(|l| !l.trim().is_empty())
            .map(ToOwned::to_owned)
    }

    /// Take ownership of the accumulated contents as text and reset.
    pub fn take_string(&mut self) -> String {
        String::from_utf8_lossy(&std::mem::take(&mut self.buffer)).into_owned()
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard the contents.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_returns_cleaned_chunk() {
        let mut buffer = PendingBuffer::new();
        let chunk = buffer.extend(b"\x1b[32mInterface up\x1b[0m");
        assert_eq!(chunk, "Interface up");
        assert_eq!(buffer.as_str_lossy(), "Interface up");
    }

    #[test]
    fn last_line_skips_trailing_blanks() {
        let mut buffer = PendingBuffer::new();
        buffer.extend(b"show version\r\nswitch#\r\n\r\n");
        assert_eq!(buffer.last_line().as_deref(), Some("switch#"));
    }

    #[test]
    fn last_line_empty_buffer() {
        let buffer = PendingBuffer::new();
        assert!(buffer.last_line().is_none());
    }

    #[test]
    fn take_string_resets() {
        let mut buffer = PendingBuffer::new();
        buffer.extend(b"some output");
        assert_eq!(buffer.take_string(), "some output");
        assert!(buffer.is_empty());
    }
}
