//! ANSI styling for terminal output.

/// ANSI color codes for terminal output.
mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Applies ANSI styles when enabled, and passes text through unchanged otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    /// Whether escape codes are emitted.
    enabled: bool,
}

impl Style {
    /// Creates a style; `enabled` turns on escape codes.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Wraps `text` in the given codes.
    fn paint(self, codes: &[&str], text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let mut out = codes.concat();
        out.push_str(text);
        out.push_str(colors::RESET);
        out
    }

    /// Formats a header with bold cyan styling.
    pub fn header(self, text: &str) -> String {
        self.paint(&[colors::BOLD, colors::CYAN], text)
    }

    /// Formats text as dimmed/less important.
    pub fn dim(self, text: &str) -> String {
        self.paint(&[colors::DIM], text)
    }

    /// Formats text as a success message (green).
    pub fn success(self, text: &str) -> String {
        self.paint(&[colors::GREEN], text)
    }

    /// Formats text as an error (red).
    pub fn error(self, text: &str) -> String {
        self.paint(&[colors::RED], text)
    }
}
