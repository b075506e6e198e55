//! Diagnostic severity levels and label styles.
//!
//! This module provides types for categorizing diagnostic severity and
//! the visual style of span labels in multi-span diagnostics.
//!
//! # Examples
//!
//! ```
//! use ferritec_util::diagnostic::{Level, LabelStyle};
//!
//! assert!(Level::Error.is_error());
//! assert!(!Level::Warning.is_error());
//!
//! assert_eq!(LabelStyle::Primary.as_str(), "^");
//! assert_eq!(LabelStyle::Secondary.as_str(), "-");
//! ```

use std::fmt;

/// Diagnostic severity level.
///
/// Variants are ordered by severity, least to most: a diagnostic pipeline
/// that analyzes lexically, syntactically, and semantically reports at one
/// of `Info`, `Warning`, `Error`, or `Critical`; `Note` and `Help` are
/// auxiliary levels attached to a parent diagnostic rather than emitted on
/// their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Informational message with no effect on the exit code.
    Info,
    /// Additional information about a diagnostic.
    ///
    /// Notes provide context or explanation for why a diagnostic was
    /// emitted. They are always attached to a parent diagnostic.
    Note,
    /// A suggestion for fixing an issue.
    ///
    /// Help messages provide actionable suggestions for resolving the
    /// diagnostic, often including a specific edit.
    Help,
    /// A warning that doesn't prevent the pipeline from continuing.
    ///
    /// Warnings indicate suspicious but valid code. A session run with
    /// `--warnings-as-errors` promotes these to failures.
    Warning,
    /// An error that prevents the current phase from succeeding.
    ///
    /// The phase that reported it keeps recovering and collecting further
    /// diagnostics, but the pipeline will not proceed past analysis.
    Error,
    /// An unrecoverable error that stops the pipeline immediately.
    ///
    /// Once a `Critical` diagnostic is reported, the reporting phase must
    /// not continue (no further tokens/nodes/bindings are produced).
    Critical,
}

impl Level {
    /// Returns true if this level represents an error (`Error` or `Critical`).
    #[inline]
    pub const fn is_error(&self) -> bool {
        matches!(self, Level::Error | Level::Critical)
    }

    /// Returns true if this level represents a warning.
    #[inline]
    pub const fn is_warning(&self) -> bool {
        matches!(self, Level::Warning)
    }

    /// Returns true if this level is informational (`Info`, `Note`, or `Help`).
    #[inline]
    pub const fn is_info(&self) -> bool {
        matches!(self, Level::Info | Level::Note | Level::Help)
    }

    /// Returns true if this level must halt the reporting phase immediately.
    #[inline]
    pub const fn is_critical(&self) -> bool {
        matches!(self, Level::Critical)
    }

    /// Returns the canonical name for this level.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Note => "note",
            Level::Help => "help",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "error: critical",
        }
    }

    /// Returns the color code for this level (ANSI).
    #[inline]
    pub const fn color_code(&self) -> Option<&'static str> {
        match self {
            Level::Info => Some("34"),     // Blue
            Level::Note => Some("36"),     // Cyan
            Level::Help => Some("32"),     // Green
            Level::Warning => Some("33"),  // Yellow
            Level::Error => Some("31"),    // Red
            Level::Critical => Some("35"), // Magenta
        }
    }

    /// Returns the intensity modifier for terminal output.
    #[inline]
    pub const fn intensity(&self) -> &'static str {
        match self {
            Level::Error | Level::Critical => "1", // Bold
            _ => "0",                              // Normal
        }
    }

    /// Returns a short single-character indicator for this level.
    #[inline]
    pub const fn indicator(&self) -> &'static str {
        match self {
            Level::Info => "I",
            Level::Note => "N",
            Level::Help => "H",
            Level::Warning => "W",
            Level::Error => "E",
            Level::Critical => "!",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Style for span labels in multi-span diagnostics.
///
/// When a diagnostic has multiple spans, each span can have a label with a
/// specific style that affects how it's displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelStyle {
    /// Primary span - the main location of the issue. Displayed with `^`.
    Primary,
    /// Secondary span - related context. Displayed with `-`.
    Secondary,
}

impl LabelStyle {
    /// Returns the underline character for this style.
    #[inline]
    pub const fn underline_char(&self) -> char {
        match self {
            LabelStyle::Primary => '^',
            LabelStyle::Secondary => '-',
        }
    }

    /// Returns the string representation for formatting.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LabelStyle::Primary => "^",
            LabelStyle::Secondary => "-",
        }
    }

    /// Returns true if this is a primary label.
    #[inline]
    pub const fn is_primary(&self) -> bool {
        matches!(self, LabelStyle::Primary)
    }

    /// Returns true if this is a secondary label.
    #[inline]
    pub const fn is_secondary(&self) -> bool {
        matches!(self, LabelStyle::Secondary)
    }
}

impl fmt::Display for LabelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color configuration for diagnostic rendering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorConfig {
    /// Automatically detect terminal color support.
    #[default]
    Auto,
    /// Always use colors, even in pipes.
    Always,
    /// Never use colors.
    Never,
    /// Use ANSI colors only.
    Ansi,
}

impl ColorConfig {
    /// Returns true if colors should be used for the given environment.
    pub fn use_color(&self, is_tty: bool) -> bool {
        match self {
            ColorConfig::Auto => is_tty,
            ColorConfig::Always => true,
            ColorConfig::Never => false,
            ColorConfig::Ansi => true,
        }
    }

    /// Returns true if this configuration enables colors.
    pub const fn is_enabled(&self) -> bool {
        matches!(self, ColorConfig::Always | ColorConfig::Ansi)
    }
}
