//! Diagnostics produced while assembling a warrior.

/// How serious a diagnostic is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Severity {
    /// Assembly cannot produce a warrior; `success` will be `false`.
    Error,
    /// Assembly succeeds, but the output may not be what was intended.
    Warning,
    /// Purely informational; never affects `success`.
    Info,
}

/// A single diagnostic, tagged with the source line it refers to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Message {
    /// How serious this diagnostic is.
    pub severity: Severity,
    /// 0-based index into the reconstructed source lines.
    pub line: usize,
    /// Human-readable description.
    pub text: String,
}

impl Message {
    /// Build an [`Severity::Error`] message.
    #[must_use]
    pub const fn error(line: usize, text: String) -> Self {
        Self {
            severity: Severity::Error,
            line,
            text,
        }
    }

    /// Build a [`Severity::Warning`] message.
    #[must_use]
    pub const fn warning(line: usize, text: String) -> Self {
        Self {
            severity: Severity::Warning,
            line,
            text,
        }
    }

    /// Build an [`Severity::Info`] message.
    #[must_use]
    pub const fn info(line: usize, text: String) -> Self {
        Self {
            severity: Severity::Info,
            line,
            text,
        }
    }

    /// Whether this diagnostic is fatal to assembly.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::{Message, Severity};

    #[test]
    fn constructors_set_severity() {
        let e = Message::error(1, "bad".to_owned());
        let w = Message::warning(2, "meh".to_owned());
        let i = Message::info(3, "fyi".to_owned());
        assert_eq!(e.severity, Severity::Error);
        assert_eq!(w.severity, Severity::Warning);
        assert_eq!(i.severity, Severity::Info);
        assert!(e.is_error());
        assert!(!w.is_error());
        assert!(!i.is_error());
    }
}
