use std::fmt;

/// Decision the commit filter returns for one tree entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Verdict {
    /// Ingest the entry with its (possibly rewritten) metadata.
    Allow,
    /// Leave the entry, and for directories everything below it, out of the
    /// commit. Metadata rewrites made while deciding must be discarded.
    Skip,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Allow`].
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Skip => f.write_str("skip"),
        }
    }
}
