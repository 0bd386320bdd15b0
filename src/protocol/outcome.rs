//! Outcome definitions
//!
//! What a successfully dispatched command did to storage.

use std::fmt;

/// Result of applying one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Insert created a record
    Inserted,

    /// Check created a zeroed record
    Created,

    /// Check found an existing record and left it alone
    AlreadyPresent,

    /// Update overwrote a record's mutable fields
    Replaced,

    /// An address was appended; carries the new history length
    IpAppended { history_len: usize },

    /// A counter was increased
    Incremented,

    /// The last-played timestamp was overwritten
    LastPlayedSet,
}

impl Outcome {
    /// Whether storage changed
    pub fn mutated(self) -> bool {
        !matches!(self, Outcome::AlreadyPresent)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted => write!(f, "inserted"),
            Outcome::Created => write!(f, "created"),
            Outcome::AlreadyPresent => write!(f, "already present"),
            Outcome::Replaced => write!(f, "replaced"),
            Outcome::IpAppended { history_len } => {
                write!(f, "ip appended (history {})", history_len)
            }
            Outcome::Incremented => write!(f, "incremented"),
            Outcome::LastPlayedSet => write!(f, "last played set"),
        }
    }
}
