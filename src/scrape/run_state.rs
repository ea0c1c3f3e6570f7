//! Pagination run states
//!
//! This module defines the states a retailer run moves through while
//! walking a listing from its first page to exhaustion.

use std::fmt;

/// Represents the current phase of a pagination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Waiting out the settle delay before querying nodes. Item nodes may
    /// not exist yet if queried immediately after navigation.
    Loading,

    /// Extracting all currently present item nodes into catalog entries.
    Extracting,

    /// Deciding whether another page exists and navigating to it.
    Advancing,

    /// The run is complete; the accumulated entries form the snapshot.
    Done,
}

impl RunState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Extracting => "extracting",
            Self::Advancing => "advancing",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_done_is_terminal() {
        assert!(!RunState::Loading.is_terminal());
        assert!(!RunState::Extracting.is_terminal());
        assert!(!RunState::Advancing.is_terminal());
        assert!(RunState::Done.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", RunState::Loading), "loading");
        assert_eq!(format!("{}", RunState::Done), "done");
    }
}
