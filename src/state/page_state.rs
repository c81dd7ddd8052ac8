//! Per-URL traversal state machine
//!
//! ```text
//! Unvisited -> Admitted -> Captured -> Recorded
//!     |            |
//!     v            v
//!  Rejected      Failed
//! ```

use crate::CrawlError;
use std::fmt;

/// Represents the state of one URL within a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// Discovered as a link, not yet checked
    Unvisited,

    /// Passed depth and scope checks and was marked visited
    Admitted,

    /// Capture returned a (possibly degraded) result
    Captured,

    // ===== Terminal States =====
    /// A `PageRecord` was inserted into the site map
    Recorded,

    /// Depth, visited, domain or translation check failed
    Rejected,

    /// Capture raised an unrecoverable navigation error
    Failed,
}

impl PageState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Recorded | Self::Rejected | Self::Failed)
    }

    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded)
    }

    /// Returns true if the transition is an arrow of the state machine
    pub fn can_transition_to(&self, next: PageState) -> bool {
        matches!(
            (self, next),
            (Self::Unvisited, Self::Admitted)
                | (Self::Unvisited, Self::Rejected)
                | (Self::Admitted, Self::Captured)
                | (Self::Admitted, Self::Failed)
                | (Self::Captured, Self::Recorded)
        )
    }

    /// Moves to `next`, or reports the illegal transition for `url`
    pub fn advance(self, next: PageState, url: &str) -> Result<PageState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                url: url.to_string(),
                from: self,
                to: next,
            })
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 6] {
        [
            Self::Unvisited,
            Self::Admitted,
            Self::Captured,
            Self::Recorded,
            Self::Rejected,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unvisited => "unvisited",
            Self::Admitted => "admitted",
            Self::Captured => "captured",
            Self::Recorded => "recorded",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}
