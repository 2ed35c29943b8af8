/// Pagination state definitions
///
/// The pagination loop moves `Requesting → Evaluating → Continuing →
/// Requesting` one page at a time until it reaches `Terminated`, which is
/// absorbing.
use std::fmt;

/// Why the pagination loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The page had no listing containers: end of the result list
    Exhausted { page: u32 },

    /// The site answered with a non-success status
    HttpStatus { page: u32, status: u16 },

    /// The request failed before a response arrived
    Transport { page: u32, message: String },
}

impl StopReason {
    /// Page at which the loop stopped
    pub fn page(&self) -> u32 {
        match self {
            Self::Exhausted { page }
            | Self::HttpStatus { page, .. }
            | Self::Transport { page, .. } => *page,
        }
    }

    /// Returns true if the loop stopped because of a failed request
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Exhausted { .. })
    }

    /// Converts the stop reason to a database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => "exhausted",
            Self::HttpStatus { .. } => "http_status",
            Self::Transport { .. } => "transport",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { page } => write!(f, "no listings on page {}", page),
            Self::HttpStatus { page, status } => {
                write!(f, "HTTP {} on page {}", status, page)
            }
            Self::Transport { page, message } => {
                write!(f, "request for page {} failed: {}", page, message)
            }
        }
    }
}

/// Represents the current state of the pagination loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationState {
    /// The page is being fetched
    Requesting { page: u32 },

    /// The fetched page is being inspected and extracted
    Evaluating { page: u32 },

    /// The page was appended; waiting out the delay before the next one
    Continuing { page: u32 },

    /// No further page will be fetched
    Terminated(StopReason),
}

impl PaginationState {
    /// State of a fresh loop: requesting the first page
    pub fn initial() -> Self {
        Self::Requesting { page: 1 }
    }

    /// Returns true if the loop has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// Page the loop is working on, if it is still running
    pub fn page(&self) -> Option<u32> {
        match self {
            Self::Requesting { page } | Self::Evaluating { page } | Self::Continuing { page } => {
                Some(*page)
            }
            Self::Terminated(_) => None,
        }
    }

    /// Checks whether moving to `next` is a legal step
    ///
    /// A page is requested, then evaluated, then either continued from or
    /// terminated on. Continuing leads to a request for the following page.
    pub fn can_transition_to(&self, next: &PaginationState) -> bool {
        match (self, next) {
            (Self::Requesting { page }, Self::Evaluating { page: next }) => page == next,
            (Self::Requesting { .. }, Self::Terminated(_)) => true,
            (Self::Evaluating { page }, Self::Continuing { page: next }) => page == next,
            (Self::Evaluating { .. }, Self::Terminated(_)) => true,
            (Self::Continuing { page }, Self::Requesting { page: next }) => *next == page + 1,
            _ => false,
        }
    }
}

impl fmt::Display for PaginationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requesting { page } => write!(f, "requesting page {}", page),
            Self::Evaluating { page } => write!(f, "evaluating page {}", page),
            Self::Continuing { page } => write!(f, "continuing after page {}", page),
            Self::Terminated(reason) => write!(f, "terminated: {}", reason),
        }
    }
}
