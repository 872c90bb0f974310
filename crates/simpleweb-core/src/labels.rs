//! Label vocabulary for request metrics.
//!
//! Every label value produced here comes from a small closed set so that the
//! exported series stay bounded no matter what clients send.

/// Route label used when the router could not supply a registered pattern.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Method label used for anything outside the standard method set.
pub const OTHER_METHOD: &str = "OTHER";

const KNOWN_METHODS: [&str; 9] = [
    "GET", "HEAD", "POST", "PUT", "DELETE", "CONNECT", "OPTIONS", "TRACE", "PATCH",
];

/// Map a request method onto a bounded label value.
pub fn method_label(method: &str) -> &'static str {
    KNOWN_METHODS
        .iter()
        .find(|m| **m == method)
        .copied()
        .unwrap_or(OTHER_METHOD)
}

/// Coarse grouping of a request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    /// The request future was dropped before a response was produced
    /// (client went away or the request timed out).
    Cancelled,
}

impl StatusClass {
    /// Classify a numeric HTTP status. Anything outside 100..=599 counts as a server error.
    pub fn from_status(code: u16) -> Self {
        match code {
            100..=199 => StatusClass::Informational,
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::ServerError,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusClass::Informational => "1xx",
            StatusClass::Success => "2xx",
            StatusClass::Redirection => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
            StatusClass::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
