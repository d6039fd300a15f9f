#![forbid(unsafe_code)]

use canopy_storage::StoreError;

#[derive(Debug)]
pub enum SessionError {
    Store(StoreError),
    /// The move is structurally valid but the session refuses it, e.g. a
    /// page with a bound address leaving the top level of its pane.
    PolicyDeclined { reason: &'static str },
    DuplicatePane,
    UnknownPane,
    NotFound,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Store(err) => write!(f, "store error: {err}"),
            SessionError::PolicyDeclined { reason } => write!(f, "move declined: {reason}"),
            SessionError::DuplicatePane => write!(f, "pane id already registered"),
            SessionError::UnknownPane => write!(f, "unknown pane"),
            SessionError::NotFound => write!(f, "page not found"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        SessionError::Store(err)
    }
}
