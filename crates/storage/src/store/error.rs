#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    InvalidInput(&'static str),
    NotFound,
    ParentNotFound,
    CyclicMove,
    PageExists,
    AmbiguousId,
    AddressTaken,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound => write!(f, "page not found"),
            Self::ParentNotFound => write!(f, "parent page not found"),
            Self::CyclicMove => write!(f, "move would place a page inside its own subtree"),
            Self::PageExists => write!(f, "page already exists"),
            Self::AmbiguousId => write!(f, "id fragment matches more than one page"),
            Self::AddressTaken => write!(f, "address is already bound in this workspace"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}
