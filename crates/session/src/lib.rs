#![forbid(unsafe_code)]

mod error;
mod events;
mod session;

pub use error::SessionError;
pub use events::StructuralEvent;
pub use session::{DropOutcome, PageSession};
