mod classify;
mod error;
mod traits;

pub use classify::{classify_failure, failure_message, FailureClass};
pub use error::{RemoteError, Result};
pub use traits::{RemoteCollection, SessionRemote};
