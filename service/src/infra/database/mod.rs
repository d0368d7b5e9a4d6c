//! [`Database`]-related implementations.

#[cfg(feature = "in-memory")]
pub mod in_memory;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "in-memory")]
pub use self::in_memory::InMemory;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "in-memory")]
    /// [`InMemory`] error.
    InMemory(in_memory::Error),
}
