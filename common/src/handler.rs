//! [`Handler`] abstractions.

use std::future::Future;

/// Executable handler.
///
/// This is the single abstraction behind commands, queries, background tasks
/// and database operations alike: a thing that can be asked to execute some
/// `Args` and either succeeds or fails.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
