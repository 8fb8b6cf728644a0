//! Apply a change locally first, then make it durable, undoing the local change on failure.
//!
//! ```
//! use rentmeter_rs::optimistic::OptimisticUpdate;
//!
//! let mut is_paid = false;
//! let toggle = OptimisticUpdate::new(|paid: &mut bool| *paid = true, |paid| *paid = false);
//!
//! let result: Result<(), &str> = toggle.run(&mut is_paid, |_| Err("database is offline"));
//!
//! assert!(result.is_err());
//! assert!(!is_paid);
//! ```

/// A tentative change to some local state `T` together with the change that undoes it.
pub struct OptimisticUpdate<T> {
    apply: Box<dyn FnOnce(&mut T) + Send>,
    revert: Box<dyn FnOnce(&mut T) + Send>,
}

impl<T> OptimisticUpdate<T> {
    /// Create an update from the change to make and the change that undoes it.
    pub fn new(
        apply: impl FnOnce(&mut T) + Send + 'static,
        revert: impl FnOnce(&mut T) + Send + 'static,
    ) -> Self {
        Self {
            apply: Box::new(apply),
            revert: Box::new(revert),
        }
    }

    /// Apply the change to `state`, then call `commit` with the changed state.
    ///
    /// If `commit` fails the change is reverted and the error is returned.
    /// There are no retries.
    pub fn run<R, E>(
        self,
        state: &mut T,
        commit: impl FnOnce(&T) -> Result<R, E>,
    ) -> Result<R, E> {
        (self.apply)(state);

        commit(state).inspect_err(|_| (self.revert)(state))
    }
}
