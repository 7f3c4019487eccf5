// shared/src/utils/reentrancy_guard.rs

use crate::errors::Error;
use scale::{Decode, Encode};

/// Busy flag kept in contract storage while a guarded message runs.
///
/// Use it through [`crate::non_reentrant`] rather than calling
/// `enter`/`exit` by hand.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    pub const fn new() -> Self {
        Self { entered: false }
    }

    /// Marks the guard as entered, failing if it already is
    pub fn enter(&mut self) -> Result<(), Error> {
        if self.entered {
            return Err(Error::ReentrantCall);
        }
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.entered = false;
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }
}
