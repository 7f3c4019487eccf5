#![cfg_attr(not(feature = "std"), no_std)]

pub mod errors;
pub mod token;
pub mod utils;

pub use errors::{Error, TokenError};
pub use scale::{Decode, Encode};
pub use token::StakingToken;

/// Wraps a message body in the contract's `reentrancy_guard`.
///
/// The guard is entered before the body runs and released once it finishes,
/// whether the body returned `Ok` or `Err`. A nested entry fails with
/// [`Error::ReentrantCall`] before any of the body executes.
#[macro_export]
macro_rules! non_reentrant {
    ($self:ident, $body:block) => {{
        $self.reentrancy_guard.enter()?;
        let result = (|| -> ::core::result::Result<_, $crate::errors::Error> { $body })();
        $self.reentrancy_guard.exit();
        result
    }};
}
