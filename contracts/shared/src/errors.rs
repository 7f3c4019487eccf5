// shared/src/errors.rs

use scale::{Decode, Encode};

/// Errors returned by the custody staking ledger.
///
/// Every failing message reverts all of its storage writes, so an `Err`
/// never leaves partially applied state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    // Input validation
    /// Amount argument was zero
    ZeroAmount,
    /// Address argument was the zero account
    ZeroAddress,
    /// The cooldown entry cap must be at least one
    InvalidMaxCooldownEntries,

    // Preconditions and resource limits
    /// Caller tried to unstake more than they have staked
    InsufficientStake { requested: u128, available: u128 },
    /// Custody wallet has not approved the ledger for the amount being withdrawn
    InsufficientCustodyAllowance { required: u128, current: u128 },
    /// Caller already has `max` live cooldown entries
    MaxCooldownEntriesReached { current: u32, max: u32 },
    /// Requested cooldown index is past the caller's live entries
    InvalidCooldownIndex { index: u32, count: u32 },

    // Authorization
    /// Caller is not the owner
    Unauthorized,
    /// Caller is not the proposed custody wallet
    NotPendingCustodyWallet,
    /// Ownership can never be renounced
    RenounceOwnershipDisabled,

    // Lifecycle
    /// Live cooldown entries exist but none has unlocked yet
    CooldownNotFinished,
    /// No custody wallet change has been proposed
    PendingCustodyChangeNone,
    /// Contract is paused
    Paused,

    // Plumbing
    /// A guarded message was entered while another one was in flight
    ReentrantCall,
    /// The token contract rejected a transfer or the call itself failed
    TransferFailed,
    /// A balance or allowance query to the token contract failed
    TokenQueryFailed,
}

/// Failure reported by the external token contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum TokenError {
    InsufficientBalance,
    InsufficientAllowance,
}

impl From<TokenError> for Error {
    fn from(_: TokenError) -> Self {
        Error::TransferFailed
    }
}
