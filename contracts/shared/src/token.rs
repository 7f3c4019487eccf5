// shared/src/token.rs

use crate::errors::TokenError;
use ink::primitives::AccountId;

/// Interface of the fungible token the ledger stakes.
///
/// The ledger never implements this; it only calls a deployed token through
/// these selectors. All transfers are all-or-nothing.
#[ink::trait_definition]
pub trait StakingToken {
    /// Balance held by `owner`
    #[ink(message)]
    fn balance_of(&self, owner: AccountId) -> u128;

    /// Amount `spender` may still move on behalf of `owner`
    #[ink(message)]
    fn allowance(&self, owner: AccountId, spender: AccountId) -> u128;

    /// Moves `value` from the caller to `to`
    #[ink(message)]
    fn transfer(&mut self, to: AccountId, value: u128) -> Result<(), TokenError>;

    /// Moves `value` from `from` to `to` using the caller's allowance
    #[ink(message)]
    fn transfer_from(
        &mut self,
        from: AccountId,
        to: AccountId,
        value: u128,
    ) -> Result<(), TokenError>;
}
