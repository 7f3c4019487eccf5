// custody_staking/src/token_gateway.rs

use ink::env::call::{build_call, ExecutionInput, Selector};
use ink::env::DefaultEnvironment;
use ink::primitives::AccountId;
use shared::errors::{Error, TokenError};

/// Calls the ledger makes into the staking token.
///
/// Transfers run with the ledger contract as the caller, so `transfer` spends
/// the ledger's own balance and `transfer_from` spends the ledger's allowance.
pub trait TokenGateway {
    fn transfer(token: AccountId, to: AccountId, amount: u128) -> Result<(), Error>;

    fn transfer_from(
        token: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), Error>;

    fn balance_of(token: AccountId, owner: AccountId) -> Result<u128, Error>;

    fn allowance(token: AccountId, owner: AccountId, spender: AccountId) -> Result<u128, Error>;
}

/// Cross-contract implementation over the `StakingToken` trait selectors
pub struct InkTokenGateway;

impl TokenGateway for InkTokenGateway {
    fn transfer(token: AccountId, to: AccountId, amount: u128) -> Result<(), Error> {
        build_call::<DefaultEnvironment>()
            .call(token)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "StakingToken::transfer"
                )))
                .push_arg(to)
                .push_arg(amount),
            )
            .returns::<Result<(), TokenError>>()
            .try_invoke()
            .map_err(|_| Error::TransferFailed)? // Handle environment error
            .map_err(|_| Error::TransferFailed)? // Handle LangError
            .map_err(Error::from)
    }

    fn transfer_from(
        token: AccountId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), Error> {
        build_call::<DefaultEnvironment>()
            .call(token)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "StakingToken::transfer_from"
                )))
                .push_arg(from)
                .push_arg(to)
                .push_arg(amount),
            )
            .returns::<Result<(), TokenError>>()
            .try_invoke()
            .map_err(|_| Error::TransferFailed)?
            .map_err(|_| Error::TransferFailed)?
            .map_err(Error::from)
    }

    fn balance_of(token: AccountId, owner: AccountId) -> Result<u128, Error> {
        build_call::<DefaultEnvironment>()
            .call(token)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "StakingToken::balance_of"
                )))
                .push_arg(owner),
            )
            .returns::<u128>()
            .try_invoke()
            .map_err(|_| Error::TokenQueryFailed)?
            .map_err(|_| Error::TokenQueryFailed)
    }

    fn allowance(token: AccountId, owner: AccountId, spender: AccountId) -> Result<u128, Error> {
        build_call::<DefaultEnvironment>()
            .call(token)
            .exec_input(
                ExecutionInput::new(Selector::new(ink::selector_bytes!(
                    "StakingToken::allowance"
                )))
                .push_arg(owner)
                .push_arg(spender),
            )
            .returns::<u128>()
            .try_invoke()
            .map_err(|_| Error::TokenQueryFailed)?
            .map_err(|_| Error::TokenQueryFailed)
    }
}
