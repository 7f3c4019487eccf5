// custody_staking/src/lib.rs

#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod cooldown;
pub mod token_gateway;

#[ink::contract]
mod ledger {
    use crate::cooldown::{CooldownArrayInfo, CooldownEntry, CooldownQueue};
    #[cfg(test)]
    use crate::token_gateway::mock::MockTokenGateway as Gateway;
    use crate::token_gateway::TokenGateway;
    #[cfg(not(test))]
    use crate::token_gateway::InkTokenGateway as Gateway;
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;
    use shared::errors::Error;
    use shared::non_reentrant;
    use shared::utils::reentrancy_guard::ReentrancyGuard;

    // Constants
    pub const DEFAULT_COOLDOWN_DURATION: u64 = 7 * 24 * 60 * 60; // 7 days
    pub const DEFAULT_MAX_GLOBAL_COOLDOWN_ENTRIES: u32 = 20;
    const MILLIS_PER_SECOND: u64 = 1_000;

    // Events

    /// Event emitted when a stake is recorded
    #[ink(event)]
    pub struct Staked {
        #[ink(topic)]
        pub user: AccountId,
        pub amount: Balance,
        pub total_staked: Balance,
    }

    /// Event emitted when staked tokens reach the custody wallet
    #[ink(event)]
    pub struct CustodyReceived {
        #[ink(topic)]
        pub custody: AccountId,
        #[ink(topic)]
        pub from: AccountId,
        pub amount: Balance,
    }

    /// Event emitted when an unstake request enters the cooldown queue
    #[ink(event)]
    pub struct UnstakeRequested {
        #[ink(topic)]
        pub user: AccountId,
        pub amount: Balance,
        pub unlock_time: u64,
    }

    /// Event emitted when matured cooldown entries are paid out
    #[ink(event)]
    pub struct Withdrawn {
        #[ink(topic)]
        pub user: AccountId,
        pub amount: Balance,
    }

    #[ink(event)]
    pub struct CooldownArrayCompacted {
        #[ink(topic)]
        pub user: AccountId,
        pub new_length: u32,
    }

    #[ink(event)]
    pub struct CustodyWalletProposed {
        #[ink(topic)]
        pub current: AccountId,
        #[ink(topic)]
        pub proposed: AccountId,
    }

    #[ink(event)]
    pub struct CustodyWalletChanged {
        #[ink(topic)]
        pub previous: AccountId,
        #[ink(topic)]
        pub new: AccountId,
    }

    #[ink(event)]
    pub struct CooldownDurationUpdated {
        pub previous: u64,
        pub new: u64,
    }

    #[ink(event)]
    pub struct MaxCooldownEntriesUpdated {
        pub previous: u32,
        pub new: u32,
    }

    /// Event emitted when the contract is paused
    #[ink(event)]
    pub struct ContractPaused {
        #[ink(topic)]
        pub by: AccountId,
    }

    /// Event emitted when the contract is unpaused
    #[ink(event)]
    pub struct ContractUnpaused {
        #[ink(topic)]
        pub by: AccountId,
    }

    #[ink(event)]
    pub struct TokensRescued {
        #[ink(topic)]
        pub token: AccountId,
        #[ink(topic)]
        pub to: AccountId,
        pub amount: Balance,
    }

    #[ink(event)]
    pub struct OwnershipTransferred {
        #[ink(topic)]
        pub previous: AccountId,
        #[ink(topic)]
        pub new: AccountId,
    }

    /// Owner-tunable ledger parameters
    #[derive(Debug, scale::Encode, scale::Decode, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(
        feature = "std",
        derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
    )]
    pub struct LedgerConfig {
        /// Seconds between an unstake request and its unlock
        pub cooldown_duration: u64,
        /// Cap on live cooldown entries per user
        pub max_global_cooldown_entries: u32,
    }

    impl Default for LedgerConfig {
        fn default() -> Self {
            Self {
                cooldown_duration: DEFAULT_COOLDOWN_DURATION,
                max_global_cooldown_entries: DEFAULT_MAX_GLOBAL_COOLDOWN_ENTRIES,
            }
        }
    }

    /// Custody staking ledger storage
    #[ink(storage)]
    pub struct CustodyStaking {
        /// The staked token contract address
        staking_token: AccountId,
        /// Contract owner
        owner: AccountId,
        /// Contract pause state
        paused: bool,
        /// Wallet that holds every staked token
        custody_wallet: AccountId,
        /// Proposed custody wallet waiting to accept
        pending_custody_wallet: Option<AccountId>,
        /// Cooldown parameters
        config: LedgerConfig,
        /// Staked balance per account
        stakes: Mapping<AccountId, Balance>,
        /// Total staked amount
        total_staked: Balance,
        /// Cooldown queue per account
        cooldowns: Mapping<AccountId, CooldownQueue>,
        /// Reentrancy guard
        reentrancy_guard: ReentrancyGuard,
    }

    impl CustodyStaking {
        /// Constructor that initializes the ledger with an explicit config
        #[ink(constructor)]
        pub fn new(
            staking_token: AccountId,
            custody_wallet: AccountId,
            config: LedgerConfig,
        ) -> Result<Self, Error> {
            if staking_token == Self::zero_account() || custody_wallet == Self::zero_account() {
                return Err(Error::ZeroAddress);
            }
            if config.max_global_cooldown_entries == 0 {
                return Err(Error::InvalidMaxCooldownEntries);
            }

            Ok(Self {
                staking_token,
                owner: Self::env().caller(),
                paused: false,
                custody_wallet,
                pending_custody_wallet: None,
                config,
                stakes: Mapping::default(),
                total_staked: 0,
                cooldowns: Mapping::default(),
                reentrancy_guard: ReentrancyGuard::new(),
            })
        }

        /// Constructor using the default cooldown parameters
        #[ink(constructor)]
        pub fn with_defaults(
            staking_token: AccountId,
            custody_wallet: AccountId,
        ) -> Result<Self, Error> {
            Self::new(staking_token, custody_wallet, LedgerConfig::default())
        }

        fn zero_account() -> AccountId {
            AccountId::from([0u8; 32])
        }

        /// Ensure the contract is not paused
        fn ensure_not_paused(&self) -> Result<(), Error> {
            if self.paused {
                return Err(Error::Paused);
            }
            Ok(())
        }

        /// Ensure the caller is the owner
        fn ensure_owner(&self) -> Result<(), Error> {
            if self.env().caller() != self.owner {
                return Err(Error::Unauthorized);
            }
            Ok(())
        }

        fn ensure_non_zero(account: AccountId) -> Result<(), Error> {
            if account == Self::zero_account() {
                return Err(Error::ZeroAddress);
            }
            Ok(())
        }

        /// Block time in seconds
        fn now(&self) -> u64 {
            self.env().block_timestamp() / MILLIS_PER_SECOND
        }

        fn queue_of(&self, account: AccountId) -> CooldownQueue {
            self.cooldowns.get(account).unwrap_or_default()
        }

        fn store_queue(&mut self, account: AccountId, queue: &CooldownQueue) {
            if queue.is_empty() {
                self.cooldowns.remove(account);
            } else {
                self.cooldowns.insert(account, queue);
            }
        }

        /// Stake tokens. The full amount is forwarded to the custody wallet
        /// in the same call.
        #[ink(message)]
        pub fn stake(&mut self, amount: Balance) -> Result<(), Error> {
            non_reentrant!(self, {
                self.ensure_not_paused()?;

                if amount == 0 {
                    return Err(Error::ZeroAmount);
                }

                let caller = self.env().caller();
                let this = self.env().account_id();

                // Pull tokens from caller into the ledger
                Gateway::transfer_from(self.staking_token, caller, this, amount)?;

                let staked = self.stakes.get(caller).unwrap_or(0).saturating_add(amount);
                self.stakes.insert(caller, &staked);
                self.total_staked = self.total_staked.saturating_add(amount);

                self.env().emit_event(Staked {
                    user: caller,
                    amount,
                    total_staked: self.total_staked,
                });

                // Forward everything to custody
                let custody = self.custody_wallet;
                Gateway::transfer(self.staking_token, custody, amount)?;

                self.env().emit_event(CustodyReceived {
                    custody,
                    from: caller,
                    amount,
                });

                Ok(())
            })
        }

        /// Move staked tokens into the cooldown queue
        #[ink(message)]
        pub fn unstake(&mut self, amount: Balance) -> Result<(), Error> {
            non_reentrant!(self, {
                self.ensure_not_paused()?;

                if amount == 0 {
                    return Err(Error::ZeroAmount);
                }

                let caller = self.env().caller();
                let available = self.stakes.get(caller).unwrap_or(0);
                if available < amount {
                    return Err(Error::InsufficientStake {
                        requested: amount,
                        available,
                    });
                }

                let mut queue = self.queue_of(caller);
                let current = queue.live_count();
                let max = self.config.max_global_cooldown_entries;
                if current >= max {
                    return Err(Error::MaxCooldownEntriesReached { current, max });
                }

                let remaining = available.saturating_sub(amount);
                if remaining == 0 {
                    self.stakes.remove(caller);
                } else {
                    self.stakes.insert(caller, &remaining);
                }
                self.total_staked = self.total_staked.saturating_sub(amount);

                let unlock_time = self.now().saturating_add(self.config.cooldown_duration);
                queue.push(amount, unlock_time);
                self.store_queue(caller, &queue);

                self.env().emit_event(UnstakeRequested {
                    user: caller,
                    amount,
                    unlock_time,
                });

                Ok(())
            })
        }

        /// Pull every matured cooldown entry back from custody.
        ///
        /// Returns 0 without touching state when the caller has no live
        /// entries, and fails with `CooldownNotFinished` when the oldest
        /// live entry is still locked.
        #[ink(message)]
        pub fn withdraw(&mut self) -> Result<Balance, Error> {
            non_reentrant!(self, {
                self.ensure_not_paused()?;

                let caller = self.env().caller();
                let mut queue = self.queue_of(caller);
                if queue.is_drained() {
                    return Ok(0);
                }

                let matured = queue.matured_prefix(self.now());
                if matured.amount == 0 {
                    return Err(Error::CooldownNotFinished);
                }

                let custody = self.custody_wallet;
                let this = self.env().account_id();
                let current = Gateway::allowance(self.staking_token, custody, this)?;
                if current < matured.amount {
                    return Err(Error::InsufficientCustodyAllowance {
                        required: matured.amount,
                        current,
                    });
                }

                Gateway::transfer_from(self.staking_token, custody, caller, matured.amount)?;

                queue.advance_to(matured.next_cursor);
                let compacted = queue.needs_compaction() && queue.compact();
                self.store_queue(caller, &queue);

                self.env().emit_event(Withdrawn {
                    user: caller,
                    amount: matured.amount,
                });
                if compacted {
                    self.env().emit_event(CooldownArrayCompacted {
                        user: caller,
                        new_length: queue.len(),
                    });
                }

                Ok(matured.amount)
            })
        }

        /// Drop the caller's already withdrawn cooldown entries
        #[ink(message)]
        pub fn compact_cooldown_array(&mut self) {
            let caller = self.env().caller();
            let mut queue = self.queue_of(caller);
            if !queue.compact() {
                return;
            }
            self.store_queue(caller, &queue);
            self.env().emit_event(CooldownArrayCompacted {
                user: caller,
                new_length: queue.len(),
            });
        }

        /// Pause the contract (owner only)
        #[ink(message)]
        pub fn pause(&mut self) -> Result<(), Error> {
            self.ensure_owner()?;
            if self.paused {
                return Ok(());
            }
            self.paused = true;
            self.env().emit_event(ContractPaused {
                by: self.env().caller(),
            });
            Ok(())
        }

        /// Unpause the contract (owner only)
        #[ink(message)]
        pub fn unpause(&mut self) -> Result<(), Error> {
            self.ensure_owner()?;
            if !self.paused {
                return Ok(());
            }
            self.paused = false;
            self.env().emit_event(ContractUnpaused {
                by: self.env().caller(),
            });
            Ok(())
        }

        /// Update the cooldown for future unstake requests (owner only).
        /// Entries already queued keep their unlock time.
        #[ink(message)]
        pub fn set_cooldown_duration(&mut self, new_duration: u64) -> Result<(), Error> {
            self.ensure_owner()?;
            let previous = self.config.cooldown_duration;
            self.config.cooldown_duration = new_duration;
            self.env().emit_event(CooldownDurationUpdated {
                previous,
                new: new_duration,
            });
            Ok(())
        }

        /// Update the live cooldown entry cap (owner only).
        /// Lowering it never evicts queued entries.
        #[ink(message)]
        pub fn set_max_global_cooldown_entries(&mut self, new_max: u32) -> Result<(), Error> {
            self.ensure_owner()?;
            if new_max == 0 {
                return Err(Error::InvalidMaxCooldownEntries);
            }
            let previous = self.config.max_global_cooldown_entries;
            self.config.max_global_cooldown_entries = new_max;
            self.env().emit_event(MaxCooldownEntriesUpdated {
                previous,
                new: new_max,
            });
            Ok(())
        }

        /// First half of the custody handoff (owner only)
        #[ink(message)]
        pub fn propose_custody_wallet(&mut self, new_wallet: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            Self::ensure_non_zero(new_wallet)?;
            self.pending_custody_wallet = Some(new_wallet);
            self.env().emit_event(CustodyWalletProposed {
                current: self.custody_wallet,
                proposed: new_wallet,
            });
            Ok(())
        }

        /// Second half of the custody handoff, called by the proposed wallet
        #[ink(message)]
        pub fn accept_custody_wallet(&mut self) -> Result<(), Error> {
            let pending = self
                .pending_custody_wallet
                .ok_or(Error::PendingCustodyChangeNone)?;
            if self.env().caller() != pending {
                return Err(Error::NotPendingCustodyWallet);
            }

            let previous = core::mem::replace(&mut self.custody_wallet, pending);
            self.pending_custody_wallet = None;
            self.env().emit_event(CustodyWalletChanged {
                previous,
                new: pending,
            });
            Ok(())
        }

        /// Recover tokens sent to the ledger's own address (owner only)
        #[ink(message)]
        pub fn rescue_tokens(
            &mut self,
            token: AccountId,
            to: AccountId,
            amount: Balance,
        ) -> Result<(), Error> {
            non_reentrant!(self, {
                self.ensure_owner()?;
                Self::ensure_non_zero(to)?;
                if amount == 0 {
                    return Err(Error::ZeroAmount);
                }

                Gateway::transfer(token, to, amount)?;

                self.env().emit_event(TokensRescued { token, to, amount });
                Ok(())
            })
        }

        /// Hand ownership to another account (owner only)
        #[ink(message)]
        pub fn transfer_ownership(&mut self, new_owner: AccountId) -> Result<(), Error> {
            self.ensure_owner()?;
            Self::ensure_non_zero(new_owner)?;
            let previous = core::mem::replace(&mut self.owner, new_owner);
            self.env().emit_event(OwnershipTransferred {
                previous,
                new: new_owner,
            });
            Ok(())
        }

        /// Always fails: the ledger must keep an owner
        #[ink(message)]
        pub fn renounce_ownership(&mut self) -> Result<(), Error> {
            self.ensure_owner()?;
            Err(Error::RenounceOwnershipDisabled)
        }

        /// Number of live cooldown entries for `account`
        #[ink(message)]
        pub fn cooldown_count(&self, account: AccountId) -> u32 {
            self.queue_of(account).live_count()
        }

        /// Live cooldown entry at `index`, 0 being the oldest pending one
        #[ink(message)]
        pub fn get_cooldown(&self, account: AccountId, index: u32) -> Result<CooldownEntry, Error> {
            let queue = self.queue_of(account);
            queue
                .live_entry(index)
                .copied()
                .ok_or(Error::InvalidCooldownIndex {
                    index,
                    count: queue.live_count(),
                })
        }

        /// Amount `withdraw` would pay `account` right now
        #[ink(message)]
        pub fn withdrawable_now(&self, account: AccountId) -> Balance {
            self.queue_of(account).matured_prefix(self.now()).amount
        }

        /// Sum of every live cooldown entry, locked or not
        #[ink(message)]
        pub fn pending_unwithdrawn(&self, account: AccountId) -> Balance {
            self.queue_of(account).pending_amount()
        }

        #[ink(message)]
        pub fn get_cooldown_array_info(&self, account: AccountId) -> CooldownArrayInfo {
            self.queue_of(account).info()
        }

        #[ink(message)]
        pub fn live_cooldowns(&self, account: AccountId) -> Vec<CooldownEntry> {
            self.queue_of(account).live().to_vec()
        }

        #[ink(message)]
        pub fn staked_balance(&self, account: AccountId) -> Balance {
            self.stakes.get(account).unwrap_or(0)
        }

        /// View function to get total staked amount
        #[ink(message)]
        pub fn total_staked(&self) -> Balance {
            self.total_staked
        }

        #[ink(message)]
        pub fn staking_token(&self) -> AccountId {
            self.staking_token
        }

        #[ink(message)]
        pub fn custody_wallet(&self) -> AccountId {
            self.custody_wallet
        }

        #[ink(message)]
        pub fn pending_custody_wallet(&self) -> Option<AccountId> {
            self.pending_custody_wallet
        }

        #[ink(message)]
        pub fn cooldown_duration(&self) -> u64 {
            self.config.cooldown_duration
        }

        #[ink(message)]
        pub fn max_global_cooldown_entries(&self) -> u32 {
            self.config.max_global_cooldown_entries
        }

        #[ink(message)]
        pub fn config(&self) -> LedgerConfig {
            self.config
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn is_paused(&self) -> bool {
            self.paused
        }
    }
}
