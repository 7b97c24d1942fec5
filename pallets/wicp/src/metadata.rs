//! Token metadata, custodian checks and read-side queries.
//!
//! Balance, allowance, log and metadata reads are open to everyone. Statistics and the
//! full-state backup are custodian-only and reject other callers with `BadOrigin`.

use frame_support::{
    dispatch::DispatchResult,
    ensure,
    traits::{fungible::Inspect, Get, UnixTime},
    BoundedVec,
};
use sp_runtime::{
    traits::{AccountIdConversion, SaturatedConversion},
    DispatchError,
};
use sp_std::{collections::btree_set::BTreeSet, prelude::*};

use crate::{
    Allowances, Balances, BlockHeight, Cap, Config, CreatedAt, Custodians, Decimals, Error, Fee,
    FeeTo, HolderCount, LedgerAccount, LedgerSnapshot, Pallet, PaymentLedger, Stats, TokenLogo,
    TokenMetadata, TokenName, TokenSymbol, TotalSupply, TransactionCount, Transactions, TxIndex,
    TxRecord, UpgradedAt, UsedBlocks, LOG_TARGET,
};

impl<T: Config> Pallet<T> {
    pub(crate) fn now() -> u64 {
        T::UnixTime::now().as_millis().saturated_into::<u64>()
    }

    /// Account owned by the pallet on this chain.
    pub fn account_id() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    /// Account on the payment ledger that deposits must be sent to.
    pub fn deposit_account() -> LedgerAccount {
        LedgerAccount::derive(&Self::account_id(), None)
    }

    pub fn balance_of(who: &T::AccountId) -> u128 {
        Balances::<T>::get(who)
    }

    pub fn allowance(owner: &T::AccountId, spender: &T::AccountId) -> u128 {
        Allowances::<T>::get(owner, spender)
    }

    /// Log entry at the 1-based `index`.
    pub fn transaction(index: TxIndex) -> Result<TxRecord<T::AccountId>, DispatchError> {
        Transactions::<T>::get(index).ok_or_else(|| Error::<T>::TxNotFound.into())
    }

    pub fn is_block_used(block_height: BlockHeight) -> bool {
        UsedBlocks::<T>::contains_key(block_height)
    }

    pub fn name() -> Option<Vec<u8>> {
        TokenName::<T>::get().map(BoundedVec::into_inner)
    }

    pub fn symbol() -> Option<Vec<u8>> {
        TokenSymbol::<T>::get().map(BoundedVec::into_inner)
    }

    pub fn logo() -> Option<Vec<u8>> {
        TokenLogo::<T>::get().map(BoundedVec::into_inner)
    }

    pub fn decimals() -> Option<u8> {
        Decimals::<T>::get()
    }

    pub fn fee() -> Option<u128> {
        Fee::<T>::get()
    }

    pub fn fee_to() -> Option<T::AccountId> {
        FeeTo::<T>::get()
    }

    pub fn cap() -> Option<T::AccountId> {
        Cap::<T>::get()
    }

    pub fn custodians() -> Vec<T::AccountId> {
        Custodians::<T>::get().into_inner()
    }

    pub fn token_metadata() -> TokenMetadata<T::AccountId> {
        TokenMetadata {
            name: Self::name(),
            logo: Self::logo(),
            symbol: Self::symbol(),
            decimals: Self::decimals(),
            fee: Self::fee(),
            fee_to: Self::fee_to(),
            custodians: Self::custodians(),
            cap: Self::cap(),
            created_at: CreatedAt::<T>::get(),
            upgraded_at: UpgradedAt::<T>::get(),
        }
    }

    pub fn is_custodian(who: &T::AccountId) -> bool {
        Custodians::<T>::get().contains(who)
    }

    pub fn ensure_custodian(who: &T::AccountId) -> DispatchResult {
        ensure!(Self::is_custodian(who), DispatchError::BadOrigin);
        Ok(())
    }

    /// Sorts and deduplicates a custodian list.
    pub(crate) fn normalize_custodians(
        custodians: Vec<T::AccountId>,
    ) -> Result<BoundedVec<T::AccountId, T::MaxCustodians>, Error<T>> {
        let unique: BTreeSet<T::AccountId> = custodians.into_iter().collect();
        unique.into_iter().collect::<Vec<_>>().try_into().map_err(|_| Error::<T>::TooManyCustodians)
    }

    pub fn total_supply(who: &T::AccountId) -> Result<u128, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(TotalSupply::<T>::get())
    }

    pub fn total_transactions(who: &T::AccountId) -> Result<u64, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(TransactionCount::<T>::get())
    }

    pub fn total_unique_holders(who: &T::AccountId) -> Result<u64, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(HolderCount::<T>::get())
    }

    /// Native balance held by the pallet account to pay for its own operation.
    pub fn cycles(who: &T::AccountId) -> Result<u128, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(Self::reserve())
    }

    /// Payment-ledger balance of the deposit account backing the supply.
    pub fn icps(who: &T::AccountId) -> Result<u64, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(Self::backing())
    }

    pub fn stats(who: &T::AccountId) -> Result<Stats, DispatchError> {
        Self::ensure_custodian(who)?;
        Ok(Stats {
            total_transactions: TransactionCount::<T>::get(),
            total_supply: TotalSupply::<T>::get(),
            cycles: Self::reserve(),
            icps: Self::backing(),
            total_unique_holders: HolderCount::<T>::get(),
        })
    }

    pub fn backup(who: &T::AccountId) -> Result<LedgerSnapshot<T::AccountId>, DispatchError> {
        Self::ensure_custodian(who)?;
        let tx_records = (1..=TransactionCount::<T>::get())
            .filter_map(|index| Transactions::<T>::get(index).map(|record| (index, record)))
            .collect();
        Ok(LedgerSnapshot {
            metadata: Self::token_metadata(),
            tx_records,
            allowances: Allowances::<T>::iter().collect(),
            used_blocks: UsedBlocks::<T>::iter_keys().collect(),
            balances: Balances::<T>::iter().collect(),
        })
    }

    fn reserve() -> u128 {
        T::Currency::balance(&Self::account_id()).saturated_into::<u128>()
    }

    fn backing() -> u64 {
        T::PaymentLedger::account_balance(&Self::deposit_account()).unwrap_or_else(|err| {
            log::warn!(target: LOG_TARGET, "deposit account balance unavailable: {err:?}");
            0
        })
    }
}
