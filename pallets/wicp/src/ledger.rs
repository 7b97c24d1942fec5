//! Balance, allowance and transaction-log bookkeeping.
//!
//! Everything here is check-then-act on exact `u128` amounts. Callers wrap these in a
//! storage layer, so a failure part-way through a ledger call leaves no trace.

use frame_support::{dispatch::DispatchResult, ensure};
use sp_runtime::DispatchError;
use sp_std::prelude::*;

use crate::{
    Allowances, Balances, Config, Detail, Error, Fee, FeeTo, HolderCount, Pallet, TotalSupply,
    TransactionCount, Transactions, TxIndex, TxRecord, MAX_DETAIL_DEPTH,
};

pub(crate) const BALANCE_OVERFLOW: &str = "balance overflow";
pub(crate) const SUPPLY_OVERFLOW: &str = "total supply overflow";
pub(crate) const AMOUNT_OVERFLOW: &str = "amount plus fee overflows";
pub(crate) const LOG_FULL: &str = "transaction log is full";

impl<T: Config> Pallet<T> {
    pub(crate) fn credit(who: &T::AccountId, amount: u128) -> DispatchResult {
        if amount == 0 {
            return Ok(());
        }
        Balances::<T>::try_mutate_exists(who, |balance| -> DispatchResult {
            let current = balance.unwrap_or(0);
            let updated =
                current.checked_add(amount).ok_or(DispatchError::Other(BALANCE_OVERFLOW))?;
            if current == 0 {
                HolderCount::<T>::mutate(|count| *count = count.saturating_add(1));
            }
            *balance = Some(updated);
            Ok(())
        })
    }

    pub(crate) fn debit(who: &T::AccountId, amount: u128) -> DispatchResult {
        if amount == 0 {
            return Ok(());
        }
        Balances::<T>::try_mutate_exists(who, |balance| -> DispatchResult {
            let remaining = balance
                .unwrap_or(0)
                .checked_sub(amount)
                .ok_or(Error::<T>::InsufficientBalance)?;
            if remaining == 0 {
                *balance = None;
                HolderCount::<T>::mutate(|count| *count = count.saturating_sub(1));
            } else {
                *balance = Some(remaining);
            }
            Ok(())
        })
    }

    pub(crate) fn move_balance(from: &T::AccountId, to: &T::AccountId, amount: u128) -> DispatchResult {
        Self::debit(from, amount)?;
        Self::credit(to, amount)
    }

    pub(crate) fn set_allowance(owner: &T::AccountId, spender: &T::AccountId, amount: u128) {
        Allowances::<T>::insert(owner, spender, amount);
    }

    pub(crate) fn increase_supply(amount: u128) -> DispatchResult {
        TotalSupply::<T>::try_mutate(|supply| -> DispatchResult {
            *supply = supply.checked_add(amount).ok_or(DispatchError::Other(SUPPLY_OVERFLOW))?;
            Ok(())
        })
    }

    pub(crate) fn decrease_supply(amount: u128) -> DispatchResult {
        TotalSupply::<T>::try_mutate(|supply| -> DispatchResult {
            *supply = supply.checked_sub(amount).ok_or(Error::<T>::InsufficientBalance)?;
            Ok(())
        })
    }

    /// Fee charged per fee-bearing call and the account it goes to. The fee is always
    /// counted against the payer; it only moves once a recipient is set.
    pub(crate) fn fee_terms() -> (u128, Option<T::AccountId>) {
        (Fee::<T>::get().unwrap_or(0), FeeTo::<T>::get())
    }

    pub(crate) fn charge_fee(
        payer: &T::AccountId,
        fee: u128,
        fee_to: Option<&T::AccountId>,
    ) -> DispatchResult {
        match fee_to {
            Some(fee_to) => Self::move_balance(payer, fee_to, fee),
            None => Ok(()),
        }
    }

    pub(crate) fn required_amount(amount: u128, fee: u128) -> Result<u128, DispatchError> {
        amount.checked_add(fee).ok_or(DispatchError::Other(AMOUNT_OVERFLOW))
    }

    /// Index the next log entry will get.
    pub(crate) fn next_index() -> Result<TxIndex, DispatchError> {
        TransactionCount::<T>::get().checked_add(1).ok_or(DispatchError::Other(LOG_FULL))
    }

    /// Appends a log entry and returns its index, which is always the previous count + 1.
    pub(crate) fn record(
        caller: &T::AccountId,
        operation: &[u8],
        details: Vec<Detail<T::AccountId>>,
    ) -> Result<TxIndex, DispatchError> {
        ensure!(
            details.iter().all(|(_, value)| value.depth() <= MAX_DETAIL_DEPTH),
            Error::<T>::DetailTooDeep
        );
        let index = Self::next_index()?;
        Transactions::<T>::insert(
            index,
            TxRecord { time: Self::now(), caller: caller.clone(), operation: operation.to_vec(), details },
        );
        TransactionCount::<T>::put(index);
        Ok(index)
    }
}
