//! Fee-bearing balance movements: approve, transfer and transferFrom.

use alloc::vec;
use frame_support::{ensure, storage::with_storage_layer};
use sp_runtime::DispatchError;

use crate::{detail, Config, Error, Event, GenericValue, Pallet, TxIndex, LOG_TARGET};

impl<T: Config> Pallet<T> {
    /// Sets `spender`'s allowance over `owner`'s balance to exactly `amount`, charging
    /// the fee to `owner`.
    pub fn do_approve(
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: u128,
    ) -> Result<TxIndex, DispatchError> {
        with_storage_layer(|| -> Result<TxIndex, DispatchError> {
            let (fee, fee_to) = Self::fee_terms();
            ensure!(Self::balance_of(owner) >= fee, Error::<T>::InsufficientBalance);

            Self::charge_fee(owner, fee, fee_to.as_ref())?;
            Self::set_allowance(owner, spender, amount);

            let index = Self::record(
                owner,
                b"approve",
                vec![
                    detail(b"owner", GenericValue::Principal(owner.clone())),
                    detail(b"spender", GenericValue::Principal(spender.clone())),
                    detail(b"amount", GenericValue::NatContent(amount)),
                    detail(b"fee", GenericValue::NatContent(fee)),
                ],
            )?;
            log::debug!(target: LOG_TARGET, "approve #{index}: {owner:?} -> {spender:?} {amount}");
            Self::deposit_event(Event::Approved {
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
                fee,
                index,
            });
            Ok(index)
        })
    }

    pub fn do_transfer(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> Result<TxIndex, DispatchError> {
        with_storage_layer(|| -> Result<TxIndex, DispatchError> {
            let (fee, fee_to) = Self::fee_terms();
            let required = Self::required_amount(amount, fee)?;
            ensure!(Self::balance_of(from) >= required, Error::<T>::InsufficientBalance);

            Self::charge_fee(from, fee, fee_to.as_ref())?;
            Self::move_balance(from, to, amount)?;

            let index = Self::record(
                from,
                b"transfer",
                vec![
                    detail(b"from", GenericValue::Principal(from.clone())),
                    detail(b"to", GenericValue::Principal(to.clone())),
                    detail(b"amount", GenericValue::NatContent(amount)),
                    detail(b"fee", GenericValue::NatContent(fee)),
                ],
            )?;
            log::debug!(target: LOG_TARGET, "transfer #{index}: {from:?} -> {to:?} {amount}");
            Self::deposit_event(Event::Transferred {
                from: from.clone(),
                to: to.clone(),
                amount,
                fee,
                index,
            });
            Ok(index)
        })
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`. The allowance must
    /// cover `amount + fee` and is checked before the balance.
    pub fn do_transfer_from(
        spender: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> Result<TxIndex, DispatchError> {
        with_storage_layer(|| -> Result<TxIndex, DispatchError> {
            let (fee, fee_to) = Self::fee_terms();
            let required = Self::required_amount(amount, fee)?;
            let allowance = Self::allowance(from, spender);
            ensure!(allowance >= required, Error::<T>::InsufficientAllowance);
            ensure!(Self::balance_of(from) >= required, Error::<T>::InsufficientBalance);

            Self::set_allowance(from, spender, allowance - required);
            Self::charge_fee(from, fee, fee_to.as_ref())?;
            Self::move_balance(from, to, amount)?;

            let index = Self::record(
                spender,
                b"transferFrom",
                vec![
                    detail(b"from", GenericValue::Principal(from.clone())),
                    detail(b"to", GenericValue::Principal(to.clone())),
                    detail(b"amount", GenericValue::NatContent(amount)),
                    detail(b"fee", GenericValue::NatContent(fee)),
                ],
            )?;
            log::debug!(
                target: LOG_TARGET,
                "transferFrom #{index}: {spender:?} moved {amount} {from:?} -> {to:?}"
            );
            Self::deposit_event(Event::TransferredFrom {
                spender: spender.clone(),
                from: from.clone(),
                to: to.clone(),
                amount,
                fee,
                index,
            });
            Ok(index)
        })
    }
}
