//! Minting against payment-ledger deposits and withdrawing back to the payment ledger.

use alloc::vec;
use frame_support::{ensure, storage::with_storage_layer, traits::Get};
use sp_runtime::DispatchError;

use crate::{
    detail, BlockHeight, Config, Error, Event, GenericValue, LedgerAccount, LedgerOperation,
    Pallet, PaymentLedger, Subaccount, TxIndex, UsedBlocks, LOG_TARGET,
};

pub(crate) const AMOUNT_CAST_FAILED: &str = "failed to cast u64 from nat";

impl<T: Config> Pallet<T> {
    /// Credits `who` with the amount deposited at `block_height` on the payment ledger.
    ///
    /// The deposit must be a plain transfer from `who`'s deposit account (selected by
    /// `subaccount`) into this ledger's deposit account. Each block can be redeemed once;
    /// the used-block mark commits together with the credit, so an attempt rejected for
    /// any other reason leaves the block redeemable.
    pub fn do_mint(
        who: &T::AccountId,
        subaccount: Option<Subaccount>,
        block_height: BlockHeight,
    ) -> Result<TxIndex, DispatchError> {
        ensure!(!UsedBlocks::<T>::contains_key(block_height), Error::<T>::BlockUsed);
        let operation = T::PaymentLedger::block(block_height).map_err(|err| {
            log::warn!(target: LOG_TARGET, "deposit block {block_height} unavailable: {err:?}");
            Error::<T>::BlockError
        })?;
        let LedgerOperation::Transfer { from, to, amount, .. } = operation else {
            return Err(Error::<T>::ErrorOperationStyle.into());
        };

        with_storage_layer(|| -> Result<TxIndex, DispatchError> {
            ensure!(!UsedBlocks::<T>::contains_key(block_height), Error::<T>::BlockUsed);
            UsedBlocks::<T>::insert(block_height, ());

            let account = LedgerAccount::derive(who, subaccount);
            ensure!(from == account, Error::<T>::Unauthorized);
            ensure!(to == Self::deposit_account(), Error::<T>::ErrorTo);
            ensure!(amount >= T::MinimumDeposit::get(), Error::<T>::AmountTooSmall);

            let amount = u128::from(amount);
            Self::credit(who, amount)?;
            Self::increase_supply(amount)?;

            let index = Self::record(
                who,
                b"mint",
                vec![
                    detail(b"to", GenericValue::Principal(who.clone())),
                    detail(b"block_height", GenericValue::Nat64Content(block_height)),
                    detail(b"account_id", GenericValue::BlobContent(account.0.to_vec())),
                    detail(b"amount", GenericValue::NatContent(amount)),
                ],
            )?;
            log::debug!(target: LOG_TARGET, "mint #{index}: {amount} to {who:?} from block {block_height}");
            Self::deposit_event(Event::Minted { to: who.clone(), block_height, amount, index });
            Ok(index)
        })
    }

    /// Burns `amount` from `who` and pays it out, less the payment-ledger fee, to the
    /// hex-encoded payment-ledger account `to`. A failed payout undoes the burn.
    pub fn do_withdraw(
        who: &T::AccountId,
        amount: u128,
        to: &[u8],
    ) -> Result<TxIndex, DispatchError> {
        let e8s = u64::try_from(amount).map_err(|_| DispatchError::Other(AMOUNT_CAST_FAILED))?;
        let network_fee = T::PaymentLedgerFee::get();
        ensure!(e8s > network_fee, Error::<T>::InvalidE8sAmount);
        let destination = LedgerAccount::from_hex(to).ok_or(Error::<T>::InvalidAccountId)?;
        ensure!(Self::balance_of(who) >= amount, Error::<T>::InsufficientBalance);
        // Payouts are irreversible; reject a full log before making one.
        Self::next_index()?;

        with_storage_layer(|| -> Result<TxIndex, DispatchError> {
            Self::debit(who, amount)?;
            Self::decrease_supply(amount)?;

            let block_height = T::PaymentLedger::transfer(
                &Self::deposit_account(),
                &destination,
                e8s - network_fee,
                network_fee,
            )
            .map_err(|err| {
                log::warn!(target: LOG_TARGET, "payout of {amount} for {who:?} failed: {err:?}");
                Error::<T>::LedgerTrap
            })?;

            let index = Self::record(
                who,
                b"withdraw",
                vec![
                    detail(b"from", GenericValue::Principal(who.clone())),
                    detail(b"to", GenericValue::BlobContent(destination.0.to_vec())),
                    detail(b"amount", GenericValue::NatContent(amount)),
                    detail(b"block_height", GenericValue::Nat64Content(block_height)),
                ],
            )?;
            log::debug!(target: LOG_TARGET, "withdraw #{index}: {amount} from {who:?} in block {block_height}");
            Self::deposit_event(Event::Withdrawn { from: who.clone(), amount, block_height, index });
            Ok(index)
        })
    }
}
