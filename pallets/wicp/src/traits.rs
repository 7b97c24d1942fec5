//! Seams to the payment ledger and to the custodian origin check.

use frame_support::traits::EnsureOrigin;
use frame_system::pallet_prelude::OriginFor;
use sp_runtime::RuntimeDebug;
use sp_std::marker::PhantomData;

use crate::{BlockHeight, Config, LedgerAccount, LedgerOperation, Pallet};

#[derive(Clone, Copy, PartialEq, Eq, RuntimeDebug)]
pub enum LedgerError {
    /// No block at the requested height.
    BlockNotFound,
    /// The ledger could not be reached or trapped.
    Unavailable,
    /// The sending account cannot cover amount plus fee.
    InsufficientFunds,
    /// The ledger refused the destination account.
    InvalidAccount,
}

/// Payment ledger whose deposits back the wrapped supply.
pub trait PaymentLedger {
    /// Operation recorded at `height`.
    fn block(height: BlockHeight) -> Result<LedgerOperation, LedgerError>;

    /// Sends `amount` from `from` to `to`, paying `fee`; returns the new block height.
    fn transfer(
        from: &LedgerAccount,
        to: &LedgerAccount,
        amount: u64,
        fee: u64,
    ) -> Result<BlockHeight, LedgerError>;

    fn account_balance(account: &LedgerAccount) -> Result<u64, LedgerError>;
}

/// Seeds the payment ledger so `mint` and `withdraw` can be benchmarked.
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper {
    /// Records a transfer of `amount` from `from` to `to`, crediting `to`, and returns
    /// the height of the new block.
    fn deposit(from: LedgerAccount, to: LedgerAccount, amount: u64) -> BlockHeight;
}

/// Succeeds for signed origins whose account is a custodian of the ledger.
pub struct EnsureCustodian<T>(PhantomData<T>);

impl<T: Config> EnsureOrigin<OriginFor<T>> for EnsureCustodian<T> {
    type Success = T::AccountId;

    fn try_origin(o: OriginFor<T>) -> Result<Self::Success, OriginFor<T>> {
        let raw: Result<frame_system::RawOrigin<T::AccountId>, OriginFor<T>> = o.clone().into();
        match raw {
            Ok(frame_system::RawOrigin::Signed(who)) if Pallet::<T>::is_custodian(&who) => Ok(who),
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<OriginFor<T>, ()> {
        Pallet::<T>::custodians()
            .first()
            .cloned()
            .map(|who| frame_system::RawOrigin::Signed(who).into())
            .ok_or(())
    }
}
