#![cfg_attr(not(feature = "std"), no_std)]
// Allow the deprecated `RuntimeEvent` config item until the runtime moves to the new event bound.
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! Wrapped payment-ledger token.
//!
//! Supply is minted only against deposits on the payment ledger (each deposit block
//! can be redeemed once) and burned when holders withdraw back to that ledger.
//! Every ledger call appends one entry to a 1-based transaction log.

extern crate alloc;

use frame_support::{
    dispatch::DispatchResult,
    pallet_prelude::*,
    traits::{fungible, EnsureOrigin, UnixTime},
    PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_std::prelude::*;

pub use pallet::*;
#[cfg(feature = "runtime-benchmarks")]
pub use traits::BenchmarkHelper;
pub use traits::{EnsureCustodian, LedgerError, PaymentLedger};
pub use types::*;
pub use weights::WeightInfo;

mod gateway;
mod ledger;
mod metadata;
pub mod migrations;
pub mod traits;
mod transfer;
pub mod types;
pub mod weights;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "runtime::wicp";

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

        /// Ledger holding the deposits that back the wrapped supply.
        type PaymentLedger: PaymentLedger;

        /// Native currency; the pallet account's balance is reported as `cycles`.
        type Currency: fungible::Inspect<Self::AccountId>;

        type UnixTime: UnixTime;

        /// Derives the pallet account and, from it, the deposit account on the payment ledger.
        #[pallet::constant]
        type PalletId: Get<PalletId>;

        /// Fee the payment ledger charges per transfer, withheld from withdrawals.
        #[pallet::constant]
        type PaymentLedgerFee: Get<u64>;

        /// Smallest deposit that can be minted.
        #[pallet::constant]
        type MinimumDeposit: Get<u64>;

        #[pallet::constant]
        type MaxCustodians: Get<u32>;

        #[pallet::constant]
        type MaxLogoLength: Get<u32>;

        type WeightInfo: WeightInfo;

        #[cfg(feature = "runtime-benchmarks")]
        type BenchmarkHelper: BenchmarkHelper;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    #[pallet::without_storage_info]
    pub struct Pallet<T>(_);

    /// Token name (e.g., "Wrapped ICP")
    #[pallet::storage]
    pub type TokenName<T> = StorageValue<_, BoundedVec<u8, ConstU32<64>>, OptionQuery>;

    /// Token symbol (e.g., "WICP")
    #[pallet::storage]
    pub type TokenSymbol<T> = StorageValue<_, BoundedVec<u8, ConstU32<16>>, OptionQuery>;

    #[pallet::storage]
    pub type TokenLogo<T: Config> = StorageValue<_, BoundedVec<u8, T::MaxLogoLength>, OptionQuery>;

    #[pallet::storage]
    pub type Decimals<T> = StorageValue<_, u8, OptionQuery>;

    /// Fee charged per approve, transfer and transferFrom. Unset means zero.
    #[pallet::storage]
    pub type Fee<T> = StorageValue<_, u128, OptionQuery>;

    /// Recipient of fees. No fees are charged while unset.
    #[pallet::storage]
    pub type FeeTo<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Event-history sink the ledger reports to.
    #[pallet::storage]
    pub type Cap<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

    /// Accounts with administrative rights. Never empty after genesis.
    #[pallet::storage]
    pub type Custodians<T: Config> =
        StorageValue<_, BoundedVec<T::AccountId, T::MaxCustodians>, ValueQuery>;

    #[pallet::storage]
    pub type CreatedAt<T> = StorageValue<_, u64, ValueQuery>;

    #[pallet::storage]
    pub type UpgradedAt<T> = StorageValue<_, u64, ValueQuery>;

    /// Total token supply
    #[pallet::storage]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Number of accounts holding a non-zero balance
    #[pallet::storage]
    pub type HolderCount<T> = StorageValue<_, u64, ValueQuery>;

    /// Account balances. Zero balances are never stored.
    #[pallet::storage]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// ERC20-style approvals (owner => spender => amount).
    #[pallet::storage]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    /// Payment-ledger blocks already redeemed by `mint`.
    #[pallet::storage]
    pub type UsedBlocks<T> = StorageMap<_, Twox64Concat, BlockHeight, (), OptionQuery>;

    #[pallet::storage]
    pub type Transactions<T: Config> =
        StorageMap<_, Twox64Concat, TxIndex, TxRecord<T::AccountId>, OptionQuery>;

    /// Index of the newest transaction log entry.
    #[pallet::storage]
    pub type TransactionCount<T> = StorageValue<_, TxIndex, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Tokens minted against a payment-ledger deposit
        Minted { to: T::AccountId, block_height: BlockHeight, amount: u128, index: TxIndex },
        /// Tokens burned and paid out on the payment ledger
        Withdrawn { from: T::AccountId, amount: u128, block_height: BlockHeight, index: TxIndex },
        Approved {
            owner: T::AccountId,
            spender: T::AccountId,
            amount: u128,
            fee: u128,
            index: TxIndex,
        },
        /// Tokens transferred from one account to another
        Transferred {
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            fee: u128,
            index: TxIndex,
        },
        /// Tokens transferred by a spender out of an owner's allowance
        TransferredFrom {
            spender: T::AccountId,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
            fee: u128,
            index: TxIndex,
        },
        NameChanged { name: Vec<u8> },
        LogoChanged,
        SymbolChanged { symbol: Vec<u8> },
        DecimalsChanged { decimals: u8 },
        FeeChanged { fee: u128 },
        FeeToChanged { fee_to: T::AccountId },
        CapChanged { cap: T::AccountId },
        CustodiansChanged { custodians: Vec<T::AccountId> },
    }

    #[pallet::error]
    pub enum Error<T> {
        InsufficientAllowance,
        InsufficientBalance,
        /// The deposit block does not exist or could not be fetched.
        BlockError,
        /// The deposit block has already been redeemed.
        BlockUsed,
        TxNotFound,
        /// The deposit block is not a plain transfer.
        ErrorOperationStyle,
        /// The deposit was not sent from the caller's account.
        Unauthorized,
        /// The payment ledger rejected or failed the payout.
        LedgerTrap,
        /// The deposit was not sent to this ledger's deposit account.
        ErrorTo,
        /// Withdrawal amount does not cover the payment-ledger fee.
        InvalidE8sAmount,
        InvalidAccountId,
        /// Deposit is below the minimum mint amount.
        AmountTooSmall,
        MetadataTooLong,
        TooManyCustodians,
        /// A log detail nests deeper than `MAX_DETAIL_DEPTH`.
        DetailTooDeep,
    }

    #[pallet::hooks]
    impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
        fn on_runtime_upgrade() -> Weight {
            let now = Self::now();
            UpgradedAt::<T>::put(now);
            log::info!(target: LOG_TARGET, "Ledger upgraded at {now}");
            T::DbWeight::get().writes(1)
        }
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::mint())]
        pub fn mint(
            origin: OriginFor<T>,
            subaccount: Option<Subaccount>,
            block_height: BlockHeight,
        ) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_mint(&who, subaccount, block_height)?;
            Ok(())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::withdraw())]
        pub fn withdraw(origin: OriginFor<T>, amount: u128, to: Vec<u8>) -> DispatchResult {
            let who = ensure_signed(origin)?;
            Self::do_withdraw(&who, amount, &to)?;
            Ok(())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(origin: OriginFor<T>, spender: T::AccountId, amount: u128) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Self::do_approve(&owner, &spender, amount)?;
            Ok(())
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let from = ensure_signed(origin)?;
            Self::do_transfer(&from, &to, amount)?;
            Ok(())
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::do_transfer_from(&spender, &from, &to, amount)?;
            Ok(())
        }

        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_name(origin: OriginFor<T>, name: Vec<u8>) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            let bounded: BoundedVec<u8, ConstU32<64>> =
                name.clone().try_into().map_err(|_| Error::<T>::MetadataTooLong)?;
            TokenName::<T>::put(bounded);
            Self::deposit_event(Event::NameChanged { name });
            Ok(())
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_logo(origin: OriginFor<T>, logo: Vec<u8>) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            let bounded: BoundedVec<u8, T::MaxLogoLength> =
                logo.try_into().map_err(|_| Error::<T>::MetadataTooLong)?;
            TokenLogo::<T>::put(bounded);
            Self::deposit_event(Event::LogoChanged);
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_symbol(origin: OriginFor<T>, symbol: Vec<u8>) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            let bounded: BoundedVec<u8, ConstU32<16>> =
                symbol.clone().try_into().map_err(|_| Error::<T>::MetadataTooLong)?;
            TokenSymbol::<T>::put(bounded);
            Self::deposit_event(Event::SymbolChanged { symbol });
            Ok(())
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_decimals(origin: OriginFor<T>, decimals: u8) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            Decimals::<T>::put(decimals);
            Self::deposit_event(Event::DecimalsChanged { decimals });
            Ok(())
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_fee(origin: OriginFor<T>, fee: u128) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            Fee::<T>::put(fee);
            Self::deposit_event(Event::FeeChanged { fee });
            Ok(())
        }

        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_fee_to(origin: OriginFor<T>, fee_to: T::AccountId) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            FeeTo::<T>::put(&fee_to);
            Self::deposit_event(Event::FeeToChanged { fee_to });
            Ok(())
        }

        /// Points the ledger at an existing event-history sink.
        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::set_metadata())]
        pub fn set_cap(origin: OriginFor<T>, cap: T::AccountId) -> DispatchResult {
            EnsureCustodian::<T>::ensure_origin(origin)?;
            Cap::<T>::put(&cap);
            Self::deposit_event(Event::CapChanged { cap });
            Ok(())
        }

        /// Replaces the custodian set. Duplicates are dropped; an empty list keeps the
        /// calling custodian as the only one.
        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::set_custodians(custodians.len() as u32))]
        pub fn set_custodians(origin: OriginFor<T>, custodians: Vec<T::AccountId>) -> DispatchResult {
            let who = EnsureCustodian::<T>::ensure_origin(origin)?;
            let mut custodians = custodians;
            if custodians.is_empty() {
                custodians.push(who);
            }
            let custodians = Self::normalize_custodians(custodians)?;
            Custodians::<T>::put(&custodians);
            Self::deposit_event(Event::CustodiansChanged { custodians: custodians.into_inner() });
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Token name
        pub name: Option<Vec<u8>>,
        /// Token symbol
        pub symbol: Option<Vec<u8>>,
        pub logo: Option<Vec<u8>>,
        pub decimals: Option<u8>,
        pub fee: Option<u128>,
        pub fee_to: Option<T::AccountId>,
        pub cap: Option<T::AccountId>,
        /// Initial custodians; at least one is required
        pub custodians: Vec<T::AccountId>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            assert!(!self.custodians.is_empty(), "At least one custodian is required");

            if let Some(ref name) = self.name {
                let name: BoundedVec<u8, ConstU32<64>> =
                    name.clone().try_into().expect("Token name too long (max 64 bytes)");
                TokenName::<T>::put(name);
            }
            if let Some(ref symbol) = self.symbol {
                let symbol: BoundedVec<u8, ConstU32<16>> =
                    symbol.clone().try_into().expect("Token symbol too long (max 16 bytes)");
                TokenSymbol::<T>::put(symbol);
            }
            if let Some(ref logo) = self.logo {
                let logo: BoundedVec<u8, T::MaxLogoLength> =
                    logo.clone().try_into().expect("Token logo exceeds MaxLogoLength");
                TokenLogo::<T>::put(logo);
            }
            if let Some(decimals) = self.decimals {
                Decimals::<T>::put(decimals);
            }
            if let Some(fee) = self.fee {
                Fee::<T>::put(fee);
            }
            if let Some(ref fee_to) = self.fee_to {
                FeeTo::<T>::put(fee_to);
            }
            if let Some(ref cap) = self.cap {
                Cap::<T>::put(cap);
            }

            let custodians = Pallet::<T>::normalize_custodians(self.custodians.clone())
                .expect("Too many custodians (exceeds MaxCustodians)");
            Custodians::<T>::put(custodians);

            let now = Pallet::<T>::now();
            CreatedAt::<T>::put(now);
            UpgradedAt::<T>::put(now);
        }
    }
}
