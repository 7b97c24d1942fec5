use crate as pallet_wicp;
use crate::{BlockHeight, LedgerAccount, LedgerError, LedgerOperation, Subaccount};
use core::{cell::RefCell, time::Duration};
use frame_support::{
    derive_impl, parameter_types,
    traits::{ConstU32, ConstU64, UnixTime},
    PalletId,
};
use sp_core::H256;
use sp_runtime::{
    traits::{BlakeTwo256, IdentityLookup},
    BuildStorage,
};
use std::collections::BTreeMap;

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        NativeBalances: pallet_balances,
        Wicp: pallet_wicp,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type BaseCallFilter = frame_support::traits::Everything;
    type BlockWeights = ();
    type BlockLength = ();
    type DbWeight = ();
    type RuntimeOrigin = RuntimeOrigin;
    type RuntimeCall = RuntimeCall;
    type Nonce = u64;
    type Hash = H256;
    type Hashing = BlakeTwo256;
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
    type RuntimeEvent = RuntimeEvent;
    type BlockHashCount = ConstU64<250>;
    type Version = ();
    type PalletInfo = PalletInfo;
    type AccountData = pallet_balances::AccountData<u64>;
    type OnNewAccount = ();
    type OnKilledAccount = ();
    type SystemWeightInfo = ();
    type SS58Prefix = ();
    type OnSetCode = ();
    type MaxConsumers = ConstU32<16>;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
    type AccountStore = System;
}

pub const CUSTODIAN: u64 = 1;
pub const ALICE: u64 = 2;
pub const BOB: u64 = 3;
pub const JOHN: u64 = 4;

/// Fee configured at genesis. It stays with the payer until a fee recipient is set.
pub const FEE: u128 = 100;
pub const LEDGER_FEE: u64 = 10_000;
/// Native balance of the pallet account, reported as `cycles`.
pub const CYCLES: u64 = 5_000_000;

parameter_types! {
    pub static Now: u64 = 1_700_000_000_000;
    pub const WicpPalletId: PalletId = PalletId(*b"py/wicp_");
}

pub fn set_now(millis: u64) {
    Now::set(millis);
}

pub struct MockTime;
impl UnixTime for MockTime {
    fn now() -> Duration {
        Duration::from_millis(Now::get())
    }
}

#[derive(Default)]
struct LedgerState {
    blocks: BTreeMap<BlockHeight, LedgerOperation>,
    balances: BTreeMap<LedgerAccount, u64>,
    offline: bool,
}

thread_local! {
    static LEDGER: RefCell<LedgerState> = RefCell::new(LedgerState::default());
}

/// In-memory payment ledger. Block heights start at 1.
pub struct MockPaymentLedger;

impl MockPaymentLedger {
    pub fn reset() {
        LEDGER.with(|ledger| *ledger.borrow_mut() = LedgerState::default());
    }

    /// Appends a block without moving any funds.
    pub fn push(operation: LedgerOperation) -> BlockHeight {
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            let height = ledger.blocks.len() as BlockHeight + 1;
            ledger.blocks.insert(height, operation);
            height
        })
    }

    /// Records a deposit from `who`'s account into the wrapped ledger's deposit account.
    pub fn deposit(who: u64, subaccount: Option<Subaccount>, amount: u64) -> BlockHeight {
        let from = LedgerAccount::derive(&who, subaccount);
        Self::record_transfer(from, Wicp::deposit_account(), amount)
    }

    fn record_transfer(from: LedgerAccount, to: LedgerAccount, amount: u64) -> BlockHeight {
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            *ledger.balances.entry(to).or_default() += amount;
        });
        Self::push(LedgerOperation::Transfer { from, to, amount, fee: LEDGER_FEE })
    }

    pub fn set_offline(offline: bool) {
        LEDGER.with(|ledger| ledger.borrow_mut().offline = offline);
    }

    pub fn balance(account: &LedgerAccount) -> u64 {
        LEDGER.with(|ledger| ledger.borrow().balances.get(account).copied().unwrap_or(0))
    }
}

impl crate::PaymentLedger for MockPaymentLedger {
    fn block(height: BlockHeight) -> Result<LedgerOperation, LedgerError> {
        LEDGER.with(|ledger| {
            let ledger = ledger.borrow();
            if ledger.offline {
                return Err(LedgerError::Unavailable);
            }
            ledger.blocks.get(&height).cloned().ok_or(LedgerError::BlockNotFound)
        })
    }

    fn transfer(
        from: &LedgerAccount,
        to: &LedgerAccount,
        amount: u64,
        fee: u64,
    ) -> Result<BlockHeight, LedgerError> {
        LEDGER.with(|ledger| {
            let mut ledger = ledger.borrow_mut();
            if ledger.offline {
                return Err(LedgerError::Unavailable);
            }
            let available = ledger.balances.get(from).copied().unwrap_or(0);
            let spent = amount.checked_add(fee).ok_or(LedgerError::InsufficientFunds)?;
            let remaining = available.checked_sub(spent).ok_or(LedgerError::InsufficientFunds)?;
            ledger.balances.insert(*from, remaining);
            *ledger.balances.entry(*to).or_default() += amount;
            let height = ledger.blocks.len() as BlockHeight + 1;
            ledger
                .blocks
                .insert(height, LedgerOperation::Transfer { from: *from, to: *to, amount, fee });
            Ok(height)
        })
    }

    fn account_balance(account: &LedgerAccount) -> Result<u64, LedgerError> {
        LEDGER.with(|ledger| {
            let ledger = ledger.borrow();
            if ledger.offline {
                return Err(LedgerError::Unavailable);
            }
            Ok(ledger.balances.get(account).copied().unwrap_or(0))
        })
    }
}

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper for MockPaymentLedger {
    fn deposit(from: LedgerAccount, to: LedgerAccount, amount: u64) -> BlockHeight {
        Self::record_transfer(from, to, amount)
    }
}

impl pallet_wicp::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type PaymentLedger = MockPaymentLedger;
    type Currency = NativeBalances;
    type UnixTime = MockTime;
    type PalletId = WicpPalletId;
    type PaymentLedgerFee = ConstU64<LEDGER_FEE>;
    type MinimumDeposit = ConstU64<1>;
    type MaxCustodians = ConstU32<8>;
    type MaxLogoLength = ConstU32<1024>;
    type WeightInfo = ();
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper = MockPaymentLedger;
}

// Build genesis storage according to the mock runtime.
pub fn new_test_ext() -> sp_io::TestExternalities {
    MockPaymentLedger::reset();
    Now::set(1_700_000_000_000);

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

    pallet_balances::GenesisConfig::<Test> {
        balances: vec![(Wicp::account_id(), CYCLES)],
        dev_accounts: None,
    }
    .assimilate_storage(&mut t)
    .unwrap();

    pallet_wicp::GenesisConfig::<Test> {
        name: Some(b"Wrapped ICP".to_vec()),
        symbol: Some(b"WICP".to_vec()),
        logo: None,
        decimals: Some(8),
        fee: Some(FEE),
        fee_to: None,
        cap: None,
        custodians: vec![CUSTODIAN],
    }
    .assimilate_storage(&mut t)
    .unwrap();

    let mut ext: sp_io::TestExternalities = t.into();
    ext.execute_with(|| System::set_block_number(1));
    ext
}

/// Deposits `amount` on the payment ledger for `who` and mints it.
pub fn mint_to(who: u64, amount: u64) -> BlockHeight {
    let height = MockPaymentLedger::deposit(who, None, amount);
    frame_support::assert_ok!(Wicp::mint(RuntimeOrigin::signed(who), None, height));
    height
}
