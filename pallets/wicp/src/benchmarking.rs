//! Benchmarking setup for pallet-wicp

use super::*;

#[allow(unused)]
use crate::Pallet as Wicp;
use alloc::vec;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

fn fund<T: Config>(who: &T::AccountId, amount: u128) {
    Pallet::<T>::credit(who, amount).expect("benchmark account can be credited");
    Pallet::<T>::increase_supply(amount).expect("benchmark supply fits u128");
}

fn charge_fees<T: Config>() {
    Fee::<T>::put(10);
    FeeTo::<T>::put(account::<T::AccountId>("fee_to", 0, 0));
}

fn deposit_for<T: Config>(who: &T::AccountId, amount: u64) -> BlockHeight {
    T::BenchmarkHelper::deposit(
        LedgerAccount::derive(who, None),
        Pallet::<T>::deposit_account(),
        amount,
    )
}

#[benchmarks]
mod benchmarks {
    use super::*;

    #[benchmark]
    fn mint() {
        let caller: T::AccountId = whitelisted_caller();
        let amount = T::MinimumDeposit::get().max(1_000_000);
        let height = deposit_for::<T>(&caller, amount);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), None, height);

        assert_eq!(Balances::<T>::get(&caller), u128::from(amount));
        assert!(UsedBlocks::<T>::contains_key(height));
    }

    #[benchmark]
    fn withdraw() {
        let caller: T::AccountId = whitelisted_caller();
        let amount = T::PaymentLedgerFee::get().saturating_add(1_000_000);
        let deposited = amount.saturating_mul(2).max(T::MinimumDeposit::get());
        let height = deposit_for::<T>(&caller, deposited);
        Pallet::<T>::do_mint(&caller, None, height).expect("benchmark deposit can be minted");
        let destination = vec![b'7'; 64];

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), u128::from(amount), destination);

        assert_eq!(Balances::<T>::get(&caller), u128::from(deposited - amount));
    }

    #[benchmark]
    fn approve() {
        let owner: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);
        charge_fees::<T>();
        fund::<T>(&owner, 1_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(owner.clone()), spender.clone(), 500);

        assert_eq!(Allowances::<T>::get(&owner, &spender), 500);
    }

    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        charge_fees::<T>();
        fund::<T>(&caller, 10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
    }

    #[benchmark]
    fn transfer_from() {
        let spender: T::AccountId = whitelisted_caller();
        let owner: T::AccountId = account("owner", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        charge_fees::<T>();
        fund::<T>(&owner, 10_000_000);
        Allowances::<T>::insert(&owner, &spender, 2_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), owner.clone(), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 1_000_000);
    }

    #[benchmark]
    fn set_metadata() {
        let custodian: T::AccountId = whitelisted_caller();
        Custodians::<T>::put(BoundedVec::truncate_from(vec![custodian.clone()]));
        let name = vec![b'w'; 64];

        #[extrinsic_call]
        set_name(RawOrigin::Signed(custodian), name.clone());

        assert_eq!(Pallet::<T>::name(), Some(name));
    }

    #[benchmark]
    fn set_custodians(n: Linear<1, { T::MaxCustodians::get() }>) {
        let custodian: T::AccountId = whitelisted_caller();
        Custodians::<T>::put(BoundedVec::truncate_from(vec![custodian.clone()]));
        let custodians: Vec<T::AccountId> = (0..n).map(|i| account("custodian", i, 0)).collect();

        #[extrinsic_call]
        _(RawOrigin::Signed(custodian), custodians);

        assert_eq!(Custodians::<T>::get().len(), n as usize);
    }

    impl_benchmark_test_suite!(Wicp, crate::mock::new_test_ext(), crate::mock::Test);
}
