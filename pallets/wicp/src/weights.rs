//! Weights for pallet-wicp.
//!
//! Hand-estimated until the benchmarks in `benchmarking.rs` are run on reference hardware.

use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
    fn mint() -> Weight;
    fn withdraw() -> Weight;
    fn approve() -> Weight;
    fn transfer() -> Weight;
    fn transfer_from() -> Weight;
    fn set_metadata() -> Weight;
    fn set_custodians(n: u32) -> Weight;
}

impl WeightInfo for () {
    // UsedBlocks, Balances, HolderCount, TotalSupply, TransactionCount, Transactions
    fn mint() -> Weight {
        Weight::from_parts(40_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads_writes(4, 6))
    }

    fn withdraw() -> Weight {
        Weight::from_parts(45_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads_writes(4, 5))
    }

    // Fee, FeeTo, Balances x2, Allowances, TransactionCount, Transactions
    fn approve() -> Weight {
        Weight::from_parts(25_000_000, 3_600)
            .saturating_add(RocksDbWeight::get().reads_writes(5, 5))
    }

    fn transfer() -> Weight {
        Weight::from_parts(30_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(6, 6))
    }

    fn transfer_from() -> Weight {
        Weight::from_parts(35_000_000, 6_200)
            .saturating_add(RocksDbWeight::get().reads_writes(7, 7))
    }

    fn set_metadata() -> Weight {
        Weight::from_parts(10_000_000, 1_500)
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }

    /// `n` is the length of the submitted list, before deduplication.
    fn set_custodians(n: u32) -> Weight {
        Weight::from_parts(12_000_000, 1_500)
            .saturating_add(Weight::from_parts(350_000, 32).saturating_mul(n.into()))
            .saturating_add(RocksDbWeight::get().reads_writes(1, 1))
    }
}
