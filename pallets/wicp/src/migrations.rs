//! Storage migrations for pallet-wicp.
//!
//! Each migration is versioned, checks the on-chain storage version first and runs
//! exactly once. Wire them into the runtime's `Executive` migration tuple:
//!
//! ```ignore
//! pub type Executive = frame_executive::Executive<
//!     Runtime,
//!     Block,
//!     frame_system::ChainContext<Runtime>,
//!     Runtime,
//!     AllPalletsWithSystem,
//!     pallet_wicp::migrations::v1::MigrateToV1<Runtime>,
//! >;
//! ```
//!
//! `UpgradedAt` is stamped by the pallet's own `on_runtime_upgrade` hook on every upgrade,
//! independently of these migrations.

use frame_support::{pallet_prelude::*, traits::OnRuntimeUpgrade};
use sp_std::marker::PhantomData;

use crate::{Balances, Config, HolderCount, Pallet, TotalSupply, LOG_TARGET};

/// Version 0 ledgers kept zero balances around and did not track holders.
pub mod v1 {
    use super::*;

    /// Drops zero balances and recomputes `TotalSupply` and `HolderCount` from `Balances`.
    pub struct MigrateToV1<T>(PhantomData<T>);

    impl<T: Config> OnRuntimeUpgrade for MigrateToV1<T> {
        fn on_runtime_upgrade() -> Weight {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();

            if on_chain_version < 1 {
                let mut scanned: u64 = 0;
                let mut holders: u64 = 0;
                let mut supply: u128 = 0;

                Balances::<T>::translate(|_who, balance: u128| {
                    scanned += 1;
                    if balance == 0 {
                        return None;
                    }
                    holders += 1;
                    supply = supply.saturating_add(balance);
                    Some(balance)
                });

                TotalSupply::<T>::put(supply);
                HolderCount::<T>::put(holders);
                StorageVersion::new(1).put::<Pallet<T>>();

                log::info!(
                    target: LOG_TARGET,
                    "Migrated to v1: {holders} holders, supply {supply}, {} zero balances dropped",
                    scanned - holders
                );

                T::DbWeight::get().reads_writes(scanned + 1, scanned + 3)
            } else {
                log::info!(
                    target: LOG_TARGET,
                    "Storage already at v{on_chain_version:?}, skipping v1 migration"
                );
                T::DbWeight::get().reads(1)
            }
        }

        #[cfg(feature = "try-runtime")]
        fn pre_upgrade() -> Result<sp_std::vec::Vec<u8>, sp_runtime::TryRuntimeError> {
            let on_chain_version = Pallet::<T>::on_chain_storage_version();
            log::info!(
                target: LOG_TARGET,
                "Pre-upgrade: on-chain storage version is {on_chain_version:?}"
            );
            let supply: u128 = Balances::<T>::iter_values().fold(0, u128::saturating_add);
            Ok((on_chain_version, supply).encode())
        }

        #[cfg(feature = "try-runtime")]
        fn post_upgrade(state: sp_std::vec::Vec<u8>) -> Result<(), sp_runtime::TryRuntimeError> {
            let (pre_version, pre_supply): (StorageVersion, u128) =
                Decode::decode(&mut &state[..])
                    .map_err(|_| sp_runtime::TryRuntimeError::Other("Failed to decode pre-state"))?;

            if pre_version < 1 {
                frame_support::ensure!(
                    Pallet::<T>::on_chain_storage_version() >= 1,
                    sp_runtime::TryRuntimeError::Other("Migration to v1 did not complete")
                );
                frame_support::ensure!(
                    TotalSupply::<T>::get() == pre_supply,
                    sp_runtime::TryRuntimeError::Other("Total supply does not match balances")
                );
                frame_support::ensure!(
                    Balances::<T>::iter_values().all(|balance| balance > 0),
                    sp_runtime::TryRuntimeError::Other("Zero balance left in storage")
                );
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::*;
    use frame_support::traits::{Hooks, StorageVersion};
    use frame_system::pallet_prelude::BlockNumberFor;

    /// A v0 ledger with stale counters and zero entries gets them rebuilt.
    #[test]
    fn migration_v1_from_v0_recomputes_counters() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(0).put::<Pallet<Test>>();
            Balances::<Test>::insert(ALICE, 70);
            Balances::<Test>::insert(BOB, 0);
            Balances::<Test>::insert(JOHN, 30);
            TotalSupply::<Test>::put(5);
            HolderCount::<Test>::put(9);

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
            assert_eq!(TotalSupply::<Test>::get(), 100);
            assert_eq!(HolderCount::<Test>::get(), 2);
            assert!(!Balances::<Test>::contains_key(BOB));
            assert_eq!(Balances::<Test>::get(ALICE), 70);
        });
    }

    /// Running the migration again leaves storage untouched.
    #[test]
    fn migration_v1_idempotent() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(1).put::<Pallet<Test>>();
            Balances::<Test>::insert(ALICE, 70);

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
            assert_eq!(TotalSupply::<Test>::get(), 0);
        });
    }

    #[test]
    fn migration_v1_skipped_on_higher_version() {
        new_test_ext().execute_with(|| {
            StorageVersion::new(5).put::<Pallet<Test>>();

            let _weight = v1::MigrateToV1::<Test>::on_runtime_upgrade();

            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 5);
        });
    }

    #[test]
    fn migration_handles_unset_version() {
        new_test_ext().execute_with(|| {
            // Genesis writes STORAGE_VERSION; wipe it back to the default.
            StorageVersion::new(0).put::<Pallet<Test>>();

            v1::MigrateToV1::<Test>::on_runtime_upgrade();
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);

            v1::MigrateToV1::<Test>::on_runtime_upgrade();
            assert_eq!(Pallet::<Test>::on_chain_storage_version(), 1);
        });
    }

    /// Every runtime upgrade stamps the upgrade time, leaving creation time alone.
    #[test]
    fn runtime_upgrade_stamps_upgraded_at() {
        new_test_ext().execute_with(|| {
            let created = Wicp::token_metadata().created_at;
            set_now(created + 60_000);

            <Wicp as Hooks<BlockNumberFor<Test>>>::on_runtime_upgrade();

            let metadata = Wicp::token_metadata();
            assert_eq!(metadata.created_at, created);
            assert_eq!(metadata.upgraded_at, created + 60_000);
        });
    }
}
