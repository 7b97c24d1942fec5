//! Record types shared by storage, queries and the payment-ledger seam.

use codec::{Decode, DecodeLimit, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_runtime::{
    traits::{BlakeTwo256, Hash},
    RuntimeDebug,
};
use sp_std::prelude::*;

/// Height of a block on the payment ledger.
pub type BlockHeight = u64;

/// 1-based position of an entry in the transaction log.
pub type TxIndex = u64;

/// Selects one of several payment-ledger accounts owned by the same principal.
pub type Subaccount = [u8; 32];

/// Deepest `NestedContent` chain accepted into the transaction log.
pub const MAX_DETAIL_DEPTH: u32 = 8;

/// Decoder recursion limit for externally supplied log records.
pub const MAX_DECODE_DEPTH: u32 = 4 * MAX_DETAIL_DEPTH + 8;

const ACCOUNT_DOMAIN: &[u8] = b"\x0Aaccount-id";

/// Typed value attached to a transaction log entry.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
#[codec(encode_bound(AccountId: Encode))]
#[codec(decode_bound(AccountId: Decode))]
#[scale_info(bounds(AccountId: TypeInfo + 'static))]
pub enum GenericValue<AccountId> {
    BoolContent(bool),
    TextContent(Vec<u8>),
    BlobContent(Vec<u8>),
    Principal(AccountId),
    Nat8Content(u8),
    Nat16Content(u16),
    Nat32Content(u32),
    Nat64Content(u64),
    NatContent(u128),
    Int8Content(i8),
    Int16Content(i16),
    Int32Content(i32),
    Int64Content(i64),
    IntContent(i128),
    NestedContent(Vec<(Vec<u8>, GenericValue<AccountId>)>),
}

impl<AccountId> GenericValue<AccountId> {
    /// Nesting depth; scalar values have depth 1.
    pub fn depth(&self) -> u32 {
        match self {
            Self::NestedContent(entries) => {
                1 + entries.iter().map(|(_, value)| value.depth()).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

/// One key/value pair of a log entry.
pub type Detail<AccountId> = (Vec<u8>, GenericValue<AccountId>);

pub fn detail<AccountId>(key: &[u8], value: GenericValue<AccountId>) -> Detail<AccountId> {
    (key.to_vec(), value)
}

/// Immutable transaction log entry.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct TxRecord<AccountId> {
    /// Unix time in milliseconds.
    pub time: u64,
    pub caller: AccountId,
    pub operation: Vec<u8>,
    pub details: Vec<Detail<AccountId>>,
}

impl<AccountId> TxRecord<AccountId> {
    pub fn detail(&self, key: &[u8]) -> Option<&GenericValue<AccountId>> {
        self.details.iter().find(|(k, _)| k.as_slice() == key).map(|(_, value)| value)
    }
}

impl<AccountId: Decode> TxRecord<AccountId> {
    /// Decodes a record while refusing pathologically nested details.
    pub fn decode_bounded(bytes: &[u8]) -> Result<Self, codec::Error> {
        Self::decode_with_depth_limit(MAX_DECODE_DEPTH, &mut &bytes[..])
    }
}

/// Account identifier on the payment ledger.
#[derive(
    Encode,
    Decode,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
)]
pub struct LedgerAccount(pub [u8; 32]);

impl LedgerAccount {
    /// Deposit account of `owner` on the payment ledger.
    pub fn derive<AccountId: Encode>(owner: &AccountId, subaccount: Option<Subaccount>) -> Self {
        let mut preimage = ACCOUNT_DOMAIN.to_vec();
        owner.encode_to(&mut preimage);
        preimage.extend_from_slice(&subaccount.unwrap_or_default());
        Self(BlakeTwo256::hash(&preimage).0)
    }

    /// Parses the 64-character hex form.
    pub fn from_hex(text: &[u8]) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(text, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

/// Operation recorded in a payment-ledger block.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub enum LedgerOperation {
    Transfer { from: LedgerAccount, to: LedgerAccount, amount: u64, fee: u64 },
    Mint { to: LedgerAccount, amount: u64 },
    Burn { from: LedgerAccount, amount: u64 },
}

/// Custodian-only ledger statistics.
#[derive(Encode, Decode, Clone, Default, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct Stats {
    pub total_transactions: u64,
    pub total_supply: u128,
    pub cycles: u128,
    pub icps: u64,
    pub total_unique_holders: u64,
}

#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct TokenMetadata<AccountId> {
    pub name: Option<Vec<u8>>,
    pub logo: Option<Vec<u8>>,
    pub symbol: Option<Vec<u8>>,
    pub decimals: Option<u8>,
    pub fee: Option<u128>,
    pub fee_to: Option<AccountId>,
    pub custodians: Vec<AccountId>,
    pub cap: Option<AccountId>,
    pub created_at: u64,
    pub upgraded_at: u64,
}

/// Full ledger state, as handed to an external backup collaborator.
#[derive(Encode, Decode, Clone, PartialEq, Eq, RuntimeDebug, TypeInfo)]
pub struct LedgerSnapshot<AccountId> {
    pub metadata: TokenMetadata<AccountId>,
    pub tx_records: Vec<(TxIndex, TxRecord<AccountId>)>,
    pub allowances: Vec<(AccountId, AccountId, u128)>,
    pub used_blocks: Vec<BlockHeight>,
    pub balances: Vec<(AccountId, u128)>,
}
