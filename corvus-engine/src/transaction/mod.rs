use serde::{Deserialize, Serialize};

pub mod model;
mod serialise;

pub use model::{Address, BuiltTransaction, ExUnits, Input, Output, ScriptKind, StagingTransaction};

/// If a Vec is empty, returns None, or Some(Vec) if not empty.
#[inline]
pub fn opt_if_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() {
        None
    } else {
        Some(v)
    }
}

pub type TxHash = Bytes32;
pub type PolicyId = Hash28;
pub type AssetName = Bytes;
pub type PubKeyHash = Hash28;
pub type ScriptHash = Hash28;
pub type DatumHash = Bytes32;
pub type PublicKey = Bytes32;
pub type Signature = Bytes64;
pub type ScriptBytes = Bytes;
pub type DatumBytes = Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Staging,
    Built,
    Signed,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash28(pub [u8; 28]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes32(pub [u8; 32]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes64(pub [u8; 64]);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Bytes(pub Vec<u8>);

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Bytes(value)
    }
}

impl From<Bytes> for Vec<u8> {
    fn from(value: Bytes) -> Self {
        value.0
    }
}

impl From<Bytes> for corvus_codec::utils::Bytes {
    fn from(value: Bytes) -> Self {
        value.0.into()
    }
}

impl From<Hash28> for corvus_crypto::hash::Hash<28> {
    fn from(value: Hash28) -> Self {
        value.0.into()
    }
}

impl From<Bytes32> for corvus_crypto::hash::Hash<32> {
    fn from(value: Bytes32) -> Self {
        value.0.into()
    }
}
