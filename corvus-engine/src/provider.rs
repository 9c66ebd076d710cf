//! External interfaces a caller plugs in to go from a built transaction to
//! a submitted, confirmed one: a chain data source ([`Provider`]) and a
//! signer ([`Wallet`]). Neither trait is implemented against a concrete
//! backend by this crate; callers supply one (a node, an indexer, a
//! hardware wallet) and drive [`crate::SignBuilder`]/[`crate::SubmitBuilder`]
//! with it.

use corvus_wallet::PrivateKey;

use crate::{
    assets::Unit,
    coinselect::AvailableUtxo,
    transaction::{Address, BuiltTransaction, DatumHash, TxHash},
    TxBuilderError,
};

/// The subset of ledger protocol parameters this crate consumes. Cost
/// models, execution-unit prices and collateral rules belong to script
/// evaluation and are not tracked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolParameters {
    pub coins_per_utxo_byte: u64,
    pub min_fee_coefficient: u64,
    pub min_fee_constant: u64,
}

/// A reward address's current delegation state, as reported by a chain
/// indexer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delegation {
    pub pool_id: Option<String>,
    pub rewards: u64,
}

/// A source of chain state: protocol parameters, UTxOs, datum lookup,
/// submission and confirmation polling.
pub trait Provider {
    fn get_protocol_parameters(&self) -> Result<ProtocolParameters, TxBuilderError>;

    fn get_utxos(&self, address: &Address) -> Result<Vec<AvailableUtxo>, TxBuilderError>;

    /// UTxOs at `address` that carry at least one unit of `unit`.
    fn get_utxos_with_unit(
        &self,
        address: &Address,
        unit: &Unit,
    ) -> Result<Vec<AvailableUtxo>, TxBuilderError>;

    fn get_delegation(&self, reward_address: &Address) -> Result<Delegation, TxBuilderError>;

    fn get_datum(&self, datum_hash: DatumHash) -> Result<Vec<u8>, TxBuilderError>;

    /// Submits canonical CBOR (hex-encoded) and returns the transaction's
    /// hash. A rejection (phase-2 failure, ledger rule violation) should
    /// surface as [`TxBuilderError::ProviderRejected`], not this method's
    /// own `Err` path, which is reserved for request failures unrelated to
    /// the transaction's validity.
    fn submit_tx(&self, cbor_hex: &str) -> Result<TxHash, TxBuilderError>;

    /// Polls until `hash` is seen on chain or `timeout_ms` elapses. The
    /// polling schedule is left to the implementation; this crate does not
    /// prescribe one.
    fn await_tx(&self, hash: &TxHash, timeout_ms: u64) -> Result<bool, TxBuilderError>;
}

/// A signer: local key material or a remote/hardware wallet.
pub trait Wallet {
    fn sign_tx(&self, tx: &BuiltTransaction) -> Result<BuiltTransaction, TxBuilderError>;

    fn sign_message(&self, payload: &[u8]) -> Result<Vec<u8>, TxBuilderError>;
}

/// The simplest [`Wallet`]: a single Ed25519 key held in memory, signing
/// through [`BuiltTransaction::sign`].
pub struct LocalWallet {
    key: PrivateKey,
}

impl LocalWallet {
    pub fn new(key: PrivateKey) -> Self {
        Self { key }
    }
}

impl Wallet for LocalWallet {
    fn sign_tx(&self, tx: &BuiltTransaction) -> Result<BuiltTransaction, TxBuilderError> {
        tx.clone().sign(self.key.clone())
    }

    fn sign_message(&self, payload: &[u8]) -> Result<Vec<u8>, TxBuilderError> {
        Ok(self.key.sign(payload).as_ref().to_vec())
    }
}
