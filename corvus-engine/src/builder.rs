//! The fluent surface: small, spec-named wrappers over
//! [`StagingTransaction`]'s own builder methods, plus the `build` step that
//! hands off to the phase state machine and wraps the result for signing.

use corvus_addresses::Address as PallasAddress;
use corvus_crypto::hash::Hash;
use corvus_primitives::{babbage, Fragment};

use crate::{
    assets::Assets,
    coinselect::AvailableUtxo,
    phases::{self, BuildOptions},
    transaction::model::{Input, Output, ScriptKind, StagingTransaction},
    BuildBabbage, BuiltTransaction, TxBuilderError,
};

/// Converts an [`Assets`] bundle (lovelace plus any native units) into an
/// [`Output`] at `address`.
pub(crate) fn assets_to_output(
    address: PallasAddress,
    assets: &Assets,
) -> Result<Output, TxBuilderError> {
    let mut output = Output::new(address, assets.lovelace());

    for (unit, qty) in assets.native_units() {
        if let crate::assets::Unit::Native(policy, name) = unit {
            output = output.add_asset((*policy).into(), name.clone(), qty as u64)?;
        }
    }

    Ok(output)
}

impl StagingTransaction {
    /// Adds a plain lovelace-only payment output.
    pub fn pay_to_address(self, address: PallasAddress, lovelace: u64) -> Self {
        self.output(Output::new(address, lovelace))
    }

    /// Adds a payment output carrying an arbitrary asset bundle (lovelace
    /// plus zero or more native units).
    pub fn pay_to_address_with_assets(
        self,
        address: PallasAddress,
        assets: &Assets,
    ) -> Result<Self, TxBuilderError> {
        Ok(self.output(assets_to_output(address, assets)?))
    }

    /// Adds a payment output at a script address carrying an inline datum.
    pub fn pay_to_script(self, address: PallasAddress, lovelace: u64, datum: Vec<u8>) -> Self {
        self.output(Output::new(address, lovelace).set_inline_datum(datum))
    }

    /// Commits specific UTxOs as inputs. `redeemer` attaches a spend
    /// redeemer to each, for spending from a script address; pass `None`
    /// for plain key-witnessed inputs. The committed UTxOs must be present
    /// in the `available_utxos` slice passed to [`StagingTransaction::build`]
    /// so their assets are known to the balance equations.
    pub fn collect_from(mut self, utxos: &[AvailableUtxo], redeemer: Option<Vec<u8>>) -> Self {
        for utxo in utxos {
            let input = Input {
                tx_hash: utxo.tx_hash,
                txo_index: utxo.output_index,
            };

            self = self.input(input.clone());

            if let Some(plutus_data) = &redeemer {
                self = self.add_spend_redeemer(input, plutus_data.clone(), None);
            }
        }

        self
    }

    /// Mints `quantity` of a native asset under `policy`.
    pub fn mint_tokens(
        self,
        policy: Hash<28>,
        name: Vec<u8>,
        quantity: u64,
    ) -> Result<Self, TxBuilderError> {
        self.mint_asset(policy, name, quantity as i64)
    }

    /// Burns `quantity` of a native asset under `policy`.
    pub fn burn_tokens(
        self,
        policy: Hash<28>,
        name: Vec<u8>,
        quantity: u64,
    ) -> Result<Self, TxBuilderError> {
        self.mint_asset(policy, name, -(quantity as i64))
    }

    /// Attaches a script so the builder can reference it by hash (as a
    /// spend, mint, or certificate witness).
    pub fn attach_script(self, kind: ScriptKind, bytes: Vec<u8>) -> Self {
        self.script(kind, bytes)
    }

    /// Sets the slot after which the transaction is no longer valid.
    pub fn set_time_to_live(self, slot: u64) -> Self {
        self.invalid_from_slot(slot)
    }

    /// Sets the slot before which the transaction is not yet valid.
    pub fn set_valid_from(self, slot: u64) -> Self {
        self.valid_from_slot(slot)
    }

    /// Runs the phase state machine over `self`'s explicit outputs and any
    /// committed inputs against `available_utxos`, then builds the
    /// canonical transaction bytes. Returns a [`SignBuilder`] ready to
    /// attach witnesses.
    pub fn build(
        self,
        available_utxos: &[AvailableUtxo],
        options: &BuildOptions,
    ) -> Result<SignBuilder, TxBuilderError> {
        let staged = phases::build(self, available_utxos, options)?;
        let built = staged.build_babbage_raw()?;
        Ok(SignBuilder::new(built))
    }
}

/// Wraps a [`BuiltTransaction`] to offer the signing surface from spec
/// §4.6: inspect it as-is, attach a signature directly, or hand off to a
/// [`crate::provider::Wallet`].
pub struct SignBuilder {
    tx: BuiltTransaction,
}

impl SignBuilder {
    pub fn new(tx: BuiltTransaction) -> Self {
        Self { tx }
    }

    pub fn to_transaction(&self) -> &BuiltTransaction {
        &self.tx
    }

    /// Reads the fee baked into this transaction's body, if the bytes
    /// decode cleanly.
    pub fn estimate_fee(&self) -> Option<u64> {
        babbage::Tx::decode_fragment(&self.tx.tx_bytes.0)
            .ok()
            .map(|tx| tx.transaction_body.fee)
    }

    /// Signs with a local private key.
    pub fn sign(self, private_key: corvus_wallet::PrivateKey) -> Result<Self, TxBuilderError> {
        Ok(Self::new(self.tx.sign(private_key)?))
    }

    /// Signs via a connected [`crate::provider::Wallet`], merging in
    /// whatever witnesses it returns without disturbing any already on the
    /// transaction.
    pub fn partial_sign(
        self,
        wallet: &dyn crate::provider::Wallet,
    ) -> Result<Self, TxBuilderError> {
        Ok(Self::new(wallet.sign_tx(&self.tx)?))
    }

    /// Submits the transaction and returns a handle for awaiting
    /// confirmation.
    pub fn submit(
        self,
        provider: &dyn crate::provider::Provider,
    ) -> Result<SubmitBuilder, TxBuilderError> {
        let cbor_hex = hex::encode(&self.tx.tx_bytes.0);
        let tx_hash = provider.submit_tx(&cbor_hex)?;
        Ok(SubmitBuilder::new(tx_hash))
    }
}

/// A transaction that has been submitted; offers a handle to poll for
/// on-chain confirmation.
pub struct SubmitBuilder {
    tx_hash: crate::transaction::TxHash,
}

impl SubmitBuilder {
    pub fn new(tx_hash: crate::transaction::TxHash) -> Self {
        Self { tx_hash }
    }

    pub fn tx_hash(&self) -> crate::transaction::TxHash {
        self.tx_hash
    }

    pub fn await_confirmation(
        &self,
        provider: &dyn crate::provider::Provider,
        timeout_ms: u64,
    ) -> Result<bool, TxBuilderError> {
        provider.await_tx(&self.tx_hash, timeout_ms)
    }
}
