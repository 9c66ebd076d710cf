mod assets;
mod babbage;
mod builder;
mod coinselect;
mod fee;
mod minutxo;
mod phases;
pub mod provider;
mod scriptdata;
mod transaction;
mod unfrack;

pub use assets::{Assets, AssetsUnderflow, Unit};
pub use babbage::BuildBabbage;
pub use builder::{SignBuilder, SubmitBuilder};
pub use coinselect::{AvailableUtxo, CoinSelector, InsufficientFunds, LargestFirst};
pub use fee::{calculate_fee, LinearFeeParams};
pub use minutxo::min_utxo_lovelace;
pub use phases::{build, BuildContext, BuildOptions, OnInsufficientChange};
pub use provider::{Delegation, LocalWallet, ProtocolParameters, Provider, Wallet};
pub use transaction::model::{
    BuiltTransaction, ExUnits, Input, Output, ScriptKind, StagingTransaction,
};
pub use unfrack::{AdaOptions, ChangeOutput, TokenOptions, UnfrackOptions};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TxBuilderError {
    /// Provided bytes could not be decoded into a script
    #[error("Transaction has no inputs")]
    MalformedScript,
    /// Provided bytes could not be decoded into a datum
    #[error("Could not decode datum bytes")]
    MalformedDatum,
    /// Provided datum hash was not 32 bytes in length
    #[error("Invalid bytes length for datum hash")]
    MalformedDatumHash,
    /// Input, policy, etc pointed to by a redeemer was not found in the
    /// transaction
    #[error("Input/policy pointed to by redeemer not found in tx")]
    RedeemerTargetMissing,
    /// Provided network ID is invalid (must be 0 or 1)
    #[error("Invalid network ID")]
    InvalidNetworkId,
    /// Transaction bytes in built transaction object could not be decoded
    #[error("Corrupted transaction bytes in built transaction")]
    CorruptedTxBytes,
    /// Public key generated from private key was of unexpected length
    #[error("Public key for private key is malformed")]
    MalformedKey,
    /// Asset name is too long, it must be 32 bytes or less
    #[error("Asset name must be 32 bytes or less")]
    AssetNameTooLong,
    /// Coin selection could not cover the required lovelace from the
    /// available UTxO set.
    #[error(transparent)]
    InsufficientFunds(#[from] InsufficientFunds),
    /// The available UTxO set does not carry enough of a specific native
    /// asset to cover what the explicit outputs spend, distinct from a
    /// plain lovelace shortfall.
    #[error("insufficient native assets to build change: {0}")]
    InsufficientFundsForAssets(InsufficientFunds),
    /// The caller asked to drain excess lovelace into an output index that
    /// does not exist on the transaction being built.
    #[error("drain-to output index {0} does not exist on this transaction")]
    InvalidDrainIndex(usize),
    /// The fee calculation did not settle on a fixed point within the
    /// iteration bound.
    #[error("fee calculation did not converge")]
    FeeFixpointDiverged,
    /// The build loop exhausted its reselection attempts without producing
    /// a balanced transaction.
    #[error("could not balance transaction after {0} reselection attempts")]
    BuildAttemptsExhausted(u32),
    /// A connected wallet refused or failed to sign the transaction.
    #[error("wallet failed to sign transaction: {0}")]
    WalletSigningFailed(String),
    /// A chain provider returned an error unrelated to the transaction's
    /// validity (network failure, timeout, rate limit).
    #[error("provider request failed: {0}")]
    ProviderError(String),
    /// A chain provider rejected the transaction itself (phase-2 script
    /// failure, ledger rule violation after submission).
    #[error("transaction rejected by provider: {0}")]
    ProviderRejected(String),
    /// An invariant this crate is responsible for maintaining was violated;
    /// indicates a bug in the builder rather than bad input.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}

impl From<AssetsUnderflow> for TxBuilderError {
    fn from(err: AssetsUnderflow) -> Self {
        TxBuilderError::InternalInvariantViolated(err.to_string())
    }
}
