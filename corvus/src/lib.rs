//! Rust-native transaction construction engine for the Cardano blockchain.
//!
//! Corvus builds, balances and signs Cardano transactions. This crate is a
//! facade: it doesn't implement anything itself, it re-exports the
//! sub-crates that do, so a consumer only needs one dependency.

#![warn(missing_docs)]

pub mod ledger {
    //! Ledger primitives, cbor codec and hashing utilities for the Cardano eras

    #[doc(inline)]
    pub use corvus_primitives as primitives;

    #[doc(inline)]
    pub use corvus_traverse as traverse;

    #[doc(inline)]
    pub use corvus_addresses as addresses;
}

#[doc(inline)]
pub use corvus_crypto as crypto;

#[doc(inline)]
pub use corvus_codec as codec;

pub mod wallet {
    //! Key derivation and transaction construction.

    #[doc(inline)]
    pub use corvus_wallet as keystore;

    #[doc(inline)]
    pub use corvus_engine as builder;
}
