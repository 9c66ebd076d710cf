//! Hashing utilities for the ledger objects produced by a transaction build.
//!
//! A built transaction needs the hash of several of its own pieces before it
//! can be finalized: the transaction body hash (what gets signed), script
//! hashes (what a policy ID or payment credential is derived from), and
//! datum/auxiliary-data hashes (what gets embedded back into the body). This
//! crate collects those computations behind two small traits so the engine
//! doesn't have to know the hashing convention (CBOR framing, era tag byte,
//! digest width) for each object kind.

mod hash;

pub use hash::*;

/// Computes the hash of a value from its in-memory representation.
///
/// Re-encodes `self` to CBOR and hashes the result. Two values that encode to
/// the same bytes hash the same, regardless of how they were constructed.
pub trait ComputeHash<const BYTES: usize> {
    fn compute_hash(&self) -> corvus_crypto::hash::Hash<BYTES>;
}

/// Computes the hash of a value from the exact bytes it was decoded from.
///
/// Implemented for types that retain their original CBOR encoding
/// (`KeepRaw<T>`). Preferred over [`ComputeHash`] when the bytes are
/// available, since it sidesteps any risk of a non-canonical re-encoding
/// producing a different hash than the one a peer computed from the wire.
pub trait OriginalHash<const BYTES: usize> {
    fn original_hash(&self) -> corvus_crypto::hash::Hash<BYTES>;
}
