pub type Error = Box<dyn std::error::Error>;

use corvus_codec::minicbor::{decode, to_vec, Decode, Encode};

pub trait Fragment<'a>
where
    Self: Sized,
{
    fn encode_fragment(&self) -> Result<Vec<u8>, Error>;
    fn decode_fragment(bytes: &'a [u8]) -> Result<Self, Error>;
}

impl<'a, T> Fragment<'a> for T
where
    T: Encode<()> + Decode<'a, ()> + Sized,
{
    fn encode_fragment(&self) -> Result<Vec<u8>, Error> {
        to_vec(self).map_err(|e| e.into())
    }

    fn decode_fragment(bytes: &'a [u8]) -> Result<Self, Error> {
        decode(bytes).map_err(|e| e.into())
    }
}

#[cfg(feature = "json")]
pub trait ToCanonicalJson {
    fn to_json(&self) -> serde_json::Value;
}

/// Era-specific hash of a ledger entity, computed directly from its own
/// fields rather than through a shared traversal (see `corvus_traverse::ComputeHash`
/// for the cross-era equivalent).
pub trait ToHash<const BYTES: usize> {
    fn to_hash(&self) -> corvus_crypto::hash::Hash<BYTES>;
}
