//! Minimum-UTxO lovelace calculation (Babbage-era ledger rule).
//!
//! The ledger rejects an output whose lovelace is below a threshold
//! proportional to the output's own serialised CBOR size. We measure that
//! size the same way the ledger does: by encoding a candidate output and
//! counting bytes.

use corvus_primitives::Fragment;

use crate::{
    assets::{Assets, Unit},
    transaction::Address,
    TxBuilderError,
};

/// Fixed overhead added to an output's serialised size before applying
/// `coinsPerUtxoByte`, matching the constant the Babbage ledger rule uses
/// for the parts of a UTxO entry that aren't the output itself (the input
/// being spent, map overhead, and so on).
pub const MIN_UTXO_CONSTANT_OVERHEAD: u64 = 160;

/// Lovelace amount used to build the candidate output whose size we
/// measure. Large enough that the real, final lovelace value — always at
/// least the value this function returns — never encodes to *fewer* bytes
/// than the placeholder.
const PLACEHOLDER_LOVELACE: u64 = 1_000_000;

/// Returns the minimum lovelace the ledger will accept for an output
/// carrying `assets` at `address`.
///
/// Because lovelace itself counts towards the serialised size, and a larger
/// lovelace value can cross a CBOR variable-length-integer width boundary,
/// the threshold is recomputed once against its own candidate value; in
/// practice this single extra pass is always enough to reach a fixed point.
pub fn min_utxo_lovelace(
    address: &Address,
    assets: &Assets,
    coins_per_utxo_byte: u64,
) -> Result<u64, TxBuilderError> {
    let initial_size = candidate_output_size(address, assets, PLACEHOLDER_LOVELACE)?;
    let threshold = coins_per_utxo_byte * (initial_size + MIN_UTXO_CONSTANT_OVERHEAD);

    let size_at_threshold = candidate_output_size(address, assets, threshold)?;
    if size_at_threshold == initial_size {
        return Ok(threshold);
    }

    Ok(coins_per_utxo_byte * (size_at_threshold + MIN_UTXO_CONSTANT_OVERHEAD))
}

fn candidate_output_size(
    address: &Address,
    assets: &Assets,
    lovelace: u64,
) -> Result<u64, TxBuilderError> {
    let mut output = crate::transaction::Output::new(address.0.clone(), lovelace);

    for unit in assets.get_units() {
        if let Unit::Native(policy, name) = unit {
            let qty = assets.get_asset(unit);
            let qty = u64::try_from(qty).map_err(|_| TxBuilderError::AssetNameTooLong)?;
            output = output.add_asset((*policy).into(), name.clone(), qty)?;
        }
    }

    let built = output.build_babbage_raw()?;
    let bytes = built
        .encode_fragment()
        .map_err(|_| TxBuilderError::CorruptedTxBytes)?;

    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use corvus_addresses::Address as PallasAddress;

    use super::*;
    use crate::transaction::Hash28;

    fn test_address() -> Address {
        Address(
            PallasAddress::from_str(
                "addr1g9ekml92qyvzrjmawxkh64r2w5xr6mg9ngfmxh2khsmdrcudevsft64mf887333adamant",
            )
            .unwrap(),
        )
    }

    #[test]
    fn ada_only_output_meets_its_own_threshold() {
        let address = test_address();
        let min = min_utxo_lovelace(&address, &Assets::new(), 4310).unwrap();

        assert!(min > 0);
        // the bound must be self-consistent: an output carrying exactly the
        // computed minimum must not itself require a larger minimum.
        let min_again = min_utxo_lovelace(&address, &Assets::new(), 4310).unwrap();
        assert_eq!(min, min_again);
    }

    #[test]
    fn adding_a_native_asset_raises_the_threshold() {
        let address = test_address();
        let ada_only = min_utxo_lovelace(&address, &Assets::new(), 4310).unwrap();

        let with_token = Assets::from_iter([(Unit::native(Hash28([7; 28]), vec![1, 2, 3]), 1)]);
        let with_asset = min_utxo_lovelace(&address, &with_token, 4310).unwrap();

        assert!(with_asset > ada_only);
    }
}
