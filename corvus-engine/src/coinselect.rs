//! Pure coin selection: picking a subset of available UTxOs that covers a
//! required asset bundle.

use crate::{
    assets::{Assets, Unit},
    transaction::{Bytes32, TxHash},
};

/// An unspent output as seen by the selector: identity plus the assets it
/// carries. Equality and deduplication are keyed on `(tx_hash, output_index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableUtxo {
    pub tx_hash: TxHash,
    pub output_index: u64,
    pub assets: Assets,
}

impl AvailableUtxo {
    pub fn new(tx_hash: impl Into<Bytes32>, output_index: u64, assets: Assets) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            output_index,
            assets,
        }
    }

    fn key(&self) -> (Bytes32, u64) {
        (self.tx_hash, self.output_index)
    }
}

/// The coin selector failed to cover `required` from the available set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("insufficient funds for unit {unit}: required {required}, have {have}, short {shortfall}")]
pub struct InsufficientFunds {
    pub unit: Unit,
    pub required: u128,
    pub have: u128,
    pub shortfall: u128,
}

/// A pluggable selection strategy: a pure function of the contract in §4.3.
pub trait CoinSelector {
    /// Selects UTxOs from `available` (already excluding anything the
    /// caller has deduplicated out) covering every unit in `required`.
    fn select(
        &self,
        available: &[AvailableUtxo],
        required: &Assets,
    ) -> Result<Vec<AvailableUtxo>, InsufficientFunds>;
}

/// Sorts by lovelace descending and walks in order, stopping as soon as the
/// accumulator covers every required unit.
pub struct LargestFirst;

impl CoinSelector for LargestFirst {
    fn select(
        &self,
        available: &[AvailableUtxo],
        required: &Assets,
    ) -> Result<Vec<AvailableUtxo>, InsufficientFunds> {
        let mut sorted: Vec<&AvailableUtxo> = available.iter().collect();
        sorted.sort_by(|a, b| b.assets.lovelace().cmp(&a.assets.lovelace()));

        let mut selected = Vec::new();
        let mut accumulated = Assets::new();

        for utxo in sorted {
            if is_satisfied(&accumulated, required) {
                break;
            }

            accumulated = accumulated.add(&utxo.assets);
            selected.push(utxo.clone());
        }

        if !is_satisfied(&accumulated, required) {
            return Err(first_shortfall(&accumulated, required));
        }

        Ok(selected)
    }
}

/// Runs an arbitrary pure function against the same contract, for callers
/// that want `random-improve`, `optimal`, or another named strategy without
/// this crate knowing its internals.
impl<F> CoinSelector for F
where
    F: Fn(&[AvailableUtxo], &Assets) -> Result<Vec<AvailableUtxo>, InsufficientFunds>,
{
    fn select(
        &self,
        available: &[AvailableUtxo],
        required: &Assets,
    ) -> Result<Vec<AvailableUtxo>, InsufficientFunds> {
        self(available, required)
    }
}

fn is_satisfied(accumulated: &Assets, required: &Assets) -> bool {
    required
        .get_units()
        .all(|unit| accumulated.get_asset(unit) >= required.get_asset(unit))
}

fn first_shortfall(accumulated: &Assets, required: &Assets) -> InsufficientFunds {
    for unit in required.get_units() {
        let have = accumulated.get_asset(unit);
        let need = required.get_asset(unit);
        if have < need {
            return InsufficientFunds {
                unit: unit.clone(),
                required: need,
                have,
                shortfall: need - have,
            };
        }
    }

    unreachable!("first_shortfall called when required is already satisfied")
}

/// Deduplicates `utxos` by `(tx_hash, output_index)`, keeping the first
/// occurrence of each key.
pub fn dedupe(utxos: Vec<AvailableUtxo>) -> Vec<AvailableUtxo> {
    let mut seen = std::collections::HashSet::new();
    utxos
        .into_iter()
        .filter(|u| seen.insert(u.key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::Hash28;

    fn utxo(hash_byte: u8, index: u64, lovelace: u64) -> AvailableUtxo {
        AvailableUtxo::new(Bytes32([hash_byte; 32]), index, Assets::from_lovelace(lovelace))
    }

    #[test]
    fn largest_first_stops_as_soon_as_satisfied() {
        let available = vec![utxo(1, 0, 2_000_000), utxo(2, 0, 5_000_000), utxo(3, 0, 1_000_000)];
        let required = Assets::from_lovelace(4_500_000);

        let selected = LargestFirst.select(&available, &required).unwrap();

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].assets.lovelace(), 5_000_000);
    }

    #[test]
    fn largest_first_keeps_adding_until_covered() {
        let available = vec![utxo(1, 0, 3_000_000), utxo(2, 0, 2_500_000)];
        let required = Assets::from_lovelace(4_500_000);

        let selected = LargestFirst.select(&available, &required).unwrap();

        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn reports_shortfall_when_nothing_covers_required() {
        let available = vec![utxo(1, 0, 1_000_000)];
        let required = Assets::from_lovelace(2_000_000);

        let err = LargestFirst.select(&available, &required).unwrap_err();

        assert_eq!(err.unit, Unit::Lovelace);
        assert_eq!(err.shortfall, 1_000_000);
    }

    #[test]
    fn dedupe_keeps_first_occurrence_by_key() {
        let utxos = vec![utxo(9, 0, 1), utxo(9, 0, 2), utxo(9, 1, 3)];
        let result = dedupe(utxos);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].assets.lovelace(), 1);
    }

    #[test]
    fn native_asset_requirement_is_honored() {
        let policy = Hash28([1; 28]);
        let unit = Unit::native(policy, vec![0xAB]);

        let available = vec![
            AvailableUtxo::new(Bytes32([1; 32]), 0, Assets::from_lovelace(2_000_000)),
            AvailableUtxo::new(
                Bytes32([2; 32]),
                0,
                Assets::from_lovelace(1_500_000).add(&Assets::from_iter([(unit.clone(), 5)])),
            ),
        ];
        let required = Assets::from_lovelace(1_000_000).add(&Assets::from_iter([(unit, 5)]));

        let selected = LargestFirst.select(&available, &required).unwrap();
        let total = selected
            .iter()
            .fold(Assets::new(), |acc, u| acc.add(&u.assets));

        assert!(total.natives_covered_by(&total));
        assert!(total.lovelace() >= required.lovelace());
    }
}
