//! Unfrack: shapes leftover change into multiple ergonomic outputs instead
//! of a single large one.

use std::collections::BTreeMap;

use crate::{
    assets::{Assets, Unit},
    minutxo::min_utxo_lovelace,
    transaction::{Address, Hash28},
    TxBuilderError,
};

/// ADA-subdivision knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct AdaOptions {
    /// Lovelace above this amount may be split across multiple outputs.
    pub subdivide_threshold: u64,
    /// Weights (out of 100) for each ADA-only output; the last absorbs the
    /// rounding remainder.
    pub subdivide_percentages: Vec<u8>,
}

impl Default for AdaOptions {
    fn default() -> Self {
        Self {
            subdivide_threshold: 100_000_000,
            subdivide_percentages: vec![50, 15, 10, 10, 5, 5, 5],
        }
    }
}

/// Token-bundling knobs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenOptions {
    /// Maximum number of distinct assets per change output. `None` means
    /// the default of 10.
    pub bundle_size: Option<usize>,
    /// Put each fungible policy (quantity > 1) in its own output.
    pub isolate_fungibles: bool,
    /// Put each NFT policy (quantity == 1) in its own output.
    pub group_nfts_by_policy: bool,
}

impl TokenOptions {
    fn bundle_size(&self) -> usize {
        self.bundle_size.unwrap_or(10)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnfrackOptions {
    pub ada: AdaOptions,
    pub tokens: TokenOptions,
}

/// A single leftover output the planner decided to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeOutput {
    pub address: Address,
    pub assets: Assets,
}

/// Splits leftover assets `leftover` into a set of change outputs covering
/// every unit exactly once, respecting `options` where affordable.
pub fn plan(
    leftover: &Assets,
    address: &Address,
    coins_per_utxo_byte: u64,
    options: &UnfrackOptions,
) -> Result<Vec<ChangeOutput>, TxBuilderError> {
    let bundles = bundle_tokens(leftover, &options.tokens);

    if bundles.is_empty() {
        return subdivide_ada_only(leftover, address, coins_per_utxo_byte, &options.ada);
    }

    let mut bundle_mins = Vec::with_capacity(bundles.len());
    let mut total_bundle_min: i128 = 0;

    for bundle in &bundles {
        let min = min_utxo_lovelace(address, bundle, coins_per_utxo_byte)? as i128;
        total_bundle_min += min;
        bundle_mins.push(min);
    }

    let remaining = leftover.lovelace() as i128 - total_bundle_min;

    if remaining < 0 {
        // bundles are unaffordable at all; caller retries with more inputs.
        return Ok(vec![ChangeOutput {
            address: address.clone(),
            assets: leftover.clone(),
        }]);
    }

    let smallest_slice = smallest_percentage_slice(remaining as u64, &options.ada.subdivide_percentages);
    let ada_only_min = min_utxo_lovelace(address, &Assets::new(), coins_per_utxo_byte)?;

    let mut outputs = Vec::new();

    if remaining as u64 >= options.ada.subdivide_threshold && smallest_slice >= ada_only_min {
        for (bundle, min) in bundles.iter().zip(bundle_mins.iter()) {
            outputs.push(ChangeOutput {
                address: address.clone(),
                assets: bundle.add(&Assets::from_lovelace(*min as u64)),
            });
        }

        outputs.extend(subdivide_lovelace(
            remaining as u64,
            address,
            &options.ada.subdivide_percentages,
        ));
    } else {
        let n = bundles.len() as i128;
        let share = remaining / n;
        let remainder = remaining % n;

        for (i, (bundle, min)) in bundles.iter().zip(bundle_mins.iter()).enumerate() {
            let extra = if i as i128 == n - 1 { share + remainder } else { share };
            outputs.push(ChangeOutput {
                address: address.clone(),
                assets: bundle.add(&Assets::from_lovelace((*min + extra) as u64)),
            });
        }
    }

    Ok(outputs)
}

fn subdivide_ada_only(
    leftover: &Assets,
    address: &Address,
    coins_per_utxo_byte: u64,
    options: &AdaOptions,
) -> Result<Vec<ChangeOutput>, TxBuilderError> {
    let lovelace = leftover.lovelace();
    let ada_only_min = min_utxo_lovelace(address, &Assets::new(), coins_per_utxo_byte)?;
    let smallest_slice = smallest_percentage_slice(lovelace, &options.subdivide_percentages);

    if lovelace >= options.subdivide_threshold && smallest_slice >= ada_only_min {
        Ok(subdivide_lovelace(lovelace, address, &options.subdivide_percentages))
    } else {
        Ok(vec![ChangeOutput {
            address: address.clone(),
            assets: Assets::from_lovelace(lovelace),
        }])
    }
}

fn smallest_percentage_slice(total: u64, percentages: &[u8]) -> u64 {
    percentages
        .iter()
        .map(|pct| total * (*pct as u64) / 100)
        .min()
        .unwrap_or(total)
}

fn subdivide_lovelace(total: u64, address: &Address, percentages: &[u8]) -> Vec<ChangeOutput> {
    let mut outputs = Vec::with_capacity(percentages.len());
    let mut allocated = 0u64;

    for (i, pct) in percentages.iter().enumerate() {
        let amount = if i == percentages.len() - 1 {
            total - allocated
        } else {
            let slice = total * (*pct as u64) / 100;
            allocated += slice;
            slice
        };

        outputs.push(ChangeOutput {
            address: address.clone(),
            assets: Assets::from_lovelace(amount),
        });
    }

    outputs
}

/// Groups the native units in `leftover` into bundles according to
/// `options`. Lovelace itself is never bundled here; it's attached once each
/// bundle's own minimum is known.
fn bundle_tokens(leftover: &Assets, options: &TokenOptions) -> Vec<Assets> {
    let mut fungible_by_policy: BTreeMap<Hash28, Vec<(Unit, u128)>> = BTreeMap::new();
    let mut nft_by_policy: BTreeMap<Hash28, Vec<(Unit, u128)>> = BTreeMap::new();

    for (unit, qty) in leftover.native_units() {
        let Some(policy) = unit.policy().copied() else {
            continue;
        };

        if qty > 1 {
            fungible_by_policy.entry(policy).or_default().push((unit.clone(), qty));
        } else {
            nft_by_policy.entry(policy).or_default().push((unit.clone(), qty));
        }
    }

    let mut bundles = Vec::new();
    let bundle_size = options.bundle_size();

    if options.isolate_fungibles {
        for (_, items) in fungible_by_policy {
            bundles.extend(chunk_into_bundles(items, bundle_size));
        }
    } else {
        let mut all: Vec<(Unit, u128)> = fungible_by_policy.into_values().flatten().collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        bundles.extend(chunk_into_bundles(all, bundle_size));
    }

    if options.group_nfts_by_policy {
        for (_, items) in nft_by_policy {
            bundles.extend(chunk_into_bundles(items, bundle_size));
        }
    } else {
        let mut all: Vec<(Unit, u128)> = nft_by_policy.into_values().flatten().collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        bundles.extend(chunk_into_bundles(all, bundle_size));
    }

    bundles
}

fn chunk_into_bundles(items: Vec<(Unit, u128)>, bundle_size: usize) -> Vec<Assets> {
    items
        .chunks(bundle_size.max(1))
        .map(|chunk| chunk.iter().cloned().collect::<Assets>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use corvus_addresses::Address as PallasAddress;

    fn test_address() -> Address {
        Address(
            PallasAddress::from_str(
                "addr1g9ekml92qyvzrjmawxkh64r2w5xr6mg9ngfmxh2khsmdrcudevsft64mf887333adamant",
            )
            .unwrap(),
        )
    }

    #[test]
    fn ada_only_subdivides_per_default_percentages() {
        let address = test_address();
        let leftover = Assets::from_lovelace(1_000_000_000 - 10_000_000);

        let outputs = plan(&leftover, &address, 4310, &UnfrackOptions::default()).unwrap();

        assert_eq!(outputs.len(), 7);
        let total: u64 = outputs.iter().map(|o| o.assets.lovelace()).sum();
        assert_eq!(total, leftover.lovelace());
        for output in &outputs {
            assert!(output.assets.lovelace() > 0);
        }
    }

    #[test]
    fn small_leftover_stays_a_single_output() {
        let address = test_address();
        let leftover = Assets::from_lovelace(2_000_000);

        let outputs = plan(&leftover, &address, 4310, &UnfrackOptions::default()).unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].assets.lovelace(), leftover.lovelace());
    }

    #[test]
    fn nft_bundles_respect_bundle_size_and_policy_grouping() {
        let address = test_address();
        let policy_a = Hash28([1; 28]);
        let policy_b = Hash28([2; 28]);

        let mut leftover = Assets::from_lovelace(1_000_000_000);
        for i in 0..12u8 {
            leftover = leftover.add(&Assets::from_iter([(Unit::native(policy_a, vec![i]), 1)]));
        }
        for i in 0..13u8 {
            leftover = leftover.add(&Assets::from_iter([(Unit::native(policy_b, vec![i]), 1)]));
        }

        let options = UnfrackOptions {
            tokens: TokenOptions {
                bundle_size: Some(10),
                group_nfts_by_policy: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let outputs = plan(&leftover, &address, 4310, &options).unwrap();

        // policy_a: 12 NFTs -> 2 bundles, policy_b: 13 NFTs -> 2 bundles
        let bundle_outputs = outputs.len();
        assert!(bundle_outputs >= 4);

        for output in &outputs {
            let policies: std::collections::BTreeSet<_> = output
                .assets
                .native_units()
                .filter_map(|(u, _)| u.policy().copied())
                .collect();
            assert!(policies.len() <= 1);
        }
    }

    #[test]
    fn asset_conservation_holds_for_every_unit() {
        let address = test_address();
        let policy = Hash28([5; 28]);
        let leftover = Assets::from_lovelace(50_000_000)
            .add(&Assets::from_iter([(Unit::native(policy, vec![1]), 4)]));

        let outputs = plan(&leftover, &address, 4310, &UnfrackOptions::default()).unwrap();

        let mut total = Assets::new();
        for output in &outputs {
            total = total.add(&output.assets);
        }

        assert_eq!(total.lovelace(), leftover.lovelace());
        for unit in leftover.get_units() {
            assert_eq!(total.get_asset(unit), leftover.get_asset(unit));
        }
    }
}
