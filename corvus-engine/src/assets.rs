//! Unit-keyed, non-negative asset quantities carried by UTxOs and outputs.
//!
//! A unit is either the literal `"lovelace"` or a policy id paired with an
//! asset name of up to 32 bytes. Zero quantities are equivalent to absence:
//! every operation that could leave a zero entry behind removes it instead.

use std::collections::BTreeMap;
use std::fmt;

use crate::transaction::Hash28;

pub const LOVELACE: &str = "lovelace";

/// A single asset class: either the native currency, or a policy/name pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Lovelace,
    Native(Hash28, Vec<u8>),
}

impl Unit {
    pub fn native(policy: Hash28, name: Vec<u8>) -> Self {
        Unit::Native(policy, name)
    }

    pub fn is_lovelace(&self) -> bool {
        matches!(self, Unit::Lovelace)
    }

    pub fn policy(&self) -> Option<&Hash28> {
        match self {
            Unit::Lovelace => None,
            Unit::Native(policy, _) => Some(policy),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Lovelace => write!(f, "{LOVELACE}"),
            Unit::Native(policy, name) => {
                write!(f, "{}{}", hex::encode(policy.0), hex::encode(name))
            }
        }
    }
}

/// Failure of a partial [`Assets`] operation: a unit would go negative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unit {unit} would go negative: have {have}, subtracting {subtracting}")]
pub struct AssetsUnderflow {
    pub unit: Unit,
    pub have: u128,
    pub subtracting: u128,
}

/// A non-negative multiset of [`Unit`] quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets(BTreeMap<Unit, u128>);

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lovelace(amount: u64) -> Self {
        let mut assets = Self::new();
        assets.insert(Unit::Lovelace, amount as u128);
        assets
    }

    fn insert(&mut self, unit: Unit, amount: u128) {
        if amount == 0 {
            self.0.remove(&unit);
        } else {
            self.0.insert(unit, amount);
        }
    }

    pub fn lovelace(&self) -> u64 {
        self.get_asset(&Unit::Lovelace) as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_units(&self) -> impl Iterator<Item = &Unit> {
        self.0.keys()
    }

    pub fn get_asset(&self, unit: &Unit) -> u128 {
        self.0.get(unit).copied().unwrap_or_default()
    }

    /// A copy of this bundle containing only the units `predicate` accepts.
    pub fn filter(&self, mut predicate: impl FnMut(&Unit, u128) -> bool) -> Assets {
        Assets(
            self.0
                .iter()
                .filter(|(u, q)| predicate(u, **q))
                .map(|(u, q)| (u.clone(), *q))
                .collect(),
        )
    }

    /// Every unit that isn't lovelace.
    pub fn native_units(&self) -> impl Iterator<Item = (&Unit, u128)> {
        self.0.iter().filter(|(u, _)| !u.is_lovelace()).map(|(u, q)| (u, *q))
    }

    /// Elementwise sum. Never fails: the result space is unbounded above.
    pub fn add(&self, other: &Assets) -> Assets {
        let mut out = self.clone();
        for (unit, qty) in other.0.iter() {
            let entry = out.0.entry(unit.clone()).or_insert(0);
            *entry += qty;
        }
        out
    }

    /// Elementwise difference. Fails on the first unit that would go
    /// negative. Callers that expect lovelace to go transiently negative
    /// (fee and change bookkeeping in the phase state machine) should
    /// compare `lovelace()` as a signed quantity directly rather than call
    /// this.
    pub fn subtract(&self, other: &Assets) -> Result<Assets, AssetsUnderflow> {
        let mut out = self.clone();
        for (unit, qty) in other.0.iter() {
            let have = out.get_asset(unit);
            let Some(remainder) = have.checked_sub(*qty) else {
                return Err(AssetsUnderflow {
                    unit: unit.clone(),
                    have,
                    subtracting: *qty,
                });
            };
            out.insert(unit.clone(), remainder);
        }
        Ok(out)
    }

    /// True if every native unit present in `self` is covered (`>=`) by
    /// `other`. Used by the coin selector's satisfaction check, which treats
    /// lovelace separately.
    pub fn natives_covered_by(&self, other: &Assets) -> bool {
        self.native_units().all(|(u, q)| other.get_asset(u) >= q)
    }
}

impl FromIterator<(Unit, u128)> for Assets {
    fn from_iter<T: IntoIterator<Item = (Unit, u128)>>(iter: T) -> Self {
        let mut out = Assets::new();
        for (unit, qty) in iter {
            out.insert(unit, qty);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(byte: u8) -> Hash28 {
        Hash28([byte; 28])
    }

    #[test]
    fn zero_quantities_are_absent() {
        let mut assets = Assets::from_lovelace(0);
        assets.insert(Unit::native(policy(1), vec![1]), 0);

        assert!(assets.is_empty());
    }

    #[test]
    fn add_is_commutative_on_overlapping_units() {
        let a = Assets::from_lovelace(10).add(&Assets::from_iter([(
            Unit::native(policy(1), vec![0xAA]),
            5,
        )]));
        let b = Assets::from_iter([(Unit::native(policy(1), vec![0xAA]), 5)])
            .add(&Assets::from_lovelace(10));

        assert_eq!(a, b);
        assert_eq!(a.lovelace(), 10);
        assert_eq!(a.get_asset(&Unit::native(policy(1), vec![0xAA])), 5);
    }

    #[test]
    fn subtract_fails_on_native_underflow() {
        let have = Assets::from_iter([(Unit::native(policy(1), vec![0]), 3)]);
        let want = Assets::from_iter([(Unit::native(policy(1), vec![0]), 4)]);

        assert!(have.subtract(&want).is_err());
    }

    #[test]
    fn subtract_allows_exact_depletion() {
        let have = Assets::from_lovelace(100);
        let want = Assets::from_lovelace(100);

        let left = have.subtract(&want).unwrap();
        assert!(left.is_empty());
    }

    #[test]
    fn natives_covered_by_ignores_lovelace() {
        let required = Assets::from_lovelace(1_000_000)
            .add(&Assets::from_iter([(Unit::native(policy(9), vec![1]), 2)]));
        let available = Assets::from_lovelace(1).add(&Assets::from_iter([(
            Unit::native(policy(9), vec![1]),
            2,
        )]));

        assert!(required.natives_covered_by(&available));
    }
}
