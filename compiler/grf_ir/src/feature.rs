//! Target features and the feature bitmask.
//!
//! A feature selects which variables exist and which action records a layout
//! produces. The set of features a layout is generated for is only known
//! after registration, which is why layout contents stay unreduced until then.

use std::fmt;

/// A target feature number.
///
/// Only values below 64 are representable so every feature fits in a
/// `FeatureSet` bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Feature(u8);

impl Feature {
    /// Feature value never targeted by layout action generation.
    pub const RESERVED: Feature = Feature(0x04);

    /// Largest representable feature number.
    pub const MAX: u8 = 63;

    /// Create a feature, or `None` if `value` exceeds [`Feature::MAX`].
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Feature(value))
        } else {
            None
        }
    }

    #[inline]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_reserved(self) -> bool {
        self == Self::RESERVED
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

/// Bitmask of features, iterated in ascending numeric order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FeatureSet(u64);

impl FeatureSet {
    pub const EMPTY: FeatureSet = FeatureSet(0);

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        FeatureSet(bits)
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, feature: Feature) {
        self.0 |= 1u64 << feature.value();
    }

    #[inline]
    #[must_use]
    pub fn with(mut self, feature: Feature) -> Self {
        self.insert(feature);
        self
    }

    #[inline]
    pub fn contains(self, feature: Feature) -> bool {
        self.0 & (1u64 << feature.value()) != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Features in ascending numeric order.
    pub fn iter(self) -> impl Iterator<Item = Feature> {
        (0..=Feature::MAX)
            .filter(move |bit| self.0 & (1u64 << bit) != 0)
            .map(Feature)
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        let mut set = FeatureSet::EMPTY;
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(value: u8) -> Feature {
        Feature::new(value).unwrap_or(Feature::RESERVED)
    }

    #[test]
    fn iterates_ascending_regardless_of_insertion_order() {
        let set: FeatureSet = [feature(0x09), feature(0x00), feature(0x07)].into_iter().collect();
        let order: Vec<u8> = set.iter().map(Feature::value).collect();
        assert_eq!(order, vec![0x00, 0x07, 0x09]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn rejects_out_of_range_feature() {
        assert!(Feature::new(64).is_none());
        assert!(Feature::new(63).is_some());
    }

    #[test]
    fn contains_and_display() {
        let set = FeatureSet::EMPTY.with(Feature::RESERVED);
        assert!(set.contains(Feature::RESERVED));
        assert!(!set.contains(feature(0x05)));
        assert_eq!(Feature::RESERVED.to_string(), "0x04");
        assert!(FeatureSet::EMPTY.is_empty());
    }
}
