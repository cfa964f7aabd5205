//! Constraint strengths.
//!
//! A strength packs three preference tiers (strong, medium, weak) into a single
//! scalar so that any amount of a higher tier outweighs the largest amount of a
//! lower tier. Each tier's weighted value is clipped to `[0, 1000]`.

use std::fmt;

/// Strength of a constraint, in `[0, REQUIRED]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(f64);

impl Strength {
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);
    pub const STRONG: Strength = Strength(1_000_000.0);
    pub const MEDIUM: Strength = Strength(1_000.0);
    pub const WEAK: Strength = Strength(1.0);

    /// Create a strength from its strong, medium and weak tiers.
    pub fn create(strong: f64, medium: f64, weak: f64) -> Self {
        Self::create_weighted(strong, medium, weak, 1.0)
    }

    /// Create a strength from its tiers, each scaled by `weight` before clipping.
    pub fn create_weighted(strong: f64, medium: f64, weak: f64, weight: f64) -> Self {
        let tier = |value: f64| (value * weight).clamp(0.0, 1000.0);
        Self(tier(strong) * 1_000_000.0 + tier(medium) * 1_000.0 + tier(weak))
    }

    /// Create a strength from a raw value, clipped into `[0, REQUIRED]`.
    pub fn new(value: f64) -> Self {
        Self(value).clip()
    }

    /// Bound this strength into `[0, REQUIRED]`.
    pub fn clip(self) -> Self {
        Self(self.0.clamp(0.0, Self::REQUIRED.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Check if this is a required strength.
    pub fn is_required(&self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self::REQUIRED
    }
}

impl From<f64> for Strength {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::REQUIRED {
            write!(f, "required")
        } else if *self == Self::STRONG {
            write!(f, "strong")
        } else if *self == Self::MEDIUM {
            write!(f, "medium")
        } else if *self == Self::WEAK {
            write!(f, "weak")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_named_strengths_match_tiers() {
        assert_eq!(Strength::create(1000.0, 1000.0, 1000.0), Strength::REQUIRED);
        assert_eq!(Strength::create(1.0, 0.0, 0.0), Strength::STRONG);
        assert_eq!(Strength::create(0.0, 1.0, 0.0), Strength::MEDIUM);
        assert_eq!(Strength::create(0.0, 0.0, 1.0), Strength::WEAK);
    }

    #[test]
    fn test_tiers_are_clipped() {
        let s = Strength::create(5000.0, -3.0, 2.0);
        assert_eq!(s.value(), 1000.0 * 1_000_000.0 + 2.0);
    }

    #[test]
    fn test_weight_scales_before_clipping() {
        let s = Strength::create_weighted(0.0, 2.0, 600.0, 2.0);
        assert_eq!(s.value(), 4.0 * 1_000.0 + 1000.0);
    }

    #[test]
    fn test_clip() {
        assert_eq!(Strength::new(-5.0).value(), 0.0);
        assert_eq!(Strength::new(1e12), Strength::REQUIRED);
        assert!(Strength::new(1e12).is_required());
        assert!(!Strength::STRONG.is_required());
    }

    #[test]
    fn test_ordering() {
        assert!(Strength::WEAK < Strength::MEDIUM);
        assert!(Strength::MEDIUM < Strength::STRONG);
        assert!(Strength::STRONG < Strength::REQUIRED);
        assert!(Strength::create(0.0, 1000.0, 1000.0) < Strength::STRONG);
    }

    proptest! {
        #[test]
        fn test_create_weighted_stays_in_range(
            strong in -1.0e4f64..1.0e4,
            medium in -1.0e4f64..1.0e4,
            weak in -1.0e4f64..1.0e4,
            weight in -10.0f64..10.0,
        ) {
            let s = Strength::create_weighted(strong, medium, weak, weight);
            prop_assert!(s.value() >= 0.0);
            prop_assert!(s.value() <= Strength::REQUIRED.value());
            prop_assert_eq!(s.clip(), s);
        }

        #[test]
        fn test_unsaturated_medium_stays_below_strong(medium in 0.0f64..1000.0) {
            prop_assert!(Strength::create(0.0, medium, 0.0) < Strength::STRONG);
        }
    }
}
