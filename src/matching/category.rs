//! Confidence categorization.

use std::fmt;

use serde::Serialize;

use crate::matching::error::EngineError;
use crate::matching::types::Category;

pub const DEFAULT_HIGH_CONFIDENCE: u8 = 70;
pub const DEFAULT_MEDIUM_CONFIDENCE: u8 = 40;

/// Validated confidence thresholds with `high > medium`, both in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    high: u8,
    medium: u8,
}

impl Thresholds {
    /// Create thresholds, validating their range and ordering.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidThresholds` if either value is outside `1..=100`
    /// or if `high` is not greater than `medium`.
    pub const fn new(high: u8, medium: u8) -> Result<Self, EngineError> {
        if high < 1 || high > 100 || medium < 1 || medium > 100 || high <= medium {
            return Err(EngineError::InvalidThresholds { high, medium });
        }
        Ok(Self { high, medium })
    }

    #[must_use]
    pub const fn high(&self) -> u8 {
        self.high
    }

    #[must_use]
    pub const fn medium(&self) -> u8 {
        self.medium
    }

    /// Bucket a confidence score.
    #[must_use]
    pub const fn categorize(&self, confidence: u8) -> Category {
        if confidence >= self.high {
            Category::High
        } else if confidence >= self.medium {
            Category::Medium
        } else {
            Category::Low
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_CONFIDENCE,
            medium: DEFAULT_MEDIUM_CONFIDENCE,
        }
    }
}

impl fmt::Display for Thresholds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HIGH >= {}, MEDIUM >= {}", self.high, self.medium)
    }
}

/// Bucket a confidence score using the given thresholds.
#[must_use]
pub const fn categorize(confidence: u8, thresholds: &Thresholds) -> Category {
    thresholds.categorize(confidence)
}

#[cfg(test)]
mod category_tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.high(), 70);
        assert_eq!(thresholds.medium(), 40);
    }

    #[test]
    fn boundaries_are_inclusive() {
        let thresholds = Thresholds::new(70, 40).unwrap();
        assert_eq!(categorize(100, &thresholds), Category::High);
        assert_eq!(categorize(70, &thresholds), Category::High);
        assert_eq!(categorize(69, &thresholds), Category::Medium);
        assert_eq!(categorize(40, &thresholds), Category::Medium);
        assert_eq!(categorize(39, &thresholds), Category::Low);
        assert_eq!(categorize(0, &thresholds), Category::Low);
    }

    #[test]
    fn rejects_invalid_thresholds() {
        assert!(Thresholds::new(40, 70).is_err());
        assert!(Thresholds::new(50, 50).is_err());
        assert!(Thresholds::new(101, 40).is_err());
        assert!(Thresholds::new(70, 0).is_err());
        assert!(Thresholds::new(2, 1).is_ok());
        assert!(Thresholds::new(100, 99).is_ok());
    }

    #[test]
    fn partitions_range_into_three_contiguous_buckets() {
        for high in 2..=100_u8 {
            for medium in 1..high {
                let thresholds = Thresholds::new(high, medium).unwrap();
                let categories: Vec<Category> = (0..=100_u8).map(|c| thresholds.categorize(c)).collect();

                // Categories only ever step down from High to Medium to Low as confidence decreases
                let mut previous = Category::Low;
                for category in &categories {
                    assert!(*category <= previous, "non-contiguous buckets for {high}/{medium}");
                    previous = *category;
                }
                assert_eq!(categories.iter().filter(|c| **c == Category::Low).count(), usize::from(medium));
                assert_eq!(
                    categories.iter().filter(|c| **c == Category::Medium).count(),
                    usize::from(high - medium)
                );
                assert_eq!(
                    categories.iter().filter(|c| **c == Category::High).count(),
                    101 - usize::from(high)
                );
            }
        }
    }
}
