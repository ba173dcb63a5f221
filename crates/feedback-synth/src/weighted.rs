//! Weighted random selection over an ordered option table.
//!
//! Every categorical decision with non-uniform odds (patch version, source
//! platform) goes through [`WeightedTable`]. The walk order is part of the
//! contract: on a boundary draw the earlier option wins, which keeps seeded
//! runs reproducible.

use rand::Rng;

use crate::error::ConfigError;

/// Allowed drift between the weight sum and one.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// An ordered collection of options with selection weights summing to one.
///
/// # Example
///
/// ```
/// use feedback_synth::WeightedTable;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let table = WeightedTable::new("coin", vec![("heads", 0.5), ("tails", 0.5)])
///     .expect("weights sum to one");
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
///
/// let side = table.choose(&mut rng);
/// assert!(*side == "heads" || *side == "tails");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    leading: Vec<(T, f64)>,
    last: (T, f64),
}

impl<T> WeightedTable<T> {
    /// Builds a table after validating its weights.
    ///
    /// `table` names the table in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - No options are supplied
    /// - Any weight is not finite or lies outside (0, 1]
    /// - The weights do not sum to one within a small tolerance
    #[expect(clippy::float_arithmetic, reason = "weights are summed to validate the table")]
    pub fn new(table: &'static str, mut options: Vec<(T, f64)>) -> Result<Self, ConfigError> {
        for (index, (_, weight)) in options.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 || *weight > 1.0 {
                return Err(ConfigError::WeightOutOfRange {
                    table,
                    index,
                    weight: *weight,
                });
            }
        }

        let sum: f64 = options.iter().map(|(_, weight)| weight).sum();
        let Some(last) = options.pop() else {
            return Err(ConfigError::EmptyWeights { table });
        };
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightsDoNotSumToOne { table, sum });
        }

        Ok(Self {
            leading: options,
            last,
        })
    }

    /// Returns the ordered `(value, weight)` pairs.
    pub fn options(&self) -> impl Iterator<Item = &(T, f64)> {
        self.leading.iter().chain(std::iter::once(&self.last))
    }

    /// Selects one value using a single uniform draw from `rng`.
    ///
    /// Walks the options in order, accumulating weight, and returns the first
    /// value whose cumulative weight reaches the draw. Should rounding leave
    /// the draw above the final sum, the last option is returned.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let draw: f64 = rng.random();
        self.select(draw)
    }

    /// Resolves a draw in `[0, 1)` to an option.
    #[expect(clippy::float_arithmetic, reason = "cumulative weights are float sums")]
    fn select(&self, draw: f64) -> &T {
        let mut cumulative = 0.0;
        for (value, weight) in &self.leading {
            cumulative += weight;
            if cumulative >= draw {
                return value;
            }
        }
        &self.last.0
    }
}
