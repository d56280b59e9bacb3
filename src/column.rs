// src/column.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column abstraction and the built-in generation strategies
//!
//! A column is a named per-row value producer. Strategies implementing
//! [`Column`] are constructed once, immutable afterwards, and stateless
//! between calls: anything that looks like cross-row memory (quota
//! tracking, seeded sampling) is recomputed from `row_number` and
//! `total_rows` on every call.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde_json::Value;

use crate::dataset::Row;
use crate::error::Error;

/// A named unit of per-row value production.
///
/// `create_value` receives the dataset's total row count, the row being
/// materialized, and the values already produced for this row by columns
/// declared earlier. The shared borrow on `previous_row_values` means a
/// column can read earlier values but never mutate them.
///
/// Implementations must be deterministic with respect to their declared
/// inputs: re-running a pass re-invokes every column for every row, and the
/// two passes are expected to agree.
pub trait Column {
    /// Name of this column; becomes the row key for its values.
    fn name(&self) -> &str;

    /// Produce this column's value for one row.
    ///
    /// Errors propagate unmodified to the caller and abort the row.
    fn create_value(
        &self,
        total_rows: usize,
        row_number: usize,
        previous_row_values: &Row,
    ) -> Result<Value, Error>;
}

/// Column backed by a fixed function.
///
/// The escape hatch for ad-hoc generators: anything callable as
/// `(total_rows, row_number, previous_row_values) -> anyhow::Result<Value>`
/// can drive a column.
///
/// # Example
/// ```rust
/// use mockset::FnColumn;
/// use serde_json::json;
///
/// let id = FnColumn::new("id", |_total, row, _prev| Ok(json!(row)));
/// ```
pub struct FnColumn<F> {
    name: String,
    generator: F,
}

impl<F> FnColumn<F>
where
    F: Fn(usize, usize, &Row) -> anyhow::Result<Value>,
{
    pub fn new(name: impl Into<String>, generator: F) -> Self {
        Self {
            name: name.into(),
            generator,
        }
    }
}

impl<F> Column for FnColumn<F>
where
    F: Fn(usize, usize, &Row) -> anyhow::Result<Value>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn create_value(
        &self,
        total_rows: usize,
        row_number: usize,
        previous_row_values: &Row,
    ) -> Result<Value, Error> {
        Ok((self.generator)(total_rows, row_number, previous_row_values)?)
    }
}

/// Column whose value is looked up from another column's current-row value.
///
/// Reads the current-row value of `source_column` and maps it through a
/// finite lookup table; an unmapped key falls back to the configured value.
/// No partial matching, no key coercion.
///
/// The source column must be declared earlier in the dataset than this one;
/// otherwise its value is absent from `previous_row_values` and the lookup
/// falls back on every row.
pub struct MappingColumn {
    name: String,
    source_column: String,
    mapping: HashMap<Value, Value>,
    fallback: Value,
}

impl MappingColumn {
    pub fn new(
        name: impl Into<String>,
        source_column: impl Into<String>,
        mapping: HashMap<Value, Value>,
        fallback: Value,
    ) -> Self {
        Self {
            name: name.into(),
            source_column: source_column.into(),
            mapping,
            fallback,
        }
    }
}

impl Column for MappingColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_value(
        &self,
        _total_rows: usize,
        _row_number: usize,
        previous_row_values: &Row,
    ) -> Result<Value, Error> {
        let mapped = previous_row_values
            .get(&self.source_column)
            .and_then(|source_value| self.mapping.get(source_value));

        match mapped {
            Some(value) => Ok(value.clone()),
            None => {
                tracing::trace!(
                    column = %self.name,
                    source = %self.source_column,
                    "no mapping entry, using fallback"
                );
                Ok(self.fallback.clone())
            }
        }
    }
}

/// Column distributing categorical values by target fractions of the rows.
///
/// Each category claims a quota, a fraction of `total_rows` in `(0, 1]`.
/// Selection is a threshold scheme, not a counting scheme: row `n` computes
/// its completion percentage `n / total_rows * 100` and takes the first
/// category (in declared order) whose cumulative quota bound still exceeds
/// it. Once every quota is satisfied the fallback value is used for the
/// rest of the dataset. Deriving the category purely from
/// `row_number`/`total_rows` keeps every call stateless and idempotent, at
/// the cost of approximating true proportional counts when quota boundaries
/// don't align with integer row divisions.
///
/// Bookkeeping happens in percent space: accumulating `0.2 + 0.2 + 0.2` as
/// raw fractions drifts one ulp above `0.6` and would misplace the row
/// that lands exactly on the boundary, while the same quotas accumulate to
/// an exact `60.0`.
///
/// Row numbering: dataset iteration numbers rows from 1, so the final row
/// is 100% complete and lands on the fallback even when quotas sum to 1.0.
/// Driving `create_value` directly with zero-based row numbers shifts the
/// curve one slot earlier.
#[derive(Debug)]
pub struct PercentageDiscreteColumn {
    name: String,
    /// Cumulative quota upper bounds in percent, in category declaration
    /// order.
    upper_bounds: Vec<(Value, f64)>,
    fallback: Value,
}

impl PercentageDiscreteColumn {
    /// Build the column, accumulating quota upper bounds in declared order.
    ///
    /// Fails if the quotas sum to more than 1.0; the category order fixes
    /// tie-break behavior, so callers pass `(category, quota)` pairs rather
    /// than an unordered map.
    pub fn new(
        name: impl Into<String>,
        category_quotas: Vec<(Value, f64)>,
        fallback: Value,
    ) -> Result<Self, Error> {
        let quota_sum: f64 = category_quotas.iter().map(|(_, quota)| quota).sum::<f64>() * 100.0;
        if quota_sum > 100.0 {
            return Err(Error::QuotaOverflow { percent: quota_sum });
        }

        let mut bound = 0.0;
        let upper_bounds = category_quotas
            .into_iter()
            .map(|(category, quota)| {
                bound += quota * 100.0;
                (category, bound)
            })
            .collect();

        Ok(Self {
            name: name.into(),
            upper_bounds,
            fallback,
        })
    }
}

impl Column for PercentageDiscreteColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_value(
        &self,
        total_rows: usize,
        row_number: usize,
        _previous_row_values: &Row,
    ) -> Result<Value, Error> {
        let progress = row_number as f64 / total_rows as f64 * 100.0;

        let incomplete = self
            .upper_bounds
            .iter()
            .find(|(_, upper_bound)| *upper_bound > progress);

        match incomplete {
            Some((category, upper_bound)) => {
                tracing::trace!(
                    column = %self.name,
                    progress,
                    upper_bound,
                    "selected category below quota bound"
                );
                Ok(category.clone())
            }
            None => Ok(self.fallback.clone()),
        }
    }
}

/// Column picking uniformly among fixed choices with a reproducible RNG.
///
/// Each call derives a Xoshiro256++ stream from `seed + row_number`, so the
/// value for a given row is a pure function of the seed and the row: the
/// same column instance produces identical values on every pass. Passing
/// `None` for the seed draws one from time + urandom at construction.
#[derive(Debug)]
pub struct RandomDiscreteColumn {
    name: String,
    choices: Vec<Value>,
    seed: u64,
}

impl RandomDiscreteColumn {
    pub fn new(
        name: impl Into<String>,
        choices: Vec<Value>,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        if choices.is_empty() {
            return Err(Error::NoChoices);
        }

        Ok(Self {
            name: name.into(),
            choices,
            seed: seed.unwrap_or_else(generate_call_entropy),
        })
    }
}

impl Column for RandomDiscreteColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_value(
        &self,
        _total_rows: usize,
        row_number: usize,
        _previous_row_values: &Row,
    ) -> Result<Value, Error> {
        // Same seed + same row number -> identical pick, pass after pass
        let row_seed = self.seed.wrapping_add(row_number as u64);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(row_seed);
        let index = rng.random_range(0..self.choices.len());
        Ok(self.choices[index].clone())
    }
}

/// Generate construction-time entropy from time + urandom
fn generate_call_entropy() -> u64 {
    let time_entropy = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let urandom_entropy: u64 = {
        let mut rng = rand::rng();
        rng.next_u64()
    };

    time_entropy.wrapping_add(urandom_entropy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn init_tracing() {
        use tracing_subscriber::{fmt, EnvFilter};
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    fn empty_row() -> Row {
        Row::new()
    }

    #[test]
    fn test_fn_column_delegates_to_generator() {
        init_tracing();
        let column = FnColumn::new("test_column", |total, row, prev| {
            Ok(json!(total + row + prev.len()))
        });

        assert_eq!(column.name(), "test_column");

        let value = column.create_value(10, 3, &empty_row()).unwrap();
        assert_eq!(value, json!(13));
    }

    #[test]
    fn test_fn_column_error_propagates() {
        let column: FnColumn<_> =
            FnColumn::new("boom", |_, _, _| anyhow::bail!("generator exploded"));

        let err = column.create_value(10, 1, &empty_row()).unwrap_err();
        assert_eq!(err.to_string(), "generator exploded");
    }

    fn animal_size_column() -> MappingColumn {
        let mapping = HashMap::from([
            (json!("Whale"), json!("Big")),
            (json!("Cat"), json!("Small")),
        ]);
        MappingColumn::new("Size", "Animal", mapping, json!("Medium"))
    }

    #[test]
    fn test_mapping_column_maps_known_value() {
        init_tracing();
        let column = animal_size_column();
        let previous = Row::from([("Animal".to_string(), json!("Whale"))]);

        let value = column.create_value(10, 3, &previous).unwrap();
        assert_eq!(value, json!("Big"));
    }

    #[test]
    fn test_mapping_column_falls_back_for_unmapped_value() {
        let column = animal_size_column();
        let previous = Row::from([("Animal".to_string(), json!("Dog"))]);

        let value = column.create_value(10, 3, &previous).unwrap();
        assert_eq!(value, json!("Medium"));
    }

    #[test]
    fn test_mapping_column_falls_back_when_source_missing() {
        let column = animal_size_column();

        // Source column not yet generated this row (wrong declaration order)
        let value = column.create_value(10, 3, &empty_row()).unwrap();
        assert_eq!(value, json!("Medium"));
    }

    fn animal_quotas() -> Vec<(Value, f64)> {
        vec![
            (json!("Cat"), 0.2),
            (json!("Dog"), 0.2),
            (json!("Whale"), 0.2),
            (json!("Lion"), 0.4),
        ]
    }

    #[test]
    fn test_percentage_column_tracks_quota_curve() {
        init_tracing();
        let column =
            PercentageDiscreteColumn::new("Animal", animal_quotas(), json!("Lion")).unwrap();

        let total_rows = 5;
        let values: Vec<Value> = (0..total_rows)
            .map(|row| column.create_value(total_rows, row, &empty_row()).unwrap())
            .collect();

        assert_eq!(
            values,
            vec![
                json!("Cat"),
                json!("Dog"),
                json!("Whale"),
                json!("Lion"),
                json!("Lion"),
            ]
        );
    }

    #[test]
    fn test_percentage_column_uses_fallback_after_quotas_filled() {
        let quotas = vec![(json!("Cat"), 0.33), (json!("Dog"), 0.33)];
        let column = PercentageDiscreteColumn::new("Animal", quotas, json!("Lion")).unwrap();

        let total_rows = 3;
        let values: Vec<Value> = (0..total_rows)
            .map(|row| column.create_value(total_rows, row, &empty_row()).unwrap())
            .collect();

        assert_eq!(values, vec![json!("Cat"), json!("Dog"), json!("Lion")]);
    }

    #[test]
    fn test_percentage_column_rejects_overcommitted_quotas() {
        let quotas = vec![
            (json!("Cat"), 0.5),
            (json!("Dog"), 0.5),
            (json!("Whale"), 0.5),
        ];
        let err = PercentageDiscreteColumn::new("Animal", quotas, json!("Lion")).unwrap_err();

        assert!(matches!(err, Error::QuotaOverflow { percent } if percent > 100.0));
    }

    #[test]
    fn test_percentage_column_accepts_quotas_summing_to_one() {
        // Exactly 1.0 is valid; only sums above 1.0 fail
        assert!(PercentageDiscreteColumn::new("Animal", animal_quotas(), json!("Lion")).is_ok());
    }

    #[test]
    fn test_random_column_is_reproducible_for_fixed_seed() {
        init_tracing();
        let choices = vec![json!("red"), json!("green"), json!("blue")];
        let column = RandomDiscreteColumn::new("color", choices.clone(), Some(42)).unwrap();

        let first_pass: Vec<Value> = (1..=20)
            .map(|row| column.create_value(20, row, &empty_row()).unwrap())
            .collect();
        let second_pass: Vec<Value> = (1..=20)
            .map(|row| column.create_value(20, row, &empty_row()).unwrap())
            .collect();

        assert_eq!(first_pass, second_pass);
        for value in &first_pass {
            assert!(choices.contains(value));
        }
    }

    #[test]
    fn test_random_column_rejects_empty_choices() {
        let err = RandomDiscreteColumn::new("color", Vec::new(), Some(42)).unwrap_err();
        assert!(matches!(err, Error::NoChoices));
    }
}
