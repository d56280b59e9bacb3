// src/lib.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic mock dataset generation with dependent and quota-driven columns
//!
//! This library provides:
//! - A pluggable per-row value producer (the [`Column`] trait) with later
//!   columns able to read values already generated for the current row
//! - Quota-driven categorical distribution ([`PercentageDiscreteColumn`])
//! - Dependent-column lookup ([`MappingColumn`])
//! - Seeded, reproducible uniform sampling ([`RandomDiscreteColumn`])
//! - A lazy, restartable row sequence and a header-plus-rows table view
//!   ([`Dataset`])
//!
//! # Example
//! ```rust
//! use mockset::{Column, Dataset, MappingColumn, PercentageDiscreteColumn};
//! use serde_json::json;
//! use std::collections::HashMap;
//!
//! let animal = PercentageDiscreteColumn::new(
//!     "Animal",
//!     vec![(json!("Cat"), 0.4), (json!("Whale"), 0.4)],
//!     json!("Dog"),
//! )?;
//! let size = MappingColumn::new(
//!     "Size",
//!     "Animal",
//!     HashMap::from([(json!("Whale"), json!("Big")), (json!("Cat"), json!("Small"))]),
//!     json!("Medium"),
//! );
//!
//! let columns: Vec<Box<dyn Column>> = vec![Box::new(animal), Box::new(size)];
//! let dataset = Dataset::new(columns, 10)?;
//!
//! for row in dataset.rows() {
//!     let row = row?;
//!     println!("{} is {}", row["Animal"], row["Size"]);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

// Core modules
pub mod column;
pub mod dataset;
pub mod error;

// Re-export main API
pub use column::{
    Column, FnColumn, MappingColumn, PercentageDiscreteColumn, RandomDiscreteColumn,
};
pub use dataset::{Dataset, Row, Rows};
pub use error::Error;
