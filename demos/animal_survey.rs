// demos/animal_survey.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Generate a small animal survey and print it as an aligned table.
// Run with: cargo run --example animal-survey
// Set RUST_LOG=mockset=trace to watch per-value generation.

use std::collections::HashMap;

use mockset::{
    Column, Dataset, FnColumn, MappingColumn, PercentageDiscreteColumn, RandomDiscreteColumn,
};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 20% cats, 20% dogs, 20% whales, the rest lions
    let animal = PercentageDiscreteColumn::new(
        "animal",
        vec![
            (json!("cat"), 0.2),
            (json!("dog"), 0.2),
            (json!("whale"), 0.2),
        ],
        json!("lion"),
    )?;

    // Size depends on the animal picked for the same row
    let size = MappingColumn::new(
        "size",
        "animal",
        HashMap::from([
            (json!("whale"), json!("big")),
            (json!("lion"), json!("big")),
            (json!("dog"), json!("medium")),
            (json!("cat"), json!("small")),
        ]),
        json!("unknown"),
    );

    // Fixed seed so re-runs print the same table
    let keeper = RandomDiscreteColumn::new(
        "keeper",
        vec![json!("ana"), json!("bo"), json!("chris")],
        Some(42),
    )?;

    let id = FnColumn::new("id", |_total, row, _prev| Ok(json!(row)));

    let columns: Vec<Box<dyn Column>> = vec![
        Box::new(id),
        Box::new(animal),
        Box::new(size),
        Box::new(keeper),
    ];
    let dataset = Dataset::new(columns, 10)?;

    for line in dataset.to_table()? {
        for cell in line {
            // Strip the JSON quoting for display
            let text = match cell {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            print!("{text:<10}");
        }
        println!();
    }

    Ok(())
}
