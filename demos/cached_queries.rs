use std::time::Instant;

use crate::utils::sample_csv_path;
use airport_explorer::dataset::AirportDataset;
use airport_explorer::dataset::query_builder::QueryCache;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = AirportDataset::load(sample_csv_path())?;
    let cache = QueryCache::new();

    // First run (filters evaluated)
    let start = Instant::now();
    let result = dataset
        .query_with_cache(&cache)
        .region("US-CT")
        .scheduled_only()
        .execute();
    println!("First run: {} rows, elapsed: {:?}", result.len(), start.elapsed());

    // Second run (should be cached)
    let start = Instant::now();
    let cached = dataset
        .query_with_cache(&cache)
        .region("US-CT")
        .scheduled_only()
        .execute();
    println!("Cached run: {} rows, elapsed: {:?}", cached.len(), start.elapsed());

    Ok(())
}
