use airport_explorer::dataset::{AirportDataset, AirportField};

#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _profiler = dhat::Profiler::new_heap();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/airports_synthetic.csv".to_string());
    let dataset = AirportDataset::load(&path)?;

    // Run the heaviest dashboard query
    let pivot = dataset.pivot_count(AirportField::RegionCode, AirportField::AirportType);

    println!(
        "Loaded {} rows, pivot total {}. See dhat-heap.json for details",
        dataset.row_count(),
        pivot.total()
    );
    Ok(())
}
