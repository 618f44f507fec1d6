use crate::utils::sample_csv_path;
use airport_explorer::dataset::{AirportDataset, AirportField};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = AirportDataset::load(sample_csv_path())?;

    // Airport type by region
    let pivot = dataset.pivot_count(AirportField::RegionCode, AirportField::AirportType);
    println!("{:>8} {:?}", "", pivot.column_values());
    for (region, counts) in pivot.rows() {
        println!("{:>8} {:?}", region.to_string(), counts);
    }

    let center = dataset.mean_coordinate()?;
    println!(
        "Map centre: {:.4}, {:.4} over {} points",
        center.latitude_deg,
        center.longitude_deg,
        dataset.all().map_points().len()
    );
    Ok(())
}
