use crate::utils::sample_csv_path;
use airport_explorer::dataset::{AirportDataset, AirportField, DEFAULT_TOP_N, SortDirection};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = AirportDataset::load(sample_csv_path())?;

    let default_region = dataset.region_summary(None);
    let massachusetts = dataset.region_summary(Some("US-MA"));
    println!("Default region: {:?}", default_region);
    println!("US-MA: {:?}", massachusetts);

    for share in dataset.all().share_by(AirportField::RegionCode) {
        println!("{} => {} ({:.1}%)", share.value, share.count, share.percent);
    }

    println!("Top {} by elevation:", DEFAULT_TOP_N);
    for airport in dataset.top_n_by(AirportField::ElevationFt, DEFAULT_TOP_N, SortDirection::Descending) {
        println!("  {:<45} {:?}", airport.name, airport.elevation_ft);
    }
    Ok(())
}
