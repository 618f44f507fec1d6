use crate::utils::sample_csv_path;
use airport_explorer::dataset::{AirportDataset, AirportField};
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = AirportDataset::load(sample_csv_path())?;

    // Region, then a city inside it, then scheduled service only
    let region = "US-MA";
    let in_region = dataset.filter_by_region(region);
    println!("Airports in {}: {}", region, in_region.len());

    let cities = in_region.distinct_sorted(AirportField::Municipality);
    println!("Cities: {:?}", cities);

    let scheduled = in_region.filter_scheduled_service();
    for airport in scheduled.records() {
        println!("  {} ({}) {}", airport.name, airport.airport_type, airport.scheduled_service);
    }

    let city = in_region.filter_by_region_and_city(region, "Boston");
    if city.is_empty() {
        println!("No airports found in this city.");
    } else {
        for airport in city.records() {
            println!("  {} {:?}", airport.name, airport.elevation_ft);
        }
    }
    Ok(())
}
