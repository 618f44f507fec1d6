use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

const REGIONS: [&str; 6] = ["US-CT", "US-MA", "US-ME", "US-NH", "US-RI", "US-VT"];
const TYPES: [&str; 5] = [
    "small_airport",
    "medium_airport",
    "large_airport",
    "heliport",
    "seaplane_base",
];
const TOWNS: [&str; 8] = [
    "Springfield",
    "Franklin",
    "Salem",
    "Bristol",
    "Clinton",
    "Georgetown",
    "Madison",
    "Milford",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "data/airports_synthetic.csv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse()?,
        None => 100_000,
    };

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,iso_country,iso_region,municipality,scheduled_service"
    )?;

    let mut rng = rand::rng();
    for i in 0..rows {
        let region = REGIONS[rng.random_range(0..REGIONS.len())];
        let kind = TYPES[rng.random_range(0..TYPES.len())];
        let town = TOWNS[rng.random_range(0..TOWNS.len())];
        let scheduled = if kind == "large_airport" || rng.random_bool(0.05) {
            "yes"
        } else {
            "no"
        };

        // About 1% of rows lack coordinates, like the real export
        let (lat, lon) = if rng.random_bool(0.01) {
            (String::new(), String::new())
        } else {
            (
                format!("{:.6}", rng.random_range(41.0..47.5)),
                format!("{:.6}", rng.random_range(-73.7..-66.9)),
            )
        };
        let elevation = if rng.random_bool(0.03) {
            String::new()
        } else {
            rng.random_range(0..3500).to_string()
        };

        writeln!(
            writer,
            "{},X{:05},{},{} {} Field,{},{},{},US,{},{},{}",
            i, i, kind, town, i, lat, lon, elevation, region, town, scheduled
        )?;
    }
    writer.flush()?;

    println!("Sample CSV generated: {} ({} rows)", path, rows);
    Ok(())
}
