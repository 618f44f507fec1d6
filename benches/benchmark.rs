use airport_explorer::dataset::query_builder::QueryCache;
use airport_explorer::dataset::{AirportDataset, AirportField, RawAirport, SortDirection};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::Rng;
use std::hint::black_box;
use std::io::Write;
use tempfile::NamedTempFile;

const ROWS: usize = 50_000;
const REGIONS: [&str; 6] = ["US-CT", "US-MA", "US-ME", "US-NH", "US-RI", "US-VT"];
const TYPES: [&str; 4] = ["small_airport", "medium_airport", "large_airport", "heliport"];

fn synthetic_rows(n: usize) -> Vec<RawAirport> {
    let mut rng = rand::rng();
    (0..n)
        .map(|i| RawAirport {
            name: format!("Airport {}", i),
            municipality: Some(format!("Town {}", rng.random_range(0..200))),
            region_code: REGIONS[rng.random_range(0..REGIONS.len())].to_string(),
            airport_type: TYPES[rng.random_range(0..TYPES.len())].to_string(),
            scheduled_service: Some(if rng.random_bool(0.1) { "yes" } else { "no" }.to_string()),
            elevation_ft: Some(rng.random_range(0.0..3500.0)),
            latitude_deg: Some(rng.random_range(41.0..47.5)),
            longitude_deg: Some(rng.random_range(-73.7..-66.9)),
        })
        .collect()
}

fn synthetic_csv(rows: &[RawAirport]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    writeln!(
        tmp,
        "name,municipality,iso_region,type,scheduled_service,elevation_ft,latitude_deg,longitude_deg"
    )
    .unwrap();
    for r in rows {
        writeln!(
            tmp,
            "{},{},{},{},{},{},{},{}",
            r.name,
            r.municipality.as_deref().unwrap_or(""),
            r.region_code,
            r.airport_type,
            r.scheduled_service.as_deref().unwrap_or(""),
            r.elevation_ft.unwrap_or_default(),
            r.latitude_deg.unwrap_or_default(),
            r.longitude_deg.unwrap_or_default()
        )
        .unwrap();
    }
    tmp
}

fn dashboard_queries(c: &mut Criterion) {
    let rows = synthetic_rows(ROWS);
    let csv = synthetic_csv(&rows);

    let mut group = c.benchmark_group("AirportDataset");
    group.sample_size(20);
    group.throughput(Throughput::Elements(ROWS as u64));

    group.bench_function("load_csv", |b| {
        b.iter(|| AirportDataset::load(csv.path()).unwrap())
    });

    let dataset = AirportDataset::from_rows(rows);

    group.bench_function("region_city_scheduled", |b| {
        b.iter(|| {
            dataset
                .filter_by_region_and_city(black_box("US-MA"), black_box("Town 7"))
                .filter_scheduled_service()
                .len()
        })
    });

    group.bench_function("region_scheduled_cached", |b| {
        let cache = QueryCache::new();
        b.iter(|| {
            dataset
                .query_with_cache(&cache)
                .region(black_box("US-MA"))
                .scheduled_only()
                .execute()
                .len()
        })
    });

    group.bench_function("top_10_elevation", |b| {
        b.iter(|| dataset.top_n_by(AirportField::ElevationFt, 10, SortDirection::Descending))
    });

    group.bench_function("pivot_region_type", |b| {
        b.iter(|| dataset.pivot_count(AirportField::RegionCode, AirportField::AirportType))
    });

    group.finish();
}

criterion_group!(benches, dashboard_queries);
criterion_main!(benches);
