use airport_explorer::config::AppConfig;
use airport_explorer::dataset::{AirportDataset, AirportField, DEFAULT_REGION, SortDirection};
use jemallocator::Jemalloc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    info!(path = %config.data_path.display(), "loading airports");

    // Loaded once, then only borrowed
    let dataset = match AirportDataset::load(&config.data_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("cannot start without the airport data: {}", e);
            return Err(e.into());
        }
    };
    let summary = dataset.load_summary();
    info!(
        rows = dataset.row_count(),
        dropped = summary.rows_dropped,
        "airports loaded"
    );

    let default_summary = dataset.region_summary(None);
    let comparison = dataset.region_summary(Some(config.comparison_region.as_str()));
    info!(
        region = DEFAULT_REGION,
        count = default_summary.count,
        max_elevation_ft = ?default_summary.max_elevation_ft,
        "region summary"
    );
    info!(
        region = %config.comparison_region,
        count = comparison.count,
        max_elevation_ft = ?comparison.max_elevation_ft,
        "region summary"
    );

    let regions = dataset.distinct_sorted(AirportField::RegionCode);
    info!(
        "regions: {}",
        regions
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    for share in dataset.all().share_by(AirportField::RegionCode) {
        info!("{:>8} {:>5} {:5.1}%", share.value, share.count, share.percent);
    }

    for airport in dataset.top_n_by(
        AirportField::ElevationFt,
        config.top_n,
        SortDirection::default(),
    ) {
        info!(
            "{:<45} {:>6}",
            airport.name,
            airport
                .elevation_ft
                .map_or_else(|| "-".to_string(), |e| format!("{:.0}", e))
        );
    }

    let pivot = dataset.pivot_count(AirportField::RegionCode, AirportField::AirportType);
    info!(
        "type by region: {}",
        pivot
            .column_values()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(" | ")
    );
    for (region, counts) in pivot.rows() {
        info!("{:>8} {:?}", region, counts);
    }

    match dataset.all().map_view(config.map_zoom) {
        Ok(view) => info!(
            latitude = view.center.latitude_deg,
            longitude = view.center.longitude_deg,
            zoom = view.zoom,
            points = dataset.all().map_points().len(),
            "map view"
        ),
        Err(e) => info!("no map view: {}", e),
    }

    Ok(())
}
