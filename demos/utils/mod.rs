use std::path::PathBuf;

/// Returns the path to the sample CSV relative to the crate root.
pub fn sample_csv_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("new_england_airports.csv")
}
