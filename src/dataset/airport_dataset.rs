use memmap2::Mmap;
use serde::{Deserialize, Deserializer, de::Error as _};
use std::{collections::HashMap, fs::File, io, path::Path};
use tracing::{debug, warn};

use crate::dataset::{
    AirportField, AirportRecord, Coordinate, DatasetError, FilterPredicate,
    HIGH_ALTITUDE_THRESHOLD_FT, LoadError, LoadSummary, PivotTable, RegionSummary,
    SCHEDULED_SERVICE_YES, Selection, SortDirection, Value, column::Column,
};

/// One row as it comes out of the source, before validation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAirport {
    pub name: String,
    pub municipality: Option<String>,
    #[serde(rename = "iso_region", alias = "region_code")]
    pub region_code: String,
    #[serde(rename = "type", alias = "airport_type")]
    pub airport_type: String,
    pub scheduled_service: Option<String>,
    #[serde(deserialize_with = "deserialize_na_f64")]
    pub elevation_ft: Option<f64>,
    #[serde(deserialize_with = "deserialize_na_f64")]
    pub latitude_deg: Option<f64>,
    #[serde(deserialize_with = "deserialize_na_f64")]
    pub longitude_deg: Option<f64>,
}

/// Cell contents read as a missing value
const NA_MARKERS: [&str; 12] = [
    "", "NA", "N/A", "n/a", "#N/A", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None",
];

/// Numeric cell where NA markers and non-finite numbers are missing
fn deserialize_na_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(cell) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let cell = cell.trim();
    if NA_MARKERS.contains(&cell) {
        return Ok(None);
    }
    let value = cell
        .parse::<f64>()
        .map_err(|e| D::Error::custom(format!("invalid number {cell:?}: {e}")))?;
    Ok(Some(value).filter(|v| v.is_finite()))
}

fn present_str(s: String) -> Option<String> {
    Some(s).filter(|s| !s.is_empty())
}

/// Columnar, read-only table of airports
///
/// Every row has a latitude and a longitude. The derived `name_length` and
/// `high_altitude` columns are attached once while the table is built.
///
/// # Examples
///
/// ```no_run
/// # use airport_explorer::dataset::{AirportDataset, AirportField};
/// let dataset = AirportDataset::load("data/new_england_airports.csv").unwrap();
/// let regions = dataset.distinct_sorted(AirportField::RegionCode);
/// println!("{} regions", regions.len());
/// ```
#[derive(Debug)]
pub struct AirportDataset {
    columns: Vec<Column>, // indexed by AirportField
    row_count: usize,
    summary: LoadSummary,
}

impl AirportDataset {
    /// Loads a CSV file into memory using memory mapping
    ///
    /// # Errors
    /// - [`DatasetError::DataSourceNotFound`] if `path` does not exist
    /// - [`DatasetError::DataLoad`] if the file cannot be read, is empty,
    ///   lacks a required column or holds a malformed row
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DatasetError::DataSourceNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(LoadError::Io(e).into()),
        };

        if file.metadata().map_err(LoadError::from)?.len() == 0 {
            return Err(LoadError::EmptySource.into());
        }

        // SAFETY: the mapping is only read, and it is dropped before returning.
        let mmap = unsafe { Mmap::map(&file) }.map_err(LoadError::from)?;
        debug!(path = %path.display(), bytes = mmap.len(), "mapped data source");

        let rows = parse_csv(&mmap[..])?;
        Ok(Self::from_rows(rows))
    }

    /// Builds the table from raw rows, dropping rows without coordinates
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawAirport>,
    {
        let rows = rows.into_iter();
        let capacity = rows.size_hint().0;

        let mut names = Vec::with_capacity(capacity);
        let mut municipalities = Vec::with_capacity(capacity);
        let mut regions = Vec::with_capacity(capacity);
        let mut types = Vec::with_capacity(capacity);
        let mut scheduled = Vec::with_capacity(capacity);
        let mut elevations = Vec::with_capacity(capacity);
        let mut latitudes = Vec::with_capacity(capacity);
        let mut longitudes = Vec::with_capacity(capacity);

        let mut summary = LoadSummary::default();

        for raw in rows {
            summary.rows_read += 1;
            let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
            let (Some(lat), Some(lon)) = (finite(raw.latitude_deg), finite(raw.longitude_deg))
            else {
                summary.rows_dropped += 1;
                continue;
            };

            names.push(present_str(raw.name));
            municipalities.push(raw.municipality.and_then(present_str));
            regions.push(present_str(raw.region_code));
            types.push(present_str(raw.airport_type));
            scheduled.push(raw.scheduled_service.and_then(present_str));
            elevations.push(finite(raw.elevation_ft));
            latitudes.push(Some(lat));
            longitudes.push(Some(lon));
        }

        if summary.rows_dropped > 0 {
            warn!(
                dropped = summary.rows_dropped,
                "dropped rows with missing coordinates"
            );
        }

        let mut dataset = AirportDataset {
            row_count: names.len(),
            columns: vec![
                Column::Str(names),
                Column::Str(municipalities),
                Column::Str(regions),
                Column::Str(types),
                Column::Str(scheduled),
                Column::Float64(elevations),
                Column::Float64(latitudes),
                Column::Float64(longitudes),
            ],
            summary,
        };
        dataset.attach_derived_columns();

        debug!(
            rows = dataset.row_count,
            read = summary.rows_read,
            "airport table ready"
        );
        dataset
    }

    fn attach_derived_columns(&mut self) {
        debug_assert_eq!(self.columns.len(), AirportField::NameLength.index());

        let names = self.column(AirportField::Name);
        let name_length: Vec<i64> = (0..self.row_count)
            .map(|i| names.get_str(i).map_or(0, |s| s.chars().count() as i64))
            .collect();

        let elevation = self.column(AirportField::ElevationFt);
        let high_altitude: Vec<bool> = (0..self.row_count)
            .map(|i| {
                elevation
                    .get_f64(i)
                    .is_some_and(|e| e > HIGH_ALTITUDE_THRESHOLD_FT)
            })
            .collect();

        self.columns.push(Column::Int64(name_length));
        self.columns.push(Column::Bool(high_altitude));
        debug!("attached derived columns name_length, high_altitude");
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn load_summary(&self) -> LoadSummary {
        self.summary
    }

    pub fn column(&self, field: AirportField) -> &Column {
        &self.columns[field.index()]
    }

    pub fn get(&self, field: AirportField, row: usize) -> Option<Value> {
        self.column(field).get(row)
    }

    /// Materializes one row
    pub fn record(&self, row: usize) -> Option<AirportRecord> {
        if row >= self.row_count {
            return None;
        }

        let text = |field: AirportField| self.column(field).get_str(row).map(str::to_string);

        Some(AirportRecord {
            name: text(AirportField::Name).unwrap_or_default(),
            municipality: text(AirportField::Municipality),
            region_code: text(AirportField::RegionCode).unwrap_or_default(),
            airport_type: text(AirportField::AirportType).unwrap_or_default(),
            scheduled_service: self.column(AirportField::ScheduledService).get_str(row)
                == Some(SCHEDULED_SERVICE_YES),
            elevation_ft: self.column(AirportField::ElevationFt).get_f64(row),
            latitude_deg: self.column(AirportField::LatitudeDeg).get_f64(row)?,
            longitude_deg: self.column(AirportField::LongitudeDeg).get_f64(row)?,
            name_length: self.column(AirportField::NameLength).get_i64(row)? as usize,
            high_altitude: self.column(AirportField::HighAltitude).get_bool(row)?,
        })
    }

    /// Every row
    pub fn all(&self) -> Selection<'_> {
        Selection::new(self, (0..self.row_count).collect())
    }

    pub fn filter(&self, field: AirportField, predicate: &FilterPredicate) -> Selection<'_> {
        self.all().filter(field, predicate)
    }

    pub fn region_summary(&self, region_code: Option<&str>) -> RegionSummary {
        self.all().region_summary(region_code)
    }

    pub fn filter_by_region(&self, region_code: &str) -> Selection<'_> {
        self.all().filter_by_region(region_code)
    }

    pub fn filter_by_region_and_city(&self, region_code: &str, municipality: &str) -> Selection<'_> {
        self.all().filter_by_region_and_city(region_code, municipality)
    }

    pub fn filter_scheduled_service(&self) -> Selection<'_> {
        self.all().filter_scheduled_service()
    }

    pub fn distinct_sorted(&self, field: AirportField) -> Vec<Value> {
        self.all().distinct_sorted(field)
    }

    pub fn top_n_by(
        &self,
        field: AirportField,
        n: usize,
        direction: SortDirection,
    ) -> Vec<AirportRecord> {
        self.all().top_n_by(field, n, direction)
    }

    pub fn count_by(&self, field: AirportField) -> HashMap<Value, usize> {
        self.all().count_by(field)
    }

    pub fn pivot_count(&self, row_field: AirportField, col_field: AirportField) -> PivotTable {
        self.all().pivot_count(row_field, col_field)
    }

    pub fn mean_coordinate(&self) -> Result<Coordinate, DatasetError> {
        self.all().mean_coordinate()
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<RawAirport>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    for field in AirportField::ALL.into_iter().filter(|f| !f.is_derived()) {
        let present = headers
            .iter()
            .any(|h| h == field.column_name() || Some(h) == field.alias());
        if !present {
            return Err(LoadError::MissingColumn(field.column_name().to_string()));
        }
    }

    let rows = reader
        .deserialize::<RawAirport>()
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = rows.len(), "parsed csv rows");
    Ok(rows)
}
