use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::dataset::{
    AirportDataset, AirportField, AirportRecord, CategoryShare, Coordinate, DEFAULT_REGION,
    DatasetError, FilterPredicate, MapPoint, MapView, PivotTable, RegionSummary,
    SCHEDULED_SERVICE_YES, SortDirection, Value,
};

/// A subset of the rows of an [`AirportDataset`]
///
/// Row indices are kept strictly ascending, so every filter preserves
/// insertion order and two selections intersect in linear time.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    dataset: &'a AirportDataset,
    rows: Vec<usize>,
}

impl PartialEq for Selection<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.rows == other.rows
    }
}

impl<'a> Selection<'a> {
    pub(crate) fn new(dataset: &'a AirportDataset, rows: Vec<usize>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0] < w[1]));
        Selection { dataset, rows }
    }

    pub fn dataset(&self) -> &'a AirportDataset {
        self.dataset
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    /// Rows in both selections; both must come from the same dataset
    pub fn intersect(&self, other: &Selection<'_>) -> Selection<'a> {
        debug_assert!(
            std::ptr::eq(self.dataset, other.dataset),
            "intersecting selections of different datasets"
        );
        Selection::new(self.dataset, intersect_sorted(&self.rows, &other.rows))
    }

    /// Keep only the first `n` rows
    pub fn limit(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Rows whose `field` satisfies `predicate`; missing cells never match
    pub fn filter(&self, field: AirportField, predicate: &FilterPredicate) -> Selection<'a> {
        let column = self.dataset.column(field);
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| column.get(i).is_some_and(|v| predicate.matches(&v)))
            .collect();
        Selection::new(self.dataset, rows)
    }

    fn filter_str(&self, field: AirportField, target: &str) -> Selection<'a> {
        let column = self.dataset.column(field);
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| column.get_str(i) == Some(target))
            .collect();
        Selection::new(self.dataset, rows)
    }

    /// Exact, case-sensitive match on `region_code`
    pub fn filter_by_region(&self, region_code: &str) -> Selection<'a> {
        self.filter_str(AirportField::RegionCode, region_code)
    }

    pub fn filter_by_region_and_city(&self, region_code: &str, municipality: &str) -> Selection<'a> {
        self.filter_by_region(region_code)
            .filter_str(AirportField::Municipality, municipality)
    }

    pub fn filter_scheduled_service(&self) -> Selection<'a> {
        self.filter_str(AirportField::ScheduledService, SCHEDULED_SERVICE_YES)
    }

    /// Count and highest elevation for one region, `DEFAULT_REGION` when `None`
    pub fn region_summary(&self, region_code: Option<&str>) -> RegionSummary {
        let subset = self.filter_by_region(region_code.unwrap_or(DEFAULT_REGION));
        let elevation = self.dataset.column(AirportField::ElevationFt);
        let max_elevation_ft = subset
            .rows
            .iter()
            .filter_map(|&i| elevation.get_f64(i))
            .max_by(f64::total_cmp);

        RegionSummary {
            count: subset.len(),
            max_elevation_ft,
        }
    }

    /// Distinct non-missing values, ascending
    pub fn distinct_sorted(&self, field: AirportField) -> Vec<Value> {
        let column = self.dataset.column(field);
        self.rows
            .iter()
            .filter_map(|&i| column.get(i))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First `n` rows after a stable sort on `field`; missing values sort last
    pub fn top_n_by(
        &self,
        field: AirportField,
        n: usize,
        direction: SortDirection,
    ) -> Vec<AirportRecord> {
        let column = self.dataset.column(field);
        let mut keyed: Vec<(usize, Option<Value>)> =
            self.rows.iter().map(|&i| (i, column.get(i))).collect();

        keyed.sort_by(|(_, a), (_, b)| match (a, b) {
            (Some(a), Some(b)) => match direction {
                SortDirection::Ascending => a.cmp(b),
                SortDirection::Descending => b.cmp(a),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        keyed
            .into_iter()
            .take(n)
            .filter_map(|(i, _)| self.dataset.record(i))
            .collect()
    }

    /// Frequency table; rows with a missing value are not counted
    pub fn count_by(&self, field: AirportField) -> HashMap<Value, usize> {
        let column = self.dataset.column(field);
        let mut counts = HashMap::new();
        for value in self.rows.iter().filter_map(|&i| column.get(i)) {
            *counts.entry(value).or_insert(0) += 1;
        }
        counts
    }

    /// Pie-chart feed: counts by `field`, largest first, with percentages
    pub fn share_by(&self, field: AirportField) -> Vec<CategoryShare> {
        let mut counts: Vec<(Value, usize)> = self.count_by(field).into_iter().collect();
        counts.sort_by(|(va, ca), (vb, cb)| cb.cmp(ca).then_with(|| va.cmp(vb)));

        let total: usize = counts.iter().map(|(_, c)| c).sum();
        counts
            .into_iter()
            .map(|(value, count)| CategoryShare {
                value,
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect()
    }

    /// Dense count grid over the observed values of two fields
    pub fn pivot_count(&self, row_field: AirportField, col_field: AirportField) -> PivotTable {
        let row_col = self.dataset.column(row_field);
        let col_col = self.dataset.column(col_field);

        let pairs: Vec<(Value, Value)> = self
            .rows
            .iter()
            .filter_map(|&i| Some((row_col.get(i)?, col_col.get(i)?)))
            .collect();

        let row_values: Vec<Value> = pairs
            .iter()
            .map(|(r, _)| r.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let col_values: Vec<Value> = pairs
            .iter()
            .map(|(_, c)| c.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0usize; col_values.len()]; row_values.len()];
        for (r, c) in &pairs {
            // Both values were collected from `pairs`, so the searches succeed.
            if let (Ok(ri), Ok(ci)) = (row_values.binary_search(r), col_values.binary_search(c)) {
                counts[ri][ci] += 1;
            }
        }

        PivotTable::new(row_field, col_field, row_values, col_values, counts)
    }

    pub fn mean_coordinate(&self) -> Result<Coordinate, DatasetError> {
        if self.rows.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }

        let lat = self.dataset.column(AirportField::LatitudeDeg);
        let lon = self.dataset.column(AirportField::LongitudeDeg);
        let (lat_sum, lon_sum) = self.rows.iter().fold((0.0, 0.0), |(la, lo), &i| {
            (
                la + lat.get_f64(i).unwrap_or_default(),
                lo + lon.get_f64(i).unwrap_or_default(),
            )
        });

        let n = self.rows.len() as f64;
        Ok(Coordinate {
            latitude_deg: lat_sum / n,
            longitude_deg: lon_sum / n,
        })
    }

    /// Scatter-layer points with tooltip text, in row order
    pub fn map_points(&self) -> Vec<MapPoint> {
        self.rows
            .iter()
            .filter_map(|&i| self.dataset.record(i))
            .map(|r| MapPoint {
                latitude_deg: r.latitude_deg,
                longitude_deg: r.longitude_deg,
                name: r.name,
                municipality: r.municipality,
            })
            .collect()
    }

    /// Viewport centred on the mean coordinate
    pub fn map_view(&self, zoom: f64) -> Result<MapView, DatasetError> {
        Ok(MapView {
            center: self.mean_coordinate()?,
            zoom,
        })
    }

    pub fn records(&self) -> Vec<AirportRecord> {
        self.rows
            .iter()
            .filter_map(|&i| self.dataset.record(i))
            .collect()
    }
}

/// Helper function to intersect sorted vectors
pub(crate) fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RawAirport;

    fn raw(name: &str, region: &str, city: Option<&str>, elevation: Option<f64>) -> RawAirport {
        RawAirport {
            name: name.to_string(),
            municipality: city.map(str::to_string),
            region_code: region.to_string(),
            airport_type: "small_airport".to_string(),
            scheduled_service: Some("no".to_string()),
            elevation_ft: elevation,
            latitude_deg: Some(42.0),
            longitude_deg: Some(-71.0),
        }
    }

    fn sample() -> AirportDataset {
        let mut rows = vec![
            raw("Alpha", "A", Some("Springfield"), Some(100.0)),
            raw("Bravo", "A", Some("Shelby"), Some(200.0)),
            raw("Charlie", "A", Some("Springfield"), Some(300.0)),
            raw("Delta", "B", None, Some(50.0)),
            raw("Echo", "B", Some("Springfield"), None),
        ];
        rows[1].scheduled_service = Some("yes".to_string());
        rows[2].scheduled_service = Some("yes".to_string());
        rows[2].airport_type = "medium_airport".to_string();
        AirportDataset::from_rows(rows)
    }

    #[test]
    fn test_intersect_sorted() {
        assert_eq!(intersect_sorted(&[0, 2, 4, 6], &[1, 2, 3, 6]), vec![2, 6]);
        assert!(intersect_sorted(&[], &[1]).is_empty());
    }

    #[test]
    fn test_intersect_same_dataset() {
        let ds = sample();
        let region_a = ds.all().filter_by_region("A");
        let scheduled = ds.all().filter_scheduled_service();
        assert_eq!(region_a.intersect(&scheduled).row_indices(), &[1, 2]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "different datasets")]
    fn test_intersect_rejects_other_dataset() {
        let ds = sample();
        let other = sample();
        let _ = ds.all().intersect(&other.all());
    }

    #[test]
    fn test_filters_compose_in_any_order() {
        let ds = sample();
        let a = ds.all().filter_by_region("A").filter_scheduled_service();
        let b = ds.all().filter_scheduled_service().filter_by_region("A");
        assert_eq!(a.row_indices(), &[1, 2]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_region_match_is_case_sensitive() {
        let ds = sample();
        assert!(ds.all().filter_by_region("a").is_empty());
    }

    #[test]
    fn test_city_filter_skips_missing_municipality() {
        let ds = sample();
        let rows = ds.all().filter_by_region_and_city("B", "Springfield");
        assert_eq!(rows.row_indices(), &[4]);
    }

    #[test]
    fn test_region_summary_ignores_missing_elevation() {
        let ds = sample();
        let summary = ds.all().region_summary(Some("B"));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.max_elevation_ft, Some(50.0));
    }

    #[test]
    fn test_region_summary_empty_region_has_no_max() {
        let ds = sample();
        let summary = ds.all().region_summary(Some("Z"));
        assert_eq!(summary.count, 0);
        assert_eq!(summary.max_elevation_ft, None);
    }

    #[test]
    fn test_top_n_puts_missing_last_both_ways() {
        let ds = sample();
        let desc = ds
            .all()
            .top_n_by(AirportField::ElevationFt, 10, SortDirection::Descending);
        let asc = ds
            .all()
            .top_n_by(AirportField::ElevationFt, 10, SortDirection::Ascending);
        assert_eq!(desc.last().unwrap().name, "Echo");
        assert_eq!(asc.last().unwrap().name, "Echo");
        assert_eq!(asc[0].name, "Delta");
        assert_eq!(desc[0].name, "Charlie");
    }

    #[test]
    fn test_top_n_is_stable_on_ties() {
        let ds = sample();
        let top = ds
            .all()
            .top_n_by(AirportField::AirportType, 5, SortDirection::Descending);
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Bravo", "Delta", "Echo", "Charlie"]);
    }

    #[test]
    fn test_share_by_orders_and_sums_to_hundred() {
        let ds = sample();
        let shares = ds.all().share_by(AirportField::RegionCode);
        assert_eq!(shares[0].value, Value::from("A"));
        assert_eq!(shares[0].count, 3);
        let total: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert!(ds.all().filter_by_region("Z").share_by(AirportField::RegionCode).is_empty());
    }

    #[test]
    fn test_pivot_is_dense() {
        let ds = sample();
        let pivot = ds
            .all()
            .pivot_count(AirportField::RegionCode, AirportField::AirportType);
        assert_eq!(pivot.get(&"B".into(), &"medium_airport".into()), Some(0));
        assert_eq!(pivot.get(&"A".into(), &"small_airport".into()), Some(2));
        assert_eq!(pivot.total(), 5);
    }

    #[test]
    fn test_map_feed() {
        let ds = sample();
        let points = ds.all().filter_by_region("B").map_points();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "Delta");
        assert_eq!(points[0].municipality, None);

        let view = ds.all().map_view(5.0).unwrap();
        assert_eq!(view.center.latitude_deg, 42.0);
        assert_eq!(view.zoom, 5.0);
        assert!(matches!(
            ds.all().filter_by_region("Z").map_view(5.0),
            Err(DatasetError::EmptyDataset)
        ));
    }

    #[test]
    fn test_limit_keeps_leading_rows() {
        let ds = sample();
        assert_eq!(ds.all().limit(2).row_indices(), &[0, 1]);
    }
}
