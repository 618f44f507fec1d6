use pyo3::exceptions;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use std::sync::Arc;

use crate::dataset::{
    AirportDataset, AirportField, AirportRecord, DEFAULT_TOP_N, DatasetError, MapPoint,
    SortDirection, Value,
};
use crate::python::py_query_cache::PyQueryCache;

/// Convert Rust errors to Python exceptions
impl From<DatasetError> for PyErr {
    fn from(err: DatasetError) -> PyErr {
        match err {
            DatasetError::DataSourceNotFound(_) => {
                exceptions::PyFileNotFoundError::new_err(err.to_string())
            }
            _ => exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}

fn parse_field(name: &str) -> PyResult<AirportField> {
    Ok(name.parse::<AirportField>()?)
}

fn value_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    let obj = match value {
        Value::Int(v) => (*v).into_pyobject(py)?.into_any().unbind(),
        Value::Float(v) => (*v).into_pyobject(py)?.into_any().unbind(),
        Value::Str(v) => v.as_str().into_pyobject(py)?.into_any().unbind(),
        Value::Bool(v) => (*v).into_pyobject(py)?.to_owned().into_any().unbind(),
    };
    Ok(obj)
}

fn values_to_list<'py>(py: Python<'py>, values: &[Value]) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for value in values {
        list.append(value_to_py(py, value)?)?;
    }
    Ok(list)
}

fn record_to_dict<'py>(py: Python<'py>, record: &AirportRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("name", record.name.as_str())?;
    dict.set_item("municipality", record.municipality.as_deref())?;
    dict.set_item("region_code", record.region_code.as_str())?;
    dict.set_item("type", record.airport_type.as_str())?;
    dict.set_item("scheduled_service", record.scheduled_service)?;
    dict.set_item("elevation_ft", record.elevation_ft)?;
    dict.set_item("latitude_deg", record.latitude_deg)?;
    dict.set_item("longitude_deg", record.longitude_deg)?;
    dict.set_item("name_length", record.name_length)?;
    dict.set_item("high_altitude", record.high_altitude)?;
    Ok(dict)
}

fn records_to_list<'py>(
    py: Python<'py>,
    records: &[AirportRecord],
) -> PyResult<Vec<Bound<'py, PyDict>>> {
    records.iter().map(|r| record_to_dict(py, r)).collect()
}

fn point_to_dict<'py>(py: Python<'py>, point: &MapPoint) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("latitude_deg", point.latitude_deg)?;
    dict.set_item("longitude_deg", point.longitude_deg)?;
    dict.set_item("name", point.name.as_str())?;
    dict.set_item("municipality", point.municipality.as_deref())?;
    Ok(dict)
}

#[pyclass(name = "AirportDataset", frozen)]
pub struct PyAirportDataset {
    inner: Arc<AirportDataset>,
}

#[pymethods]
impl PyAirportDataset {
    #[new]
    pub fn new(path: &str) -> PyResult<Self> {
        let dataset = AirportDataset::load(path)?;
        Ok(PyAirportDataset {
            inner: Arc::new(dataset),
        })
    }

    fn __len__(&self) -> usize {
        self.inner.row_count()
    }

    /// (rows_read, rows_dropped)
    pub fn load_summary(&self) -> (usize, usize) {
        let summary = self.inner.load_summary();
        (summary.rows_read, summary.rows_dropped)
    }

    /// (count, max_elevation_ft); the default region when `region` is None
    #[pyo3(signature = (region=None))]
    pub fn region_summary(&self, region: Option<&str>) -> (usize, Option<f64>) {
        let summary = self.inner.region_summary(region);
        (summary.count, summary.max_elevation_ft)
    }

    pub fn filter_by_region<'py>(
        &self,
        py: Python<'py>,
        region: &str,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        records_to_list(py, &self.inner.filter_by_region(region).records())
    }

    pub fn filter_by_region_and_city<'py>(
        &self,
        py: Python<'py>,
        region: &str,
        city: &str,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        records_to_list(
            py,
            &self.inner.filter_by_region_and_city(region, city).records(),
        )
    }

    /// Every filter given is applied; the result is their intersection
    #[pyo3(signature = (region=None, city=None, scheduled_only=false, limit=None, cache=None))]
    pub fn query<'py>(
        &self,
        py: Python<'py>,
        region: Option<&str>,
        city: Option<&str>,
        scheduled_only: bool,
        limit: Option<usize>,
        cache: Option<PyRef<'_, PyQueryCache>>,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let mut builder = match &cache {
            Some(c) => self.inner.query_with_cache(&c.inner),
            None => self.inner.query(),
        };
        if let Some(region) = region {
            builder = builder.region(region);
        }
        if let Some(city) = city {
            builder = builder.municipality(city);
        }
        if scheduled_only {
            builder = builder.scheduled_only();
        }
        if let Some(n) = limit {
            builder = builder.limit(n);
        }
        records_to_list(py, &builder.execute().records())
    }

    /// Distinct values of `field`, optionally within one region
    #[pyo3(signature = (field, region=None))]
    pub fn distinct_sorted<'py>(
        &self,
        py: Python<'py>,
        field: &str,
        region: Option<&str>,
    ) -> PyResult<Bound<'py, PyList>> {
        let field = parse_field(field)?;
        let values = match region {
            Some(region) => self.inner.filter_by_region(region).distinct_sorted(field),
            None => self.inner.distinct_sorted(field),
        };
        values_to_list(py, &values)
    }

    #[pyo3(signature = (field, n=DEFAULT_TOP_N, descending=true))]
    pub fn top_n_by<'py>(
        &self,
        py: Python<'py>,
        field: &str,
        n: usize,
        descending: bool,
    ) -> PyResult<Vec<Bound<'py, PyDict>>> {
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let records = self.inner.top_n_by(parse_field(field)?, n, direction);
        records_to_list(py, &records)
    }

    pub fn count_by<'py>(&self, py: Python<'py>, field: &str) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        for (value, count) in self.inner.count_by(parse_field(field)?) {
            dict.set_item(value_to_py(py, &value)?, count)?;
        }
        Ok(dict)
    }

    /// [(value, count, percent)], largest first
    pub fn share_by(&self, py: Python<'_>, field: &str) -> PyResult<Vec<(PyObject, usize, f64)>> {
        self.inner
            .all()
            .share_by(parse_field(field)?)
            .iter()
            .map(|s| Ok((value_to_py(py, &s.value)?, s.count, s.percent)))
            .collect()
    }

    /// (row values, column values, counts[row][column])
    #[allow(clippy::type_complexity)]
    pub fn pivot_count<'py>(
        &self,
        py: Python<'py>,
        row_field: &str,
        col_field: &str,
    ) -> PyResult<(Bound<'py, PyList>, Bound<'py, PyList>, Vec<Vec<usize>>)> {
        let pivot = self
            .inner
            .pivot_count(parse_field(row_field)?, parse_field(col_field)?);
        let grid = pivot.rows().map(|(_, counts)| counts.to_vec()).collect();
        Ok((
            values_to_list(py, pivot.row_values())?,
            values_to_list(py, pivot.column_values())?,
            grid,
        ))
    }

    pub fn mean_coordinate(&self) -> PyResult<(f64, f64)> {
        let center = self.inner.mean_coordinate()?;
        Ok((center.latitude_deg, center.longitude_deg))
    }

    pub fn map_points<'py>(&self, py: Python<'py>) -> PyResult<Vec<Bound<'py, PyDict>>> {
        self.inner
            .all()
            .map_points()
            .iter()
            .map(|p| point_to_dict(py, p))
            .collect()
    }
}
