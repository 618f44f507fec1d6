#![cfg(feature = "python-bindings")]

use pyo3::types::PyModuleMethods;
use pyo3::{Bound, PyResult, Python, pymodule, types::PyModule};

pub mod py_airport_dataset;

pub mod py_query_cache;

#[pymodule]
fn airport_explorer(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py_airport_dataset::PyAirportDataset>()?;
    m.add_class::<py_query_cache::PyQueryCache>()?;
    Ok(())
}
