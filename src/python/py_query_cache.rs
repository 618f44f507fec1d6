use pyo3::prelude::*;

use crate::dataset::query_builder::QueryCache;

/// Python bindings for QueryCache
#[pyclass(name = "QueryCache", unsendable)]
pub struct PyQueryCache {
    pub inner: QueryCache,
}

#[pymethods]
impl PyQueryCache {
    #[new]
    fn new() -> Self {
        Self {
            inner: QueryCache::new(),
        }
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn clear(&self) {
        self.inner.clear();
    }
}
