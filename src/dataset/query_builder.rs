use lru::LruCache;
use tracing::debug;

use crate::dataset::selection::intersect_sorted;
use crate::dataset::{
    AirportDataset, AirportField, FilterPredicate, SCHEDULED_SERVICE_YES, Selection, Value,
};
use std::cell::RefCell;
use std::num::NonZeroUsize;

const CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(128) {
    Some(n) => n,
    None => panic!("cache capacity must be non-zero"),
};

#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct QueryKey {
    pub field: AirportField,
    pub predicate: FilterPredicate,
}

/// Per-session cache of filter results
///
/// Holds row indices only, so one cache must not be shared between datasets.
#[derive(Debug)]
pub struct QueryCache {
    cache: RefCell<LruCache<QueryKey, Vec<usize>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            cache: RefCell::new(LruCache::new(CACHE_CAPACITY)),
        }
    }

    pub fn get(&self, key: &QueryKey) -> Option<Vec<usize>> {
        self.cache.borrow_mut().get(key).cloned()
    }

    pub fn put(&self, key: QueryKey, rows: Vec<usize>) {
        self.cache.borrow_mut().put(key, rows);
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Accumulates filters and resolves them into a [`Selection`]
///
/// ```no_run
/// # use airport_explorer::dataset::AirportDataset;
/// # let dataset = AirportDataset::load("data/new_england_airports.csv").unwrap();
/// let rows = dataset
///     .query()
///     .region("US-MA")
///     .municipality("Boston")
///     .scheduled_only()
///     .execute();
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    dataset: &'a AirportDataset,
    cache: Option<&'a QueryCache>,
    filters: Vec<QueryKey>,
    limit: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(dataset: &'a AirportDataset, cache: Option<&'a QueryCache>) -> Self {
        Self {
            dataset,
            cache,
            filters: Vec::new(),
            limit: None,
        }
    }

    /// Add a filter condition
    pub fn filter(mut self, field: AirportField, predicate: FilterPredicate) -> Self {
        self.filters.push(QueryKey { field, predicate });
        self
    }

    /// Add multiple filter conditions
    pub fn filters(mut self, filters: Vec<(AirportField, FilterPredicate)>) -> Self {
        for (field, predicate) in filters {
            self.filters.push(QueryKey { field, predicate });
        }
        self
    }

    pub fn region(self, region_code: &str) -> Self {
        self.filter(
            AirportField::RegionCode,
            FilterPredicate::Equals(Value::from(region_code)),
        )
    }

    pub fn municipality(self, municipality: &str) -> Self {
        self.filter(
            AirportField::Municipality,
            FilterPredicate::Equals(Value::from(municipality)),
        )
    }

    pub fn scheduled_only(self) -> Self {
        self.filter(
            AirportField::ScheduledService,
            FilterPredicate::Equals(Value::from(SCHEDULED_SERVICE_YES)),
        )
    }

    /// Limit number of results
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Disable caching
    pub fn no_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Intersect every filter; no filters selects every row
    pub fn execute(self) -> Selection<'a> {
        let mut filtered_rows: Option<Vec<usize>> = None;

        for key in &self.filters {
            let current = self.rows_for(key);
            filtered_rows = Some(match filtered_rows {
                None => current,
                Some(existing) => intersect_sorted(&existing, &current),
            });
        }

        let selection = match filtered_rows {
            Some(rows) => Selection::new(self.dataset, rows),
            None => self.dataset.all(),
        };

        match self.limit {
            Some(n) => selection.limit(n),
            None => selection,
        }
    }

    fn rows_for(&self, key: &QueryKey) -> Vec<usize> {
        match self.cache {
            Some(cache) => {
                if let Some(rows) = cache.get(key) {
                    debug!(field = %key.field, "filter served from cache");
                    rows
                } else {
                    let rows = self.evaluate(key);
                    cache.put(key.clone(), rows.clone());
                    rows
                }
            }
            None => self.evaluate(key),
        }
    }

    fn evaluate(&self, key: &QueryKey) -> Vec<usize> {
        self.dataset
            .filter(key.field, &key.predicate)
            .row_indices()
            .to_vec()
    }
}

impl AirportDataset {
    pub fn query(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self, None)
    }

    pub fn query_with_cache<'a>(&'a self, cache: &'a QueryCache) -> QueryBuilder<'a> {
        QueryBuilder::new(self, Some(cache))
    }
}
