use crate::dataset::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Str,
    Bool,
}

/// One column of the table. `None` marks a missing cell.
#[derive(Debug, Clone)]
pub enum Column {
    Int64(Vec<i64>),
    Float64(Vec<Option<f64>>),
    Str(Vec<Option<String>>),
    Bool(Vec<bool>),
}

impl Column {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::Str(_) => ColumnType::Str,
            Column::Bool(_) => ColumnType::Bool,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Str(v) => v.len(),
            Column::Bool(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Random access
    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Column::Int64(v) => v.get(idx).copied().map(Value::Int),
            Column::Float64(v) => v.get(idx).copied().flatten().map(Value::Float),
            Column::Str(v) => v.get(idx).and_then(|s| s.clone()).map(Value::Str),
            Column::Bool(v) => v.get(idx).copied().map(Value::Bool),
        }
    }

    pub fn get_str(&self, idx: usize) -> Option<&str> {
        match self {
            Column::Str(v) => v.get(idx).and_then(|s| s.as_deref()),
            _ => None,
        }
    }

    pub fn get_f64(&self, idx: usize) -> Option<f64> {
        match self {
            Column::Float64(v) => v.get(idx).copied().flatten(),
            Column::Int64(v) => v.get(idx).map(|&x| x as f64),
            _ => None,
        }
    }

    pub fn get_i64(&self, idx: usize) -> Option<i64> {
        match self {
            Column::Int64(v) => v.get(idx).copied(),
            _ => None,
        }
    }

    pub fn get_bool(&self, idx: usize) -> Option<bool> {
        match self {
            Column::Bool(v) => v.get(idx).copied(),
            _ => None,
        }
    }

    pub fn is_missing(&self, idx: usize) -> bool {
        match self {
            Column::Float64(v) => v.get(idx).is_none_or(|x| x.is_none()),
            Column::Str(v) => v.get(idx).is_none_or(|x| x.is_none()),
            Column::Int64(v) => idx >= v.len(),
            Column::Bool(v) => idx >= v.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells() {
        let col = Column::Float64(vec![Some(1.5), None]);
        assert_eq!(col.get(0), Some(Value::Float(1.5)));
        assert_eq!(col.get(1), None);
        assert!(col.is_missing(1));
        assert!(col.is_missing(2));
        assert!(!col.is_missing(0));
    }

    #[test]
    fn test_typed_accessors_reject_other_types() {
        let col = Column::Str(vec![Some("US-MA".to_string())]);
        assert_eq!(col.get_str(0), Some("US-MA"));
        assert_eq!(col.get_f64(0), None);
        assert_eq!(col.column_type(), ColumnType::Str);
    }
}
