//! Bounded previews of dataset contents.
//!
//! [`sample`] gives a handful of representative values for reports;
//! [`preview_table`] gives a row-oriented view for tabular display.

use crate::data::{element_count, Container, DataType, NodeKind, Scalar, Selection};
use crate::error::{RasscopeError, Result};
use ndarray::{ArrayD, Axis};
use serde::Serialize;
use tracing::{debug, warn};

/// Placeholder value stored in a failed [`SampleSet`].
pub const SAMPLE_ERROR_SENTINEL: &str = "Error reading sample data";

/// One sampled item: a value, or a whole row of a 2-D dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    /// Single element.
    Scalar(Scalar),
    /// Leading row of a matrix.
    Row(Vec<Scalar>),
}

impl From<Scalar> for SampleValue {
    fn from(value: Scalar) -> Self {
        SampleValue::Scalar(value)
    }
}

/// Bounded sample of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSet {
    /// Sampled values or rows.
    pub values: Vec<SampleValue>,
    /// True when `values` covers only part of the dataset.
    pub truncated: bool,
    /// Failure detail; `values` then holds only the sentinel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SampleSet {
    fn complete(values: Vec<SampleValue>) -> Self {
        Self {
            values,
            truncated: false,
            error: None,
        }
    }

    fn partial(values: Vec<SampleValue>) -> Self {
        Self {
            values,
            truncated: true,
            error: None,
        }
    }

    /// Sample standing in for a dataset that could not be read.
    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            values: vec![SampleValue::Scalar(Scalar::from(SAMPLE_ERROR_SENTINEL))],
            truncated: false,
            error: Some(detail.into()),
        }
    }

    /// Whether this sample records a read failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Take a bounded sample of the dataset at `path`.
///
/// Never fails: any read problem yields [`SampleSet::failed`].
pub fn sample<C: Container + ?Sized>(container: &C, path: &str, max_samples: usize) -> SampleSet {
    match try_sample(container, path, max_samples) {
        Ok(set) => set,
        Err(e) => {
            warn!("Sampling {} failed: {}", path, e);
            SampleSet::failed(e.to_string())
        }
    }
}

fn try_sample<C: Container + ?Sized>(
    container: &C,
    path: &str,
    max_samples: usize,
) -> Result<SampleSet> {
    if container.kind(path)? != NodeKind::Dataset {
        return Err(RasscopeError::type_mismatch(path, NodeKind::Dataset));
    }
    let shape = container.shape(path)?;
    let count = element_count(&shape)?;

    if shape.is_empty() || count <= max_samples {
        let data = container.read(path, &Selection::All)?;
        return Ok(SampleSet::complete(flatten(data)));
    }

    match shape.len() {
        1 => {
            let indices = spread_indices(count, max_samples);
            debug!("Sampling {} at {} points", path, indices.len());
            let data = container.read(path, &Selection::Points(indices))?;
            Ok(SampleSet::partial(flatten(data)))
        }
        2 => {
            let rows = max_samples.min(shape[0]);
            let data = container.read(path, &Selection::Rows(0..rows))?;
            let values = data
                .axis_iter(Axis(0))
                .map(|row| SampleValue::Row(row.iter().cloned().collect()))
                .collect();
            Ok(SampleSet {
                values,
                truncated: shape[0] > max_samples,
                error: None,
            })
        }
        _ => {
            let row_len = element_count(&shape[1..])?;
            let rows = max_samples.div_ceil(row_len).min(shape[0]);
            let data = container.read(path, &Selection::Rows(0..rows))?;
            let values = data
                .iter()
                .take(max_samples)
                .cloned()
                .map(SampleValue::Scalar)
                .collect();
            Ok(SampleSet::partial(values))
        }
    }
}

fn flatten(data: ArrayD<Scalar>) -> Vec<SampleValue> {
    // iter() walks in logical (row-major) order
    data.iter().cloned().map(SampleValue::Scalar).collect()
}

/// `n` indices evenly spread over `[0, len - 1]`, rounded to nearest.
fn spread_indices(len: usize, n: usize) -> Vec<usize> {
    match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => {
            let step = (len - 1) as f64 / (n - 1) as f64;
            (0..n).map(|i| (i as f64 * step).round() as usize).collect()
        }
    }
}

/// Row-oriented preview of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    /// Dataset path.
    pub path: String,
    /// Full dataset shape.
    pub shape: Vec<usize>,
    /// Element type.
    pub dtype: DataType,
    /// Column headers, one per value in each row.
    pub columns: Vec<String>,
    /// Leading rows.
    pub rows: Vec<Vec<Scalar>>,
    /// Length of the leading dimension (0 for scalars).
    pub total_rows: usize,
    /// True when `rows` stops before `total_rows`.
    pub truncated: bool,
}

/// Build a table of at most `max_rows` rows from the dataset at `path`.
///
/// Scalars and vectors become a single `Value` column. Matrices use
/// `Column_i` headers, or the `column_names` attribute when it names every
/// column. Higher ranks flatten each leading slice into one row of `Dim_i`
/// columns.
pub fn preview_table<C: Container + ?Sized>(
    container: &C,
    path: &str,
    max_rows: usize,
) -> Result<TablePreview> {
    if container.kind(path)? != NodeKind::Dataset {
        return Err(RasscopeError::type_mismatch(path, NodeKind::Dataset));
    }
    let shape = container.shape(path)?;
    let dtype = container.dtype(path)?;

    let Some(&total_rows) = shape.first() else {
        let data = container.read(path, &Selection::All)?;
        return Ok(TablePreview {
            path: path.to_string(),
            shape,
            dtype,
            columns: vec!["Value".to_string()],
            rows: vec![data.iter().cloned().collect()],
            total_rows: 0,
            truncated: false,
        });
    };

    let taken = max_rows.min(total_rows);
    let data = container.read(path, &Selection::Rows(0..taken))?;
    let rows: Vec<Vec<Scalar>> = if shape.len() == 1 {
        data.iter().map(|v| vec![v.clone()]).collect()
    } else {
        data.axis_iter(Axis(0))
            .map(|slice| slice.iter().cloned().collect())
            .collect()
    };

    let columns = match shape.len() {
        1 => vec!["Value".to_string()],
        2 => column_names(container, path, shape[1])
            .unwrap_or_else(|| (0..shape[1]).map(|i| format!("Column_{}", i)).collect()),
        _ => (0..element_count(&shape[1..])?)
            .map(|i| format!("Dim_{}", i))
            .collect(),
    };

    Ok(TablePreview {
        path: path.to_string(),
        shape,
        dtype,
        columns,
        rows,
        total_rows,
        truncated: total_rows > max_rows,
    })
}

fn column_names<C: Container + ?Sized>(
    container: &C,
    path: &str,
    width: usize,
) -> Option<Vec<String>> {
    let attributes = container.attributes(path).ok()?;
    let names = attributes.get("column_names")?.as_array()?;
    (names.len() == width).then(|| names.iter().map(|v| v.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AttrValue, MemoryContainer};

    fn scalars(set: &SampleSet) -> Vec<f64> {
        set.values
            .iter()
            .filter_map(|v| match v {
                SampleValue::Scalar(s) => s.as_f64(),
                SampleValue::Row(_) => None,
            })
            .collect()
    }

    fn float64() -> DataType {
        DataType::Float { bytes: 8 }
    }

    #[test]
    fn long_vector_is_spread_over_the_whole_range() {
        let mut c = MemoryContainer::new();
        let values: Vec<f64> = (0..1000).map(|i| i as f64).collect();
        c.insert_array("/v", float64(), &[1000], values).unwrap();

        let set = sample(&c, "/v", 10);
        let picked = scalars(&set);

        assert!(set.truncated);
        assert_eq!(picked.len(), 10);
        assert_eq!(picked.first(), Some(&0.0));
        assert_eq!(picked.last(), Some(&999.0));
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn small_dataset_is_returned_whole_in_storage_order() {
        let mut c = MemoryContainer::new();
        c.insert_array("/m", float64(), &[2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();

        let set = sample(&c, "/m", 10);
        assert!(!set.truncated);
        assert_eq!(scalars(&set), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn scalar_dataset_gives_one_value() {
        let mut c = MemoryContainer::new();
        c.insert_array("/s", float64(), &[], vec![42.0]).unwrap();

        let set = sample(&c, "/s", 0);
        assert!(!set.truncated);
        assert_eq!(scalars(&set), vec![42.0]);
    }

    #[test]
    fn matrix_gives_leading_rows() {
        let mut c = MemoryContainer::new();
        let values: Vec<f64> = (0..40).map(|i| i as f64).collect();
        c.insert_array("/m", float64(), &[20, 2], values).unwrap();

        let set = sample(&c, "/m", 3);
        assert!(set.truncated);
        assert_eq!(set.values.len(), 3);
        assert_eq!(
            set.values[1],
            SampleValue::Row(vec![Scalar::Float(2.0), Scalar::Float(3.0)])
        );
    }

    #[test]
    fn wide_matrix_with_few_rows_is_not_truncated() {
        let mut c = MemoryContainer::new();
        c.insert_array("/m", float64(), &[2, 50], vec![0.0; 100]).unwrap();

        let set = sample(&c, "/m", 10);
        assert!(!set.truncated);
        assert_eq!(set.values.len(), 2);
    }

    #[test]
    fn cube_gives_leading_elements() {
        let mut c = MemoryContainer::new();
        let values: Vec<i64> = (0..60).collect();
        c.insert_array("/c", DataType::Int { bytes: 8 }, &[5, 3, 4], values)
            .unwrap();

        let set = sample(&c, "/c", 14);
        assert!(set.truncated);
        assert_eq!(scalars(&set), (0..14).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn unreadable_dataset_gives_sentinel() {
        let mut c = MemoryContainer::new();
        c.insert_array("/bad", float64(), &[100], vec![0.0; 100]).unwrap();
        c.mark_unreadable("/bad").unwrap();

        let set = sample(&c, "/bad", 10);
        assert!(set.is_error());
        assert!(!set.truncated);
        assert_eq!(set.values, vec![SampleValue::Scalar(Scalar::from(SAMPLE_ERROR_SENTINEL))]);
    }

    #[test]
    fn spread_handles_tiny_counts() {
        assert!(spread_indices(100, 0).is_empty());
        assert_eq!(spread_indices(100, 1), vec![0]);
        assert_eq!(spread_indices(11, 3), vec![0, 5, 10]);
    }

    #[test]
    fn table_uses_column_names_attribute() {
        let mut c = MemoryContainer::new();
        c.insert_array("/t", float64(), &[3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
            .unwrap();
        c.set_attribute("/t", "column_names", ["x", "y"].into_iter().collect::<AttrValue>())
            .unwrap();

        let table = preview_table(&c, "/t", 2).unwrap();
        assert_eq!(table.columns, vec!["x", "y"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.total_rows, 3);
        assert!(table.truncated);
    }

    #[test]
    fn table_ignores_mismatched_column_names() {
        let mut c = MemoryContainer::new();
        c.insert_array("/t", float64(), &[1, 2], vec![1.0, 2.0]).unwrap();
        c.set_attribute("/t", "column_names", ["only"].into_iter().collect::<AttrValue>())
            .unwrap();

        let table = preview_table(&c, "/t", 10).unwrap();
        assert_eq!(table.columns, vec!["Column_0", "Column_1"]);
        assert!(!table.truncated);
    }

    #[test]
    fn table_flattens_higher_ranks() {
        let mut c = MemoryContainer::new();
        c.insert_array("/c", DataType::Int { bytes: 4 }, &[2, 2, 3], (0..12i64).collect::<Vec<_>>())
            .unwrap();

        let table = preview_table(&c, "/c", 10).unwrap();
        assert_eq!(table.columns.len(), 6);
        assert_eq!(table.columns[5], "Dim_5");
        assert_eq!(table.rows[1][0], Scalar::Int(6));
    }

    #[test]
    fn table_of_vector_and_scalar() {
        let mut c = MemoryContainer::new();
        c.insert_array("/v", float64(), &[3], vec![1.0, 2.0, 3.0]).unwrap();
        c.insert_array("/s", float64(), &[], vec![7.0]).unwrap();

        let vector = preview_table(&c, "/v", 10).unwrap();
        assert_eq!(vector.columns, vec!["Value"]);
        let expected: Vec<Vec<Scalar>> = [1.0, 2.0, 3.0].map(|v| vec![Scalar::Float(v)]).into();
        assert_eq!(vector.rows, expected);

        let scalar = preview_table(&c, "/s", 10).unwrap();
        assert_eq!(scalar.total_rows, 0);
        assert_eq!(scalar.rows, vec![vec![Scalar::Float(7.0)]]);
    }

    #[test]
    fn table_of_group_is_type_mismatch() {
        let mut c = MemoryContainer::new();
        c.insert_group("/Results").unwrap();
        assert!(matches!(
            preview_table(&c, "/Results", 10),
            Err(RasscopeError::TypeMismatch { .. })
        ));
        assert!(matches!(
            preview_table(&c, "/missing", 10),
            Err(RasscopeError::NotFound { .. })
        ));
    }
}
