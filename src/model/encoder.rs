use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One-hot encoder over a fixed number of categorical columns.
///
/// Categories are learned per column and kept sorted. A value never seen
/// during `fit` encodes as an all-zero block.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    pub fn fit<'a, R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: AsRef<[&'a str]>,
    {
        let mut columns: Vec<BTreeSet<&'a str>> = Vec::new();
        for row in rows {
            let row = row.as_ref();
            if columns.len() < row.len() {
                columns.resize_with(row.len(), BTreeSet::new);
            }
            for (column, value) in columns.iter_mut().zip(row.iter().copied()) {
                column.insert(value);
            }
        }

        Self {
            categories: columns
                .into_iter()
                .map(|c| c.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Number of categorical columns
    pub fn n_columns(&self) -> usize {
        self.categories.len()
    }

    /// Total width of the encoded output
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn categories(&self, column: usize) -> &[String] {
        self.categories.get(column).map(Vec::as_slice).unwrap_or_default()
    }

    /// Append the indicator blocks for `row` to `out`.
    pub fn transform_into(&self, row: &[&str], out: &mut Vec<f64>) {
        for (i, known) in self.categories.iter().enumerate() {
            let start = out.len();
            out.resize(start + known.len(), 0.0);
            let hit = row
                .get(i)
                .and_then(|value| known.binary_search_by(|c| c.as_str().cmp(*value)).ok());
            if let Some(pos) = hit {
                out[start + pos] = 1.0;
            }
        }
    }

    pub fn transform(&self, row: &[&str]) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.width());
        self.transform_into(row, &mut out);
        out
    }
}
