//! Named two-dimensional view over rows of scalars.
//!
//! A matrix may be ragged: the column count is the length of its longest row
//! and every cell past the end of a shorter row reads as `None`.
use super::scalar::Scalar;
use super::vector::{ScalarVector, Vector};
use crate::error::FunctionError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATRIX_NAME: &str = "matrix";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<Scalar>>>,
}

impl Matrix {
    /// Builds from row vectors. Headers name the leading columns; the rest
    /// fall back to `column_<i>`.
    pub fn from_rows<I>(rows: I, headers: &[&str]) -> Self
    where
        I: IntoIterator<Item = ScalarVector>,
    {
        let rows: Vec<Vec<Option<Scalar>>> = rows
            .into_iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        Self::assemble_rows(rows, headers)
    }

    /// Builds from column vectors; each vector's name becomes its header.
    pub fn from_columns(columns: &[ScalarVector]) -> Self {
        let row_count = columns.iter().map(Vector::len).max().unwrap_or(0);
        let rows = (0..row_count)
            .map(|r| columns.iter().map(|c| c.get(r).copied()).collect())
            .collect();
        let headers: Vec<&str> = columns.iter().map(Vector::name).collect();
        Self::assemble(DEFAULT_MATRIX_NAME, rows, columns.len(), &headers)
    }

    /// Builds from a raw array. `None` entries stay missing.
    pub fn from_array(data: &[Vec<Option<f64>>], headers: &[&str]) -> Self {
        let rows = data
            .iter()
            .map(|row| row.iter().map(|cell| cell.map(Scalar::from)).collect())
            .collect();
        Self::assemble_rows(rows, headers)
    }

    fn assemble_rows(rows: Vec<Vec<Option<Scalar>>>, headers: &[&str]) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self::assemble(DEFAULT_MATRIX_NAME, rows, column_count, headers)
    }

    fn assemble(name: &str, rows: Vec<Vec<Option<Scalar>>>, column_count: usize, headers: &[&str]) -> Self {
        let columns = (0..column_count)
            .map(|i| headers.get(i).map(|h| h.to_string()).unwrap_or_else(|| format!("column_{}", i)))
            .collect();
        Self { name: name.to_string(), columns, rows }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, row: usize, column: usize) -> Option<Scalar> {
        self.rows.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Row `i` padded to the full column count.
    pub fn row(&self, index: usize) -> Option<Vector<Option<Scalar>>> {
        self.rows.get(index).map(|_| {
            Vector::new(
                format!("row_{}", index),
                None,
                (0..self.column_count()).map(|c| self.get(index, c)),
            )
        })
    }

    pub fn column(&self, index: usize) -> Option<Vector<Option<Scalar>>> {
        let name = self.columns.get(index)?;
        Some(Vector::new(
            name.clone(),
            None,
            (0..self.row_count()).map(|r| self.get(r, index)),
        ))
    }

    pub fn column_by_name(&self, name: &str) -> Option<Vector<Option<Scalar>>> {
        self.column_index(name).and_then(|i| self.column(i))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A fully populated column, tagged with `variable`.
    pub fn scalar_column(&self, index: usize, variable: Option<&str>) -> Result<ScalarVector, FunctionError> {
        let name = self.columns.get(index).ok_or_else(|| FunctionError::ColumnNotFound {
            matrix: self.name.clone(),
            column: index.to_string(),
        })?;
        let values = (0..self.row_count())
            .map(|r| {
                self.get(r, index).ok_or_else(|| FunctionError::MissingCell {
                    matrix: self.name.clone(),
                    row: r,
                    column: index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Vector::new(name.clone(), variable, values))
    }

    pub fn to_array(&self) -> Vec<Vec<Option<f64>>> {
        (0..self.row_count())
            .map(|r| (0..self.column_count()).map(|c| self.get(r, c).map(|s| s.as_double())).collect())
            .collect()
    }
}
