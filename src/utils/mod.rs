use ndarray::ArrayView2;
use num_traits::Float;

use crate::error::{ManifoldError, Result};

/// Orientation of a point set stored in a 2D array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One point per row, `(n_points, n_dims)`.
    Rows,
    /// One point per column, `(n_dims, n_points)`.
    Columns,
}

impl Layout {
    pub fn n_points<T>(&self, data: &ArrayView2<T>) -> usize {
        match self {
            Layout::Rows => data.nrows(),
            Layout::Columns => data.ncols(),
        }
    }

    pub fn n_dims<T>(&self, data: &ArrayView2<T>) -> usize {
        match self {
            Layout::Rows => data.ncols(),
            Layout::Columns => data.nrows(),
        }
    }
}

/// Minimum and maximum of a sequence, `None` when empty.
pub fn min_max<T, I>(values: I) -> Option<(T, T)>
where
    T: Float,
    I: IntoIterator<Item = T>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

pub(crate) fn ensure_len(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(ManifoldError::ShapeMismatch(format!(
            "Length of {} ({}) does not match the number of points ({})",
            what, actual, expected
        )));
    }
    Ok(())
}

pub(crate) fn ensure_dims(what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(ManifoldError::ShapeMismatch(format!(
            "{} must have {} dimensions, got {}",
            what, expected, actual
        )));
    }
    Ok(())
}
