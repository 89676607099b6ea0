//! # Distance preservation
//!
//! Pairwise distance matrices and the distortion score used to compare a
//! low-dimensional embedding against the ground-truth 2D parameterisation.
//!
//! Both matrices are min-max scaled independently before they are compared,
//! so a uniform change of scale between two layouts does not show up in the
//! score. A matrix with no spread (every pairwise distance equal) cannot be
//! scaled and is reported as [`ManifoldError::DegenerateInput`].

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use num_traits::Float;
use rayon::prelude::*;

use crate::error::{ManifoldError, Result};
use crate::utils::{min_max, Layout};

pub trait DistanceMeasure: Sync {
    fn distance<T: Float>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> T;
}

pub struct Euclidean;

impl DistanceMeasure for Euclidean {
    fn distance<T: Float>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> T {
        SquaredEuclidean.distance(a, b).sqrt()
    }
}

pub struct SquaredEuclidean;

impl DistanceMeasure for SquaredEuclidean {
    fn distance<T: Float>(&self, a: ArrayView1<T>, b: ArrayView1<T>) -> T {
        a.iter().zip(b.iter()).fold(T::zero(), |acc, (&x, &y)| {
            let diff = x - y;
            acc + diff * diff
        })
    }
}

/// Full `(n, n)` matrix of pairwise distances between the points of `data`.
///
/// Rows of the result are filled in parallel; each entry only depends on the
/// two points involved, so the result is identical to a sequential fill.
pub fn pairwise_distances<T, D>(data: ArrayView2<T>, layout: Layout, measure: &D) -> Array2<T>
where
    T: Float + Send + Sync,
    D: DistanceMeasure,
{
    let points = match layout {
        Layout::Rows => data,
        Layout::Columns => data.reversed_axes(),
    };
    let n = points.nrows();
    let mut result = Array2::zeros((n, n));

    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let point = points.row(i);
            for (j, value) in row.iter_mut().enumerate() {
                *value = measure.distance(point, points.row(j));
            }
        });

    result
}

/// Distances from every point of `data` to a single `center`.
pub fn distances_to<T, D>(data: ArrayView2<T>, center: ArrayView1<T>, measure: &D) -> Array1<T>
where
    T: Float,
    D: DistanceMeasure,
{
    data.rows()
        .into_iter()
        .map(|row| measure.distance(row, center))
        .collect()
}

/// Rescales every entry to `[0, 1]` using the global minimum and maximum.
pub fn min_max_scale<T: Float>(matrix: &Array2<T>) -> Result<Array2<T>> {
    let (lo, hi) = min_max(matrix.iter().copied()).ok_or_else(|| {
        ManifoldError::DegenerateInput("Cannot scale an empty distance matrix".to_string())
    })?;
    let range = hi - lo;
    if !(range > T::zero()) || !range.is_finite() {
        return Err(ManifoldError::DegenerateInput(
            "All pairwise distances are equal, min-max scaling is undefined".to_string(),
        ));
    }
    Ok(matrix.mapv(|v| (v - lo) / range))
}

pub fn frobenius_distance<T: Float>(a: &Array2<T>, b: &Array2<T>) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| {
            let diff = x - y;
            acc + diff * diff
        })
        .sqrt()
}

/// Distortion of each embedding relative to `reference`.
///
/// `reference` is laid out according to `layout`; every embedding holds one
/// point per row and must contain as many points as the reference. The
/// returned array has one score per embedding, lower meaning the relative
/// pairwise distances were better preserved.
pub fn distance_differences(
    reference: ArrayView2<f64>,
    layout: Layout,
    embeddings: &[Array2<f64>],
) -> Result<Array1<f64>> {
    let n_points = layout.n_points(&reference);
    let scaled_reference = min_max_scale(&pairwise_distances(reference, layout, &Euclidean))?;

    let mut differences = Array1::zeros(embeddings.len());
    for (i, embedding) in embeddings.iter().enumerate() {
        if embedding.nrows() != n_points {
            return Err(ManifoldError::ShapeMismatch(format!(
                "Embedding {} has {} points, the reference has {}",
                i,
                embedding.nrows(),
                n_points
            )));
        }
        let distances = pairwise_distances(embedding.view(), Layout::Rows, &Euclidean);
        let scaled = min_max_scale(&distances)?;
        differences[i] = frobenius_distance(&scaled_reference, &scaled);
    }

    log::debug!(
        "Computed distance differences for {} embeddings of {} points",
        embeddings.len(),
        n_points
    );
    Ok(differences)
}
