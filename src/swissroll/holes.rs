use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::distr::{Bernoulli, Distribution};
use rand::Rng;
use statrs::distribution::{Continuous, Normal};

use crate::distance::{distances_to, Euclidean};
use crate::error::{ManifoldError, Result};

/// How a hole decides which points near its centre are removed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoleBoundary {
    /// Each point is dropped with probability equal to its density ratio,
    /// giving a soft, randomly thinned hole.
    #[default]
    Stochastic,
    /// A point is dropped iff its density ratio strictly exceeds the value.
    /// Must lie in `[0, 1]`.
    Threshold(f64),
}

impl HoleBoundary {
    pub fn validate(&self) -> Result<()> {
        match *self {
            HoleBoundary::Stochastic => Ok(()),
            HoleBoundary::Threshold(t) if (0.0..=1.0).contains(&t) => Ok(()),
            HoleBoundary::Threshold(t) => Err(ManifoldError::InvalidArgument(format!(
                "Hole threshold must lie in [0, 1], got {}",
                t
            ))),
        }
    }
}

/// Ratio of the centred Gaussian density at each distance to its peak.
///
/// The ratio is 1 at the centre and decays towards 0 with distance.
pub fn rejection_probability(distance: ArrayView1<f64>, sigma: f64) -> Result<Array1<f64>> {
    let gaussian = Normal::new(0.0, sigma).map_err(|e| {
        ManifoldError::InvalidArgument(format!("Invalid hole sigma {}: {}", sigma, e))
    })?;
    let peak = gaussian.pdf(0.0);
    Ok(distance.mapv(|d| gaussian.pdf(d) / peak))
}

/// Decides, per distance, whether a point survives a single hole.
///
/// Returns `true` for points that are kept.
pub fn keep_points<R: Rng + ?Sized>(
    distance: ArrayView1<f64>,
    sigma: f64,
    boundary: HoleBoundary,
    rng: &mut R,
) -> Result<Array1<bool>> {
    boundary.validate()?;
    let probability = rejection_probability(distance, sigma)?;

    match boundary {
        HoleBoundary::Stochastic => probability
            .iter()
            .map(|&p| {
                let reject = Bernoulli::new(p.clamp(0.0, 1.0)).map_err(|e| {
                    ManifoldError::InvalidArgument(format!("Invalid rejection probability: {}", e))
                })?;
                Ok(!reject.sample(&mut *rng))
            })
            .collect(),
        HoleBoundary::Threshold(threshold) => Ok(probability.mapv(|p| p <= threshold)),
    }
}

/// Carves `nb_holes` holes into a point set holding one 2D point per row.
///
/// Centres are distinct points drawn from `rng`. A point is kept only if it
/// survives every hole.
pub fn make_2d_holes<R: Rng + ?Sized>(
    data: ArrayView2<f64>,
    nb_holes: usize,
    sigma: f64,
    boundary: HoleBoundary,
    rng: &mut R,
) -> Result<Array2<f64>> {
    let n_points = data.nrows();
    if nb_holes > n_points {
        return Err(ManifoldError::InvalidArgument(format!(
            "Cannot choose {} hole centres from {} points",
            nb_holes, n_points
        )));
    }
    if nb_holes == 0 {
        return Ok(data.to_owned());
    }
    if !(sigma > 0.0) {
        return Err(ManifoldError::InvalidArgument(format!(
            "Hole sigma must be positive, got {}",
            sigma
        )));
    }
    boundary.validate()?;

    let centers = rand::seq::index::sample(rng, n_points, nb_holes);
    let mut keep = vec![true; n_points];

    for center in centers.iter() {
        let distance = distances_to(data, data.row(center), &Euclidean);
        let survives = keep_points(distance.view(), sigma, boundary, rng)?;
        for (k, s) in keep.iter_mut().zip(survives.iter()) {
            *k &= *s;
        }
    }

    let kept: Vec<usize> = keep
        .iter()
        .enumerate()
        .filter_map(|(i, &k)| k.then_some(i))
        .collect();

    log::debug!(
        "Carved {} holes (sigma = {}), kept {} of {} points",
        nb_holes,
        sigma,
        kept.len(),
        n_points
    );

    Ok(data.select(Axis(0), &kept))
}
