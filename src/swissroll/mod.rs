//! # Swiss roll generation
//!
//! Samples a rectangle in `(t, y)` parameter space, optionally carves holes
//! into it, lifts it onto the swiss roll in 3D and adds isotropic noise.
//!
//! Every stage draws from one explicit random source, so a fixed
//! `random_state` reproduces the sampled rectangle, the holes and the noise.

use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{ManifoldError, Result};
use crate::utils::{ensure_dims, Layout};

mod holes;
pub use holes::{keep_points, make_2d_holes, rejection_probability, HoleBoundary};

/// Range of the `t` (roll angle) parameter.
pub const T_RANGE: (f64, f64) = (1.5 * PI, 4.5 * PI);
/// Range of the `y` (roll height) parameter.
pub const Y_RANGE: (f64, f64) = (4.5 * PI, 13.5 * PI);

#[derive(Debug, Clone, PartialEq)]
pub struct SwissRollConfig {
    n_samples: usize,
    noise: f64,
    nb_holes: usize,
    sigma: f64,
    boundary: HoleBoundary,
    random_state: Option<u64>,
}

impl Default for SwissRollConfig {
    fn default() -> Self {
        SwissRollConfig {
            n_samples: 1000,
            noise: 1.0,
            nb_holes: 0,
            sigma: 0.4,
            boundary: HoleBoundary::Stochastic,
            random_state: None,
        }
    }
}

impl SwissRollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Standard deviation of the Gaussian noise added in 3D. Zero disables it.
    pub fn noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn nb_holes(mut self, nb_holes: usize) -> Self {
        self.nb_holes = nb_holes;
        self
    }

    /// Scale of the Gaussian that shapes each hole.
    pub fn sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn boundary(mut self, boundary: HoleBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.noise >= 0.0) || !self.noise.is_finite() {
            return Err(ManifoldError::InvalidArgument(format!(
                "Noise must be a finite, non-negative standard deviation, got {}",
                self.noise
            )));
        }
        if self.nb_holes > self.n_samples {
            return Err(ManifoldError::InvalidArgument(format!(
                "Cannot carve {} holes into {} samples",
                self.nb_holes, self.n_samples
            )));
        }
        if self.nb_holes > 0 {
            if !(self.sigma > 0.0) {
                return Err(ManifoldError::InvalidArgument(format!(
                    "Hole sigma must be positive, got {}",
                    self.sigma
                )));
            }
            self.boundary.validate()?;
        }
        Ok(())
    }

    /// Random source for this configuration: seeded when `random_state` is
    /// set, otherwise drawn from the thread-local generator.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.random_state {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

/// A generated swiss roll.
#[derive(Debug, Clone, PartialEq)]
pub struct SwissRoll {
    /// `(n, 3)` embedded points, columns `x, y, z`.
    pub points: Array2<f64>,
    /// Roll parameter `t` of each point, used for colouring.
    pub color: Array1<f64>,
    /// `(2, n)` parameterisation, rows `t` and `y`.
    pub data_2d: Array2<f64>,
}

impl SwissRoll {
    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }

    /// The 2D parameterisation with one point per row.
    pub fn points_2d(&self) -> ArrayView2<'_, f64> {
        self.data_2d.t()
    }

    /// Distance-preservation score of each embedding against this roll's
    /// 2D parameterisation.
    pub fn distance_differences(&self, embeddings: &[Array2<f64>]) -> Result<Array1<f64>> {
        crate::distance::distance_differences(self.data_2d.view(), Layout::Columns, embeddings)
    }
}

/// Uniformly samples `n` parameter pairs, returned as a `(2, n)` array.
///
/// All `t` values are drawn before any `y` value.
pub fn make_2d_data<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array2<f64> {
    let mut data = Array2::zeros((2, n));
    for (mut row, (lo, hi)) in data.axis_iter_mut(Axis(0)).zip([T_RANGE, Y_RANGE]) {
        row.mapv_inplace(|_| lo + (hi - lo) * rng.random::<f64>());
    }
    data
}

/// Lifts a `(2, n)` parameterisation onto the swiss roll.
///
/// Returns the `(n, 3)` points with `x = t cos t`, `y = y`, `z = t sin t`
/// and the `t` row as colour.
pub fn transform_to_3d(data_2d: ArrayView2<f64>) -> Result<(Array2<f64>, Array1<f64>)> {
    ensure_dims("Swiss roll parameterisation", data_2d.nrows(), 2)?;
    let t_row = data_2d.row(0);
    let y_row = data_2d.row(1);

    let mut points = Array2::zeros((data_2d.ncols(), 3));
    for (mut point, (&t, &y)) in points.axis_iter_mut(Axis(0)).zip(t_row.iter().zip(y_row.iter())) {
        point[0] = t * t.cos();
        point[1] = y;
        point[2] = t * t.sin();
    }
    Ok((points, t_row.to_owned()))
}

/// Adds independent `Normal(0, noise^2)` perturbations to `(n, 3)` points.
///
/// Draws are made coordinate by coordinate: every `x`, then every `y`, then
/// every `z`.
pub fn add_noise<R: Rng + ?Sized>(points: &mut Array2<f64>, noise: f64, rng: &mut R) -> Result<()> {
    let normal = Normal::new(0.0, noise).map_err(|e| {
        ManifoldError::InvalidArgument(format!("Invalid noise level {}: {}", noise, e))
    })?;
    for mut column in points.axis_iter_mut(Axis(1)) {
        for value in column.iter_mut() {
            *value += normal.sample(rng);
        }
    }
    Ok(())
}

/// Generates a swiss roll described by `config`.
pub fn make_swissroll(config: &SwissRollConfig) -> Result<SwissRoll> {
    let mut rng = config.rng();
    make_swissroll_with_rng(config, &mut rng)
}

/// Generates a swiss roll drawing every random number from `rng`.
///
/// `config.random_state` is ignored here; the caller owns the seed.
pub fn make_swissroll_with_rng<R: Rng + ?Sized>(
    config: &SwissRollConfig,
    rng: &mut R,
) -> Result<SwissRoll> {
    config.validate()?;

    let mut data_2d = make_2d_data(config.n_samples, rng);

    if config.nb_holes > 0 {
        let carved = make_2d_holes(
            data_2d.t(),
            config.nb_holes,
            config.sigma,
            config.boundary,
            rng,
        )?;
        data_2d = carved.reversed_axes();
    }

    let (mut points, color) = transform_to_3d(data_2d.view())?;

    if config.noise > 0.0 {
        add_noise(&mut points, config.noise, rng)?;
    }

    log::debug!(
        "Generated swiss roll with {} of {} samples (noise = {}, holes = {})",
        points.nrows(),
        config.n_samples,
        config.noise,
        config.nb_holes
    );

    Ok(SwissRoll {
        points,
        color,
        data_2d,
    })
}
