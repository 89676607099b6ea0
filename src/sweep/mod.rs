//! # Hyperparameter sweeps
//!
//! Containers for embeddings computed across one or two sweep variables,
//! kept in lockstep with their error, run time and distance-difference
//! scores so the plotting layer never has to guess at index order.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::error::{ManifoldError, Result};
use crate::swissroll::SwissRoll;
use crate::utils::ensure_len;

/// Distribution names used when the augmentation is [`Augmentation::Distribution`].
pub const DISTRIBUTIONS: [&str; 4] = ["uniform", "normal", "mixed_normal", "beta"];

/// Hole setups used when the augmentation is [`Augmentation::Holes`].
pub const HOLE_SETUPS: [&str; 6] = [
    "1: 1 hole, size 2",
    "2: 1 hole, size 5",
    "3: 2 holes, size 2",
    "4: 2 holes, size 5",
    "5: 3 holes, size 2",
    "6: 3 holes, size 5",
];

/// Hyperparameter of the dimensionality reduction that a sweep varies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepVariable {
    Perplexity,
    LearningRate,
    Threshold,
    EarlyExaggeration,
    NNeighbors,
    Regularization,
    Other(String),
}

impl SweepVariable {
    /// Short axis label.
    pub fn label(&self) -> &str {
        match self {
            SweepVariable::Perplexity => "perplexity",
            SweepVariable::LearningRate => "learning_rate",
            SweepVariable::Threshold => "threshold",
            SweepVariable::EarlyExaggeration => "early_exaggeration",
            SweepVariable::NNeighbors => "n_neighbors",
            SweepVariable::Regularization => "reg",
            SweepVariable::Other(name) => name.as_str(),
        }
    }

    pub fn describe(&self, value: f64) -> String {
        match self {
            SweepVariable::Perplexity => format!("The perplexity is {}", value),
            SweepVariable::LearningRate => format!("The learning rate is {}", value),
            SweepVariable::Threshold => format!("The threshold is {}", value),
            SweepVariable::EarlyExaggeration => format!("The early exaggeration is {}", value),
            SweepVariable::NNeighbors => format!("The n_neighbors is {}", value),
            SweepVariable::Regularization => format!("The regularization term is {}", value),
            SweepVariable::Other(name) => format!("The {} is {}", name, value),
        }
    }

    /// Whether diagnostics over this variable read best on a log x axis.
    pub fn log_scale(&self) -> bool {
        matches!(self, SweepVariable::Threshold | SweepVariable::Regularization)
    }
}

impl fmt::Display for SweepVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SweepVariable {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "per" | "perplexity" => SweepVariable::Perplexity,
            "learning_rate" => SweepVariable::LearningRate,
            "threshold" => SweepVariable::Threshold,
            "early_exaggeration" => SweepVariable::EarlyExaggeration,
            "n_neighbors" => SweepVariable::NNeighbors,
            "reg" => SweepVariable::Regularization,
            other => SweepVariable::Other(other.to_string()),
        })
    }
}

/// Aspect of the dataset that is varied between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Augmentation {
    Noise,
    Distribution,
    Datapoints,
    Holes,
}

impl Augmentation {
    pub fn label(&self) -> &'static str {
        match self {
            Augmentation::Noise => "noise",
            Augmentation::Distribution => "distribution",
            Augmentation::Datapoints => "datapoints",
            Augmentation::Holes => "holes",
        }
    }

    /// Human-readable description of the `index`-th dataset.
    pub fn describe(&self, index: usize, value: f64) -> String {
        match self {
            Augmentation::Noise => format!("The noise is {}", value),
            Augmentation::Datapoints => format!("The number of datapoints is {}", value),
            Augmentation::Distribution => format!(
                "The distribution is {}",
                DISTRIBUTIONS.get(index).copied().unwrap_or("unknown")
            ),
            Augmentation::Holes => HOLE_SETUPS
                .get(index)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("{}: hole setup {}", index + 1, value)),
        }
    }

    /// Title of the 3D panel showing the `index`-th dataset.
    pub fn panel_title(&self, index: usize, value: f64) -> String {
        match self {
            Augmentation::Distribution => format!(
                "{}-distributed points",
                DISTRIBUTIONS.get(index).copied().unwrap_or("unknown")
            ),
            _ => format!("{}: {:.2}", self.label(), value),
        }
    }
}

impl fmt::Display for Augmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error, run time and distance-difference series over one sweep variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub values: Vec<f64>,
    pub error: Vec<f64>,
    pub times: Vec<f64>,
    pub difference: Vec<f64>,
}

impl Diagnostics {
    pub fn new(
        values: Vec<f64>,
        error: Vec<f64>,
        times: Vec<f64>,
        difference: Vec<f64>,
    ) -> Result<Self> {
        ensure_len("error", error.len(), values.len())?;
        ensure_len("times", times.len(), values.len())?;
        ensure_len("difference", difference.len(), values.len())?;
        Ok(Diagnostics {
            values,
            error,
            times,
            difference,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn check_embedding(embedding: &Array2<f64>, n_points: usize) -> Result<()> {
    if embedding.ncols() < 2 {
        return Err(ManifoldError::ShapeMismatch(format!(
            "Embeddings need at least 2 components, got {}",
            embedding.ncols()
        )));
    }
    ensure_len("embedding", embedding.nrows(), n_points)
}

/// Embeddings computed for each value of a single sweep variable.
#[derive(Debug, Clone)]
pub struct EmbeddingSweep {
    pub variable: SweepVariable,
    pub values: Vec<f64>,
    pub embeddings: Vec<Array2<f64>>,
    pub color: Array1<f64>,
    pub diagnostics: Option<Diagnostics>,
}

impl EmbeddingSweep {
    pub fn new(
        variable: SweepVariable,
        values: Vec<f64>,
        embeddings: Vec<Array2<f64>>,
        color: Array1<f64>,
    ) -> Result<Self> {
        ensure_len("embeddings", embeddings.len(), values.len())?;
        for embedding in &embeddings {
            check_embedding(embedding, color.len())?;
        }
        Ok(EmbeddingSweep {
            variable,
            values,
            embeddings,
            color,
            diagnostics: None,
        })
    }

    /// Attaches error and timing series; differences are computed against
    /// the 2D parameterisation of `roll`.
    pub fn with_diagnostics(
        mut self,
        error: Vec<f64>,
        times: Vec<f64>,
        roll: &SwissRoll,
    ) -> Result<Self> {
        let difference = roll.distance_differences(&self.embeddings)?.to_vec();
        self.diagnostics = Some(Diagnostics::new(self.values.clone(), error, times, difference)?);
        Ok(self)
    }

    pub fn set_diagnostics(&mut self, diagnostics: Diagnostics) -> Result<()> {
        ensure_len("diagnostics", diagnostics.len(), self.values.len())?;
        self.diagnostics = Some(diagnostics);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<(f64, &Array2<f64>)> {
        match (self.values.get(index), self.embeddings.get(index)) {
            (Some(&value), Some(embedding)) => Ok((value, embedding)),
            _ => Err(ManifoldError::InvalidArgument(format!(
                "Sweep index {} out of range for {} values",
                index,
                self.values.len()
            ))),
        }
    }
}

/// Scores attached to a single embedding of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub embedding: Array2<f64>,
    pub error: Option<f64>,
    pub time: Option<f64>,
    pub difference: Option<f64>,
}

impl GridCell {
    pub fn new(embedding: Array2<f64>) -> Self {
        GridCell {
            embedding,
            error: None,
            time: None,
            difference: None,
        }
    }

    pub fn error(mut self, error: f64) -> Self {
        self.error = Some(error);
        self
    }

    pub fn time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }
}

/// Embeddings over a dataset augmentation (outer key) and a hyperparameter
/// (inner key), addressed by `(outer index, inner index)`.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    pub augmentation: Augmentation,
    pub outer_values: Vec<f64>,
    pub variable: SweepVariable,
    pub inner_values: Vec<f64>,
    colors: Vec<Array1<f64>>,
    cells: BTreeMap<(usize, usize), GridCell>,
}

impl SweepGrid {
    /// `colors[j]` holds the point colours of the `j`-th dataset.
    pub fn new(
        augmentation: Augmentation,
        outer_values: Vec<f64>,
        variable: SweepVariable,
        inner_values: Vec<f64>,
        colors: Vec<Array1<f64>>,
    ) -> Result<Self> {
        ensure_len("colors", colors.len(), outer_values.len())?;
        Ok(SweepGrid {
            augmentation,
            outer_values,
            variable,
            inner_values,
            colors,
            cells: BTreeMap::new(),
        })
    }

    fn check_key(&self, outer: usize, inner: usize) -> Result<()> {
        if outer >= self.outer_values.len() || inner >= self.inner_values.len() {
            return Err(ManifoldError::InvalidArgument(format!(
                "Grid key ({}, {}) outside a {} x {} sweep",
                outer,
                inner,
                self.outer_values.len(),
                self.inner_values.len()
            )));
        }
        Ok(())
    }

    pub fn insert(&mut self, outer: usize, inner: usize, cell: GridCell) -> Result<()> {
        self.check_key(outer, inner)?;
        check_embedding(&cell.embedding, self.colors[outer].len())?;
        self.cells.insert((outer, inner), cell);
        Ok(())
    }

    pub fn get(&self, outer: usize, inner: usize) -> Option<&GridCell> {
        self.cells.get(&(outer, inner))
    }

    pub fn color(&self, outer: usize) -> Option<&Array1<f64>> {
        self.colors.get(outer)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Computes the distance difference of every stored embedding against
    /// the 2D parameterisation of the dataset it was computed on.
    pub fn fill_differences(&mut self, rolls: &[SwissRoll]) -> Result<()> {
        ensure_len("rolls", rolls.len(), self.outer_values.len())?;
        for (&(outer, _), cell) in self.cells.iter_mut() {
            let difference =
                rolls[outer].distance_differences(std::slice::from_ref(&cell.embedding))?;
            cell.difference = Some(difference[0]);
        }
        Ok(())
    }

    /// Diagnostics along the outer axis for a fixed inner index.
    ///
    /// Every cell of the column must be present and carry all three scores.
    pub fn column(&self, inner: usize) -> Result<Diagnostics> {
        let n = self.outer_values.len();
        let mut error = Vec::with_capacity(n);
        let mut times = Vec::with_capacity(n);
        let mut difference = Vec::with_capacity(n);

        for outer in 0..n {
            self.check_key(outer, inner)?;
            let cell = self.get(outer, inner).ok_or_else(|| {
                ManifoldError::InvalidArgument(format!("Missing grid cell ({}, {})", outer, inner))
            })?;
            match (cell.error, cell.time, cell.difference) {
                (Some(e), Some(t), Some(d)) => {
                    error.push(e);
                    times.push(t);
                    difference.push(d);
                }
                _ => {
                    return Err(ManifoldError::InvalidArgument(format!(
                        "Grid cell ({}, {}) has incomplete diagnostics",
                        outer, inner
                    )))
                }
            }
        }

        Diagnostics::new(self.outer_values.clone(), error, times, difference)
    }
}
