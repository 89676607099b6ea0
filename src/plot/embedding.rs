// Digit embedding view modelled on the scikit-learn "plot_lle_digits" example
// (BSD 3 clause, (C) INRIA 2011).
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{gray_r, map_colors, set1};
use super::{render, Figure, PlotConfig};
use crate::distance::{DistanceMeasure, SquaredEuclidean};
use crate::error::{ManifoldError, Result};
use crate::utils::{ensure_len, min_max};

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingPlotConfig {
    /// Overlay thumbnails of the original images.
    pub images: bool,
    /// Squared distance (in scaled coordinates) below which a thumbnail is
    /// suppressed because another one is already shown nearby.
    pub im_thres: f64,
    /// Side length of a thumbnail in scaled coordinates.
    pub thumbnail_extent: f64,
}

impl Default for EmbeddingPlotConfig {
    fn default() -> Self {
        EmbeddingPlotConfig {
            images: false,
            im_thres: 3e-3,
            thumbnail_extent: 0.05,
        }
    }
}

impl EmbeddingPlotConfig {
    pub fn images(mut self, images: bool) -> Self {
        self.images = images;
        self
    }

    pub fn im_thres(mut self, im_thres: f64) -> Self {
        self.im_thres = im_thres;
        self
    }
}

/// Min-max scales every column, then shrinks by 10% and shifts by 0.05 so
/// that no point sits on the edge of the unit square.
pub fn scale_embedding(embedding: ArrayView2<f64>) -> Result<Array2<f64>> {
    let mut scaled = embedding.to_owned();
    for (j, mut column) in scaled.axis_iter_mut(Axis(1)).enumerate() {
        let (lo, hi) = min_max(column.iter().copied()).ok_or_else(|| {
            ManifoldError::DegenerateInput("Cannot scale an empty embedding".to_string())
        })?;
        let range = hi - lo;
        if !(range > 0.0) {
            return Err(ManifoldError::DegenerateInput(format!(
                "Embedding component {} is constant",
                j
            )));
        }
        column.mapv_inplace(|v| (v - lo) / (range * 1.1) + 0.05);
    }
    Ok(scaled)
}

/// Indices of the points that get a thumbnail, in order.
///
/// A point is skipped while it lies closer than `im_thres` (squared distance)
/// to an already shown thumbnail, starting from a sentinel at `(1, 1)`.
pub fn select_thumbnails(scaled: ArrayView2<f64>, im_thres: f64) -> Vec<usize> {
    let mut shown: Vec<ArrayView1<f64>> = Vec::new();
    let sentinel = ndarray::arr1(&[1.0, 1.0]);
    let mut selected = Vec::new();

    for (i, point) in scaled.rows().into_iter().enumerate() {
        let nearest = shown
            .iter()
            .map(|s| SquaredEuclidean.distance(point, *s))
            .chain(std::iter::once(SquaredEuclidean.distance(point, sentinel.view())))
            .fold(f64::INFINITY, f64::min);
        if nearest < im_thres {
            continue;
        }
        shown.push(point);
        selected.push(i);
    }
    selected
}

/// Side length of square images holding `n_pixels` pixels.
pub(crate) fn square_side(n_pixels: usize) -> Result<usize> {
    let side = (n_pixels as f64).sqrt().round() as usize;
    if side * side != n_pixels {
        return Err(ManifoldError::ShapeMismatch(format!(
            "Images with {} pixels cannot be reshaped into a square",
            n_pixels
        )));
    }
    Ok(side)
}

struct Thumbnail {
    center: (f64, f64),
    side: usize,
    pixels: Vec<f64>,
}

struct EmbeddingFigure {
    labels: Vec<(f64, f64, usize)>,
    thumbnails: Vec<Thumbnail>,
    extent: f64,
    title: Option<String>,
}

impl Figure for EmbeddingFigure {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(30)
            .y_label_area_size(30);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 30).into_font());
        }
        let mut chart = builder.build_cartesian_2d(0f64..1f64, 0f64..1f64)?;
        chart.configure_mesh().disable_mesh().draw()?;

        for thumb in &self.thumbnails {
            let pixel = self.extent / thumb.side as f64;
            let shades = map_colors(&thumb.pixels, gray_r);
            let (x0, y0) = (
                thumb.center.0 - self.extent / 2.0,
                thumb.center.1 + self.extent / 2.0,
            );
            chart.draw_series(shades.iter().enumerate().map(|(k, shade)| {
                let (r, c) = (k / thumb.side, k % thumb.side);
                Rectangle::new(
                    [
                        (x0 + c as f64 * pixel, y0 - r as f64 * pixel),
                        (x0 + (c + 1) as f64 * pixel, y0 - (r + 1) as f64 * pixel),
                    ],
                    shade.filled(),
                )
            }))?;
        }

        chart.draw_series(self.labels.iter().map(|&(x, y, label)| {
            let style = ("sans-serif", 9)
                .into_font()
                .style(FontStyle::Bold)
                .color(&set1(label as f64 / 10.0));
            Text::new(label.to_string(), (x, y), style)
        }))?;
        Ok(())
    }
}

/// Plots a 2D embedding as class labels, optionally with thumbnails of the
/// original images spread across the plot.
///
/// `originals` holds one flattened square image per row and is only read
/// when thumbnails are enabled.
pub fn plot_embedding(
    originals: ArrayView2<f64>,
    embedding: ArrayView2<f64>,
    labels: &[usize],
    options: &EmbeddingPlotConfig,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    if embedding.ncols() < 2 {
        return Err(ManifoldError::ShapeMismatch(format!(
            "Embeddings need at least 2 components, got {}",
            embedding.ncols()
        ))
        .into());
    }
    ensure_len("labels", labels.len(), embedding.nrows())?;
    let scaled = scale_embedding(embedding)?;

    let thumbnails = if options.images {
        ensure_len("original images", originals.nrows(), embedding.nrows())?;
        let side = square_side(originals.ncols())?;
        select_thumbnails(scaled.view(), options.im_thres)
            .into_iter()
            .map(|i| Thumbnail {
                center: (scaled[[i, 0]], scaled[[i, 1]]),
                side,
                pixels: originals.row(i).to_vec(),
            })
            .collect()
    } else {
        Vec::new()
    };
    log::debug!("Drawing {} thumbnails", thumbnails.len());

    let figure = EmbeddingFigure {
        labels: scaled
            .rows()
            .into_iter()
            .zip(labels)
            .map(|(row, &label)| (row[0], row[1], label))
            .collect(),
        thumbnails,
        extent: options.thumbnail_extent,
        title: config.caption().map(str::to_string),
    };
    render(&figure, config)
}
