//! # Plotting
//!
//! Presentation layer for generated datasets and the embeddings computed
//! from them. Every function consumes already-computed arrays and writes one
//! figure to the path named in its [`PlotConfig`]; nothing here feeds back
//! into the numeric code.
//!
//! Figures ending in `.svg` are written with the SVG backend. Raster formats
//! (`png`, `jpg`, `bmp`, `gif`, `tiff`) use the bitmap backend, which can
//! only rasterise text when the `ttf` feature is enabled; without it, bitmap
//! output is refused with an error.

use std::path::{Path, PathBuf};

use anyhow::Context;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::utils::min_max;

pub mod colormap;
mod diagnostics;
mod digits;
mod embedding;
mod scatter;

pub use diagnostics::{plot_error_dist_and_time, DiagnosticsConfig};
pub use digits::{plot_digits_samples, tile_digits};
pub use embedding::{plot_embedding, scale_embedding, select_thumbnails, EmbeddingPlotConfig};
pub use scatter::{
    plot_2d, plot_3d, plot_augmented_swissrolls, plot_grid_embedding, plot_sweep_embedding,
    SweepPlotConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Bitmap,
}

/// Where and how large a figure is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    output: PathBuf,
    size: (u32, u32),
    title: Option<String>,
}

impl PlotConfig {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        PlotConfig {
            output: output.into(),
            size: (1000, 800),
            title: None,
        }
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.size
    }

    pub fn caption(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Output format implied by the file extension, `None` when unsupported.
    pub fn format(&self) -> Option<OutputFormat> {
        let ext = self.output.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Some(OutputFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" | "gif" | "tif" | "tiff" => Some(OutputFormat::Bitmap),
            _ => None,
        }
    }
}

/// Something that can draw itself onto any plotters backend.
pub trait Figure {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Renders `figure` to the file described by `config`, creating parent
/// directories as needed.
pub fn render<F: Figure>(figure: &F, config: &PlotConfig) -> anyhow::Result<()> {
    let path = config.output();
    let format = config
        .format()
        .with_context(|| format!("Unsupported figure format: {}", path.display()))?;
    if format == OutputFormat::Bitmap && !cfg!(feature = "ttf") {
        anyhow::bail!(
            "Cannot write {}: bitmap figures need the `ttf` feature, use an .svg path instead",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    match format {
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, config.dimensions()).into_drawing_area();
            draw_on(figure, &root)?;
        }
        OutputFormat::Bitmap => {
            let root = BitMapBackend::new(path, config.dimensions()).into_drawing_area();
            draw_on(figure, &root)?;
        }
    }

    log::info!("Figure saved to {}", path.display());
    Ok(())
}

/// Renders `figure` into an in-memory SVG document.
pub fn render_svg_string<F: Figure>(figure: &F, size: (u32, u32)) -> anyhow::Result<String> {
    let mut buffer = String::new();
    {
        let root = SVGBackend::with_string(&mut buffer, size).into_drawing_area();
        draw_on(figure, &root)?;
    }
    Ok(buffer)
}

fn draw_on<F, DB>(figure: &F, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
where
    F: Figure,
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    figure.draw(root)?;
    root.present()?;
    Ok(())
}

/// Axis range covering `values` with a margin on both sides.
pub(crate) fn padded_range<I>(values: I) -> std::ops::Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    match min_max(values.into_iter().filter(|v| v.is_finite())) {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
        Some((v, _)) => (v - 1.0)..(v + 1.0),
        None => 0.0..1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(PlotConfig::new("out/fig.svg").format(), Some(OutputFormat::Svg));
        assert_eq!(PlotConfig::new("out/fig.SVG").format(), Some(OutputFormat::Svg));
        assert_eq!(PlotConfig::new("out/fig.png").format(), Some(OutputFormat::Bitmap));
        assert_eq!(PlotConfig::new("out/fig.pdf").format(), None);
        assert_eq!(PlotConfig::new("fig").format(), None);
    }

    struct Labelled;

    impl Figure for Labelled {
        fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
        where
            DB: DrawingBackend,
            DB::ErrorType: 'static,
        {
            let mut chart = ChartBuilder::on(root)
                .caption("labelled", ("sans-serif", 20).into_font())
                .x_label_area_size(30)
                .y_label_area_size(30)
                .build_cartesian_2d(0f64..1f64, 0f64..1f64)?;
            chart.configure_mesh().draw()?;
            Ok(())
        }
    }

    #[cfg(not(feature = "ttf"))]
    #[test]
    fn test_render_png_without_fonts_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelled.png");
        let err = render(&Labelled, &PlotConfig::new(&path)).unwrap_err();
        assert!(err.to_string().contains("ttf"));
        assert!(!path.exists());
    }

    #[cfg(feature = "ttf")]
    #[test]
    fn test_render_png_with_fonts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelled.png");
        render(&Labelled, &PlotConfig::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_unsupported_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images").join("labelled.pdf");
        let err = render(&Labelled, &PlotConfig::new(&path)).unwrap_err();
        assert!(err.to_string().contains("Unsupported figure format"));
    }

    #[test]
    fn test_render_svg_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labelled.svg");
        render(&Labelled, &PlotConfig::new(&path)).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("labelled"));
    }

    #[test]
    fn test_padded_range() {
        let r = padded_range(vec![0.0, 10.0]);
        assert!(r.start < 0.0 && r.end > 10.0);
        assert_eq!(padded_range(vec![2.0, 2.0]), 1.0..3.0);
        assert_eq!(padded_range(Vec::new()), 0.0..1.0);
    }
}
