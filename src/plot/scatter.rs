use ndarray::{ArrayView1, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{map_colors, spectral};
use super::diagnostics::{DiagnosticsConfig, DiagnosticsFigure};
use super::{padded_range, render, Figure, PlotConfig};
use crate::error::ManifoldError;
use crate::swissroll::SwissRoll;
use crate::sweep::{Augmentation, Diagnostics, EmbeddingSweep, SweepGrid};
use crate::utils::{ensure_dims, ensure_len};

const PANELS_PER_ROW: usize = 3;

/// Options shared by the sweep embedding views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SweepPlotConfig {
    /// Name of the reduction method, used as scatter title ("t-SNE", "LLE").
    pub transformation: String,
    /// Label of the error panel, e.g. "KL divergence".
    pub error_label: Option<String>,
}

impl SweepPlotConfig {
    pub fn new(transformation: impl Into<String>) -> Self {
        SweepPlotConfig {
            transformation: transformation.into(),
            error_label: None,
        }
    }

    pub fn error_label(mut self, label: impl Into<String>) -> Self {
        self.error_label = Some(label.into());
        self
    }
}

fn draw_scatter_2d<DB>(
    area: &DrawingArea<DB, Shift>,
    points: &[(f64, f64)],
    colors: &[RGBColor],
    title: Option<&str>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(45);
    if let Some(title) = title {
        builder.caption(title, ("sans-serif", 22).into_font());
    }
    let mut chart = builder.build_cartesian_2d(
        padded_range(points.iter().map(|p| p.0)),
        padded_range(points.iter().map(|p| p.1)),
    )?;
    chart.configure_mesh().draw()?;
    chart.draw_series(
        points
            .iter()
            .zip(colors)
            .map(|(&p, c)| Circle::new(p, 3, c.filled())),
    )?;
    Ok(())
}

fn draw_scatter_3d<DB>(
    area: &DrawingArea<DB, Shift>,
    points: &[(f64, f64, f64)],
    colors: &[RGBColor],
    title: Option<&str>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if let Some(title) = title {
        builder.caption(title, ("sans-serif", 20).into_font());
    }
    let mut chart = builder.build_cartesian_3d(
        padded_range(points.iter().map(|p| p.0)),
        padded_range(points.iter().map(|p| p.1)),
        padded_range(points.iter().map(|p| p.2)),
    )?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.3;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart.configure_axes().draw()?;
    chart.draw_series(
        points
            .iter()
            .zip(colors)
            .map(|(&p, c)| Circle::new(p, 2, c.filled())),
    )?;
    Ok(())
}

fn rows_2d(data: ArrayView2<f64>) -> Vec<(f64, f64)> {
    data.rows().into_iter().map(|r| (r[0], r[1])).collect()
}

fn rows_3d(data: ArrayView2<f64>) -> Vec<(f64, f64, f64)> {
    data.rows()
        .into_iter()
        .map(|r| (r[0], r[1], r[2]))
        .collect()
}

struct Scatter2d {
    points: Vec<(f64, f64)>,
    colors: Vec<RGBColor>,
    title: Option<String>,
}

impl Figure for Scatter2d {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        draw_scatter_2d(root, &self.points, &self.colors, self.title.as_deref())
    }
}

struct Scatter3dGrid {
    panels: Vec<(Vec<(f64, f64, f64)>, Vec<RGBColor>, Option<String>)>,
}

impl Figure for Scatter3dGrid {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let cols = self.panels.len().clamp(1, PANELS_PER_ROW);
        let rows = self.panels.len().div_ceil(PANELS_PER_ROW).max(1);
        let areas = root.split_evenly((rows, cols));
        for (area, (points, colors, title)) in areas.iter().zip(&self.panels) {
            draw_scatter_3d(area, points, colors, title.as_deref())?;
        }
        Ok(())
    }
}

/// Scatter plot of a `(2, n)` parameterisation coloured by `color`.
pub fn plot_2d(
    data: ArrayView2<f64>,
    color: ArrayView1<f64>,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    ensure_dims("2D scatter data", data.nrows(), 2)?;
    ensure_len("color", color.len(), data.ncols())?;
    let figure = Scatter2d {
        points: rows_2d(data.reversed_axes()),
        colors: map_colors(&color.to_vec(), spectral),
        title: config.caption().map(str::to_string),
    };
    render(&figure, config)
}

/// 3D scatter plot of `(n, 3)` points coloured by `color`.
pub fn plot_3d(
    points: ArrayView2<f64>,
    color: ArrayView1<f64>,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    ensure_dims("3D scatter data", points.ncols(), 3)?;
    ensure_len("color", color.len(), points.nrows())?;
    let figure = Scatter3dGrid {
        panels: vec![(
            rows_3d(points),
            map_colors(&color.to_vec(), spectral),
            config.caption().map(str::to_string),
        )],
    };
    render(&figure, config)
}

/// One 3D panel per augmented swiss roll, three panels per row.
///
/// `values[i]` is the augmentation value of `rolls[i]` (noise level, hole
/// setup id, distribution index).
pub fn plot_augmented_swissrolls(
    rolls: &[SwissRoll],
    values: &[f64],
    augmentation: Augmentation,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    ensure_len("values", values.len(), rolls.len())?;
    let panels = rolls
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (roll, &value))| {
            (
                rows_3d(roll.points.view()),
                map_colors(&roll.color.to_vec(), spectral),
                Some(augmentation.panel_title(i, value)),
            )
        })
        .collect();
    render(&Scatter3dGrid { panels }, config)
}

struct EmbeddingWithDiagnostics<'a> {
    scatter: Scatter2d,
    diagnostics: Option<(&'a Diagnostics, DiagnosticsConfig)>,
}

impl Figure for EmbeddingWithDiagnostics<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match &self.diagnostics {
            None => self.scatter.draw(root),
            Some((diagnostics, options)) => {
                let (_, height) = root.dim_in_pixel();
                let (top, bottom) = root.split_vertically(height * 3 / 5);
                self.scatter.draw(&top)?;
                DiagnosticsFigure {
                    diagnostics: *diagnostics,
                    options,
                }
                .draw(&bottom)
            }
        }
    }
}

/// Scatter of the `index`-th embedding of a sweep, above the sweep's
/// diagnostics with that value highlighted when diagnostics are attached.
pub fn plot_sweep_embedding(
    sweep: &EmbeddingSweep,
    index: usize,
    options: &SweepPlotConfig,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    let (value, embedding) = sweep.get(index)?;
    log::info!("{}", sweep.variable.describe(value));

    let diagnostics = sweep.diagnostics.as_ref().map(|d| {
        let mut diag_options = DiagnosticsConfig::for_variable(&sweep.variable).highlight(index);
        diag_options.error_label = options.error_label.clone();
        (d, diag_options)
    });

    let figure = EmbeddingWithDiagnostics {
        scatter: Scatter2d {
            points: rows_2d(embedding.view()),
            colors: map_colors(&sweep.color.to_vec(), spectral),
            title: Some(options.transformation.clone()),
        },
        diagnostics,
    };
    render(&figure, config)
}

/// Scatter of the embedding at `(outer, inner)` of a grid, above the
/// diagnostics along the outer axis for that inner value.
///
/// Diagnostics are drawn only when every cell of the column carries them.
pub fn plot_grid_embedding(
    grid: &SweepGrid,
    outer: usize,
    inner: usize,
    options: &SweepPlotConfig,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    let cell = grid.get(outer, inner).ok_or_else(|| {
        ManifoldError::InvalidArgument(format!("No embedding stored at ({}, {})", outer, inner))
    })?;
    let color = grid.color(outer).ok_or_else(|| {
        ManifoldError::InvalidArgument(format!("No colours for dataset {}", outer))
    })?;

    log::info!(
        "{}",
        grid.augmentation.describe(outer, grid.outer_values[outer])
    );
    log::info!("{}", grid.variable.describe(grid.inner_values[inner]));

    let column = match grid.column(inner) {
        Ok(column) => Some(column),
        Err(e) => {
            log::debug!("Skipping grid diagnostics: {}", e);
            None
        }
    };
    let diagnostics = column.as_ref().map(|d| {
        let mut diag_options = DiagnosticsConfig::new(grid.augmentation.label()).highlight(outer);
        diag_options.error_label = options.error_label.clone();
        (d, diag_options)
    });

    let figure = EmbeddingWithDiagnostics {
        scatter: Scatter2d {
            points: rows_2d(cell.embedding.view()),
            colors: map_colors(&color.to_vec(), spectral),
            title: Some(options.transformation.clone()),
        },
        diagnostics,
    };
    render(&figure, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::render_svg_string;
    use crate::swissroll::{make_swissroll, SwissRollConfig};
    use crate::sweep::{GridCell, SweepVariable};

    fn roll(seed: u64, noise: f64) -> SwissRoll {
        make_swissroll(
            &SwissRollConfig::new()
                .n_samples(60)
                .noise(noise)
                .random_state(seed),
        )
        .unwrap()
    }

    #[test]
    fn test_plot_2d_and_3d() {
        let r = roll(1, 0.5);
        let dir = tempfile::tempdir().unwrap();
        let path_2d = dir.path().join("roll_2d.svg");
        let path_3d = dir.path().join("roll_3d.svg");
        plot_2d(r.data_2d.view(), r.color.view(), &PlotConfig::new(&path_2d)).unwrap();
        plot_3d(
            r.points.view(),
            r.color.view(),
            &PlotConfig::new(&path_3d).title("swiss roll"),
        )
        .unwrap();
        assert!(path_2d.exists());
        assert!(std::fs::read_to_string(&path_3d).unwrap().contains("swiss roll"));
    }

    #[test]
    fn test_plot_2d_color_mismatch() {
        let r = roll(1, 0.0);
        let short = r.color.slice(ndarray::s![..10]).to_owned();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mismatch.svg");
        let err = plot_2d(r.data_2d.view(), short.view(), &PlotConfig::new(&path)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ManifoldError>(),
            Some(ManifoldError::ShapeMismatch(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_augmented_panel_titles() {
        let rolls = vec![roll(1, 0.0), roll(2, 0.5), roll(3, 1.0), roll(4, 1.5)];
        let figure = Scatter3dGrid {
            panels: rolls
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    (
                        rows_3d(r.points.view()),
                        map_colors(&r.color.to_vec(), spectral),
                        Some(Augmentation::Noise.panel_title(i, i as f64 * 0.5)),
                    )
                })
                .collect(),
        };
        let svg = render_svg_string(&figure, (1500, 1000)).unwrap();
        assert!(svg.contains("noise: 0.00"));
        assert!(svg.contains("noise: 1.50"));

        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::new(dir.path().join("augmented.svg"));
        let values = [0.0, 0.5, 1.0, 1.5];
        plot_augmented_swissrolls(&rolls, &values, Augmentation::Noise, &config).unwrap();
        assert!(config.output().exists());
        assert!(plot_augmented_swissrolls(&rolls, &[0.0], Augmentation::Noise, &config).is_err());
    }

    #[test]
    fn test_plot_sweep_embedding() {
        let r = roll(5, 0.0);
        let base = r.points_2d().to_owned();
        let sweep = EmbeddingSweep::new(
            SweepVariable::Perplexity,
            vec![5.0, 30.0],
            vec![base.clone(), base.mapv(|v| v * 2.0)],
            r.color.clone(),
        )
        .unwrap()
        .with_diagnostics(vec![1.2, 0.9], vec![0.3, 0.4], &r)
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::new(dir.path().join("sweep.svg"));
        plot_sweep_embedding(
            &sweep,
            1,
            &SweepPlotConfig::new("t-SNE").error_label("KL divergence"),
            &config,
        )
        .unwrap();
        let svg = std::fs::read_to_string(config.output()).unwrap();
        assert!(svg.contains("t-SNE"));
        assert!(svg.contains("KL divergence"));

        assert!(plot_sweep_embedding(&sweep, 2, &SweepPlotConfig::new("t-SNE"), &config).is_err());
    }

    #[test]
    fn test_plot_grid_embedding() {
        let rolls = vec![roll(1, 0.0), roll(2, 0.0)];
        let mut grid = SweepGrid::new(
            Augmentation::Holes,
            vec![1.0, 2.0],
            SweepVariable::NNeighbors,
            vec![5.0, 10.0],
            rolls.iter().map(|r| r.color.clone()).collect(),
        )
        .unwrap();
        for (j, r) in rolls.iter().enumerate() {
            for i in 0..2 {
                grid.insert(j, i, GridCell::new(r.points_2d().to_owned()).error(0.1).time(1.0))
                    .unwrap();
            }
        }
        grid.fill_differences(&rolls).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::new(dir.path().join("grid.svg"));
        plot_grid_embedding(&grid, 1, 0, &SweepPlotConfig::new("LLE"), &config).unwrap();
        let svg = std::fs::read_to_string(config.output()).unwrap();
        assert!(svg.contains("LLE"));
        assert!(svg.contains("holes"));

        assert!(plot_grid_embedding(&grid, 2, 0, &SweepPlotConfig::new("LLE"), &config).is_err());
    }
}
