use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use super::{padded_range, render, Figure, PlotConfig};
use crate::sweep::{Diagnostics, SweepVariable};

/// Options for the three-panel error / time / distance-difference figure.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Name shown on the x axes.
    pub variable: String,
    /// Label of the error panel, e.g. "KL divergence". Defaults to "Error".
    pub error_label: Option<String>,
    /// Index of the sweep value marked with a red dashed line.
    pub highlight: Option<usize>,
    pub log_x: bool,
}

impl DiagnosticsConfig {
    pub fn new(variable: impl Into<String>) -> Self {
        DiagnosticsConfig {
            variable: variable.into(),
            error_label: None,
            highlight: None,
            log_x: false,
        }
    }

    /// Labels and axis scale taken from a sweep variable.
    pub fn for_variable(variable: &SweepVariable) -> Self {
        DiagnosticsConfig {
            log_x: variable.log_scale(),
            ..Self::new(variable.label())
        }
    }

    pub fn error_label(mut self, label: impl Into<String>) -> Self {
        self.error_label = Some(label.into());
        self
    }

    pub fn highlight(mut self, index: usize) -> Self {
        self.highlight = Some(index);
        self
    }

    pub fn log_x(mut self, log_x: bool) -> Self {
        self.log_x = log_x;
        self
    }
}

pub(crate) struct DiagnosticsFigure<'a> {
    pub diagnostics: &'a Diagnostics,
    pub options: &'a DiagnosticsConfig,
}

impl Figure for DiagnosticsFigure<'_> {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let d = self.diagnostics;
        if let Some(i) = self.options.highlight {
            if i >= d.len() {
                anyhow::bail!(
                    "Highlighted index {} out of range for {} sweep values",
                    i,
                    d.len()
                );
            }
        }

        let log_x = self.options.log_x && d.values.iter().all(|&v| v > 0.0);
        if self.options.log_x && !log_x {
            log::warn!(
                "Non-positive {} values, falling back to a linear axis",
                self.options.variable
            );
        }

        let error_label = self.options.error_label.as_deref().unwrap_or("Error");
        let panels = root.split_evenly((1, 3));
        let series = [
            (&d.error, error_label),
            (&d.times, "Time, s"),
            (&d.difference, "Difference in 2d distance"),
        ];

        for (area, (values, y_label)) in panels.iter().zip(series) {
            draw_panel(
                area,
                &d.values,
                values,
                &self.options.variable,
                y_label,
                self.options.highlight,
                log_x,
            )?;
        }
        Ok(())
    }
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    x: &[f64],
    y: &[f64],
    x_label: &str,
    y_label: &str,
    highlight: Option<usize>,
    log_x: bool,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_range = padded_range(x.iter().copied());
    let y_range = padded_range(y.iter().copied());

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(65);

    if log_x {
        let (lo, hi) = match crate::utils::min_max(x.iter().copied()) {
            Some((lo, hi)) if hi > lo => (lo * 0.8, hi * 1.25),
            Some((v, _)) => (v * 0.5, v * 2.0),
            None => (1.0, 10.0),
        };
        let mut chart = builder.build_cartesian_2d((lo..hi).log_scale(), y_range.clone())?;
        fill_panel(&mut chart, x, y, x_label, y_label, highlight, y_range)
    } else {
        let mut chart = builder.build_cartesian_2d(x_range, y_range.clone())?;
        fill_panel(&mut chart, x, y, x_label, y_label, highlight, y_range)
    }
}

fn fill_panel<DB, X>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, RangedCoordf64>>,
    x: &[f64],
    y: &[f64],
    x_label: &str,
    y_label: &str,
    highlight: Option<usize>,
    y_range: std::ops::Range<f64>,
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .draw()?;

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    chart.draw_series(DashedLineSeries::new(
        points.clone(),
        6,
        4,
        GREEN.stroke_width(2),
    ))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, GREEN.filled())))?;

    if let Some(i) = highlight {
        let marker = x[i];
        chart.draw_series(DashedLineSeries::new(
            vec![(marker, y_range.start), (marker, y_range.end)],
            6,
            4,
            RED.stroke_width(2),
        ))?;
    }
    Ok(())
}

/// Plots error, computation time and distance difference against the sweep
/// values as three side-by-side panels.
pub fn plot_error_dist_and_time(
    diagnostics: &Diagnostics,
    options: &DiagnosticsConfig,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    render(
        &DiagnosticsFigure {
            diagnostics,
            options,
        },
        config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::render_svg_string;

    fn diagnostics() -> Diagnostics {
        Diagnostics::new(
            vec![1e-4, 1e-3, 1e-2, 1e-1],
            vec![2.0, 1.5, 1.2, 1.4],
            vec![0.5, 0.6, 0.9, 1.3],
            vec![3.0, 2.5, 2.2, 2.9],
        )
        .unwrap()
    }

    #[test]
    fn test_config_for_variable() {
        let options = DiagnosticsConfig::for_variable(&SweepVariable::Regularization);
        assert_eq!(options.variable, "reg");
        assert!(options.log_x);
        assert!(!DiagnosticsConfig::for_variable(&SweepVariable::Perplexity).log_x);
    }

    #[test]
    fn test_three_panels_render() {
        let d = diagnostics();
        let options = DiagnosticsConfig::for_variable(&SweepVariable::Regularization)
            .error_label("reconstruction error")
            .highlight(2);
        let svg = render_svg_string(
            &DiagnosticsFigure {
                diagnostics: &d,
                options: &options,
            },
            (1500, 400),
        )
        .unwrap();

        assert!(svg.contains("reconstruction error"));
        assert!(svg.contains("Time, s"));
        assert!(svg.contains("Difference in 2d distance"));
    }

    #[test]
    fn test_highlight_out_of_range() {
        let d = diagnostics();
        let options = DiagnosticsConfig::new("perplexity").highlight(9);
        let result = render_svg_string(
            &DiagnosticsFigure {
                diagnostics: &d,
                options: &options,
            },
            (1500, 400),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_plot_to_file() {
        let d = diagnostics();
        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig::new(dir.path().join("diagnostics.svg")).size(1500, 400);
        plot_error_dist_and_time(&d, &DiagnosticsConfig::new("threshold"), &config).unwrap();
        assert!(config.output().exists());
    }
}
