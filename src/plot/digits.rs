use ndarray::{s, Array2, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::*;

use super::colormap::{gray_r, map_colors};
use super::embedding::square_side;
use super::{render, Figure, PlotConfig};
use crate::error::{ManifoldError, Result};

/// Tiles the first `rows * cols` flattened square images into one picture.
///
/// Each tile is surrounded by a one-pixel blank border.
pub fn tile_digits(inputs: ArrayView2<f64>, rows: usize, cols: usize) -> Result<Array2<f64>> {
    let side = square_side(inputs.ncols())?;
    let needed = rows * cols;
    if inputs.nrows() < needed {
        return Err(ManifoldError::ShapeMismatch(format!(
            "A {} x {} grid needs {} samples, got {}",
            rows,
            cols,
            needed,
            inputs.nrows()
        )));
    }

    let cell = side + 2;
    let mut image = Array2::zeros((cell * rows, cell * cols));
    for i in 0..rows {
        let x = cell * i + 1;
        for j in 0..cols {
            let y = cell * j + 1;
            let sample = inputs.row(i * cols + j);
            let tile = sample
                .to_shape((side, side))
                .map_err(|e| ManifoldError::ShapeMismatch(e.to_string()))?;
            image.slice_mut(s![x..x + side, y..y + side]).assign(&tile);
        }
    }
    Ok(image)
}

struct ImageFigure {
    image: Array2<f64>,
    title: String,
}

impl Figure for ImageFigure {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (height, width) = self.image.dim();
        let pixels: Vec<f64> = self.image.iter().copied().collect();
        let shades = map_colors(&pixels, gray_r);

        let mut chart = ChartBuilder::on(root)
            .caption(&self.title, ("sans-serif", 24).into_font())
            .margin(10)
            .build_cartesian_2d(0..width, 0..height)?;

        chart.draw_series(shades.iter().enumerate().map(|(k, shade)| {
            let (r, c) = (k / width, k % width);
            // Row 0 is the top of the picture.
            Rectangle::new([(c, height - r), (c + 1, height - r - 1)], shade.filled())
        }))?;
        Ok(())
    }
}

/// Renders a `rows x cols` grid of sample images with a binary colour map.
pub fn plot_digits_samples(
    inputs: ArrayView2<f64>,
    rows: usize,
    cols: usize,
    config: &PlotConfig,
) -> anyhow::Result<()> {
    let figure = ImageFigure {
        image: tile_digits(inputs, rows, cols)?,
        title: config
            .caption()
            .unwrap_or("Samples from MNIST, handwritten digits")
            .to_string(),
    };
    render(&figure, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_digits_layout() {
        // Three 2x2 images with distinct values.
        let inputs = ndarray::array![
            [1.0, 1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0, 2.0],
            [3.0, 3.0, 3.0, 3.0],
        ];
        let image = tile_digits(inputs.view(), 1, 3).unwrap();
        assert_eq!(image.dim(), (4, 12));

        // Borders stay blank.
        assert_eq!(image.row(0).sum(), 0.0);
        assert_eq!(image.row(3).sum(), 0.0);
        assert_eq!(image[[1, 0]], 0.0);

        assert_eq!(image[[1, 1]], 1.0);
        assert_eq!(image[[2, 2]], 1.0);
        assert_eq!(image[[1, 5]], 2.0);
        assert_eq!(image[[2, 10]], 3.0);
        assert_eq!(image.sum(), 4.0 * (1.0 + 2.0 + 3.0));
    }

    #[test]
    fn test_tile_digits_pixel_order() {
        let inputs = ndarray::array![[1.0, 2.0, 3.0, 4.0]];
        let image = tile_digits(inputs.view(), 1, 1).unwrap();
        assert_eq!(image[[1, 1]], 1.0);
        assert_eq!(image[[1, 2]], 2.0);
        assert_eq!(image[[2, 1]], 3.0);
        assert_eq!(image[[2, 2]], 4.0);
    }

    #[test]
    fn test_tile_digits_errors() {
        let inputs = Array2::<f64>::zeros((2, 4));
        assert!(matches!(
            tile_digits(inputs.view(), 2, 2),
            Err(ManifoldError::ShapeMismatch(_))
        ));
        let not_square = Array2::<f64>::zeros((4, 5));
        assert!(matches!(
            tile_digits(not_square.view(), 1, 1),
            Err(ManifoldError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_plot_digits_samples_to_configured_path() {
        let inputs = Array2::from_shape_fn((6, 64), |(i, p)| ((i * p) % 16) as f64);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images").join("digits_samples.svg");
        plot_digits_samples(inputs.view(), 2, 3, &PlotConfig::new(&path)).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Samples from MNIST, handwritten digits"));
    }
}
