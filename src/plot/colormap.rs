use plotters::style::RGBColor;

use crate::utils::min_max;

// ColorBrewer "Spectral", 11 classes, low to high.
const SPECTRAL: [(u8, u8, u8); 11] = [
    (158, 1, 66),
    (213, 62, 79),
    (244, 109, 67),
    (253, 174, 97),
    (254, 224, 139),
    (255, 255, 191),
    (230, 245, 152),
    (171, 221, 164),
    (102, 194, 165),
    (50, 136, 189),
    (94, 79, 162),
];

// ColorBrewer "Set1", 9 classes.
const SET1: [(u8, u8, u8); 9] = [
    (228, 26, 28),
    (55, 126, 184),
    (77, 175, 74),
    (152, 78, 163),
    (255, 127, 0),
    (255, 255, 51),
    (166, 86, 40),
    (247, 129, 191),
    (153, 153, 153),
];

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8
}

/// Continuous Spectral map, `t` in `[0, 1]`.
pub fn spectral(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let scaled = t * (SPECTRAL.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(SPECTRAL.len() - 2);
    let frac = scaled - lo as f64;
    let (a, b) = (SPECTRAL[lo], SPECTRAL[lo + 1]);
    RGBColor(lerp(a.0, b.0, frac), lerp(a.1, b.1, frac), lerp(a.2, b.2, frac))
}

/// Qualitative Set1 map, `t` in `[0, 1]` picks one of nine colours.
pub fn set1(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let idx = ((t * SET1.len() as f64) as usize).min(SET1.len() - 1);
    let (r, g, b) = SET1[idx];
    RGBColor(r, g, b)
}

/// White at 0, black at 1.
pub fn gray_r(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let v = lerp(255, 0, t);
    RGBColor(v, v, v)
}

/// Min-max normalised colours for a set of scalar labels.
///
/// A constant set maps to the middle of the colour map.
pub fn map_colors<F>(values: &[f64], cmap: F) -> Vec<RGBColor>
where
    F: Fn(f64) -> RGBColor,
{
    let (lo, hi) = min_max(values.iter().copied()).unwrap_or((0.0, 1.0));
    let range = hi - lo;
    values
        .iter()
        .map(|&v| {
            if range > 0.0 {
                cmap((v - lo) / range)
            } else {
                cmap(0.5)
            }
        })
        .collect()
}
