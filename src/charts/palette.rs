//! Color ramps for the charts.

use plotters::style::RGBColor;

pub const TEAL: RGBColor = RGBColor(0, 128, 128);

/// Sampled stops of the viridis colormap.
pub const VIRIDIS: [RGBColor; 5] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
];

/// Sampled stops of the magma colormap.
pub const MAGMA: [RGBColor; 5] = [
    RGBColor(0, 0, 4),
    RGBColor(81, 18, 124),
    RGBColor(183, 55, 121),
    RGBColor(252, 137, 97),
    RGBColor(252, 253, 191),
];

/// Diverging blue to red.
pub const COOLWARM: [RGBColor; 5] = [
    RGBColor(59, 76, 192),
    RGBColor(141, 176, 254),
    RGBColor(221, 221, 221),
    RGBColor(244, 154, 123),
    RGBColor(180, 4, 38),
];

/// Linear interpolation across `stops` at `t` in `[0, 1]`.
pub fn gradient(stops: &[RGBColor], t: f64) -> RGBColor {
    match stops.len() {
        0 => RGBColor(0, 0, 0),
        1 => stops[0],
        len => {
            let scaled = t.clamp(0.0, 1.0) * (len - 1) as f64;
            let i = (scaled.floor() as usize).min(len - 2);
            let frac = scaled - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient(&VIRIDIS, 0.0), VIRIDIS[0]);
        assert_eq!(gradient(&VIRIDIS, 1.0), VIRIDIS[4]);
        assert_eq!(gradient(&VIRIDIS, 2.0), VIRIDIS[4]);
    }

    #[test]
    fn test_gradient_midpoint() {
        let stops = [RGBColor(0, 0, 0), RGBColor(200, 100, 50)];
        assert_eq!(gradient(&stops, 0.5), RGBColor(100, 50, 25));
        assert_eq!(gradient(&[TEAL], 0.3), TEAL);
    }
}
