//! Fixed color assignments for every panel of the heatmap.

pub type Color = (u8, u8, u8);

/// Copy-number values at or above this level all render as the top palette
/// entry; the legend labels it "7+".
pub const MAX_LEVEL: i32 = 7;

/// ColorBrewer RdBu 8-class diverging palette, reversed so that losses
/// (low copy number) are blue and gains are red.
pub const COPY_NUMBER_COLORS: [Color; 8] = [
    (33, 102, 172),
    (67, 147, 195),
    (146, 197, 222),
    (209, 229, 240),
    (253, 219, 199),
    (244, 165, 130),
    (214, 96, 77),
    (178, 24, 43),
];

/// ColorBrewer Set1 qualitative palette for categorical cell annotations.
pub const CATEGORY_COLORS: [Color; 9] = [
    (228, 26, 28),   // red
    (55, 126, 184),  // blue
    (77, 175, 74),   // green
    (152, 78, 163),  // purple
    (255, 127, 0),   // orange
    (255, 255, 51),  // yellow
    (166, 86, 40),   // brown
    (247, 129, 191), // pink
    (153, 153, 153), // grey
];

/// Endpoints of the continuous quality-metric gradient (white -> purple).
pub const QUALITY_LOW: Color = (247, 247, 247);
pub const QUALITY_HIGH: Color = (84, 39, 136);

/// Alternating shades for the chromosome band header.
pub const BAND_SHADES: [Color; 2] = [(226, 226, 226), (203, 203, 203)];

pub const BACKGROUND: Color = (255, 255, 255);
pub const SEPARATOR: Color = (70, 70, 70);
pub const TEXT: Color = (25, 25, 25);

/// Display color of an integer copy-number call. Values are clamped to the
/// [0, MAX_LEVEL] display range: negatives saturate at 0, everything at or
/// above MAX_LEVEL saturates at the top entry.
pub fn copy_number_color(value: i32) -> Color {
    COPY_NUMBER_COLORS[value.clamp(0, MAX_LEVEL) as usize]
}

/// Legend label of a display level.
pub fn copy_number_label(level: i32) -> String {
    if level >= MAX_LEVEL {
        format!("{MAX_LEVEL}+")
    } else {
        level.to_string()
    }
}

/// Interpolate the quality gradient at position `t` in [0, 1].
pub fn quality_color(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |low: u8, high: u8| (low as f64 + (high as f64 - low as f64) * t).round() as u8;
    (
        lerp(QUALITY_LOW.0, QUALITY_HIGH.0),
        lerp(QUALITY_LOW.1, QUALITY_HIGH.1),
        lerp(QUALITY_LOW.2, QUALITY_HIGH.2),
    )
}

/// Map quality values onto gradient positions, normalized over the
/// observed finite range. A constant vector (or one with no finite
/// values) maps everything to the gradient midpoint.
pub fn quality_scale(values: &[f64]) -> Vec<f64> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let low = finite.clone().fold(f64::INFINITY, f64::min);
    let high = finite.fold(f64::NEG_INFINITY, f64::max);

    values
        .iter()
        .map(|&v| {
            if !v.is_finite() || low >= high {
                0.5
            } else {
                (v - low) / (high - low)
            }
        })
        .collect()
}

/// Color of a categorical annotation, cycling the qualitative palette when
/// there are more distinct categories than palette entries.
pub fn category_color(ind: usize) -> Color {
    CATEGORY_COLORS[ind % CATEGORY_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_number_saturation() {
        for value in [7, 8, 9, 100, i32::MAX] {
            assert_eq!(copy_number_color(value), copy_number_color(7));
        }
        for value in [0, -1, -100, i32::MIN] {
            assert_eq!(copy_number_color(value), copy_number_color(0));
        }
        // Interior levels keep distinct colors
        for level in 0..7 {
            assert_ne!(copy_number_color(level), copy_number_color(level + 1));
        }
    }

    #[test]
    fn test_copy_number_labels() {
        assert_eq!(copy_number_label(0), "0");
        assert_eq!(copy_number_label(6), "6");
        assert_eq!(copy_number_label(7), "7+");
        assert_eq!(copy_number_label(12), "7+");
    }

    #[test]
    fn test_quality_gradient() {
        assert_eq!(quality_color(0.0), QUALITY_LOW);
        assert_eq!(quality_color(1.0), QUALITY_HIGH);
        assert_eq!(quality_color(-2.0), QUALITY_LOW);
        assert_eq!(quality_color(2.0), QUALITY_HIGH);
    }

    #[test]
    fn test_quality_scale() {
        assert_eq!(quality_scale(&[1.0, 2.0, 3.0]), vec![0.0, 0.5, 1.0]);
        // Constant vector maps to the midpoint
        assert_eq!(quality_scale(&[4.0, 4.0]), vec![0.5, 0.5]);
        // Non-finite values sit at the midpoint without breaking the rest
        let scaled = quality_scale(&[0.0, f64::NAN, 1.0]);
        assert_eq!(scaled, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_category_cycling() {
        assert_eq!(category_color(0), CATEGORY_COLORS[0]);
        assert_eq!(category_color(9), CATEGORY_COLORS[0]);
        assert_eq!(category_color(13), CATEGORY_COLORS[4]);
    }
}
