//! Fixed multi-panel arrangements of the heatmap canvas.
//!
//! The canvas size never changes; the arrangement is selected by the two
//! display flags plus the presence of the categorical annotation, giving
//! eight fixed layouts. Cells are drawn as horizontal lanes, the genome
//! runs along the x axis.

/// Output raster dimensions in pixels.
pub const CANVAS_WIDTH: u32 = 2500;
pub const CANVAS_HEIGHT: u32 = 1600;

const MARGIN: u32 = 40;
const GAP: u32 = 12;
const BAND_HEIGHT: u32 = 56;
const LEGEND_HEIGHT: u32 = 150;
const DENDROGRAM_WIDTH: u32 = 240;
const NAMES_WIDTH: u32 = 260;
const STRIP_WIDTH: u32 = 36;

/// An axis-aligned pixel rectangle, [x, x + width) by [y, y + height).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Pixel rectangles of every panel in the selected arrangement. The
/// dendrogram sits left of the heatmap; the annotation strips and the
/// name panel sit to its right; bands are above, the legend below.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PanelLayout {
    pub bands: Rect,
    pub heatmap: Rect,
    pub quality: Rect,
    pub dendrogram: Option<Rect>,
    pub categories: Option<Rect>,
    pub names: Option<Rect>,
    pub legend: Rect,
}

/// Select one of the eight fixed arrangements.
pub fn arrange(with_dendrogram: bool, with_names: bool, with_categories: bool) -> PanelLayout {
    let left = MARGIN + if with_dendrogram { DENDROGRAM_WIDTH + GAP } else { 0 };
    let right_side = (STRIP_WIDTH + GAP)
        + if with_categories { STRIP_WIDTH + GAP } else { 0 }
        + if with_names { NAMES_WIDTH + GAP } else { 0 };

    let heatmap = Rect {
        x: left,
        y: MARGIN + BAND_HEIGHT,
        width: CANVAS_WIDTH - MARGIN - right_side - left,
        height: CANVAS_HEIGHT - 2 * MARGIN - BAND_HEIGHT - LEGEND_HEIGHT - GAP,
    };
    let lane = |x: u32, width: u32| Rect {
        x,
        y: heatmap.y,
        width,
        height: heatmap.height,
    };

    let quality = lane(heatmap.right() + GAP, STRIP_WIDTH);
    let categories = with_categories.then(|| lane(quality.right() + GAP, STRIP_WIDTH));
    let names_x = categories.map_or(quality.right(), |rect| rect.right()) + GAP;

    PanelLayout {
        bands: Rect {
            x: heatmap.x,
            y: MARGIN,
            width: heatmap.width,
            height: BAND_HEIGHT,
        },
        heatmap,
        quality,
        dendrogram: with_dendrogram.then(|| lane(MARGIN, DENDROGRAM_WIDTH)),
        categories,
        names: with_names.then(|| lane(names_x, NAMES_WIDTH)),
        legend: Rect {
            x: MARGIN,
            y: CANVAS_HEIGHT - MARGIN - LEGEND_HEIGHT,
            width: CANVAS_WIDTH - 2 * MARGIN,
            height: LEGEND_HEIGHT,
        },
    }
}
