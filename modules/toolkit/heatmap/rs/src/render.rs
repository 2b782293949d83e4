use std::path::{Path, PathBuf};

use derive_getters::Getters;
use eyre::{ensure, Result};
use image::{Rgb, RgbImage};
use log::{debug, info};
use ndarray::Array2;

use scnv_core_rs::bins::GenomicBins;

use crate::cluster::{self, Dendrogram};
use crate::font;
use crate::layout::{self, PanelLayout, Rect};
use crate::palette::{self, Color};

/// Display options of the heatmap renderer. The output file is always
/// `out` with its extension forced to `png`.
#[derive(Clone, Debug, Getters)]
pub struct RenderOptions {
    dendrogram: bool,
    cell_labels: bool,
    out: PathBuf,
}

impl RenderOptions {
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            dendrogram: false,
            cell_labels: false,
            out: out.into(),
        }
    }

    /// Draw the merge tree of the cell clustering left of the heatmap.
    pub fn with_dendrogram(mut self, dendrogram: bool) -> Self {
        self.dendrogram = dendrogram;
        self
    }

    /// Draw per-cell text labels right of the annotation strips. Requires
    /// cell identifiers to be supplied to [`render`].
    pub fn with_cell_labels(mut self, cell_labels: bool) -> Self {
        self.cell_labels = cell_labels;
        self
    }
}

/// Render a clustered, annotated copy-number heatmap to `<out>.png`.
///
/// `matrix` holds integer copy-number calls, rows aligned 1:1 with `bins`
/// and one column per cell. `quality` is a per-cell scalar (e.g. a
/// dispersion coefficient) shown as a side strip; `categories` is an
/// optional per-cell label (e.g. a clone assignment) shown as a second
/// strip. Cells are reordered by hierarchical clustering and every panel
/// follows that one order.
///
/// All precondition violations fail before any output is produced.
pub fn render(
    matrix: &Array2<i32>,
    bins: &GenomicBins,
    quality: &[f64],
    categories: Option<&[String]>,
    cell_names: Option<&[String]>,
    options: &RenderOptions,
) -> Result<()> {
    ensure!(
        matrix.nrows() > 0 && matrix.ncols() > 0,
        "Copy-number matrix must contain at least one bin and one cell"
    );
    ensure!(
        matrix.nrows() == bins.len(),
        "Matrix has {} rows but the bin layout has {} bins",
        matrix.nrows(),
        bins.len()
    );
    ensure!(
        quality.len() == matrix.ncols(),
        "Quality vector covers {} cells but the matrix has {}",
        quality.len(),
        matrix.ncols()
    );
    if let Some(categories) = categories {
        ensure!(
            categories.len() == matrix.ncols(),
            "Categorical vector covers {} cells but the matrix has {}",
            categories.len(),
            matrix.ncols()
        );
    }
    ensure!(
        !options.cell_labels || cell_names.is_some(),
        "Cell labels were requested but no cell identifiers are available"
    );
    if let Some(cell_names) = cell_names {
        ensure!(
            cell_names.len() == matrix.ncols(),
            "Cell identifiers cover {} cells but the matrix has {}",
            cell_names.len(),
            matrix.ncols()
        );
    }

    let dendrogram = cluster::cluster_columns(matrix);
    debug!(
        "Clustered {} cells across {} bins (top merge height {:.3})",
        matrix.ncols(),
        matrix.nrows(),
        dendrogram.max_height()
    );

    let panels = layout::arrange(options.dendrogram, options.cell_labels, categories.is_some());
    let mut canvas = Canvas::new(
        layout::CANVAS_WIDTH,
        layout::CANVAS_HEIGHT,
        palette::BACKGROUND,
    );

    draw_chromosome_bands(&mut canvas, &panels.bands, bins);
    draw_matrix(&mut canvas, &panels.heatmap, matrix, dendrogram.order());
    draw_separators(&mut canvas, &panels, bins);
    draw_quality_strip(&mut canvas, &panels.quality, quality, dendrogram.order());
    if let (Some(rect), Some(categories)) = (&panels.categories, categories) {
        draw_category_strip(&mut canvas, rect, categories, dendrogram.order());
    }
    if let (Some(rect), Some(cell_names)) = (&panels.names, cell_names) {
        draw_names(&mut canvas, rect, cell_names, dendrogram.order());
    }
    if let Some(rect) = &panels.dendrogram {
        draw_dendrogram(&mut canvas, rect, &dendrogram);
    }
    draw_legend(&mut canvas, &panels.legend, quality, categories);

    let path = output_path(&options.out);
    canvas.save(&path)?;
    info!("Wrote copy-number heatmap to {}", path.display());
    Ok(())
}

fn output_path(out: &Path) -> PathBuf {
    out.with_extension("png")
}

/// RGB pixel buffer with the few primitives the panels need.
struct Canvas {
    img: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32, background: Color) -> Self {
        let (r, g, b) = background;
        Self {
            img: RgbImage::from_pixel(width, height, Rgb([r, g, b])),
        }
    }

    fn set(&mut self, x: u32, y: u32, color: Color) {
        if x < self.img.width() && y < self.img.height() {
            self.img.put_pixel(x, y, Rgb([color.0, color.1, color.2]));
        }
    }

    fn fill_rect(&mut self, rect: &Rect, color: Color) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.set(x, y, color);
            }
        }
    }

    fn hline(&mut self, x0: u32, x1: u32, y: u32, color: Color) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set(x, y, color);
        }
    }

    fn vline(&mut self, x: u32, y0: u32, y1: u32, color: Color) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, color);
        }
    }

    /// Draw `text` with its top-left corner at (x, y), integer-scaled.
    fn text(&mut self, x: u32, y: u32, scale: u32, color: Color, text: &str) {
        for (ind, c) in text.chars().enumerate() {
            let base_x = x + ind as u32 * font::GLYPH_ADVANCE * scale;
            let rows = font::glyph(c);
            for (row_ind, row) in rows.iter().enumerate() {
                for bit in 0..5u32 {
                    if (row >> (7 - bit)) & 1 == 1 {
                        for dy in 0..scale {
                            for dx in 0..scale {
                                self.set(
                                    base_x + bit * scale + dx,
                                    y + row_ind as u32 * scale + dy,
                                    color,
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        self.img.save(path)?;
        Ok(())
    }
}

/// Index of the data element covering a pixel offset inside an extent.
fn index_at(pixel: u32, extent: u32, count: usize) -> usize {
    (pixel as u64 * count as u64 / extent as u64) as usize
}

/// Pixel x of a bin offset inside a rect spanning `count` bins.
fn offset_to_x(rect: &Rect, offset: usize, count: usize) -> u32 {
    rect.x + (offset as u64 * rect.width as u64 / count as u64) as u32
}

fn draw_chromosome_bands(canvas: &mut Canvas, rect: &Rect, bins: &GenomicBins) {
    let runs = bins.chromosome_runs();
    let total = bins.len();

    let mut offset = 0;
    for (ind, &(name, count)) in runs.iter().enumerate() {
        let x0 = offset_to_x(rect, offset, total);
        let x1 = offset_to_x(rect, offset + count, total);
        let band = Rect {
            x: x0,
            y: rect.y,
            width: x1 - x0,
            height: rect.height,
        };
        canvas.fill_rect(&band, palette::BAND_SHADES[ind % 2]);

        // Full name at the larger scale, else smaller, else the bare
        // payload, else nothing: narrow chromosomes stay unlabeled.
        let short = name.strip_prefix("chr").unwrap_or(name);
        let candidates = [(name, 2), (name, 1), (short, 1)];
        if let Some((label, scale)) = candidates
            .iter()
            .find(|(label, scale)| font::text_width(label, *scale) + 4 <= band.width)
        {
            let text_x = band.x + (band.width - font::text_width(label, *scale)) / 2;
            let text_y = band.y + (band.height - font::GLYPH_HEIGHT * scale) / 2;
            canvas.text(text_x, text_y, *scale, palette::TEXT, label);
        }

        offset += count;
    }
}

fn draw_matrix(canvas: &mut Canvas, rect: &Rect, matrix: &Array2<i32>, order: &[usize]) {
    for py in 0..rect.height {
        let cell = order[index_at(py, rect.height, order.len())];
        for px in 0..rect.width {
            let bin = index_at(px, rect.width, matrix.nrows());
            let color = palette::copy_number_color(matrix[[bin, cell]]);
            canvas.set(rect.x + px, rect.y + py, color);
        }
    }
}

fn draw_separators(canvas: &mut Canvas, panels: &PanelLayout, bins: &GenomicBins) {
    let runs = bins.chromosome_runs();
    let total = bins.len();

    let mut offset = 0;
    for (_, count) in &runs[..runs.len() - 1] {
        offset += count;
        let x = offset_to_x(&panels.heatmap, offset, total);
        canvas.vline(x, panels.bands.y, panels.heatmap.bottom() - 1, palette::SEPARATOR);
    }
}

fn draw_quality_strip(canvas: &mut Canvas, rect: &Rect, quality: &[f64], order: &[usize]) {
    let scaled = palette::quality_scale(quality);
    for py in 0..rect.height {
        let cell = order[index_at(py, rect.height, order.len())];
        let color = palette::quality_color(scaled[cell]);
        canvas.hline(rect.x, rect.right() - 1, rect.y + py, color);
    }
}

/// Distinct categories in first-appearance order plus, per cell, the index
/// of its category in that list.
fn category_index(categories: &[String]) -> (Vec<&str>, Vec<usize>) {
    let mut distinct: Vec<&str> = Vec::new();
    let inds = categories
        .iter()
        .map(|category| {
            distinct
                .iter()
                .position(|known| *known == category.as_str())
                .unwrap_or_else(|| {
                    distinct.push(category);
                    distinct.len() - 1
                })
        })
        .collect();
    (distinct, inds)
}

fn draw_category_strip(canvas: &mut Canvas, rect: &Rect, categories: &[String], order: &[usize]) {
    let (_, inds) = category_index(categories);
    for py in 0..rect.height {
        let cell = order[index_at(py, rect.height, order.len())];
        let color = palette::category_color(inds[cell]);
        canvas.hline(rect.x, rect.right() - 1, rect.y + py, color);
    }
}

fn draw_names(canvas: &mut Canvas, rect: &Rect, names: &[String], order: &[usize]) {
    let lanes = order.len() as u32;
    let lane_height = rect.height as f64 / lanes as f64;
    let scale: u32 = if lane_height >= 18.0 { 2 } else { 1 };
    let glyph_height = font::GLYPH_HEIGHT * scale;

    // Label every lane when they are tall enough, otherwise at the
    // smallest stride whose labels do not collide.
    let stride = ((glyph_height + 2) as f64 / lane_height).ceil().max(1.0) as usize;
    let max_chars = (rect.width.saturating_sub(6) / (font::GLYPH_ADVANCE * scale)) as usize;

    for lane in (0..order.len()).step_by(stride) {
        let name: String = names[order[lane]].chars().take(max_chars).collect();
        let center = rect.y as f64 + (lane as f64 + 0.5) * lane_height;
        let text_y = (center - glyph_height as f64 / 2.0).max(rect.y as f64) as u32;
        canvas.text(rect.x + 6, text_y, scale, palette::TEXT, &name);
    }
}

fn draw_dendrogram(canvas: &mut Canvas, rect: &Rect, dendrogram: &Dendrogram) {
    if dendrogram.merges().is_empty() {
        return;
    }
    let span = rect.width.saturating_sub(2) as f64;
    let max_height = if dendrogram.max_height() > 0.0 {
        dendrogram.max_height()
    } else {
        1.0
    };
    let x_of = |height: f64| rect.right() as f64 - height / max_height * span;

    let lanes = dendrogram.n_leaves();
    let lane_height = rect.height as f64 / lanes as f64;

    // Node positions: leaves at the heatmap edge on their lane centers,
    // internal nodes at their merge height between their children.
    let mut positions = vec![(0.0, 0.0); lanes + dendrogram.merges().len()];
    for (lane, &cell) in dendrogram.order().iter().enumerate() {
        positions[cell] = (x_of(0.0), rect.y as f64 + (lane as f64 + 0.5) * lane_height);
    }
    for (ind, merge) in dendrogram.merges().iter().enumerate() {
        let (left_x, left_y) = positions[merge.left];
        let (right_x, right_y) = positions[merge.right];
        let parent_x = x_of(merge.height);

        canvas.hline(left_x as u32, parent_x as u32, left_y as u32, palette::SEPARATOR);
        canvas.hline(right_x as u32, parent_x as u32, right_y as u32, palette::SEPARATOR);
        canvas.vline(parent_x as u32, left_y as u32, right_y as u32, palette::SEPARATOR);

        positions[lanes + ind] = (parent_x, (left_y + right_y) / 2.0);
    }
}

fn draw_legend(canvas: &mut Canvas, rect: &Rect, quality: &[f64], categories: Option<&[String]>) {
    let swatch_y = rect.y + 34;
    let label_y = swatch_y + 28;

    // Discrete copy-number scale
    canvas.text(rect.x, rect.y + 4, 2, palette::TEXT, "copy number");
    for level in 0..=palette::MAX_LEVEL {
        let x = rect.x + level as u32 * 44;
        let swatch = Rect {
            x,
            y: swatch_y,
            width: 36,
            height: 22,
        };
        canvas.fill_rect(&swatch, palette::copy_number_color(level));
        let label = palette::copy_number_label(level);
        let label_x = x + (36 - font::text_width(&label, 2)) / 2;
        canvas.text(label_x, label_y, 2, palette::TEXT, &label);
    }

    // Continuous quality gradient with the observed range at its ends
    let gradient_x = rect.x + 420;
    canvas.text(gradient_x, rect.y + 4, 2, palette::TEXT, "quality");
    let gradient = Rect {
        x: gradient_x,
        y: swatch_y,
        width: 220,
        height: 22,
    };
    for px in 0..gradient.width {
        let t = px as f64 / (gradient.width - 1) as f64;
        canvas.vline(
            gradient.x + px,
            gradient.y,
            gradient.bottom() - 1,
            palette::quality_color(t),
        );
    }
    let finite: Vec<f64> = quality.iter().copied().filter(|v| v.is_finite()).collect();
    if let (Some(low), Some(high)) = (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        canvas.text(gradient.x, label_y, 1, palette::TEXT, &format!("{low:.2}"));
        let high_label = format!("{high:.2}");
        let high_x = gradient.right() - font::text_width(&high_label, 1);
        canvas.text(high_x, label_y, 1, palette::TEXT, &high_label);
    }

    // Qualitative category swatches
    if let Some(categories) = categories {
        let (distinct, _) = category_index(categories);
        let block_x = rect.x + 720;
        canvas.text(block_x, rect.y + 4, 2, palette::TEXT, "categories");

        let visible = distinct.len().min(5);
        for (ind, category) in distinct[..visible].iter().enumerate() {
            let y = rect.y + 30 + ind as u32 * 22;
            let swatch = Rect {
                x: block_x,
                y,
                width: 18,
                height: 14,
            };
            canvas.fill_rect(&swatch, palette::category_color(ind));
            let name: String = category.chars().take(28).collect();
            canvas.text(block_x + 24, y + 2, 1, palette::TEXT, &name);
        }
        if distinct.len() > visible {
            let y = rect.y + 30 + visible as u32 * 22;
            let more = format!("+{} more", distinct.len() - visible);
            canvas.text(block_x + 24, y + 2, 1, palette::TEXT, &more);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use scnv_core_rs::bins::GenomicBin;
    use scnv_core_rs::loc::Interval;

    fn bins(n: usize) -> GenomicBins {
        GenomicBins::new(
            (0..n)
                .map(|i| {
                    GenomicBin::new(
                        "chr1",
                        Interval::new(i as u64 * 100, (i as u64 + 1) * 100).unwrap(),
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn out(name: &str) -> RenderOptions {
        RenderOptions::new(std::env::temp_dir().join(format!("scnv-render-{name}")))
    }

    #[test]
    fn test_degenerate_matrix() {
        let matrix = Array2::<i32>::zeros((0, 4));
        let err = render(&matrix, &bins(1), &[0.1; 4], None, None, &out("degenerate"))
            .unwrap_err()
            .to_string();
        assert!(err.contains("at least one bin"), "{err}");
    }

    #[test]
    fn test_row_mismatch() {
        let matrix = Array2::<i32>::zeros((10, 4));
        let err = render(
            &matrix,
            &bins(9),
            &[0.1; 4],
            None,
            None,
            &out("row-mismatch"),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("10 rows") && err.contains("9 bins"), "{err}");
    }

    #[test]
    fn test_quality_mismatch() {
        let matrix = Array2::<i32>::zeros((10, 4));
        let err = render(
            &matrix,
            &bins(10),
            &[0.1; 3],
            None,
            None,
            &out("quality-mismatch"),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("Quality vector"), "{err}");
    }

    #[test]
    fn test_category_mismatch() {
        let matrix = Array2::<i32>::zeros((10, 4));
        let categories = vec!["a".to_owned(); 5];
        let err = render(
            &matrix,
            &bins(10),
            &[0.1; 4],
            Some(&categories),
            None,
            &out("category-mismatch"),
        )
        .unwrap_err()
        .to_string();
        assert!(err.contains("Categorical vector"), "{err}");
    }

    #[test]
    fn test_labels_without_identifiers() {
        let matrix = Array2::<i32>::zeros((10, 4));
        let options = out("labels-without-ids").with_cell_labels(true);
        let err = render(&matrix, &bins(10), &[0.1; 4], None, None, &options)
            .unwrap_err()
            .to_string();
        assert!(err.contains("no cell identifiers"), "{err}");
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("plot")), PathBuf::from("plot.png"));
        assert_eq!(output_path(Path::new("plot.png")), PathBuf::from("plot.png"));
        assert_eq!(
            output_path(Path::new("dir/heatmap")),
            PathBuf::from("dir/heatmap.png")
        );
    }

    #[test]
    fn test_category_index() {
        let categories: Vec<String> = ["b", "a", "b", "c", "a"]
            .into_iter()
            .map(str::to_owned)
            .collect();
        let (distinct, inds) = category_index(&categories);
        assert_eq!(distinct, ["b", "a", "c"]);
        assert_eq!(inds, [0, 1, 0, 2, 1]);
    }

    #[test]
    fn test_index_at_covers_extent() {
        for count in [1usize, 3, 10, 250] {
            assert_eq!(index_at(0, 500, count), 0);
            assert_eq!(index_at(499, 500, count), count - 1);
        }
    }
}
