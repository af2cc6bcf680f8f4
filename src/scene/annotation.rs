//! Overlays drawn on top of rendered bodies
//!
//! Annotations are collected per frame in an [`AnnotationMap`] keyed by view
//! depth. Annotations at equal depth keep their insertion order.

use std::collections::BTreeMap;

use super::properties::Align;
use crate::render::Framebuffer;

/// Rasterized text: row-major coverage, 0 (empty) to 255 (solid)
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub coverage: Vec<u8>,
}

/// Source of rendered text
pub trait GlyphRenderer: Sync {
    /// Render `text` at `size` pixels, or `None` if it cannot be rendered
    fn render(&self, text: &str, size: u32) -> Option<GlyphBitmap>;
}

/// Default label size, pixels
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// One overlay element, in frame pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// A point spread over the four nearest pixels
    Point { x: f64, y: f64, color: [u8; 3] },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: [u8; 3],
    },
    /// Circle of `radius` pixels, outlined in black
    Symbol {
        x: f64,
        y: f64,
        radius: u32,
        color: [u8; 3],
    },
    /// Text placed beside a `box_width` x `box_height` marker at (`x`, `y`)
    Text {
        x: f64,
        y: f64,
        box_width: f64,
        box_height: f64,
        align: Align,
        text: String,
        size: u32,
        color: [u8; 3],
    },
}

impl Annotation {
    /// Move horizontally by `dx` pixels
    pub fn shift(&mut self, dx: f64) {
        match self {
            Annotation::Point { x, .. }
            | Annotation::Symbol { x, .. }
            | Annotation::Text { x, .. } => *x += dx,
            Annotation::Line { from, to, .. } => {
                from.0 += dx;
                to.0 += dx;
            }
        }
    }

    /// Draw onto `frame`; returns false for text that needed a missing
    /// glyph renderer
    pub fn draw(&self, frame: &mut Framebuffer, glyphs: Option<&dyn GlyphRenderer>) -> bool {
        match self {
            Annotation::Point { x, y, color } => {
                frame.set_pixel_fractional(*x, *y, *color, 1.0);
            }
            Annotation::Line { from, to, color } => draw_line(frame, *from, *to, *color),
            Annotation::Symbol {
                x,
                y,
                radius,
                color,
            } => {
                if *radius > 0 {
                    let r = f64::from(*radius);
                    draw_circle(frame, *x, *y, r + 1.0, [0, 0, 0]);
                    draw_circle(frame, *x, *y, r - 1.0, [0, 0, 0]);
                    draw_circle(frame, *x, *y, r, *color);
                }
            }
            Annotation::Text {
                x,
                y,
                box_width,
                box_height,
                align,
                text,
                size,
                color,
            } => {
                let Some(glyphs) = glyphs else {
                    return false;
                };
                let Some(bitmap) = glyphs.render(text, *size) else {
                    log::warn!("Can't render label {:?}", text);
                    return true;
                };
                let (left, top) = text_origin(
                    frame.width() as f64,
                    (*x, *y),
                    (*box_width, *box_height),
                    (bitmap.width as f64, bitmap.height as f64),
                    *align,
                );
                draw_bitmap(frame, &bitmap, left, top, *color);
            }
        }
        true
    }
}

/// Top-left corner of a text box of `text` size next to a marker box
fn text_origin(
    frame_width: f64,
    (x, y): (f64, f64),
    (box_w, box_h): (f64, f64),
    (text_w, text_h): (f64, f64),
    align: Align,
) -> (f64, f64) {
    let right = (x + box_w / 2.0 + 2.0, y - text_h / 2.0);
    let left = (x - box_w / 2.0 - 2.0 - text_w, y - text_h / 2.0);
    match align {
        Align::Right => right,
        Align::Left => left,
        Align::Above => (x - text_w / 2.0, y - box_h / 2.0 - 2.0 - text_h),
        Align::Below => (x - text_w / 2.0, y + box_h / 2.0 + 2.0),
        Align::Center => (x - text_w / 2.0, y - text_h / 2.0),
        Align::Auto => {
            if right.0 + text_w < frame_width {
                right
            } else {
                left
            }
        }
    }
}

fn draw_bitmap(frame: &mut Framebuffer, bitmap: &GlyphBitmap, left: f64, top: f64, color: [u8; 3]) {
    let (x0, y0) = (left.round() as i64, top.round() as i64);
    for (j, row) in bitmap.coverage.chunks(bitmap.width.max(1)).enumerate() {
        for (i, &c) in row.iter().enumerate() {
            if c > 0 {
                frame.blend(x0 + i as i64, y0 + j as i64, color, f64::from(c) / 255.0);
            }
        }
    }
}

fn draw_line(frame: &mut Framebuffer, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
    // Segments far longer than the frame come from points that wrapped
    // around a projection edge or passed behind the observer
    let limit = 2.0 * (frame.width() + frame.height()) as f64;
    if !steps.is_finite() || steps > limit {
        return;
    }
    let n = steps as usize;
    for k in 0..=n {
        let t = k as f64 / steps;
        frame.set_pixel_fractional(from.0 + t * dx, from.1 + t * dy, color, 1.0);
    }
}

fn draw_circle(frame: &mut Framebuffer, x: f64, y: f64, radius: f64, color: [u8; 3]) {
    if radius <= 0.0 {
        frame.set_pixel_fractional(x, y, color, 1.0);
        return;
    }
    let n = (std::f64::consts::TAU * radius).ceil().max(8.0) as usize;
    for k in 0..n {
        let a = std::f64::consts::TAU * k as f64 / n as f64;
        frame.set_pixel_fractional(x + radius * a.cos(), y + radius * a.sin(), color, 1.0);
    }
}

/// Total order on depths for use as a map key
#[derive(Debug, Clone, Copy, PartialEq)]
struct Depth(f64);

impl Eq for Depth {}

impl PartialOrd for Depth {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Depth {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Annotations ordered by view depth
#[derive(Debug, Clone, Default)]
pub struct AnnotationMap {
    entries: BTreeMap<Depth, Vec<Annotation>>,
    skipped_labels: usize,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, depth: f64, annotation: Annotation) {
        self.entries.entry(Depth(depth)).or_default().push(annotation);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotations in drawing order, farthest first
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Annotation)> {
        self.entries
            .iter()
            .rev()
            .flat_map(|(d, list)| list.iter().map(move |a| (d.0, a)))
    }

    /// Draw and remove every annotation deeper than `depth`, farthest first
    pub fn draw_farther_than(
        &mut self,
        depth: f64,
        frame: &mut Framebuffer,
        glyphs: Option<&dyn GlyphRenderer>,
    ) {
        let mut farther = self.entries.split_off(&Depth(depth));
        if let Some(equal) = farther.remove(&Depth(depth)) {
            self.entries.insert(Depth(depth), equal);
        }
        self.draw_entries(farther, frame, glyphs, None);
    }

    /// Draw and remove everything, farthest first
    ///
    /// With `wrap_width`, each annotation is drawn again shifted one frame
    /// width to either side.
    pub fn draw_all(
        &mut self,
        frame: &mut Framebuffer,
        glyphs: Option<&dyn GlyphRenderer>,
        wrap_width: Option<f64>,
    ) {
        let entries = std::mem::take(&mut self.entries);
        self.draw_entries(entries, frame, glyphs, wrap_width);
        if self.skipped_labels > 0 {
            log::warn!(
                "No glyph renderer; skipped {} label(s)",
                self.skipped_labels
            );
            self.skipped_labels = 0;
        }
    }

    fn draw_entries(
        &mut self,
        entries: BTreeMap<Depth, Vec<Annotation>>,
        frame: &mut Framebuffer,
        glyphs: Option<&dyn GlyphRenderer>,
        wrap_width: Option<f64>,
    ) {
        for (_, list) in entries.into_iter().rev() {
            for mut annotation in list {
                if !annotation.draw(frame, glyphs) {
                    self.skipped_labels += 1;
                    continue;
                }
                if let Some(w) = wrap_width {
                    annotation.shift(-w);
                    annotation.draw(frame, glyphs);
                    annotation.shift(2.0 * w);
                    annotation.draw(frame, glyphs);
                }
            }
        }
    }
}
