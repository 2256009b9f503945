use crate::border::lut::ColorLut;
use crate::border::model::{BorderSegment, Edge, VisibleInterval, WindowRect};
use crate::border::occlusion::visible_ranges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    /// Thickness perpendicular to each edge, in pixels.
    pub border_width: u32,
    /// Target segment length along the edge, in pixels.
    pub segment_size: u32,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            border_width: 4,
            segment_size: 3,
        }
    }
}

/// Split `interval` into `max(1, len / segment_size)` equal pieces that tile
/// it exactly. The last piece always ends on `interval.end`.
pub fn subdivide(
    interval: VisibleInterval,
    segment_size: u32,
) -> impl DoubleEndedIterator<Item = (f32, f32)> + ExactSizeIterator {
    let len = interval.len().max(0);
    let count = if len == 0 {
        0
    } else {
        (len as u32 / segment_size.max(1)).max(1) as usize
    };
    let start = interval.start as f32;
    let end = interval.end as f32;
    let width = len as f32 / count.max(1) as f32;
    (0..count).map(move |i| {
        let a = start + i as f32 * width;
        let b = if i + 1 == count {
            end
        } else {
            start + (i + 1) as f32 * width
        };
        (a, b)
    })
}

/// Band swept by `edge` as `(start, end, fixed_min, fixed_max)`.
fn edge_band(rect: &WindowRect, edge: Edge, bw: i32) -> (i32, i32, i32, i32) {
    match edge {
        Edge::Top => (rect.x, rect.right(), rect.y, rect.y + bw),
        Edge::Right => (rect.y, rect.bottom(), rect.right() - bw, rect.right()),
        Edge::Bottom => (rect.x, rect.right(), rect.bottom() - bw, rect.bottom()),
        Edge::Left => (rect.y, rect.bottom(), rect.x, rect.x + bw),
    }
}

struct EdgeWalk<'a> {
    rect: WindowRect,
    bw: f32,
    perimeter: f32,
    lut: &'a ColorLut,
    phase_offset: usize,
}

impl EdgeWalk<'_> {
    fn segment(&self, edge: Edge, a: f32, b: f32) -> BorderSegment {
        let r = &self.rect;
        let (x, y) = (r.x as f32, r.y as f32);
        let (right, bottom) = (r.right() as f32, r.bottom() as f32);
        let base = edge.base_offset(r.w, r.h) as f32;
        let (x1, y1, x2, y2, along) = match edge {
            Edge::Top => (a, y, b, y + self.bw, a - x),
            Edge::Right => (right - self.bw, a, right, b, a - y),
            Edge::Bottom => (a, bottom - self.bw, b, bottom, right - b),
            Edge::Left => (x, a, x + self.bw, b, bottom - b),
        };
        let distance = base + along;
        let index = self
            .lut
            .index_for(self.phase_offset, distance, self.perimeter);
        BorderSegment {
            x1,
            y1,
            x2,
            y2,
            color: self.lut.get(index),
            edge,
            distance,
        }
    }
}

/// Stream the visible border segments of `rect` into `sink` in clockwise
/// walking order, so consecutive segments never move backwards along the
/// perimeter. Zero-length edges of a degenerate window contribute nothing.
pub fn generate_into<F>(
    rect: WindowRect,
    style: BorderStyle,
    occluders: &[WindowRect],
    lut: &ColorLut,
    phase_offset: usize,
    mut sink: F,
) where
    F: FnMut(BorderSegment),
{
    let walk = EdgeWalk {
        rect,
        bw: style.border_width as f32,
        perimeter: rect.perimeter() as f32,
        lut,
        phase_offset,
    };
    let bw = style.border_width as i32;

    for edge in Edge::CLOCKWISE {
        let (start, end, fixed_min, fixed_max) = edge_band(&rect, edge, bw);
        let visible = visible_ranges(start, end, fixed_min, fixed_max, edge.axis(), occluders);
        if edge.is_reversed() {
            for interval in visible.iter().rev() {
                for (a, b) in subdivide(*interval, style.segment_size).rev() {
                    sink(walk.segment(edge, a, b));
                }
            }
        } else {
            for interval in &visible {
                for (a, b) in subdivide(*interval, style.segment_size) {
                    sink(walk.segment(edge, a, b));
                }
            }
        }
    }
}

pub fn generate(
    rect: WindowRect,
    style: BorderStyle,
    occluders: &[WindowRect],
    lut: &ColorLut,
    phase_offset: usize,
) -> Vec<BorderSegment> {
    let mut segments = Vec::new();
    generate_into(rect, style, occluders, lut, phase_offset, |s| {
        segments.push(s)
    });
    segments
}

/// Generous pool size for a frame: every edge subdivided without occlusion,
/// plus headroom for intervals split by occluders.
pub fn estimate_segment_capacity(windows: &[WindowRect], segment_size: u32) -> usize {
    let seg = segment_size.max(1) as i64;
    let total: i64 = windows
        .iter()
        .map(|r| ((r.w as i64 / seg).max(1) + (r.h as i64 / seg).max(1)) * 2)
        .sum();
    total as usize + 200
}
