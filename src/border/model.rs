use crate::border::lut::Rgb;

/// Window bounds in virtual-screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub fn perimeter(&self) -> i64 {
        2 * (self.w as i64 + self.h as i64)
    }
}

/// Half-open `[start, end)` range along one axis of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VisibleInterval {
    pub start: i32,
    pub end: i32,
}

impl VisibleInterval {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Orientation of the edge band being tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Top and bottom edges; the band runs along x.
    Horizontal,
    /// Left and right edges; the band runs along y.
    Vertical,
}

/// Window edges in clockwise walking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const CLOCKWISE: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn axis(self) -> Axis {
        match self {
            Edge::Top | Edge::Bottom => Axis::Horizontal,
            Edge::Right | Edge::Left => Axis::Vertical,
        }
    }

    /// Perimeter distance at which the walk enters this edge.
    pub fn base_offset(self, w: i32, h: i32) -> i32 {
        match self {
            Edge::Top => 0,
            Edge::Right => w,
            Edge::Bottom => w + h,
            Edge::Left => 2 * w + h,
        }
    }

    /// Bottom and left are walked against their coordinate axis.
    pub fn is_reversed(self) -> bool {
        matches!(self, Edge::Bottom | Edge::Left)
    }
}

/// One colored strip of a window border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Rgb,
    pub edge: Edge,
    /// Clockwise perimeter distance of the segment's leading end.
    pub distance: f32,
}

impl BorderSegment {
    /// Extent along the edge it belongs to.
    pub fn length(&self) -> f32 {
        match self.edge.axis() {
            Axis::Horizontal => self.x2 - self.x1,
            Axis::Vertical => self.y2 - self.y1,
        }
    }
}
