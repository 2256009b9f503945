use crate::border::lut::Rgb;
use crate::border::model::BorderSegment;
use crate::border::surface::SegmentSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotId(pub usize);

/// Integer pixel rectangle, half-open on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    /// Snap a segment to pixels. Shared boundaries of neighbouring segments
    /// round the same way, so tiled segments stay gapless.
    pub fn from_segment(segment: &BorderSegment) -> Self {
        Self {
            x0: segment.x1.round() as i32,
            y0: segment.y1.round() as i32,
            x1: segment.x2.round() as i32,
            y1: segment.y2.round() as i32,
        }
    }

    pub fn clip(self, width: u32, height: u32) -> Option<Self> {
        let clipped = Self {
            x0: self.x0.max(0),
            y0: self.y0.max(0),
            x1: self.x1.min(width as i32),
            y1: self.y1.min(height as i32),
        };
        (clipped.x0 < clipped.x1 && clipped.y0 < clipped.y1).then_some(clipped)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    current: Option<(PixelRect, Rgb)>,
    painted: Option<PixelRect>,
}

/// Pool slots backed by a BGRA pixel buffer whose background is the color
/// key. Only rectangles that changed since the last flush are erased.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<Slot>,
    key: Rgb,
    dirty: bool,
}

impl SlotTable {
    pub fn new(key: Rgb) -> Self {
        Self {
            slots: Vec::new(),
            key,
            dirty: false,
        }
    }

    pub fn key(&self) -> Rgb {
        self.key
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn create(&mut self) -> SlotId {
        self.slots.push(Slot::default());
        SlotId(self.slots.len() - 1)
    }

    pub fn set(&mut self, id: SlotId, segment: &BorderSegment) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.current = Some((PixelRect::from_segment(segment), segment.color));
            self.dirty = true;
        }
    }

    pub fn hide(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            if slot.current.take().is_some() || slot.painted.is_some() {
                self.dirty = true;
            }
        }
    }

    pub fn visible_count(&self) -> usize {
        self.slots.iter().filter(|s| s.current.is_some()).count()
    }

    /// Fill the whole buffer with the key color.
    pub fn clear(&mut self, pixels: &mut [u8]) {
        let key = bgra(self.key);
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&key);
        }
        for slot in &mut self.slots {
            slot.painted = None;
        }
        self.dirty = true;
    }

    /// Bring `pixels` up to date with the slot contents.
    pub fn flush(&mut self, pixels: &mut [u8], width: u32, height: u32) {
        if !self.dirty {
            return;
        }
        let key = bgra(self.key);
        for slot in &mut self.slots {
            let moved = slot.painted != slot.current.map(|(rect, _)| rect);
            if moved {
                if let Some(old) = slot.painted.take() {
                    fill(pixels, width, height, old, key);
                }
            }
        }
        for slot in &mut self.slots {
            if let Some((rect, color)) = slot.current {
                fill(pixels, width, height, rect, bgra(color));
                slot.painted = Some(rect);
            }
        }
        self.dirty = false;
    }
}

fn bgra(color: Rgb) -> [u8; 4] {
    [color.b, color.g, color.r, 255]
}

fn fill(pixels: &mut [u8], width: u32, height: u32, rect: PixelRect, color: [u8; 4]) {
    let Some(rect) = rect.clip(width, height) else {
        return;
    };
    let stride = width as usize * 4;
    for y in rect.y0..rect.y1 {
        let row = y as usize * stride;
        let span = &mut pixels[row + rect.x0 as usize * 4..row + rect.x1 as usize * 4];
        for px in span.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }
}

/// In-memory surface used headless and in tests.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    table: SlotTable,
    presented_frames: u64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, key: Rgb) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        let mut table = SlotTable::new(key);
        table.clear(&mut pixels);
        table.dirty = false;
        Self {
            width,
            height,
            pixels,
            table,
            presented_frames: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgb::new(
            self.pixels[idx + 2],
            self.pixels[idx + 1],
            self.pixels[idx],
        )
    }

    pub fn slots(&self) -> &SlotTable {
        &self.table
    }

    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }
}

impl SegmentSurface for RasterSurface {
    type Handle = SlotId;

    fn create_slot(&mut self) -> SlotId {
        self.table.create()
    }

    fn set_segment(&mut self, handle: SlotId, segment: &BorderSegment) {
        self.table.set(handle, segment);
    }

    fn hide(&mut self, handle: SlotId) {
        self.table.hide(handle);
    }

    fn present(&mut self) {
        self.table.flush(&mut self.pixels, self.width, self.height);
        self.presented_frames += 1;
    }
}
