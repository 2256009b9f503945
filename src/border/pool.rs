use crate::border::model::BorderSegment;
use crate::border::surface::SegmentSurface;

/// Reusable drawable handles, reassigned every frame.
///
/// The pool only ever grows. Slots used in the previous frame but not in the
/// current one are hidden by [`SegmentPool::finish_frame`].
pub struct SegmentPool<S: SegmentSurface> {
    surface: S,
    handles: Vec<S::Handle>,
    cursor: usize,
    prev_used: usize,
}

impl<S: SegmentSurface> SegmentPool<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            handles: Vec::new(),
            cursor: 0,
            prev_used: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.handles.len()
    }

    pub fn used_this_frame(&self) -> usize {
        self.cursor
    }

    pub fn used_last_frame(&self) -> usize {
        self.prev_used
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn ensure_capacity(&mut self, needed: usize) {
        if needed > self.handles.len() {
            self.handles.reserve(needed - self.handles.len());
        }
        while self.handles.len() < needed {
            let handle = self.surface.create_slot();
            self.handles.push(handle);
        }
    }

    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Next handle for this frame, growing the pool if the estimate fell short.
    pub fn next_slot(&mut self) -> S::Handle {
        if self.cursor >= self.handles.len() {
            self.ensure_capacity(self.cursor + 1);
        }
        let handle = self.handles[self.cursor];
        self.cursor += 1;
        handle
    }

    pub fn place(&mut self, segment: &BorderSegment) {
        let handle = self.next_slot();
        self.surface.set_segment(handle, segment);
    }

    /// Hide stale trailing slots and present. Returns how many were hidden.
    pub fn finish_frame(&mut self) -> usize {
        let used = self.cursor;
        let stale = used..self.prev_used.max(used);
        let hidden = stale.len();
        for &handle in &self.handles[stale] {
            self.surface.hide(handle);
        }
        self.prev_used = used;
        self.surface.present();
        hidden
    }

    /// Hide everything shown last frame, as when pausing or quitting.
    pub fn hide_all(&mut self) -> usize {
        let shown = self.prev_used.min(self.handles.len());
        for &handle in &self.handles[..shown] {
            self.surface.hide(handle);
        }
        self.prev_used = 0;
        self.cursor = 0;
        self.surface.present();
        shown
    }
}
