use crate::border::model::BorderSegment;

/// Drawing primitives the segment pool delegates to.
///
/// A handle names one reusable drawable; the pool reassigns handles every
/// frame instead of creating and destroying them.
pub trait SegmentSurface {
    type Handle: Copy + std::fmt::Debug;

    fn create_slot(&mut self) -> Self::Handle;

    fn set_segment(&mut self, handle: Self::Handle, segment: &BorderSegment);

    /// Move the drawable out of the visible area.
    fn hide(&mut self, handle: Self::Handle);

    /// Make the current frame visible.
    fn present(&mut self) {}

    /// Service host events. Returns `false` once the host surface is gone.
    fn pump(&mut self) -> bool {
        true
    }

    fn release(&mut self) {}
}
