use crate::border::model::{Axis, VisibleInterval, WindowRect};

/// Portions of the band `[start, end)` × `(fixed_min, fixed_max)` not covered
/// by any occluder, in ascending order.
///
/// Visibility is derived from merged intervals once per edge, so the cost is
/// `O(k log k)` in the occluder count regardless of how finely the edge is
/// later subdivided.
pub fn visible_ranges(
    start: i32,
    end: i32,
    fixed_min: i32,
    fixed_max: i32,
    axis: Axis,
    occluders: &[WindowRect],
) -> Vec<VisibleInterval> {
    if start >= end {
        return Vec::new();
    }

    let blocked = blocking_intervals(start, end, fixed_min, fixed_max, axis, occluders);
    if blocked.is_empty() {
        return vec![VisibleInterval::new(start, end)];
    }
    complement(start, end, &merge_blocked(blocked))
}

fn blocking_intervals(
    start: i32,
    end: i32,
    fixed_min: i32,
    fixed_max: i32,
    axis: Axis,
    occluders: &[WindowRect],
) -> Vec<VisibleInterval> {
    occluders
        .iter()
        .filter_map(|o| {
            let (perp_lo, perp_hi, par_lo, par_hi) = match axis {
                Axis::Horizontal => (o.y, o.bottom(), o.x, o.right()),
                Axis::Vertical => (o.x, o.right(), o.y, o.bottom()),
            };
            // Touching the band exactly at its boundary does not cover it.
            if !(perp_lo < fixed_max && perp_hi > fixed_min) {
                return None;
            }
            let clipped = VisibleInterval::new(start.max(par_lo), end.min(par_hi));
            (!clipped.is_empty()).then_some(clipped)
        })
        .collect()
}

/// Sort and coalesce blocked intervals; touching intervals merge.
pub fn merge_blocked(mut blocked: Vec<VisibleInterval>) -> Vec<VisibleInterval> {
    blocked.sort_unstable();
    let mut merged: Vec<VisibleInterval> = Vec::with_capacity(blocked.len());
    for interval in blocked {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

fn complement(start: i32, end: i32, merged: &[VisibleInterval]) -> Vec<VisibleInterval> {
    let mut visible = Vec::with_capacity(merged.len() + 1);
    let mut pos = start;
    for blocked in merged {
        if pos < blocked.start {
            visible.push(VisibleInterval::new(pos, blocked.start));
        }
        pos = pos.max(blocked.end);
    }
    if pos < end {
        visible.push(VisibleInterval::new(pos, end));
    }
    visible
}
