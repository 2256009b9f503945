use std::collections::VecDeque;
use std::time::Duration;

const DEFAULT_WINDOW_SIZE: usize = 240;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStatsSnapshot {
    pub avg_ms: f64,
    pub worst_ms: f64,
    pub p95_ms: f64,
    pub fps: f64,
    pub segments: usize,
    pub windows: usize,
    pub frame_samples: usize,
}

/// Rolling frame-time statistics for the render loop.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window_size: usize,
    work_ms_window: VecDeque<f64>,
    gap_ms_window: VecDeque<f64>,
    last_segments: usize,
    last_windows: usize,
    since_report: Duration,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl FrameStats {
    pub fn new(rolling_window: usize) -> Self {
        Self {
            window_size: rolling_window.max(1),
            work_ms_window: VecDeque::with_capacity(rolling_window.max(1)),
            gap_ms_window: VecDeque::with_capacity(rolling_window.max(1)),
            last_segments: 0,
            last_windows: 0,
            since_report: Duration::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.work_ms_window.clear();
        self.gap_ms_window.clear();
        self.last_segments = 0;
        self.last_windows = 0;
        self.since_report = Duration::ZERO;
    }

    /// `work` is the time spent producing the frame, `gap` the wall-clock
    /// time since the previous frame started.
    pub fn finish_frame(&mut self, work: Duration, gap: Duration, segments: usize, windows: usize) {
        Self::push_window(&mut self.work_ms_window, ms(work), self.window_size);
        Self::push_window(&mut self.gap_ms_window, ms(gap), self.window_size);
        self.last_segments = segments;
        self.last_windows = windows;
        self.since_report += gap;
    }

    pub fn snapshot(&self) -> FrameStatsSnapshot {
        let avg_gap = avg(&self.gap_ms_window);
        FrameStatsSnapshot {
            avg_ms: avg(&self.work_ms_window),
            worst_ms: max(&self.work_ms_window),
            p95_ms: p95(&self.work_ms_window),
            fps: if avg_gap > 0.0 { 1000.0 / avg_gap } else { 0.0 },
            segments: self.last_segments,
            windows: self.last_windows,
            frame_samples: self.work_ms_window.len(),
        }
    }

    /// Snapshot once at least `interval` of frame time has accumulated.
    pub fn take_report(&mut self, interval: Duration) -> Option<FrameStatsSnapshot> {
        if interval.is_zero() || self.since_report < interval {
            return None;
        }
        self.since_report = Duration::ZERO;
        Some(self.snapshot())
    }

    fn push_window(window: &mut VecDeque<f64>, sample: f64, window_size: usize) {
        window.push_back(sample);
        while window.len() > window_size {
            let _ = window.pop_front();
        }
    }
}

fn ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn avg(window: &VecDeque<f64>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    window.iter().sum::<f64>() / window.len() as f64
}

fn max(window: &VecDeque<f64>) -> f64 {
    window.iter().copied().fold(0.0, f64::max)
}

fn p95(window: &VecDeque<f64>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let mut values: Vec<f64> = window.iter().copied().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((values.len() as f64 * 0.95).ceil() as usize).saturating_sub(1);
    values[idx.min(values.len().saturating_sub(1))]
}
