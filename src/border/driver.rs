use crate::border::lut::ColorLut;
use crate::border::messages::{ExitReason, LoopRequest};
use crate::border::perf::{FrameStats, FrameStatsSnapshot};
use crate::border::phase::HuePhase;
use crate::border::pool::SegmentPool;
use crate::border::segments::{estimate_segment_capacity, generate_into, BorderStyle};
use crate::border::snapshot::{WindowSnapshot, WindowSource};
use crate::border::state::{can_transition, RenderState};
use crate::border::surface::SegmentSurface;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameConfig {
    pub style: BorderStyle,
    /// Full hue rotations per second.
    pub cycle_speed: f64,
    pub active_delay: Duration,
    pub paused_delay: Duration,
    /// Zero disables periodic frame statistics.
    pub stats_interval: Duration,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            style: BorderStyle::default(),
            cycle_speed: 0.18,
            active_delay: Duration::from_millis(1),
            paused_delay: Duration::from_millis(50),
            stats_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub windows: usize,
    pub segments: usize,
    pub hidden: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run the next tick after this delay.
    Continue(Duration),
    Stop(ExitReason),
}

/// Render-loop context: owns the animation phase, the segment pool and the
/// pause/quit state. Other threads reach it only through [`LoopRequest`]s.
pub struct FrameDriver<S: SegmentSurface> {
    config: FrameConfig,
    lut: ColorLut,
    phase: HuePhase,
    pool: SegmentPool<S>,
    state: RenderState,
    requests: Receiver<LoopRequest>,
    paused_cleared: bool,
    exit_reason: Option<ExitReason>,
    released: bool,
    snapshot_failing: bool,
    last_report: FrameReport,
    stats: FrameStats,
}

impl<S: SegmentSurface> FrameDriver<S> {
    pub fn new(
        config: FrameConfig,
        lut: ColorLut,
        surface: S,
        requests: Receiver<LoopRequest>,
    ) -> Self {
        Self {
            config,
            lut,
            phase: HuePhase::default(),
            pool: SegmentPool::new(surface),
            state: RenderState::Active,
            requests,
            paused_cleared: false,
            exit_reason: None,
            released: false,
            snapshot_failing: false,
            last_report: FrameReport::default(),
            stats: FrameStats::default(),
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn phase(&self) -> HuePhase {
        self.phase
    }

    pub fn lut(&self) -> &ColorLut {
        &self.lut
    }

    pub fn pool(&self) -> &SegmentPool<S> {
        &self.pool
    }

    pub fn surface(&self) -> &S {
        self.pool.surface()
    }

    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    pub fn frame_stats(&self) -> FrameStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn apply(&mut self, request: LoopRequest) {
        match request {
            LoopRequest::TogglePause => {
                let next = match self.state {
                    RenderState::Active => RenderState::Paused,
                    RenderState::Paused => RenderState::Active,
                    RenderState::Stopped => RenderState::Stopped,
                };
                self.transition(next);
            }
            LoopRequest::SetPaused(true) => self.transition(RenderState::Paused),
            LoopRequest::SetPaused(false) => self.transition(RenderState::Active),
            LoopRequest::Quit { reason } => {
                if self.exit_reason.is_none() {
                    self.exit_reason = Some(reason);
                }
                self.transition(RenderState::Stopped);
            }
        }
    }

    fn transition(&mut self, to: RenderState) {
        if self.state == to {
            return;
        }
        if !can_transition(self.state, to) {
            tracing::debug!(from = ?self.state, to = ?to, "ignoring render state transition");
            return;
        }
        tracing::info!(from = ?self.state, to = ?to, "render state changed");
        if to == RenderState::Paused {
            self.paused_cleared = false;
        }
        if to == RenderState::Active {
            self.stats.reset();
        }
        self.state = to;
    }

    fn drain_requests(&mut self) {
        loop {
            match self.requests.try_recv() {
                Ok(request) => self.apply(request),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected();
                    break;
                }
            }
        }
    }

    /// Nobody can post pause or quit any more, so the loop winds down.
    fn disconnected(&mut self) {
        if self.state.is_running() {
            tracing::warn!("all request senders dropped; stopping render loop");
            self.apply(LoopRequest::Quit {
                reason: ExitReason::Disconnected,
            });
        }
    }

    /// Block for up to `delay`, waking early to apply a posted request.
    pub fn wait(&mut self, delay: Duration) {
        match self.requests.recv_timeout(delay) {
            Ok(request) => self.apply(request),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => self.disconnected(),
        }
    }

    /// Service the host surface; a vanished surface stops the loop.
    pub fn pump_surface(&mut self) -> bool {
        let alive = self.pool.surface_mut().pump();
        if !alive && self.state.is_running() {
            tracing::warn!("overlay surface lost");
            self.apply(LoopRequest::Quit {
                reason: ExitReason::SurfaceLost,
            });
        }
        alive
    }

    /// Run one frame. `elapsed` is the wall-clock time since the previous tick.
    pub fn tick<W>(&mut self, elapsed: Duration, source: &mut W) -> TickOutcome
    where
        W: WindowSource + ?Sized,
    {
        self.drain_requests();
        match self.state {
            RenderState::Stopped => self.shutdown(),
            RenderState::Paused => {
                if !self.paused_cleared {
                    let hidden = self.pool.hide_all();
                    self.paused_cleared = true;
                    self.last_report = FrameReport {
                        hidden,
                        ..FrameReport::default()
                    };
                    tracing::debug!(hidden, "borders hidden while paused");
                }
                TickOutcome::Continue(self.config.paused_delay)
            }
            RenderState::Active => {
                self.render_frame(elapsed, source);
                TickOutcome::Continue(self.config.active_delay)
            }
        }
    }

    fn render_frame<W>(&mut self, elapsed: Duration, source: &mut W)
    where
        W: WindowSource + ?Sized,
    {
        let started = Instant::now();
        self.phase.advance(elapsed, self.config.cycle_speed);
        let snapshot = self.take_snapshot(source);
        let style = self.config.style;

        self.pool
            .ensure_capacity(estimate_segment_capacity(snapshot.windows(), style.segment_size));
        self.pool.begin_frame();

        let offset = self.lut.phase_offset(self.phase.value());
        let lut = &self.lut;
        let pool = &mut self.pool;
        for (rect, occluders) in snapshot.with_occluders() {
            generate_into(rect, style, occluders, lut, offset, |segment| {
                pool.place(&segment)
            });
        }

        let segments = self.pool.used_this_frame();
        let hidden = self.pool.finish_frame();
        self.last_report = FrameReport {
            windows: snapshot.len(),
            segments,
            hidden,
        };

        self.stats
            .finish_frame(started.elapsed(), elapsed, segments, snapshot.len());
        if let Some(report) = self.stats.take_report(self.config.stats_interval) {
            tracing::debug!(
                avg_ms = report.avg_ms,
                p95_ms = report.p95_ms,
                worst_ms = report.worst_ms,
                fps = report.fps,
                segments = report.segments,
                windows = report.windows,
                pool = self.pool.capacity(),
                "frame stats"
            );
        }
    }

    fn take_snapshot<W>(&mut self, source: &mut W) -> WindowSnapshot
    where
        W: WindowSource + ?Sized,
    {
        match source.snapshot() {
            Ok(snapshot) => {
                if self.snapshot_failing {
                    tracing::info!("window snapshot recovered");
                    self.snapshot_failing = false;
                }
                snapshot
            }
            Err(err) => {
                if !self.snapshot_failing {
                    tracing::warn!(error = %err, "window snapshot failed; rendering no borders");
                    self.snapshot_failing = true;
                }
                WindowSnapshot::default()
            }
        }
    }

    fn shutdown(&mut self) -> TickOutcome {
        if !self.released {
            let hidden = self.pool.hide_all();
            self.pool.surface_mut().release();
            self.released = true;
            tracing::debug!(hidden, "render loop cleaned up");
        }
        TickOutcome::Stop(self.exit_reason.unwrap_or(ExitReason::UserRequest))
    }
}
