use chromaglow::border::driver::{FrameConfig, FrameDriver, TickOutcome};
use chromaglow::border::lut::{ColorLut, LutParams, Rgb};
use chromaglow::border::messages::{request_channel, ExitReason, LoopRequest};
use chromaglow::border::model::{BorderSegment, WindowRect};
use chromaglow::border::raster::RasterSurface;
use chromaglow::border::runtime;
use chromaglow::border::snapshot::WindowSnapshot;
use chromaglow::border::state::RenderState;
use chromaglow::border::surface::SegmentSurface;
use std::collections::BTreeSet;
use std::time::Duration;

const KEY: Rgb = Rgb::new(1, 1, 1);
const FRAME: Duration = Duration::from_millis(16);

fn windows() -> WindowSnapshot {
    WindowSnapshot::new(vec![
        WindowRect::new(10, 10, 100, 50),
        WindowRect::new(60, 30, 120, 80),
    ])
}

fn lut() -> ColorLut {
    ColorLut::build(LutParams::default())
}

#[derive(Default)]
struct CountingSurface {
    created: usize,
    visible: BTreeSet<usize>,
    releases: usize,
    dead: bool,
}

impl SegmentSurface for CountingSurface {
    type Handle = usize;

    fn create_slot(&mut self) -> usize {
        self.created += 1;
        self.created - 1
    }

    fn set_segment(&mut self, handle: usize, _segment: &BorderSegment) {
        self.visible.insert(handle);
    }

    fn hide(&mut self, handle: usize) {
        self.visible.remove(&handle);
    }

    fn pump(&mut self) -> bool {
        !self.dead
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}

#[test]
fn active_tick_draws_every_window() {
    let (_handle, rx) = request_channel();
    let surface = RasterSurface::new(200, 120, KEY);
    let mut driver = FrameDriver::new(FrameConfig::default(), lut(), surface, rx);
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };

    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Continue(Duration::from_millis(1))
    );
    let report = driver.last_report();
    assert_eq!(report.windows, 2);
    assert!(report.segments > 0);
    assert_eq!(report.hidden, 0);
    assert_eq!(driver.surface().slots().visible_count(), report.segments);

    // Top edge of the front window is painted, its interior is not.
    assert_ne!(driver.surface().pixel(20, 11), KEY);
    assert_eq!(driver.surface().pixel(50, 35), KEY);
}

#[test]
fn back_window_border_is_clipped_by_the_front_one() {
    let (_handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let front = WindowRect::new(0, 0, 300, 300);
    let back = WindowRect::new(50, 50, 100, 100);
    let mut source =
        || -> anyhow::Result<WindowSnapshot> { Ok(WindowSnapshot::new(vec![front, back])) };
    driver.tick(FRAME, &mut source);

    let mut only_front = || -> anyhow::Result<WindowSnapshot> {
        Ok(WindowSnapshot::new(vec![front]))
    };
    let with_back = driver.last_report().segments;
    driver.tick(FRAME, &mut only_front);
    assert_eq!(driver.last_report().segments, with_back);
    assert_eq!(driver.last_report().hidden, 0);
}

#[test]
fn phase_follows_wall_clock_not_frame_count() {
    let (_handle, rx) = request_channel();
    let mut fast = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let (_handle2, rx2) = request_channel();
    let mut slow = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx2,
    );
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(WindowSnapshot::default()) };

    for _ in 0..10 {
        fast.tick(Duration::from_millis(100), &mut source);
    }
    slow.tick(Duration::from_secs(1), &mut source);

    assert!((fast.phase().value() - 0.18).abs() < 1e-9);
    assert!((slow.phase().value() - 0.18).abs() < 1e-9);
}

#[test]
fn pause_hides_borders_and_freezes_the_phase() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };

    driver.tick(FRAME, &mut source);
    let drawn = driver.last_report().segments;
    assert_eq!(driver.surface().visible.len(), drawn);
    let phase = driver.phase();

    assert!(handle.post(LoopRequest::SetPaused(true)));
    assert_eq!(
        driver.tick(Duration::from_secs(3), &mut source),
        TickOutcome::Continue(Duration::from_millis(50))
    );
    assert_eq!(driver.state(), RenderState::Paused);
    assert!(driver.surface().visible.is_empty());
    assert_eq!(driver.last_report().hidden, drawn);

    driver.tick(Duration::from_secs(3), &mut source);
    assert_eq!(driver.phase(), phase);

    assert!(handle.post(LoopRequest::TogglePause));
    driver.tick(FRAME, &mut source);
    assert_eq!(driver.state(), RenderState::Active);
    assert_eq!(driver.surface().visible.len(), drawn);
    assert_eq!(driver.last_report().hidden, 0);
}

#[test]
fn quit_cleans_up_once_and_stops() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    driver.tick(FRAME, &mut source);

    assert!(handle.quit(ExitReason::Hotkey));
    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Stop(ExitReason::Hotkey)
    );
    assert!(driver.surface().visible.is_empty());
    assert_eq!(driver.surface().releases, 1);

    // Later requests cannot revive the loop.
    handle.post(LoopRequest::SetPaused(false));
    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Stop(ExitReason::Hotkey)
    );
    assert_eq!(driver.surface().releases, 1);
    assert_eq!(driver.state(), RenderState::Stopped);
}

#[test]
fn failed_snapshot_renders_nothing_and_continues() {
    let (_handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let mut calls = 0;
    let mut source = || -> anyhow::Result<WindowSnapshot> {
        calls += 1;
        if calls == 2 {
            anyhow::bail!("window enumeration failed");
        }
        Ok(windows())
    };

    driver.tick(FRAME, &mut source);
    let drawn = driver.last_report().segments;

    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Continue(Duration::from_millis(1))
    );
    assert_eq!(driver.last_report().windows, 0);
    assert_eq!(driver.last_report().hidden, drawn);
    assert!(driver.surface().visible.is_empty());

    driver.tick(FRAME, &mut source);
    assert_eq!(driver.last_report().segments, drawn);
}

#[test]
fn run_returns_after_a_posted_quit() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        RasterSurface::new(64, 64, KEY),
        rx,
    );
    handle.quit(ExitReason::UserRequest);
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    assert_eq!(runtime::run(&mut driver, &mut source), ExitReason::UserRequest);
    assert_eq!(driver.surface().slots().visible_count(), 0);
}

#[test]
fn run_quits_from_another_thread() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let poster = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        handle.post(LoopRequest::TogglePause);
        std::thread::sleep(Duration::from_millis(30));
        handle.quit(ExitReason::Hotkey);
    });
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    assert_eq!(runtime::run(&mut driver, &mut source), ExitReason::Hotkey);
    poster.join().unwrap();
    assert_eq!(driver.surface().releases, 1);
}

#[test]
fn lost_surface_stops_the_loop() {
    let (_handle, rx) = request_channel();
    let surface = CountingSurface {
        dead: true,
        ..CountingSurface::default()
    };
    let mut driver = FrameDriver::new(FrameConfig::default(), lut(), surface, rx);
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    assert_eq!(runtime::run(&mut driver, &mut source), ExitReason::SurfaceLost);
}

#[test]
fn dropped_senders_stop_the_loop() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    driver.tick(FRAME, &mut source);
    assert!(!driver.surface().visible.is_empty());

    drop(handle);
    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Stop(ExitReason::Disconnected)
    );
    assert!(driver.surface().visible.is_empty());
    assert_eq!(driver.surface().releases, 1);
}

#[test]
fn run_exits_when_every_sender_is_gone() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let poster = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        drop(handle);
    });
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    assert_eq!(runtime::run(&mut driver, &mut source), ExitReason::Disconnected);
    poster.join().unwrap();
}

#[test]
fn queued_quit_wins_over_disconnect() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    handle.quit(ExitReason::Hotkey);
    drop(handle);
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Stop(ExitReason::Hotkey)
    );
}

#[test]
fn request_posted_during_wait_applies_before_next_frame() {
    let (handle, rx) = request_channel();
    let mut driver = FrameDriver::new(
        FrameConfig::default(),
        lut(),
        CountingSurface::default(),
        rx,
    );
    let mut source = || -> anyhow::Result<WindowSnapshot> { Ok(windows()) };
    driver.tick(FRAME, &mut source);
    let drawn = driver.last_report().segments;
    assert!(drawn > 0);

    let poster = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(20));
        handle.post(LoopRequest::SetPaused(true));
        handle
    });
    let started = std::time::Instant::now();
    driver.wait(Duration::from_secs(10));
    assert!(started.elapsed() < Duration::from_secs(5), "wait did not wake early");
    assert_eq!(driver.state(), RenderState::Paused);
    let _handle = poster.join().unwrap();

    assert_eq!(
        driver.tick(FRAME, &mut source),
        TickOutcome::Continue(Duration::from_millis(50))
    );
    assert!(driver.surface().visible.is_empty());
    assert_eq!(driver.last_report().hidden, drawn);
}
