use crate::border::model::WindowRect;
use anyhow::Result;

/// Bounding box of all monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VirtualScreen {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl VirtualScreen {
    pub fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    #[cfg(windows)]
    pub fn current() -> Option<Self> {
        use windows::Win32::UI::WindowsAndMessaging::{
            GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
            SM_YVIRTUALSCREEN,
        };
        let screen = unsafe {
            Self {
                x: GetSystemMetrics(SM_XVIRTUALSCREEN),
                y: GetSystemMetrics(SM_YVIRTUALSCREEN),
                width: GetSystemMetrics(SM_CXVIRTUALSCREEN),
                height: GetSystemMetrics(SM_CYVIRTUALSCREEN),
            }
        };
        (screen.width > 0 && screen.height > 0).then_some(screen)
    }

    #[cfg(not(windows))]
    pub fn current() -> Option<Self> {
        None
    }
}

/// Front-to-back window rectangles for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowSnapshot {
    windows: Vec<WindowRect>,
}

impl WindowSnapshot {
    pub fn new(windows: Vec<WindowRect>) -> Self {
        Self { windows }
    }

    pub fn capped(mut windows: Vec<WindowRect>, max_windows: usize) -> Self {
        windows.truncate(max_windows);
        Self { windows }
    }

    pub fn windows(&self) -> &[WindowRect] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Each window paired with the windows strictly in front of it.
    pub fn with_occluders(&self) -> impl Iterator<Item = (WindowRect, &[WindowRect])> + '_ {
        self.windows
            .iter()
            .enumerate()
            .map(move |(i, rect)| (*rect, &self.windows[..i]))
    }
}

/// Pull-based provider of the current window stack.
pub trait WindowSource {
    fn snapshot(&mut self) -> Result<WindowSnapshot>;
}

impl<F> WindowSource for F
where
    F: FnMut() -> Result<WindowSnapshot>,
{
    fn snapshot(&mut self) -> Result<WindowSnapshot> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowFilter {
    pub min_width: i32,
    pub min_height: i32,
    pub max_windows: usize,
}

impl Default for WindowFilter {
    fn default() -> Self {
        Self {
            min_width: 60,
            min_height: 40,
            max_windows: 15,
        }
    }
}

impl WindowFilter {
    /// Tiny windows (tooltips, shell slivers) get no border.
    pub fn admits(&self, rect: &WindowRect) -> bool {
        rect.w > self.min_width && rect.h > self.min_height
    }
}

/// Translate absolute window bounds to virtual-screen coordinates, drop
/// windows the filter rejects and cap the count. Order is preserved.
pub fn collect_snapshot<I>(candidates: I, origin: (i32, i32), filter: &WindowFilter) -> WindowSnapshot
where
    I: IntoIterator<Item = WindowRect>,
{
    let windows = candidates
        .into_iter()
        .map(|r| WindowRect::new(r.x - origin.0, r.y - origin.1, r.w, r.h))
        .filter(|r| filter.admits(r))
        .take(filter.max_windows)
        .collect();
    WindowSnapshot::new(windows)
}

#[cfg(windows)]
mod platform {
    use super::{collect_snapshot, VirtualScreen, WindowFilter, WindowSnapshot, WindowSource};
    use crate::border::model::WindowRect;
    use anyhow::{Context, Result};
    use std::ffi::c_void;
    use std::mem;
    use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
    use windows::Win32::Graphics::Dwm::{
        DwmGetWindowAttribute, DWMWA_CLOAKED, DWMWA_EXTENDED_FRAME_BOUNDS,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        EnumWindows, GetClassNameW, GetWindowLongW, GetWindowRect, GetWindowTextLengthW,
        IsIconic, IsWindowVisible, GWL_EXSTYLE, WS_EX_APPWINDOW,
    };

    const EXCLUDED_CLASSES: &[&str] = &[
        "Progman",
        "WorkerW",
        "Shell_TrayWnd",
        "Shell_SecondaryTrayWnd",
        "Windows.UI.Core.CoreWindow",
        "ForegroundStaging",
        "MultitaskingViewFrame",
        "Windows.Internal.Shell.TabProxyWindow",
    ];

    /// Top-level desktop windows in z-order.
    pub struct DesktopWindows {
        own_window: isize,
        screen: VirtualScreen,
        filter: WindowFilter,
    }

    struct EnumContext {
        own_window: isize,
        found: Vec<WindowRect>,
    }

    impl DesktopWindows {
        pub fn new(own_window: isize, screen: VirtualScreen, filter: WindowFilter) -> Self {
            Self {
                own_window,
                screen,
                filter,
            }
        }
    }

    impl WindowSource for DesktopWindows {
        fn snapshot(&mut self) -> Result<WindowSnapshot> {
            let mut context = EnumContext {
                own_window: self.own_window,
                found: Vec::new(),
            };
            unsafe {
                EnumWindows(
                    Some(enum_proc),
                    LPARAM(&mut context as *mut EnumContext as isize),
                )
            }
            .context("EnumWindows failed")?;
            Ok(collect_snapshot(
                context.found,
                self.screen.origin(),
                &self.filter,
            ))
        }
    }

    unsafe extern "system" fn enum_proc(hwnd: HWND, data: LPARAM) -> BOOL {
        let context = unsafe { &mut *(data.0 as *mut EnumContext) };
        if hwnd.0 as isize == context.own_window || !is_real_window(hwnd) {
            return BOOL(1);
        }
        if let Some(rect) = window_bounds(hwnd) {
            context.found.push(WindowRect::new(
                rect.left,
                rect.top,
                rect.right - rect.left,
                rect.bottom - rect.top,
            ));
        }
        BOOL(1)
    }

    fn class_name(hwnd: HWND) -> String {
        let mut buf = [0u16; 256];
        let len = unsafe { GetClassNameW(hwnd, &mut buf) };
        String::from_utf16_lossy(&buf[..len.max(0) as usize])
    }

    fn is_cloaked(hwnd: HWND) -> bool {
        let mut cloaked: u32 = 0;
        let result = unsafe {
            DwmGetWindowAttribute(
                hwnd,
                DWMWA_CLOAKED,
                &mut cloaked as *mut u32 as *mut c_void,
                mem::size_of::<u32>() as u32,
            )
        };
        result.is_ok() && cloaked != 0
    }

    fn is_real_window(hwnd: HWND) -> bool {
        unsafe {
            if !IsWindowVisible(hwnd).as_bool() || IsIconic(hwnd).as_bool() {
                return false;
            }
        }
        let class = class_name(hwnd);
        if EXCLUDED_CLASSES.contains(&class.as_str()) || is_cloaked(hwnd) {
            return false;
        }
        // Untitled windows only count when they explicitly ask for a taskbar entry.
        if unsafe { GetWindowTextLengthW(hwnd) } == 0 {
            let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;
            if ex_style & WS_EX_APPWINDOW.0 == 0 {
                return false;
            }
        }
        true
    }

    fn window_bounds(hwnd: HWND) -> Option<RECT> {
        let mut rect = RECT::default();
        let extended = unsafe {
            DwmGetWindowAttribute(
                hwnd,
                DWMWA_EXTENDED_FRAME_BOUNDS,
                &mut rect as *mut RECT as *mut c_void,
                mem::size_of::<RECT>() as u32,
            )
        };
        if extended.is_err() {
            unsafe { GetWindowRect(hwnd, &mut rect) }.ok()?;
        }
        Some(rect)
    }
}

#[cfg(windows)]
pub use platform::DesktopWindows;

/// Stand-in used where no desktop window list is available.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct DesktopWindows;

#[cfg(not(windows))]
impl DesktopWindows {
    pub fn new(_own_window: isize, _screen: VirtualScreen, _filter: WindowFilter) -> Self {
        Self
    }
}

#[cfg(not(windows))]
impl WindowSource for DesktopWindows {
    fn snapshot(&mut self) -> Result<WindowSnapshot> {
        Ok(WindowSnapshot::default())
    }
}
