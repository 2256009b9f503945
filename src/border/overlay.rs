use crate::border::lut::Rgb;
use crate::border::snapshot::VirtualScreen;
use anyhow::Result;

/// Layered-window alpha for a border opacity in `[0, 1]`.
pub fn opacity_to_alpha(opacity: f32) -> u8 {
    if !opacity.is_finite() {
        return u8::MAX;
    }
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `COLORREF` layout (`0x00BBGGRR`) of the transparency key.
pub fn color_key_ref_value(key: Rgb) -> u32 {
    (key.r as u32) | ((key.g as u32) << 8) | ((key.b as u32) << 16)
}

#[cfg(windows)]
mod platform {
    use super::{color_key_ref_value, opacity_to_alpha};
    use crate::border::lut::Rgb;
    use crate::border::model::BorderSegment;
    use crate::border::raster::{SlotId, SlotTable};
    use crate::border::snapshot::VirtualScreen;
    use crate::border::surface::SegmentSurface;
    use anyhow::{anyhow, Context, Result};
    use std::mem;
    use std::ptr;
    use std::sync::Once;
    use windows::core::PCWSTR;
    use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::Graphics::Gdi::{
        BeginPaint, BitBlt, CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, EndPaint,
        InvalidateRect, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
        HBITMAP, HDC, HGDIOBJ, PAINTSTRUCT, SRCCOPY,
    };
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::HiDpi::{
        SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetWindowLongPtrW,
        IsWindow, PeekMessageW, RegisterClassW, SetLayeredWindowAttributes, SetProcessDPIAware,
        SetWindowLongPtrW, SetWindowPos, TranslateMessage, GWLP_USERDATA, HWND_TOPMOST, LWA_ALPHA,
        LWA_COLORKEY, MSG, PM_REMOVE, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_SHOWWINDOW,
        WINDOW_EX_STYLE, WINDOW_STYLE, WM_ERASEBKGND, WM_PAINT, WNDCLASSW, WS_EX_LAYERED,
        WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
    };

    pub fn compose_overlay_window_ex_style() -> WINDOW_EX_STYLE {
        WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST | WS_EX_TOOLWINDOW | WS_EX_NOACTIVATE
    }

    pub fn color_key_ref(key: Rgb) -> COLORREF {
        COLORREF(color_key_ref_value(key))
    }

    pub fn configure_layered_window(
        hwnd: HWND,
        key: Rgb,
        opacity: f32,
    ) -> windows::core::Result<()> {
        unsafe {
            SetLayeredWindowAttributes(
                hwnd,
                color_key_ref(key),
                opacity_to_alpha(opacity),
                LWA_COLORKEY | LWA_ALPHA,
            )
        }
    }

    /// Window bounds are reported in physical pixels only for DPI-aware
    /// processes; must run before any window is created.
    pub fn enable_dpi_awareness() {
        let aware =
            unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) };
        if aware.is_err() {
            let _ = unsafe { SetProcessDPIAware() };
        }
    }

    fn widestring(value: &str) -> Vec<u16> {
        use std::os::windows::ffi::OsStrExt;
        std::ffi::OsStr::new(value)
            .encode_wide()
            .chain(std::iter::once(0))
            .collect()
    }

    unsafe extern "system" fn overlay_wndproc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_ERASEBKGND => LRESULT(1),
            WM_PAINT => {
                let mut ps = PAINTSTRUCT::default();
                let hdc = unsafe { BeginPaint(hwnd, &mut ps) };
                if !hdc.0.is_null() {
                    let mem_dc = HDC(unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) } as *mut _);
                    if !mem_dc.0.is_null() {
                        let width = ps.rcPaint.right - ps.rcPaint.left;
                        let height = ps.rcPaint.bottom - ps.rcPaint.top;
                        let _ = unsafe {
                            BitBlt(
                                hdc,
                                ps.rcPaint.left,
                                ps.rcPaint.top,
                                width,
                                height,
                                mem_dc,
                                ps.rcPaint.left,
                                ps.rcPaint.top,
                                SRCCOPY,
                            )
                        };
                    }
                }
                unsafe {
                    let _ = EndPaint(hwnd, &ps);
                }
                LRESULT(0)
            }
            _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        }
    }

    /// Transparent, click-through, always-on-top window covering the virtual
    /// screen. Border slots are rasterized into a DIB section and blitted on
    /// `WM_PAINT`.
    #[derive(Debug)]
    pub struct OverlayWindow {
        hwnd: HWND,
        mem_dc: HDC,
        dib: HBITMAP,
        old_bitmap: HGDIOBJ,
        bits: *mut u8,
        size_bytes: usize,
        screen: VirtualScreen,
        table: SlotTable,
    }

    impl OverlayWindow {
        pub fn create(screen: VirtualScreen, key: Rgb, opacity: f32) -> Result<Self> {
            static REGISTER_CLASS: Once = Once::new();
            let class_name = widestring("ChromaglowOverlay");
            let hinstance = unsafe { GetModuleHandleW(PCWSTR::null()) }
                .context("GetModuleHandleW failed")?;

            REGISTER_CLASS.call_once(|| unsafe {
                let wc = WNDCLASSW {
                    hInstance: hinstance.into(),
                    lpszClassName: PCWSTR(class_name.as_ptr()),
                    lpfnWndProc: Some(overlay_wndproc),
                    ..Default::default()
                };
                let _ = RegisterClassW(&wc);
            });

            let hwnd = unsafe {
                CreateWindowExW(
                    compose_overlay_window_ex_style(),
                    PCWSTR(class_name.as_ptr()),
                    PCWSTR::null(),
                    WINDOW_STYLE(WS_POPUP.0),
                    screen.x,
                    screen.y,
                    screen.width,
                    screen.height,
                    None,
                    None,
                    hinstance,
                    None,
                )
            }
            .context("failed to create overlay window")?;

            if let Err(err) = configure_layered_window(hwnd, key, opacity) {
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                return Err(anyhow!("failed to configure overlay transparency: {err}"));
            }

            let mem_dc = unsafe { CreateCompatibleDC(HDC::default()) };
            if mem_dc.0.is_null() {
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                return Err(anyhow!("failed to create overlay memory DC"));
            }

            let mut bmi = BITMAPINFO::default();
            bmi.bmiHeader = BITMAPINFOHEADER {
                biSize: mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: screen.width,
                biHeight: -screen.height,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            };

            let mut bits: *mut core::ffi::c_void = ptr::null_mut();
            let dib = unsafe {
                CreateDIBSection(
                    mem_dc,
                    &bmi,
                    DIB_RGB_COLORS,
                    &mut bits,
                    windows::Win32::Foundation::HANDLE::default(),
                    0,
                )
            };
            let dib = match dib {
                Ok(dib) if !bits.is_null() => dib,
                _ => {
                    unsafe {
                        let _ = DeleteDC(mem_dc);
                        let _ = DestroyWindow(hwnd);
                    }
                    return Err(anyhow!("failed to allocate overlay bitmap"));
                }
            };

            let old_bitmap = unsafe { SelectObject(mem_dc, dib) };
            unsafe {
                let _ = SetWindowLongPtrW(hwnd, GWLP_USERDATA, mem_dc.0 as isize);
            }

            let size_bytes = (screen.width as usize)
                .saturating_mul(screen.height as usize)
                .saturating_mul(4);

            let mut window = Self {
                hwnd,
                mem_dc,
                dib,
                old_bitmap,
                bits: bits as *mut u8,
                size_bytes,
                screen,
                table: SlotTable::new(key),
            };
            window.with_bitmap_mut(|table, pixels, _, _| table.clear(pixels));
            window.show();
            Ok(window)
        }

        pub fn raw_handle(&self) -> isize {
            self.hwnd.0 as isize
        }

        pub fn screen(&self) -> VirtualScreen {
            self.screen
        }

        pub fn show(&self) {
            unsafe {
                let _ = SetWindowPos(
                    self.hwnd,
                    HWND_TOPMOST,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
                );
            }
        }

        fn with_bitmap_mut<F>(&mut self, mut f: F)
        where
            F: FnMut(&mut SlotTable, &mut [u8], u32, u32),
        {
            if self.bits.is_null() || self.size_bytes == 0 {
                return;
            }
            let pixels = unsafe { std::slice::from_raw_parts_mut(self.bits, self.size_bytes) };
            f(
                &mut self.table,
                pixels,
                self.screen.width as u32,
                self.screen.height as u32,
            );
        }

        pub fn shutdown(&mut self) {
            unsafe {
                if !self.mem_dc.0.is_null() {
                    let _ = SelectObject(self.mem_dc, self.old_bitmap);
                }
                if !self.dib.0.is_null() {
                    let _ = DeleteObject(self.dib);
                    self.dib = HBITMAP::default();
                }
                if !self.mem_dc.0.is_null() {
                    let _ = DeleteDC(self.mem_dc);
                    self.mem_dc = HDC::default();
                }
                if !self.hwnd.0.is_null() {
                    let _ = SetWindowLongPtrW(self.hwnd, GWLP_USERDATA, 0);
                    let _ = DestroyWindow(self.hwnd);
                    self.hwnd = HWND::default();
                }
                self.bits = ptr::null_mut();
                self.size_bytes = 0;
            }
        }
    }

    impl SegmentSurface for OverlayWindow {
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
            if !self.table.is_dirty() {
                return;
            }
            self.with_bitmap_mut(|table, pixels, width, height| {
                table.flush(pixels, width, height)
            });
            unsafe {
                let _ = InvalidateRect(self.hwnd, None, false);
            }
        }

        fn pump(&mut self) -> bool {
            unsafe {
                let mut msg = MSG::default();
                while PeekMessageW(&mut msg, HWND::default(), 0, 0, PM_REMOVE).into() {
                    let _ = TranslateMessage(&msg);
                    let _ = DispatchMessageW(&msg);
                }
                !self.hwnd.0.is_null() && IsWindow(self.hwnd).as_bool()
            }
        }

        fn release(&mut self) {
            self.shutdown();
        }
    }

    impl Drop for OverlayWindow {
        fn drop(&mut self) {
            self.shutdown();
        }
    }

}

#[cfg(windows)]
pub use platform::{enable_dpi_awareness, OverlayWindow};

#[cfg(windows)]
pub type PlatformSurface = OverlayWindow;

#[cfg(not(windows))]
pub type PlatformSurface = crate::border::raster::RasterSurface;

/// Open the overlay surface for `screen`.
#[cfg(windows)]
pub fn create_platform_surface(
    screen: VirtualScreen,
    key: Rgb,
    opacity: f32,
) -> Result<PlatformSurface> {
    OverlayWindow::create(screen, key, opacity)
}

/// Without a native overlay the borders are rendered into memory only.
#[cfg(not(windows))]
pub fn create_platform_surface(
    screen: VirtualScreen,
    key: Rgb,
    _opacity: f32,
) -> Result<PlatformSurface> {
    tracing::warn!("no native overlay on this platform; rendering headless");
    Ok(crate::border::raster::RasterSurface::new(
        screen.width.max(0) as u32,
        screen.height.max(0) as u32,
        key,
    ))
}

/// Native window id of the surface, excluded from window snapshots.
#[cfg(windows)]
pub fn native_handle(surface: &PlatformSurface) -> isize {
    surface.raw_handle()
}

#[cfg(not(windows))]
pub fn native_handle(_surface: &PlatformSurface) -> isize {
    0
}

#[cfg(not(windows))]
pub fn enable_dpi_awareness() {}
