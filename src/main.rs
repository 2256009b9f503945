use chromaglow::border::lut::ColorLut;
use chromaglow::border::messages::{request_channel, ExitReason, LoopRequest};
use chromaglow::border::overlay::{create_platform_surface, enable_dpi_awareness, native_handle};
use chromaglow::border::snapshot::{DesktopWindows, VirtualScreen};
use chromaglow::border::{runtime, FrameDriver};
use chromaglow::hotkey::{HotkeyBinding, HotkeyListener};
use chromaglow::logging;
use chromaglow::settings::{default_settings_path, Settings};
use std::path::PathBuf;

const FALLBACK_SCREEN: VirtualScreen = VirtualScreen {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::var_os(chromaglow::settings::SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .or_else(|| std::env::args_os().nth(1).map(PathBuf::from))
        .unwrap_or_else(default_settings_path);
    let settings = Settings::load(&settings_path)?;
    logging::init(settings.debug_logging, settings.log_file_path());
    let settings = settings.sanitized();

    tracing::info!(
        path = %settings_path.display(),
        border_width = settings.border_width,
        segment_size = settings.segment_size,
        cycle_speed = settings.cycle_speed,
        color_mode = ?settings.color_mode,
        max_windows = settings.max_windows,
        "chromaglow starting"
    );

    enable_dpi_awareness();
    let screen = VirtualScreen::current().unwrap_or_else(|| {
        tracing::warn!("virtual screen metrics unavailable; assuming 1920x1080");
        FALLBACK_SCREEN
    });
    tracing::info!(?screen, "virtual screen");

    let surface = create_platform_surface(screen, settings.color_key(), settings.border_opacity)?;
    let own_window = native_handle(&surface);
    let lut = ColorLut::build(settings.lut_params());
    let (handle, requests) = request_channel();

    let mut bindings: Vec<HotkeyBinding> = Vec::new();
    if let Some(hotkey) = settings.quit_hotkey() {
        bindings.push((
            hotkey,
            LoopRequest::Quit {
                reason: ExitReason::Hotkey,
            },
        ));
    }
    if let Some(hotkey) = settings.pause_hotkey() {
        bindings.push((hotkey, LoopRequest::TogglePause));
    }
    let mut listener = match HotkeyListener::spawn(bindings, handle.clone()) {
        Ok(listener) => Some(listener),
        Err(err) => {
            tracing::error!(error = %err, "failed to start hotkey listener");
            None
        }
    };

    let mut source = DesktopWindows::new(own_window, screen, settings.window_filter());
    let mut driver = FrameDriver::new(settings.frame_config(), lut, surface, requests);
    let reason = runtime::run(&mut driver, &mut source);

    if let Some(listener) = listener.as_mut() {
        listener.stop();
    }
    drop(handle);
    tracing::info!(?reason, "chromaglow exited");
    Ok(())
}
