use crate::border::driver::FrameConfig;
use crate::border::lut::{ColorMode, HueBand, LutParams, Rgb};
use crate::border::segments::BorderStyle;
use crate::border::snapshot::WindowFilter;
use crate::hotkey::{parse_hotkey, Hotkey};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides the settings file location.
pub const SETTINGS_PATH_ENV: &str = "CHROMAGLOW_SETTINGS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Border thickness in pixels.
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    /// Target length of one colored segment in pixels.
    #[serde(default = "default_segment_size")]
    pub segment_size: u32,
    /// Full hue rotations per second.
    #[serde(default = "default_cycle_speed")]
    pub cycle_speed: f64,
    #[serde(default = "default_border_opacity")]
    pub border_opacity: f32,
    #[serde(default = "default_saturation")]
    pub saturation: f64,
    #[serde(default = "default_value")]
    pub value: f64,
    #[serde(default)]
    pub color_mode: ColorMode,
    /// Hue range used when `color_mode` is `restricted-band`.
    #[serde(default)]
    pub restricted_band: HueBand,
    #[serde(default = "default_max_windows")]
    pub max_windows: usize,
    #[serde(default = "default_lut_size")]
    pub lut_size: usize,
    /// Windows must be strictly larger than this (width, height) to get a border.
    #[serde(default = "default_min_window_size")]
    pub min_window_size: (i32, i32),
    /// Overlay pixels of exactly this color are transparent.
    #[serde(default = "default_color_key")]
    pub color_key: [u8; 3],
    #[serde(default = "default_active_delay_ms")]
    pub active_delay_ms: u64,
    #[serde(default = "default_paused_delay_ms")]
    pub paused_delay_ms: u64,
    #[serde(default = "default_quit_hotkey")]
    pub quit_hotkey: Option<String>,
    #[serde(default = "default_pause_hotkey")]
    pub pause_hotkey: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    /// Seconds between frame statistics log lines; 0 disables them.
    #[serde(default = "default_frame_stats_interval_secs")]
    pub frame_stats_interval_secs: u64,
}

fn default_border_width() -> u32 {
    4
}

fn default_segment_size() -> u32 {
    3
}

fn default_cycle_speed() -> f64 {
    0.18
}

fn default_border_opacity() -> f32 {
    0.92
}

fn default_saturation() -> f64 {
    0.88
}

fn default_value() -> f64 {
    0.95
}

fn default_max_windows() -> usize {
    15
}

fn default_lut_size() -> usize {
    720
}

fn default_min_window_size() -> (i32, i32) {
    (60, 40)
}

fn default_color_key() -> [u8; 3] {
    [1, 1, 1]
}

fn default_active_delay_ms() -> u64 {
    1
}

fn default_paused_delay_ms() -> u64 {
    50
}

fn default_quit_hotkey() -> Option<String> {
    Some("Ctrl+Shift+Q".into())
}

fn default_pause_hotkey() -> Option<String> {
    Some("Ctrl+Shift+P".into())
}

fn default_frame_stats_interval_secs() -> u64 {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            border_width: default_border_width(),
            segment_size: default_segment_size(),
            cycle_speed: default_cycle_speed(),
            border_opacity: default_border_opacity(),
            saturation: default_saturation(),
            value: default_value(),
            color_mode: ColorMode::default(),
            restricted_band: HueBand::default(),
            max_windows: default_max_windows(),
            lut_size: default_lut_size(),
            min_window_size: default_min_window_size(),
            color_key: default_color_key(),
            active_delay_ms: default_active_delay_ms(),
            paused_delay_ms: default_paused_delay_ms(),
            quit_hotkey: default_quit_hotkey(),
            pause_hotkey: default_pause_hotkey(),
            debug_logging: false,
            log_file: None,
            frame_stats_interval_secs: default_frame_stats_interval_secs(),
        }
    }
}

/// `$CHROMAGLOW_SETTINGS`, else `<config dir>/chromaglow/settings.json`,
/// else `settings.json` in the working directory.
pub fn default_settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os(SETTINGS_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join("chromaglow").join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("settings.json"))
}

impl Settings {
    /// Missing or empty files yield the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("cannot write settings to {}", path.display()))?;
        Ok(())
    }

    /// Clamp out-of-range values, warning about each correction.
    pub fn sanitized(mut self) -> Self {
        if self.border_width == 0 {
            tracing::warn!("border_width must be at least 1; using 1");
            self.border_width = 1;
        }
        if self.segment_size == 0 {
            tracing::warn!("segment_size must be at least 1; using 1");
            self.segment_size = 1;
        }
        if self.lut_size == 0 {
            tracing::warn!("lut_size must be at least 1; using {}", default_lut_size());
            self.lut_size = default_lut_size();
        }
        if !self.cycle_speed.is_finite() {
            tracing::warn!("cycle_speed is not a finite number; using default");
            self.cycle_speed = default_cycle_speed();
        }
        if !(0.0..=1.0).contains(&self.border_opacity) {
            tracing::warn!(
                "border_opacity {} outside [0, 1]; clamping",
                self.border_opacity
            );
            self.border_opacity = clamp_unit(self.border_opacity as f64) as f32;
        }
        if !(0.0..=1.0).contains(&self.saturation) {
            tracing::warn!("saturation {} outside [0, 1]; clamping", self.saturation);
            self.saturation = clamp_unit(self.saturation);
        }
        if !(0.0..=1.0).contains(&self.value) {
            tracing::warn!("value {} outside [0, 1]; clamping", self.value);
            self.value = clamp_unit(self.value);
        }
        self
    }

    pub fn color_key(&self) -> Rgb {
        Rgb::from_array(self.color_key)
    }

    pub fn lut_params(&self) -> LutParams {
        LutParams {
            size: self.lut_size,
            mode: self.color_mode,
            band: self.restricted_band,
            saturation: self.saturation,
            value: self.value,
            color_key: self.color_key(),
        }
    }

    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            style: BorderStyle {
                border_width: self.border_width,
                segment_size: self.segment_size,
            },
            cycle_speed: self.cycle_speed,
            active_delay: Duration::from_millis(self.active_delay_ms),
            paused_delay: Duration::from_millis(self.paused_delay_ms),
            stats_interval: Duration::from_secs(self.frame_stats_interval_secs),
        }
    }

    pub fn window_filter(&self) -> WindowFilter {
        WindowFilter {
            min_width: self.min_window_size.0,
            min_height: self.min_window_size.1,
            max_windows: self.max_windows,
        }
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn quit_hotkey(&self) -> Option<Hotkey> {
        parse_configured("quit_hotkey", self.quit_hotkey.as_deref())
    }

    pub fn pause_hotkey(&self) -> Option<Hotkey> {
        parse_configured("pause_hotkey", self.pause_hotkey.as_deref())
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        1.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn parse_configured(field: &str, value: Option<&str>) -> Option<Hotkey> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    match parse_hotkey(value) {
        Some(hotkey) => Some(hotkey),
        None => {
            tracing::warn!("provided {field} string '{value}' is invalid; ignoring");
            None
        }
    }
}
