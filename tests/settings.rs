use chromaglow::border::lut::{ColorMode, Rgb};
use chromaglow::hotkey::parse_hotkey;
use chromaglow::settings::{default_settings_path, Settings, SETTINGS_PATH_ENV};
use serial_test::serial;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = Settings::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.border_width, 4);
    assert_eq!(settings.segment_size, 3);
    assert_eq!(settings.lut_size, 720);
    assert_eq!(settings.max_windows, 15);
    assert_eq!(settings.color_key(), Rgb::new(1, 1, 1));
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "border_width": 6, "color_mode": "g102", "quit_hotkey": "Alt+F4" }"#,
    )
    .unwrap();

    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.border_width, 6);
    assert_eq!(settings.color_mode, ColorMode::RestrictedBand);
    assert_eq!(settings.quit_hotkey(), parse_hotkey("Alt+F4"));
    assert_eq!(settings.segment_size, 3);
    assert_eq!(settings.cycle_speed, 0.18);
    assert_eq!(settings.pause_hotkey(), parse_hotkey("Ctrl+Shift+P"));
}

#[test]
fn color_mode_aliases_are_accepted() {
    for (text, mode) in [
        ("full-spectrum", ColorMode::FullSpectrum),
        ("spectrum", ColorMode::FullSpectrum),
        ("restricted-band", ColorMode::RestrictedBand),
        ("g102", ColorMode::RestrictedBand),
    ] {
        let json = format!(r#"{{ "color_mode": "{text}" }}"#);
        let settings: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.color_mode, mode, "{text}");
    }
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(Settings::load(&path).is_err());
}

#[test]
fn save_then_load_preserves_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.json");
    let settings = Settings {
        cycle_speed: 0.5,
        color_mode: ColorMode::RestrictedBand,
        log_file: Some("glow.log".into()),
        pause_hotkey: None,
        ..Settings::default()
    };
    settings.save(&path).unwrap();
    assert_eq!(Settings::load(&path).unwrap(), settings);
}

#[test]
fn sanitize_clamps_out_of_range_values() {
    let settings = Settings {
        border_width: 0,
        segment_size: 0,
        lut_size: 0,
        border_opacity: 1.7,
        saturation: -0.2,
        value: 3.0,
        cycle_speed: f64::NAN,
        ..Settings::default()
    }
    .sanitized();
    assert_eq!(settings.border_width, 1);
    assert_eq!(settings.segment_size, 1);
    assert_eq!(settings.lut_size, 720);
    assert_eq!(settings.border_opacity, 1.0);
    assert_eq!(settings.saturation, 0.0);
    assert_eq!(settings.value, 1.0);
    assert_eq!(settings.cycle_speed, 0.18);
}

#[test]
fn invalid_hotkey_is_ignored() {
    let settings = Settings {
        quit_hotkey: Some("Ctrl+Nope".into()),
        pause_hotkey: Some(String::new()),
        ..Settings::default()
    };
    assert!(settings.quit_hotkey().is_none());
    assert!(settings.pause_hotkey().is_none());
}

#[test]
fn derived_configs_follow_the_fields() {
    let settings = Settings {
        border_width: 2,
        segment_size: 8,
        active_delay_ms: 5,
        paused_delay_ms: 100,
        min_window_size: (10, 20),
        max_windows: 3,
        lut_size: 90,
        ..Settings::default()
    };
    let frame = settings.frame_config();
    assert_eq!(frame.style.border_width, 2);
    assert_eq!(frame.style.segment_size, 8);
    assert_eq!(frame.active_delay, Duration::from_millis(5));
    assert_eq!(frame.paused_delay, Duration::from_millis(100));
    assert_eq!(frame.stats_interval, Duration::from_secs(5));

    let filter = settings.window_filter();
    assert_eq!((filter.min_width, filter.min_height, filter.max_windows), (10, 20, 3));
    assert_eq!(settings.lut_params().size, 90);
    assert_eq!(settings.log_file_path(), None);
}

#[test]
#[serial]
fn env_var_overrides_settings_path() {
    std::env::set_var(SETTINGS_PATH_ENV, "/tmp/custom-glow.json");
    assert_eq!(
        default_settings_path(),
        std::path::PathBuf::from("/tmp/custom-glow.json")
    );
    std::env::remove_var(SETTINGS_PATH_ENV);
    assert!(default_settings_path().ends_with("settings.json"));
}
