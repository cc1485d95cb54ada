mod common;

use detectlens::Settings;
use detectlens::config::parse_size;
use std::io::Write;

use common::*;

#[test]
fn test_empty_file_gives_defaults() -> anyhow::Result<()> {
    let settings = Settings::from_toml("")?;

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.max_results, 6);
    assert_eq!(settings.detector.inference_size, Size::new(300, 300));
    assert_eq!(settings.viewport, None);
    Ok(())
}

#[test]
fn test_file_values_override_defaults() -> anyhow::Result<()> {
    let settings = Settings::from_toml(
        r#"
        max_results = 3

        [detector]
        inference_width = 320
        inference_height = 240
        min_region_pixels = 50

        [display]
        viewport_width = 800
        viewport_height = 600
        "#,
    )?;

    assert_eq!(settings.max_results, 3);
    assert_eq!(settings.detector.inference_size, Size::new(320, 240));
    assert_eq!(settings.detector.min_region_pixels, 50);
    assert_eq!(settings.detector.blur_sigma, 1.5);
    assert_eq!(settings.viewport, Some(Size::new(800, 600)));
    Ok(())
}

#[test]
fn test_invalid_settings_are_rejected() {
    assert!(
        Settings::from_toml("[display]\nviewport_width = 800\n").is_err()
    );
    assert!(
        Settings::from_toml("[detector]\ninference_width = 0\n").is_err()
    );
    assert!(Settings::from_toml("unknown_key = 1\n").is_err());
}

#[test]
fn test_load_from_path() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "max_results = 2")?;

    let settings = Settings::load(Some(file.path()))?;

    assert_eq!(settings.max_results, 2);
    Ok(())
}

#[test]
fn test_parse_size() -> anyhow::Result<()> {
    assert_eq!(parse_size("1024x768")?, Size::new(1024, 768));
    assert_eq!(parse_size("640X480")?, Size::new(640, 480));
    assert!(parse_size("0x480").is_err());
    assert!(parse_size("wide").is_err());
    assert!(parse_size("12x").is_err());
    Ok(())
}
