use pdf_compare::config::settings::Settings;
use pdf_compare::config::{ColorMode, Configuration, MainPage, PageSizeKey, options};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.dpi, 300);
    assert_eq!(settings.page_size, PageSizeKey::Auto);
    assert_eq!(settings.threshold, 128);
    assert_eq!(settings.min_area, 20);
    assert!(!settings.new_copy);
    assert!(!settings.old_copy);
    assert!(settings.markup);
    assert!(settings.difference);
    assert!(settings.overlay);
    assert!(settings.scale_output);
    assert!(settings.reduce_filesize);
    assert_eq!(settings.main_page, MainPage::New);
}

#[test]
fn test_settings_yaml_round_trip() {
    let mut settings = Settings::default();
    settings.dpi = 600;
    settings.page_size = PageSizeKey::AnsiB;
    settings.monochrome = true;
    settings.output_path = Some("/tmp/out".into());

    let yaml = serde_yml::to_string(&settings).expect("serialize");
    let parsed = Settings::from_yaml(&yaml).expect("parse");
    assert_eq!(parsed, settings);
}

#[test]
fn test_settings_unknown_fields_fall_back_to_defaults() {
    let yaml = "dpi: 150\nsome_future_knob: 42\n";
    let settings = Settings::from_yaml(yaml).expect("unknown fields are ignored");
    assert_eq!(settings.dpi, 150);
    assert_eq!(settings.threshold, 128, "missing fields keep their defaults");
}

#[test]
fn test_page_size_dimensions() {
    assert_eq!(PageSizeKey::Auto.dimensions(), None);
    assert_eq!(PageSizeKey::Letter.dimensions(), Some((8.5, 11.0)));
    assert_eq!(PageSizeKey::AnsiD.dimensions(), Some((34.0, 22.0)));
    assert_eq!(PageSizeKey::parse("ANSI_C"), Some(PageSizeKey::AnsiC));
    assert_eq!(PageSizeKey::parse("letter"), None, "profile tokens are uppercase");
}

#[test]
fn test_configuration_rejects_zero_dpi() {
    let mut settings = Settings::default();
    settings.dpi = 0;
    let err = Configuration::from_settings(&settings).unwrap_err();
    assert!(err.to_string().contains("DPI"));
}

#[test]
fn test_monochrome_takes_precedence_over_grayscale() {
    let mut settings = Settings::default();
    settings.grayscale = true;
    settings.monochrome = true;
    let config = Configuration::from_settings(&settings).unwrap();
    assert_eq!(config.color_mode, ColorMode::Monochrome);

    settings.monochrome = false;
    let config = Configuration::from_settings(&settings).unwrap();
    assert_eq!(config.color_mode, ColorMode::Grayscale);

    settings.grayscale = false;
    let config = Configuration::from_settings(&settings).unwrap();
    assert_eq!(config.color_mode, ColorMode::Color);
}

#[test]
fn test_cli_options_apply_known_keys() {
    let mut settings = Settings::default();
    let tokens = vec![
        "-dpi:600".to_string(),
        "--page_size:ANSI_B".to_string(),
        "-s:False".to_string(),
        "-bw:True".to_string(),
        "-mp:OLD".to_string(),
    ];
    options::apply_options(&mut settings, &tokens);

    assert_eq!(settings.dpi, 600);
    assert_eq!(settings.page_size, PageSizeKey::AnsiB);
    assert!(!settings.scale_output);
    assert!(settings.monochrome);
    assert_eq!(settings.main_page, MainPage::Old);
}

#[test]
fn test_cli_options_ignore_invalid_values() {
    let mut settings = Settings::default();
    let tokens = vec![
        "-dpi:fast".to_string(),
        "-dpi:0".to_string(),
        "--page_size:A4".to_string(),
        "-s:yes".to_string(),
        "-mp:NEWEST".to_string(),
        "--frobnicate:True".to_string(),
        "not-an-option".to_string(),
    ];
    options::apply_options(&mut settings, &tokens);

    // Every invalid or unknown token leaves the prior value in place.
    assert_eq!(settings, Settings::default());
}
