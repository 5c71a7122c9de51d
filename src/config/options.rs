use std::path::Path;

use tracing::warn;

use super::{MainPage, PageSizeKey};
use super::settings::Settings;

/// Apply CLI `key:value` option tokens on top of loaded settings.
///
/// Unrecognized keys and invalid values leave the prior value in place.
/// This permissive behavior matches the historical tool; each ignored
/// token is logged so a typo is at least visible.
pub fn apply_options(settings: &mut Settings, options: &[String]) {
    for token in options {
        let Some((key, value)) = token.split_once(':') else {
            warn!("Ignoring malformed option (expected key:value): {token}");
            continue;
        };

        match key {
            "-ps" | "--page_size" => match PageSizeKey::parse(value) {
                Some(size) => settings.page_size = size,
                None => warn!("Ignoring unknown page size: {value}"),
            },
            "-dpi" => match value.parse::<u32>() {
                Ok(dpi) if dpi > 0 => settings.dpi = dpi,
                _ => warn!("Ignoring invalid DPI value: {value}"),
            },
            "-o" | "--output" => {
                if Path::new(value).exists() {
                    settings.output_path = Some(value.into());
                } else {
                    warn!("Ignoring output path that does not exist: {value}");
                }
            }
            "-s" | "--scale" => match parse_bool(value) {
                Some(v) => settings.scale_output = v,
                None => warn!("Ignoring invalid scale value: {value}"),
            },
            "-bw" | "--black_white" => match parse_bool(value) {
                Some(v) => settings.monochrome = v,
                None => warn!("Ignoring invalid black_white value: {value}"),
            },
            "-gs" | "--grayscale" => match parse_bool(value) {
                Some(v) => settings.grayscale = v,
                None => warn!("Ignoring invalid grayscale value: {value}"),
            },
            "-r" | "--reduce_filesize" => match parse_bool(value) {
                Some(v) => settings.reduce_filesize = v,
                None => warn!("Ignoring invalid reduce_filesize value: {value}"),
            },
            "-mp" | "--main_page" => match value {
                "NEW" => settings.main_page = MainPage::New,
                "OLD" => settings.main_page = MainPage::Old,
                _ => warn!("Ignoring invalid main_page value: {value}"),
            },
            _ => warn!("Ignoring unknown option: {key}"),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}
