use std::path::Path;
use std::time::{Duration, SystemTime};

use super::*;
use crate::file::DirScope;

fn update(name: &str, size: u64, mtime_secs: u64) -> RawFile {
    RawFile::new(
        Path::new("/lib"),
        Path::new("/lib/Game").join(name),
        size,
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs)),
        DirScope::TopLevel,
    )
}

#[test]
fn extract_version_patterns_in_order() {
    assert_eq!(extract_version("Game_v1.2.3.nsp").as_deref(), Some("1.2.3"));
    assert_eq!(extract_version("Game_v1.2.nsp").as_deref(), Some("1.2"));
    assert_eq!(extract_version("Game_v1_2_3.nsp").as_deref(), Some("1.2.3"));
    assert_eq!(extract_version("Game_v131072.nsp").as_deref(), Some("131072"));
    assert_eq!(extract_version("Game_V7.nsp").as_deref(), Some("7"));
    assert_eq!(extract_version("Game 1.0.5.nsp").as_deref(), Some("1.0.5"));
    assert_eq!(extract_version("Game 1_4.nsp").as_deref(), Some("1.4"));
    assert_eq!(extract_version("Game.nsp"), None);
}

#[test]
fn prefixed_form_beats_earlier_bare_form() {
    // The bare pattern would match "3.1" first, but v-prefixed patterns are tried before it.
    assert_eq!(extract_version("Game 3.1 Edition v2.0.nsp").as_deref(), Some("2.0"));
}

#[test]
fn parse_version_fills_missing_components() {
    assert_eq!(parse_version("Game_v2.nsp"), Version::new(2, 0, 0));
    assert_eq!(parse_version("Game_v2.1.nsp"), Version::new(2, 1, 0));
    assert_eq!(parse_version("Game_v2.1.7.nsp"), Version::new(2, 1, 7));
    assert_eq!(parse_version("Game.nsp"), Version::default());
}

#[test]
fn date_stamped_version_keeps_its_value() {
    assert_eq!(
        parse_version("Game_v20240101123456.nsp"),
        Version::new(20240101123456, 0, 0)
    );
    let files = vec![
        update("Game v2.0 [0100ABCDEF000800].nsp", 10, 0),
        update("Game_v20240101123456 [0100ABCDEF000800].nsp", 10, 0),
    ];
    assert_eq!(
        select_latest_update(&files).unwrap().file_name(),
        "Game_v20240101123456 [0100ABCDEF000800].nsp"
    );
}

#[test]
fn overflowing_version_is_zero() {
    assert_eq!(parse_version("Game_v99999999999999999999999.nsp"), Version::default());
}

#[test]
fn version_ordering_is_numeric() {
    assert!(Version::new(1, 10, 0) > Version::new(1, 9, 9));
    assert!(Version::new(2, 0, 0) > Version::new(1, 99, 99));
    assert_eq!(Version::new(1, 2, 0).to_string(), "1.2.0");
}

#[test]
fn larger_file_breaks_version_tie() {
    let updates = vec![
        update("Game_v1.2.0_small.nsp", 10, 0),
        update("Game_v1.2.0_large.nsp", 20, 0),
        update("Game_v1.1.9.nsp", 30, 0),
    ];
    let pick = select_latest_update(&updates).unwrap();
    assert_eq!(pick.file_name(), "Game_v1.2.0_large.nsp");
}

#[test]
fn newer_mtime_breaks_size_tie() {
    let updates = vec![update("a_v1.0.nsp", 10, 100), update("b_v1.0.nsp", 10, 200)];
    assert_eq!(select_latest_update(&updates).unwrap().file_name(), "b_v1.0.nsp");
}

#[test]
fn exact_tie_keeps_first() {
    let updates = vec![update("a_v1.0.nsp", 10, 100), update("b_v1.0.nsp", 10, 100)];
    assert_eq!(select_latest_update(&updates).unwrap().file_name(), "a_v1.0.nsp");
}

#[test]
fn unversioned_update_loses_to_versioned() {
    let updates = vec![update("Game_update.nsp", 999, 0), update("Game_v1.0.1.nsp", 1, 0)];
    assert_eq!(select_latest_update(&updates).unwrap().file_name(), "Game_v1.0.1.nsp");
}

#[test]
fn empty_input_selects_nothing() {
    assert!(select_latest_update(&[]).is_none());
}
