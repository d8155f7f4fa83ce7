use std::cell::RefCell;
use std::fs;
use std::path::Path;

use nx_merge_lib::grouping::group_files;
use nx_merge_lib::scanner::{
    ScanOptions, collect_container_paths, extension_set, read_raw_files, scan_directory,
};
use nx_merge_lib::{DirScope, ScanError, ScanEvent, ignore_events};

fn touch(root: &Path, rel: &str, size: usize) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![0u8; size]).unwrap();
}

#[test]
fn scans_nested_library() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "GameX/GameX[0100ABCDEF000000].xci", 500);
    touch(root, "GameX/updates/GameX_update[0100ABCDEF000800]_v2.0.0.nsp", 80);
    touch(root, "GameX/GameX_dlc1[0100ABCDEF000001].nsp", 20);
    touch(root, "Zelda [0100000000010000].XCI", 900);
    touch(root, "notes.txt", 5);

    let grouping = scan_directory(root, &ScanOptions::default(), &ignore_events).unwrap();

    assert_eq!(grouping.len(), 2);
    let gamex = grouping.get("dir:GameX").unwrap();
    assert_eq!(gamex.base().unwrap().size(), 500);
    assert_eq!(
        gamex.selected_update().unwrap().file_name(),
        "GameX_update[0100ABCDEF000800]_v2.0.0.nsp"
    );
    assert_eq!(gamex.dlcs().len(), 1);

    let zelda = grouping.get("0100000000010000").unwrap();
    assert_eq!(zelda.display_name(), "Zelda");
    assert_eq!(zelda.base().unwrap().extension(), "xci");
}

#[test]
fn immediate_scope_uses_direct_parent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "switch/Kirby/Kirby [0100227010460000].xci", 10);
    touch(root, "switch/Kirby/Kirby DLC [0100227010461001].nsp", 10);

    let options = ScanOptions {
        dir_scope: DirScope::Immediate,
        ..ScanOptions::default()
    };
    let grouping = scan_directory(root, &options, &ignore_events).unwrap();
    let kirby = grouping.get("dir:switch/Kirby").unwrap();
    assert_eq!(kirby.display_name(), "Kirby");

    let grouping = scan_directory(root, &ScanOptions::default(), &ignore_events).unwrap();
    assert!(grouping.get("dir:switch").is_some());
}

#[test]
fn extension_filter_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "a.NSP", 1);
    touch(root, "b.nsz", 1);
    touch(root, "c.xci", 1);

    let paths = collect_container_paths(root, &extension_set(&[".nsp", "NSZ"]), &ignore_events)
        .unwrap();
    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.NSP", "b.nsz"]);
}

#[test]
fn paths_are_sorted_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "b/two.xci", 1);
    touch(root, "a/one.xci", 1);
    touch(root, "c.nsp", 1);

    let found = RefCell::new(Vec::new());
    let paths = collect_container_paths(
        root,
        &extension_set(&["xci", "nsp"]),
        &|event: ScanEvent| {
            if let ScanEvent::FileFound { count, .. } = event {
                found.borrow_mut().push(count);
            }
        },
    )
    .unwrap();

    let rel: Vec<_> = paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        rel,
        vec![
            Path::new("a/one.xci").to_path_buf(),
            Path::new("b/two.xci").to_path_buf(),
            Path::new("c.nsp").to_path_buf(),
        ]
    );
    assert_eq!(*found.borrow(), vec![1, 2, 3]);
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    match scan_directory(&missing, &ScanOptions::default(), &ignore_events) {
        Err(ScanError::RootNotFound(p)) => assert_eq!(p, missing),
        other => panic!("expected RootNotFound, got {:?}", other.map(|g| g.len())),
    }
}

#[test]
fn file_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "game.xci", 1);
    let file_root = dir.path().join("game.xci");
    assert!(matches!(
        scan_directory(&file_root, &ScanOptions::default(), &ignore_events),
        Err(ScanError::NotADirectory(_))
    ));
}

#[test]
fn empty_root_yields_empty_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let grouping = scan_directory(dir.path(), &ScanOptions::default(), &ignore_events).unwrap();
    assert!(grouping.is_empty());
}

#[test]
fn vanished_file_is_skipped_and_the_rest_still_group() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "Zelda/Zelda [0100000000010000].xci", 900);
    touch(root, "Zelda/Zelda [0100000000010800] v1.1.nsp", 50);
    touch(root, "Zelda/Zelda DLC [0100000000010001].nsp", 10);

    let mut paths =
        collect_container_paths(root, &extension_set(&["xci", "nsp"]), &ignore_events).unwrap();
    assert_eq!(paths.len(), 3);
    let gone = root.join("Zelda/Zelda DLC [0100000000010001].nsp");
    fs::remove_file(&gone).unwrap();
    paths.push(root.join("never-existed.xci"));

    let skipped = RefCell::new(Vec::new());
    let files = read_raw_files(root, &paths, DirScope::TopLevel, &|event: ScanEvent| {
        if let ScanEvent::FileSkipped { path, .. } = event {
            skipped.borrow_mut().push(path);
        }
    });

    assert_eq!(files.len(), 2);
    let mut skipped = skipped.into_inner();
    skipped.sort();
    let mut expected = vec![gone, root.join("never-existed.xci")];
    expected.sort();
    assert_eq!(skipped, expected);

    let grouping = group_files(&files, &ignore_events);
    let group = grouping.get("dir:Zelda").unwrap();
    assert_eq!(group.base().unwrap().size(), 900);
    assert!(group.selected_update().is_some());
    assert!(group.dlcs().is_empty());
}
