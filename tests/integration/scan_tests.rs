use dupfind::duplicates::{BufferSchedule, DuplicateFinder, FinderConfig, FinderError};
use dupfind::output::TextOutput;
use dupfind::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn root_of(dir: &tempfile::TempDir) -> PathBuf {
    std::path::absolute(dir.path()).unwrap()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert_eq!(
        TextOutput::new(&groups, summary.stats()).render(),
        "Matching Files:\n-- Stats --\nNumber of files scanned: 0\nTotal data compared: 0.00MB\n"
    );
}

#[test]
fn test_scan_reference_tree() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello").unwrap();
    fs::write(dir.path().join("b.txt"), "hello").unwrap();
    fs::write(dir.path().join("c.txt"), "world").unwrap();
    fs::write(dir.path().join("d.bin"), vec![0u8; 1024]).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let root = root_of(&dir);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![root.join("a.txt"), root.join("b.txt")]);
    assert_eq!(summary.total_files, 4);
    assert_eq!(summary.total_size, 1039);

    let report = TextOutput::new(&groups, summary.stats()).render();
    let expected = format!(
        "Matching Files:\n[ {},\n  {} ]\n\n-- Stats --\nNumber of files scanned: 4\nTotal data compared: 0.00MB\n",
        root.join("a.txt").display(),
        root.join("b.txt").display()
    );
    assert_eq!(report, expected);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir").join("deeper");
    fs::create_dir_all(&sub).unwrap();

    File::create(dir.path().join("top.dat"))
        .unwrap()
        .write_all(b"nested duplicate")
        .unwrap();
    File::create(sub.join("low.dat"))
        .unwrap()
        .write_all(b"nested duplicate")
        .unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(summary.total_files, 2);
    assert!(groups[0].contains(&root_of(&dir).join("subdir/deeper/low.dat")));
}

#[test]
fn test_scan_three_copies_form_one_group() {
    let dir = tempdir().unwrap();
    for name in ["one", "two", "three"] {
        fs::write(dir.path().join(name), b"same bytes").unwrap();
    }
    fs::write(dir.path().join("other"), b"diff bytes").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 3);
    assert_eq!(summary.duplicate_files, 2);
    assert_eq!(summary.reclaimable_space, 20);
}

#[test]
fn test_scan_large_identical_files_across_passes() {
    let dir = tempdir().unwrap();
    let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("big1"), &data).unwrap();
    fs::write(dir.path().join("big2"), &data).unwrap();

    let mut tail = data.clone();
    *tail.last_mut().unwrap() ^= 0xFF;
    fs::write(dir.path().join("big3"), &tail).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let root = root_of(&dir);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].paths, vec![root.join("big1"), root.join("big2")]);
    assert_eq!(summary.comparisons, 2);
}

#[test]
fn test_scan_with_custom_schedule() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), vec![7u8; 1000]).unwrap();
    fs::write(dir.path().join("y"), vec![7u8; 1000]).unwrap();

    let schedule = BufferSchedule::new(vec![3]).unwrap();
    let finder = DuplicateFinder::new(FinderConfig::default().with_schedule(schedule));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    // Both files are read in full: 1000 bytes each.
    assert_eq!(summary.bytes_compared, 2000);
}

#[test]
fn test_scan_respects_size_filters() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("s1"), b"ab").unwrap();
    fs::write(dir.path().join("s2"), b"ab").unwrap();
    fs::write(dir.path().join("l1"), b"abcdefgh").unwrap();
    fs::write(dir.path().join("l2"), b"abcdefgh").unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(false, Some(4), None)),
    );
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 8);
}

#[test]
fn test_scan_nonexistent_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let result = DuplicateFinder::with_defaults().find_duplicates(&missing);

    assert!(matches!(result, Err(FinderError::PathNotFound(p)) if p == missing));
}
