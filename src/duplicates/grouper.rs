//! Partitioning one size bucket into duplicate groups.
//!
//! Files in a bucket are compared pairwise, but each file is taken out of
//! consideration as soon as it joins a group: content equality is exact and
//! therefore transitive, so a file proven identical to an earlier one never
//! needs to be compared against the rest of the bucket again.

use std::path::PathBuf;

use super::compare::ContentEq;

/// Partition a bucket of same-size paths into groups of identical files.
///
/// For every path `i` not yet matched, each later unmatched path `j` is
/// compared with `i`. The first match opens a group `[i, j]`; later matches
/// of `i` are appended. Paths that match nothing are left out.
///
/// The matched set lives only for this call, so the result does not depend
/// on the order in which buckets are processed.
///
/// # Example
///
/// ```
/// use dupfind::duplicates::group_bucket;
/// use std::path::{Path, PathBuf};
///
/// let bucket = vec![PathBuf::from("/a1"), PathBuf::from("/b"), PathBuf::from("/a2")];
/// // Files are "equal" when their names share a first letter.
/// let mut same_letter = |x: &Path, y: &Path| {
///     x.to_string_lossy().chars().nth(1) == y.to_string_lossy().chars().nth(1)
/// };
///
/// let groups = group_bucket(&bucket, &mut same_letter);
/// assert_eq!(groups, vec![vec![PathBuf::from("/a1"), PathBuf::from("/a2")]]);
/// ```
pub fn group_bucket<C>(paths: &[PathBuf], comparator: &mut C) -> Vec<Vec<PathBuf>>
where
    C: ContentEq + ?Sized,
{
    let mut matched = vec![false; paths.len()];
    let mut groups = Vec::new();

    for i in 0..paths.len() {
        if matched[i] {
            continue;
        }

        let mut group: Vec<usize> = Vec::new();
        for j in (i + 1)..paths.len() {
            if matched[j] {
                continue;
            }
            if comparator.equal(&paths[i], &paths[j]) {
                if group.is_empty() {
                    group.push(i);
                    matched[i] = true;
                }
                group.push(j);
                matched[j] = true;
            }
        }

        if !group.is_empty() {
            log::debug!(
                "Found {} identical copies of {}",
                group.len(),
                paths[i].display()
            );
            groups.push(group.into_iter().map(|k| paths[k].clone()).collect());
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};
    use std::path::Path;

    /// In-memory stand-in for file contents.
    struct MemoryFiles {
        contents: HashMap<PathBuf, Vec<u8>>,
        compared: Vec<(PathBuf, PathBuf)>,
    }

    impl MemoryFiles {
        fn new(files: &[(&str, &[u8])]) -> Self {
            Self {
                contents: files
                    .iter()
                    .map(|(name, data)| (PathBuf::from(name), data.to_vec()))
                    .collect(),
                compared: Vec::new(),
            }
        }

        fn paths(names: &[&str]) -> Vec<PathBuf> {
            names.iter().map(PathBuf::from).collect()
        }
    }

    impl ContentEq for MemoryFiles {
        fn equal(&mut self, a: &Path, b: &Path) -> bool {
            self.compared.push((a.to_path_buf(), b.to_path_buf()));
            match (self.contents.get(a), self.contents.get(b)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
    }

    #[test]
    fn test_empty_bucket() {
        let mut files = MemoryFiles::new(&[]);
        assert!(group_bucket(&[], &mut files).is_empty());
        assert!(files.compared.is_empty());
    }

    #[test]
    fn test_single_pair() {
        let mut files = MemoryFiles::new(&[("/a", b"hello"), ("/b", b"hello")]);
        let groups = group_bucket(&MemoryFiles::paths(&["/a", "/b"]), &mut files);

        assert_eq!(groups, vec![MemoryFiles::paths(&["/a", "/b"])]);
    }

    #[test]
    fn test_size_collision_without_content_collision() {
        let mut files = MemoryFiles::new(&[("/a", b"hello"), ("/b", b"world")]);
        let groups = group_bucket(&MemoryFiles::paths(&["/a", "/b"]), &mut files);

        assert!(groups.is_empty());
    }

    #[test]
    fn test_two_groups_in_one_bucket() {
        let mut files = MemoryFiles::new(&[
            ("/x1", b"xxxx"),
            ("/y1", b"yyyy"),
            ("/x2", b"xxxx"),
            ("/z", b"zzzz"),
            ("/y2", b"yyyy"),
            ("/x3", b"xxxx"),
        ]);
        let bucket = MemoryFiles::paths(&["/x1", "/y1", "/x2", "/z", "/y2", "/x3"]);

        let groups = group_bucket(&bucket, &mut files);

        assert_eq!(
            groups,
            vec![
                MemoryFiles::paths(&["/x1", "/x2", "/x3"]),
                MemoryFiles::paths(&["/y1", "/y2"]),
            ]
        );
    }

    #[test]
    fn test_matched_files_are_not_compared_again() {
        let mut files = MemoryFiles::new(&[
            ("/a", b"same"),
            ("/b", b"same"),
            ("/c", b"same"),
            ("/d", b"diff"),
        ]);
        let bucket = MemoryFiles::paths(&["/a", "/b", "/c", "/d"]);

        group_bucket(&bucket, &mut files);

        // a-b, a-c, a-d; then b and c are matched and d has no later peer.
        assert_eq!(files.compared.len(), 3);
        assert!(files
            .compared
            .iter()
            .all(|(x, _)| x == Path::new("/a")));
    }

    #[test]
    fn test_unreadable_file_is_left_ungrouped() {
        // "/gone" has no content, like a file deleted after indexing.
        let mut files = MemoryFiles::new(&[("/a", b"data"), ("/b", b"data")]);
        let bucket = MemoryFiles::paths(&["/gone", "/a", "/b"]);

        let groups = group_bucket(&bucket, &mut files);

        assert_eq!(groups, vec![MemoryFiles::paths(&["/a", "/b"])]);
    }

    fn bucket_from(contents: &[u8]) -> (Vec<PathBuf>, HashMap<PathBuf, u8>) {
        let paths: Vec<PathBuf> = (0..contents.len())
            .map(|i| PathBuf::from(format!("/f{i}")))
            .collect();
        let map = paths.iter().cloned().zip(contents.iter().copied()).collect();
        (paths, map)
    }

    proptest! {
        #[test]
        fn prop_groups_are_exact_equivalence_classes(contents in proptest::collection::vec(0u8..5, 0..30)) {
            let (paths, map) = bucket_from(&contents);
            let mut pairs: HashSet<(PathBuf, PathBuf)> = HashSet::new();
            let mut repeated = false;
            let mut eq = |a: &Path, b: &Path| {
                let key = if a < b { (a.to_path_buf(), b.to_path_buf()) } else { (b.to_path_buf(), a.to_path_buf()) };
                repeated |= !pairs.insert(key);
                map[a] == map[b]
            };

            let groups = group_bucket(&paths, &mut eq);
            prop_assert!(!repeated, "a pair was compared twice");

            let mut seen = HashSet::new();
            for group in &groups {
                prop_assert!(group.len() >= 2);
                let value = map[&group[0]];
                for path in group {
                    prop_assert_eq!(map[path], value);
                    prop_assert!(seen.insert(path.clone()), "path in two groups");
                }
            }

            // Every path sharing content with another path is grouped.
            for path in &paths {
                let peers = paths.iter().filter(|p| map[*p] == map[path]).count();
                prop_assert_eq!(peers >= 2, seen.contains(path));
            }
        }
    }
}
