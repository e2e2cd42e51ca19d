// Copyright 2025 Laurent Pireyn
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Directory size cache (`directorysizes`).
//!
//! Rewritten in full after every successful delete via a temp-file +
//! rename swap, so concurrent readers always see either the old or the
//! new version, never a partial file.

use std::fs::{OpenOptions, remove_file, rename};
use std::io::Write;
use std::os::unix::fs::MetadataExt;

use camino::{Utf8Path, Utf8PathBuf};

use super::escape::escape;
use super::names::random_hex;
use crate::error::TrashError;

const CACHE_FILE_NAME: &str = "directorysizes";

/// Recursively sum the byte size of every regular-file descendant of `dir`.
///
/// Recursion follows child directories but never symlinks; symlinks,
/// sockets, fifos and devices contribute zero.
fn regular_file_bytes(dir: &Utf8Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    let mut total = 0u64;
    for entry in entries.flatten() {
        let Ok(metadata) = entry.metadata() else { continue };
        if metadata.is_dir() {
            if let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) {
                total += regular_file_bytes(&path);
            }
        } else if metadata.is_file() {
            total += metadata.len();
        }
        // Symlinks, sockets, fifos and devices contribute 0.
    }
    total
}

/// Recompute `<root>/directorysizes` from the current contents of `files_dir`.
///
/// One line is emitted per direct subdirectory of `files_dir` that has a
/// corresponding `.trashinfo` file; entries without one (and non-directory
/// children of `files_dir`) are silently skipped. The new file replaces
/// the old one atomically via a temporary sibling + rename.
pub(crate) fn refresh(root: &Utf8Path, info_dir: &Utf8Path, files_dir: &Utf8Path) -> Result<(), TrashError> {
    let temp_path = root.join(random_hex(16));
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(TrashError::DirCacheFailed)?;

    let write_result = (|| -> std::io::Result<()> {
        let Ok(entries) = std::fs::read_dir(files_dir) else {
            return Ok(());
        };
        for entry in entries.flatten() {
            let Ok(metadata) = entry.metadata() else { continue };
            if !metadata.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else { continue };
            let trashinfo_path = info_dir.join(format!("{name}.trashinfo"));
            let Ok(trashinfo_metadata) = trashinfo_path.metadata() else {
                continue;
            };
            let Ok(entry_path) = Utf8PathBuf::from_path_buf(entry.path()) else {
                continue;
            };
            let size = regular_file_bytes(&entry_path);
            let mtime = trashinfo_metadata.mtime() as u64;
            writeln!(temp_file, "{size} {mtime} {}", escape(&name))?;
        }
        Ok(())
    })();

    if let Err(err) = write_result {
        let _ = remove_file(&temp_path);
        return Err(TrashError::DirCacheFailed(err));
    }

    let cache_path = root.join(CACHE_FILE_NAME);
    if let Err(err) = rename(&temp_path, &cache_path) {
        let _ = remove_file(&temp_path);
        return Err(TrashError::DirCacheFailed(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_fs::prelude::*;

    use super::*;

    #[test]
    fn test_refresh_one_line_per_directory_entry() {
        let dir = assert_fs::TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let info_dir = root.join("info");
        let files_dir = root.join("files");
        std::fs::create_dir_all(&info_dir).unwrap();
        std::fs::create_dir_all(files_dir.join("a_dir/nested")).unwrap();
        std::fs::write(files_dir.join("a_dir/one.bin"), [0u8; 10]).unwrap();
        std::fs::write(files_dir.join("a_dir/nested/two.bin"), [0u8; 5]).unwrap();
        std::fs::write(info_dir.join("a_dir.trashinfo"), "x").unwrap();
        // A regular file directly under files_dir must not get a line.
        std::fs::write(files_dir.join("not_a_dir.txt"), "x").unwrap();

        refresh(root, &info_dir, &files_dir).unwrap();

        let cache = std::fs::read_to_string(root.join(CACHE_FILE_NAME)).unwrap();
        let lines: Vec<&str> = cache.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("15 "));
        assert!(lines[0].ends_with(" a_dir"));
    }

    #[test]
    fn test_refresh_skips_directory_without_trashinfo() {
        let dir = assert_fs::TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let info_dir = root.join("info");
        let files_dir = root.join("files");
        std::fs::create_dir_all(&info_dir).unwrap();
        std::fs::create_dir_all(files_dir.join("orphan")).unwrap();

        refresh(root, &info_dir, &files_dir).unwrap();

        let cache = std::fs::read_to_string(root.join(CACHE_FILE_NAME)).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_refresh_is_atomic_rename_over_existing_cache() {
        let dir = assert_fs::TempDir::new().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        let info_dir = root.join("info");
        let files_dir = root.join("files");
        std::fs::create_dir_all(&info_dir).unwrap();
        std::fs::create_dir_all(&files_dir).unwrap();
        std::fs::write(root.join(CACHE_FILE_NAME), "stale line\n").unwrap();

        refresh(root, &info_dir, &files_dir).unwrap();

        let contents = std::fs::read_to_string(root.join(CACHE_FILE_NAME)).unwrap();
        assert!(!contents.contains("stale line"));
        // No leftover temporary files.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|entry| entry.file_name() != CACHE_FILE_NAME && entry.file_name() != "info" && entry.file_name() != "files")
            .collect();
        assert!(leftovers.is_empty());
    }
}
