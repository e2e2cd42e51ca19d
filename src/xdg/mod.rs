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

//! The XDG/freedesktop trash core.
//!
//! This is the only backend with non-trivial engineering (see the crate
//! root docs); [`soft_delete`] is its single entry point, composed of the
//! leaf components in the sibling modules.

mod dirsizes;
mod escape;
mod info;
mod locate;
mod mounts;
mod names;
mod path;
mod mover;

use camino::Utf8Path;
use chrono::Local;

use crate::error::TrashError;
use info::WriteOutcome;

/// Relocate `path` into the XDG trash for its device.
///
/// Control flow: resolve, locate, allocate a candidate name, write its
/// `.trashinfo` (retrying on collision), rename the source in, then
/// refresh the directory size cache.
///
/// # Invariant
///
/// On `Ok`, exactly one trash entry exists (`info/<stem>.trashinfo` and
/// `files/<stem>` both present). On any `Err` other than
/// [`TrashError::DirCacheFailed`], no new entry persists: `path` still
/// exists at its canonicalised location.
pub(crate) fn soft_delete(path: &Utf8Path) -> Result<(), TrashError> {
    let resolved = path::resolve(path)?;
    let dirs = locate::locate(&resolved.canonical, resolved.device)?;
    let deletion_time = Local::now().naive_local();

    let mut counter: u32 = 0;
    let mut force_random = false;
    loop {
        let candidate = names::allocate(
            &resolved.basename,
            &dirs.info_dir,
            &dirs.files_dir,
            &deletion_time,
            counter,
            force_random,
        )?;

        match info::write(&candidate.info_file_path, &resolved.canonical, &deletion_time)? {
            WriteOutcome::Ok => {
                mover::move_into_trash(&resolved.canonical, &candidate.file_path, &candidate.info_file_path)?;
                dirsizes::refresh(&dirs.root, &dirs.info_dir, &dirs.files_dir)?;
                return Ok(());
            }
            WriteOutcome::Collision => {
                if force_random {
                    return Err(TrashError::CollisionFailed);
                }
                let (next_counter, overflowed) = counter.overflowing_add(1);
                counter = next_counter;
                if overflowed {
                    force_random = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_fs::TempDir;
    use serial_test::serial;

    use super::*;

    fn with_home_trash(f: impl FnOnce(&Utf8Path)) {
        let data_home = TempDir::new().unwrap();
        let previous = std::env::var("XDG_DATA_HOME").ok();
        unsafe { std::env::set_var("XDG_DATA_HOME", data_home.path()) };
        f(Utf8Path::from_path(data_home.path()).unwrap());
        match previous {
            Some(value) => unsafe { std::env::set_var("XDG_DATA_HOME", value) },
            None => unsafe { std::env::remove_var("XDG_DATA_HOME") },
        }
    }

    #[test]
    #[serial]
    fn test_soft_delete_file_moves_it_and_writes_info() {
        with_home_trash(|data_home| {
            let source = data_home.join("notes.txt");
            std::fs::write(&source, "hello").unwrap();

            soft_delete(&source).unwrap();

            assert!(!source.exists());
            let files_dir = data_home.join("Trash/files");
            let entries: Vec<_> = std::fs::read_dir(&files_dir).unwrap().flatten().collect();
            assert_eq!(entries.len(), 1);
            assert!(entries[0].file_name().to_string_lossy().starts_with("notes.txt"));
            let contents = std::fs::read_to_string(entries[0].path()).unwrap();
            assert_eq!(contents, "hello");

            let info_dir = data_home.join("Trash/info");
            let info_entries: Vec<_> = std::fs::read_dir(&info_dir).unwrap().flatten().collect();
            assert_eq!(info_entries.len(), 1);
            let body = std::fs::read_to_string(info_entries[0].path()).unwrap();
            assert!(body.starts_with("[Trash Info]\n"));
            assert!(body.contains(&format!("Path={}\n", source.as_str())));
        });
    }

    #[test]
    #[serial]
    fn test_soft_delete_two_identical_basenames_both_succeed() {
        with_home_trash(|data_home| {
            std::fs::create_dir_all(data_home.join("first")).unwrap();
            std::fs::create_dir_all(data_home.join("second")).unwrap();
            let source1 = data_home.join("first/a.txt");
            let source2 = data_home.join("second/a.txt");
            std::fs::write(&source1, "one").unwrap();
            std::fs::write(&source2, "two").unwrap();

            soft_delete(&source1).unwrap();
            soft_delete(&source2).unwrap();

            let files_dir = data_home.join("Trash/files");
            let entries: Vec<_> = std::fs::read_dir(&files_dir).unwrap().flatten().collect();
            assert_eq!(entries.len(), 2, "both entries must exist under distinct stems");
        });
    }

    #[test]
    #[serial]
    fn test_soft_delete_missing_source_fails() {
        with_home_trash(|data_home| {
            let source = data_home.join("absent.txt");
            let err = soft_delete(&source).unwrap_err();
            assert!(matches!(err, TrashError::RealPathFailed(_)));
        });
    }

    #[test]
    #[serial]
    fn test_soft_delete_refreshes_directory_size_cache_for_directories() {
        with_home_trash(|data_home| {
            let source = data_home.join("a_dir");
            std::fs::create_dir_all(&source).unwrap();
            std::fs::write(source.join("payload.bin"), [0u8; 42]).unwrap();

            soft_delete(&source).unwrap();

            let cache = std::fs::read_to_string(data_home.join("Trash/directorysizes")).unwrap();
            assert_eq!(cache.lines().count(), 1);
            assert!(cache.contains("42 "));
        });
    }
}
