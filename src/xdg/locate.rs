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

//! Trash directory location.
//!
//! Decides which [`TrashDirSet`] a source path belongs in: the home
//! trash if it shares a device with `$XDG_DATA_HOME`, otherwise a
//! top-dir trash rooted at the source's own mount point.

use std::fs::DirBuilder;
use std::os::unix::fs::{DirBuilderExt, MetadataExt};

use camino::{Utf8Path, Utf8PathBuf};
use xdg::BaseDirectories;

use super::mounts::mount_point_for_device;
use crate::error::TrashError;

const DIR_MODE: u32 = 0o700;
const STICKY_BIT: u32 = 0o1000;

/// The `(root, info, files)` triple for one trash location.
pub(crate) struct TrashDirSet {
    pub(crate) root: Utf8PathBuf,
    pub(crate) info_dir: Utf8PathBuf,
    pub(crate) files_dir: Utf8PathBuf,
}

impl TrashDirSet {
    fn new(root: Utf8PathBuf) -> Self {
        let info_dir = root.join("info");
        let files_dir = root.join("files");
        Self { root, info_dir, files_dir }
    }

    /// Ensure `root`, `info/` and `files/` exist, all mode 0700.
    ///
    /// Idempotent: calling this against an already-existing trash
    /// directory set does not alter its permissions or contents beyond
    /// what the caller subsequently writes into it.
    fn ensure_dirs(&self) -> Result<(), TrashError> {
        for dir in [&self.root, &self.info_dir, &self.files_dir] {
            create_dir_mode(dir, DIR_MODE).map_err(TrashError::MkdirFailed)?;
        }
        Ok(())
    }
}

fn create_dir_mode(path: &Utf8Path, mode: u32) -> std::io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    DirBuilder::new().recursive(true).mode(mode).create(path)
}

/// Return the home trash root (`$XDG_DATA_HOME/Trash`), per the
/// freedesktop default resolution of `$XDG_DATA_HOME`/`$HOME`.
fn home_data_dir() -> Result<Utf8PathBuf, TrashError> {
    let path = BaseDirectories::default()
        .get_data_home()
        .ok_or_else(|| TrashError::HomeTrashFailed("neither $XDG_DATA_HOME nor $HOME is set".into()))?;
    Utf8PathBuf::from_path_buf(path)
        .map_err(|_| TrashError::HomeTrashFailed("data home path is not valid UTF-8".into()))
}

/// Decide the [`TrashDirSet`] to use for `source` (canonical path, on device `source_device`).
pub(crate) fn locate(source: &Utf8Path, source_device: u64) -> Result<TrashDirSet, TrashError> {
    let data_dir = home_data_dir()?;
    create_dir_mode(&data_dir, DIR_MODE).map_err(TrashError::MkdirFailed)?;

    let data_dir_device = data_dir.metadata().map_err(TrashError::HomeStatFailed)?.dev();

    if data_dir_device == source_device {
        let dirs = TrashDirSet::new(data_dir.join("Trash"));
        dirs.ensure_dirs()?;
        return Ok(dirs);
    }

    match top_dir_admin(source_device) {
        Some(dirs) => Ok(dirs),
        None => top_dir_user(source_device),
    }
}

/// Attempt case 1: `<mount>/.Trash/<uid>`.
///
/// Returns `None` (not an error) if case 1 is abandoned for any reason —
/// no mount point, no `.Trash`, a symlinked or non-sticky `.Trash`, or a
/// failure creating the per-uid subdirectory — so the caller can fall
/// back to case 2.
fn top_dir_admin(device: u64) -> Option<TrashDirSet> {
    let mount = mount_point_for_device(device)?;
    let admin_dir = mount.join(".Trash");
    let metadata = admin_dir.symlink_metadata().ok()?;
    if metadata.is_symlink() || !metadata.is_dir() || metadata.mode() & STICKY_BIT == 0 {
        return None;
    }
    let dirs = TrashDirSet::new(admin_dir.join(current_uid().to_string()));
    dirs.ensure_dirs().ok()?;
    Some(dirs)
}

/// Case 2: `<mount>/.Trash-<uid>`. Any failure here is fatal.
fn top_dir_user(device: u64) -> Result<TrashDirSet, TrashError> {
    let mount = mount_point_for_device(device)
        .ok_or_else(|| TrashError::TopDirFailed("no mount point found for source device".into()))?;
    let dirs = TrashDirSet::new(mount.join(format!(".Trash-{}", current_uid())));
    dirs.ensure_dirs()?;
    Ok(dirs)
}

fn current_uid() -> u32 {
    // SAFETY: getuid() has no preconditions and cannot fail.
    unsafe { libc::getuid() }
}
