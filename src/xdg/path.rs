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

//! Path resolution.
//!
//! The canonicalisation below resolves the *whole* path, including a
//! symlink final component: trashing a symlink moves its target rather
//! than the symlink itself. This is deliberate, not an oversight — see
//! `DESIGN.md`.

use std::os::unix::fs::MetadataExt;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::TrashError;

/// A resolved source path: its canonical form, the device it lives on, and its basename.
pub(crate) struct ResolvedPath {
    pub(crate) canonical: Utf8PathBuf,
    pub(crate) device: u64,
    pub(crate) basename: String,
}

/// Canonicalise `path`, stat it, and extract its basename.
pub(crate) fn resolve(path: impl AsRef<Utf8Path>) -> Result<ResolvedPath, TrashError> {
    let canonical = path
        .as_ref()
        .canonicalize_utf8()
        .map_err(TrashError::RealPathFailed)?;
    let metadata = canonical.symlink_metadata().map_err(TrashError::PathStatFailed)?;
    let basename = canonical
        .file_name()
        .ok_or(TrashError::NameFailed)?
        .to_owned();
    Ok(ResolvedPath {
        canonical,
        device: metadata.dev(),
        basename,
    })
}
