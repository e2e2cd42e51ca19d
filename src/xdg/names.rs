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

//! Candidate name allocation.
//!
//! Produces the shared stem for a `.trashinfo`/payload pair, preferring a
//! name derived from the original basename and the deletion time, and
//! falling back to a random stem when the derived name would not fit the
//! filesystem's `NAME_MAX`.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDateTime;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::TrashError;

const TRASHINFO_EXTENSION: &str = ".trashinfo";

/// A candidate pair of sibling paths sharing a stem.
pub(crate) struct Candidate {
    pub(crate) info_file_path: Utf8PathBuf,
    pub(crate) file_path: Utf8PathBuf,
}

/// Query `NAME_MAX` for `dir` via `pathconf`.
///
/// Returns `None` if the filesystem imposes no limit (or `pathconf`
/// itself fails), in which case callers should treat the name as always
/// fitting.
fn name_max(dir: &Utf8Path) -> Option<usize> {
    let cpath = CString::new(dir.as_os_str().as_bytes()).ok()?;
    // SAFETY: `cpath` is a valid NUL-terminated C string for the lifetime of the call.
    let limit = unsafe { libc::pathconf(cpath.as_ptr(), libc::_PC_NAME_MAX) };
    if limit < 0 { None } else { Some(limit as usize) }
}

/// Generate a random hex stem sized to fit within `NAME_MAX` once
/// `.trashinfo` is appended. An odd byte budget is rounded down by one
/// rather than rejected, so this stays usable on filesystems where
/// `NAME_MAX - len(".trashinfo")` happens to be odd.
fn random_stem(name_max: usize) -> Result<String, TrashError> {
    let available = name_max.saturating_sub(TRASHINFO_EXTENSION.len());
    let hex_len = available - (available % 2);
    Ok(random_hex(hex_len / 2))
}

/// Return `byte_len` cryptographically random bytes, uppercase-hex encoded.
///
/// Shared by the name allocator's random fallback and by the directory
/// size cache, which needs an unrelated random name for its temporary
/// replacement file.
pub(crate) fn random_hex(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}

/// Allocate the `counter`-th candidate name for `basename` under `files_dir`/`info_dir`.
///
/// `force_random` skips the derived-name attempt entirely, as does a
/// derived name that would not fit `NAME_MAX`.
pub(crate) fn allocate(
    basename: &str,
    info_dir: &Utf8Path,
    files_dir: &Utf8Path,
    deletion_time: &NaiveDateTime,
    counter: u32,
    force_random: bool,
) -> Result<Candidate, TrashError> {
    let timestamp = deletion_time.format("%Y%m%d%H%M%S").to_string();
    let counter_hex = format!("{counter:x}");
    let derived = format!("{basename}{timestamp}{counter_hex}");

    let stem = match name_max(files_dir) {
        Some(limit) if force_random || derived.len() + TRASHINFO_EXTENSION.len() > limit => {
            random_stem(limit)?
        }
        None if force_random => {
            // No filesystem limit to size against; fall back to a fixed, generous width.
            random_stem(256)?
        }
        _ => derived,
    };

    Ok(Candidate {
        info_file_path: info_dir.join(format!("{stem}{TRASHINFO_EXTENSION}")),
        file_path: files_dir.join(stem),
    })
}
