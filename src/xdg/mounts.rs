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

//! Mount-point lookup.
//!
//! Maps a device id to the path of its mount point by reading the
//! kernel's in-memory mount table: `/proc/mounts` on Linux, the
//! `getmntinfo(3)` buffer on the BSDs.

use std::os::unix::fs::MetadataExt;

use camino::{Utf8Path, Utf8PathBuf};

#[cfg(target_os = "linux")]
const MOUNTS_PATH: &str = "/proc/mounts";

/// Return every mount point path listed in the kernel's mount table.
///
/// Entries whose mount point is not valid UTF-8 are skipped (this crate's
/// path layer is UTF-8 only throughout). The iteration order is whatever
/// the kernel returns; it need not be sorted.
#[cfg(target_os = "linux")]
fn list_mount_points() -> Vec<Utf8PathBuf> {
    let Ok(contents) = std::fs::read_to_string(MOUNTS_PATH) else {
        return Vec::new();
    };
    contents
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|field| unescape_octal(field))
        .filter_map(|mount_point| Utf8PathBuf::from_path_buf(mount_point.into()).ok())
        .collect()
}

/// Return every mount point path from `getmntinfo(3)`.
///
/// FreeBSD and DragonFly BSD fill a `struct statfs` array; NetBSD and
/// OpenBSD unified `statfs` into `statvfs` decades ago and fill that
/// instead, but both expose it through the same `getmntinfo` entry point
/// and the same null-terminated `f_mntonname` field.
#[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
fn list_mount_points() -> Vec<Utf8PathBuf> {
    use std::ffi::CStr;

    let mut buffer: *mut libc::statfs = std::ptr::null_mut();
    // SAFETY: `getmntinfo` allocates and owns `buffer`'s storage internally
    // (it is a static buffer reused across calls); we only read from it.
    let count = unsafe { libc::getmntinfo(&mut buffer, libc::MNT_NOWAIT) };
    if count <= 0 {
        return Vec::new();
    }
    (0..count as usize)
        .filter_map(|i| {
            // SAFETY: `buffer` holds `count` contiguous `statfs` entries.
            let entry = unsafe { &*buffer.add(i) };
            let name = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) };
            Utf8PathBuf::from_path_buf(name.to_str().ok()?.into()).ok()
        })
        .collect()
}

#[cfg(any(target_os = "netbsd", target_os = "openbsd"))]
fn list_mount_points() -> Vec<Utf8PathBuf> {
    use std::ffi::CStr;

    let mut buffer: *mut libc::statvfs = std::ptr::null_mut();
    // SAFETY: see the `freebsd`/`dragonfly` branch above; same contract.
    let count = unsafe { libc::getmntinfo(&mut buffer, libc::MNT_NOWAIT) };
    if count <= 0 {
        return Vec::new();
    }
    (0..count as usize)
        .filter_map(|i| {
            // SAFETY: `buffer` holds `count` contiguous `statvfs` entries.
            let entry = unsafe { &*buffer.add(i) };
            let name = unsafe { CStr::from_ptr(entry.f_mntonname.as_ptr()) };
            Utf8PathBuf::from_path_buf(name.to_str().ok()?.into()).ok()
        })
        .collect()
}

/// `/proc/mounts` escapes spaces, tabs, backslashes and newlines in mount
/// point paths as `\NNN` octal sequences; undo that before using the path.
#[cfg(target_os = "linux")]
fn unescape_octal(field: &str) -> Option<String> {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let octal = std::str::from_utf8(&bytes[i + 1..i + 4]).ok()?;
            if let Ok(value) = u8::from_str_radix(octal, 8) {
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).ok()
}

/// Return the mount point of the filesystem with the given device id, if any.
///
/// Ties are impossible: a device id uniquely identifies a mounted
/// filesystem at a point in time, so the first match found is returned.
pub(crate) fn mount_point_for_device(device: u64) -> Option<Utf8PathBuf> {
    list_mount_points()
        .into_iter()
        .find(|mount_point| mount_point.metadata().is_ok_and(|metadata| metadata.dev() == device))
}
