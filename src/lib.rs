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

//! A portable soft-delete primitive.
//!
//! [`soft_delete`] relocates a file or directory into the operating
//! system's user-visible trash/recycle store instead of unlinking it.
//! Three backends are selected at build time behind one entry point:
//!
//! - [`xdg`], the XDG/freedesktop trash protocol for Linux and the BSDs.
//!   This is the only backend with non-trivial engineering: mount-point
//!   placement, atomic `.trashinfo` creation, collision retry, and the
//!   `directorysizes` cache.
//! - `windows`, a thin adapter over `IFileOperation`.
//! - `macos`, a thin adapter over `NSFileManager`.
//!
//! The latter two are opaque collaborators whose only contract is "move
//! path to the recycle store; return ok or error".

pub mod error;

#[cfg(any(
    target_os = "linux",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly"
))]
mod xdg;

#[cfg(windows)]
mod windows;

#[cfg(target_os = "macos")]
mod macos;

use camino::Utf8Path;

pub use error::{TrashError, status_message};

/// Relocate `path` into the platform trash/recycle store.
///
/// This is the idiomatic entry point for in-process Rust callers; see
/// [`soft_delete`] for the stable integer-status surface used across
/// language boundaries.
pub fn try_soft_delete(path: impl AsRef<Utf8Path>) -> Result<(), TrashError> {
    let path = path.as_ref();
    #[cfg(any(
        target_os = "linux",
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    ))]
    {
        xdg::soft_delete(path)
    }
    #[cfg(windows)]
    {
        windows::soft_delete(path)
    }
    #[cfg(target_os = "macos")]
    {
        macos::soft_delete(path)
    }
}

/// Relocate `path` into the platform trash/recycle store.
///
/// Returns `0` on success, or one of the negative [`TrashError::code`]
/// values on failure. This is the sole entry point of the language-neutral
/// external interface; pair it with [`status_message`] to render a
/// human-readable diagnostic for the returned code.
pub fn soft_delete(path: impl AsRef<Utf8Path>) -> i32 {
    match try_soft_delete(path) {
        Ok(()) => 0,
        Err(err) => err.code(),
    }
}
