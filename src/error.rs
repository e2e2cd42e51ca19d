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

//! Error and status-code surface.
//!
//! [`TrashError`] is the one error type shared by every component of the
//! core. Each variant corresponds to exactly one of the stable status
//! codes a caller can depend on; [`TrashError::code`] and
//! [`status_message`] are the two sides of that mapping.

use std::io;

use thiserror::Error;

/// Error produced by a trash operation.
///
/// Every variant maps to a stable, negative status code (see [`TrashError::code`]).
/// No variant is added or removed without also updating the code table.
#[derive(Debug, Error)]
pub enum TrashError {
    /// Canonicalisation of the input path failed.
    #[error("cannot resolve real path: {0}")]
    RealPathFailed(#[source] io::Error),

    /// Neither `$XDG_DATA_HOME` nor `$HOME` could be used to locate the home trash.
    #[error("cannot locate home trash: {0}")]
    HomeTrashFailed(String),

    /// `stat` on the data-home directory failed.
    #[error("cannot stat data home: {0}")]
    HomeStatFailed(#[source] io::Error),

    /// `stat` on the input path failed.
    #[error("cannot stat path: {0}")]
    PathStatFailed(#[source] io::Error),

    /// Creation of a trash subdirectory (`info/`, `files/`, or the root) failed.
    #[error("cannot create trash directory: {0}")]
    MkdirFailed(#[source] io::Error),

    /// Neither the admin (case 1) nor the user (case 2) top-dir trash could be established.
    #[error("cannot establish a top-dir trash: {0}")]
    TopDirFailed(String),

    /// The canonical path has no usable basename (e.g. it is `/`).
    #[error("path has no basename")]
    NameFailed,

    /// The current local time could not be read.
    #[error("cannot read current time: {0}")]
    TimeFailed(String),

    /// A candidate name could not be allocated.
    #[error("cannot allocate a candidate name: {0}")]
    NameAllocFailed(#[source] io::Error),

    /// Writing the `.trashinfo` file failed for a reason other than collision.
    #[error("cannot write trash info file: {0}")]
    TrashInfoFailed(#[source] io::Error),

    /// Moving the source into `files/` failed.
    #[error("cannot move path into trash: {0}")]
    RenameFailed(#[source] io::Error),

    /// Every retry, including the random-name fallback, still collided.
    #[error("exhausted name collisions, including the random fallback")]
    CollisionFailed,

    /// Refreshing the `directorysizes` cache failed.
    #[error("cannot refresh directory size cache: {0}")]
    DirCacheFailed(#[source] io::Error),
}

impl TrashError {
    /// Return the stable status code for this error, per the external interface table.
    pub fn code(&self) -> i32 {
        match self {
            TrashError::RealPathFailed(_) => -1,
            TrashError::HomeTrashFailed(_) => -2,
            TrashError::HomeStatFailed(_) => -3,
            TrashError::PathStatFailed(_) => -4,
            TrashError::MkdirFailed(_) => -5,
            TrashError::TopDirFailed(_) => -6,
            TrashError::NameFailed => -7,
            TrashError::TimeFailed(_) => -8,
            TrashError::NameAllocFailed(_) => -9,
            TrashError::TrashInfoFailed(_) => -10,
            TrashError::RenameFailed(_) => -11,
            TrashError::CollisionFailed => -12,
            TrashError::DirCacheFailed(_) => -13,
        }
    }
}

/// Map a status code (as returned by [`crate::soft_delete`]) to a human-readable string.
///
/// `0` maps to the success message; any code not in the table below maps to
/// a generic "unknown status code" message rather than panicking, since the
/// code may come from a future version of this library.
pub fn status_message(code: i32) -> &'static str {
    match code {
        0 => "successful",
        -1 => "canonicalisation failed",
        -2 => "$HOME / $XDG_DATA_HOME unusable",
        -3 => "stat on data-home failed",
        -4 => "stat on input path failed",
        -5 => "creation of trash subdirectories failed",
        -6 => "could not establish a top-dir trash",
        -7 => "basename extraction failed",
        -8 => "clock read failed",
        -9 => "candidate name allocation failed",
        -10 => "info-file write failed for a non-collision reason",
        -11 => "move into files_dir failed",
        -12 => "exhausted retries including random names",
        -13 => "size-cache refresh failed",
        _ => "unknown status code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_table_is_stable() {
        assert_eq!(TrashError::RealPathFailed(io::Error::other("x")).code(), -1);
        assert_eq!(TrashError::NameFailed.code(), -7);
        assert_eq!(TrashError::CollisionFailed.code(), -12);
        assert_eq!(TrashError::DirCacheFailed(io::Error::other("x")).code(), -13);
    }

    #[test]
    fn test_status_message_known_and_unknown() {
        assert_eq!(status_message(0), "successful");
        assert_eq!(status_message(-7), "basename extraction failed");
        assert_eq!(status_message(1), "unknown status code");
        assert_eq!(status_message(-99), "unknown status code");
    }
}
