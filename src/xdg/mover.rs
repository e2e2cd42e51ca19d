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

//! Moving the resolved source into the trash.

use std::fs::{remove_file, rename};

use camino::Utf8Path;

use crate::error::TrashError;

/// Rename `source` to `destination`.
///
/// On failure, the reservation info file at `info_file_path` is unlinked
/// before returning, so a failed move never leaves an orphaned
/// `.trashinfo` behind. Cross-device renames (`EXDEV`) are not retried;
/// they surface as [`TrashError::RenameFailed`] like any other failure.
pub(crate) fn move_into_trash(
    source: &Utf8Path,
    destination: &Utf8Path,
    info_file_path: &Utf8Path,
) -> Result<(), TrashError> {
    rename(source, destination).map_err(|err| {
        let _ = remove_file(info_file_path);
        TrashError::RenameFailed(err)
    })
}
