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

//! Trash info.
//!
//! Represents the contents of a `.trashinfo` file in the info directory
//! of a trash, and the exclusive-create primitive that makes concurrent
//! deletions safe.

use std::fs::{OpenOptions, remove_file};
use std::io::{ErrorKind, Write};

use camino::Utf8Path;
use chrono::NaiveDateTime;

use super::escape::escape;
use crate::error::TrashError;

/// Outcome of attempting to claim a candidate `.trashinfo` path.
pub(crate) enum WriteOutcome {
    /// The file was created and fully written.
    Ok,
    /// A file already existed at the candidate path.
    Collision,
}

/// Render the literal body of a `.trashinfo` file for `original_path`/`deletion_time`.
fn render(original_path: &Utf8Path, deletion_time: &NaiveDateTime) -> String {
    format!(
        "[Trash Info]\nPath={}\nDeletionDate={}\n",
        escape(original_path.as_str()),
        deletion_time.format("%Y-%m-%dT%H:%M:%S")
    )
}

/// Atomically create `info_file_path` with the trash-info body for
/// `original_path`/`deletion_time`.
///
/// Uses an exclusive-create primitive (`O_CREAT | O_EXCL`, via
/// `OpenOptions::create_new`) so that two callers racing for the same
/// stem see exactly one [`WriteOutcome::Ok`]; the other sees
/// [`WriteOutcome::Collision`]. If the file is created but writing its
/// contents fails, the partially written file is removed before
/// returning an error.
pub(crate) fn write(
    info_file_path: &Utf8Path,
    original_path: &Utf8Path,
    deletion_time: &NaiveDateTime,
) -> Result<WriteOutcome, TrashError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(info_file_path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::AlreadyExists => return Ok(WriteOutcome::Collision),
        Err(err) => return Err(TrashError::TrashInfoFailed(err)),
    };
    let body = render(original_path, deletion_time);
    if let Err(err) = file.write_all(body.as_bytes()) {
        let _ = remove_file(info_file_path);
        return Err(TrashError::TrashInfoFailed(err));
    }
    Ok(WriteOutcome::Ok)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn deletion_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 34, 56)
            .unwrap()
    }

    #[test]
    fn test_render_body() {
        let body = render(Utf8Path::new("/tmp/u/notes.txt"), &deletion_time());
        assert_eq!(body, "[Trash Info]\nPath=/tmp/u/notes.txt\nDeletionDate=2024-05-01T12:34:56\n");
    }

    #[test]
    fn test_render_body_escapes_path() {
        let body = render(Utf8Path::new("/tmp/u/a file %.txt"), &deletion_time());
        assert!(body.contains("Path=/tmp/u/a%20file%20%25.txt\n"));
    }

    #[test]
    fn test_write_then_collision() {
        let dir = assert_fs::TempDir::new().unwrap();
        let info_path = Utf8Path::from_path(dir.path()).unwrap().join("a.trashinfo");
        let outcome = write(&info_path, Utf8Path::new("/tmp/a"), &deletion_time()).unwrap();
        assert!(matches!(outcome, WriteOutcome::Ok));
        let contents = std::fs::read_to_string(&info_path).unwrap();
        assert!(contents.starts_with("[Trash Info]\n"));

        let outcome = write(&info_path, Utf8Path::new("/tmp/b"), &deletion_time()).unwrap();
        assert!(matches!(outcome, WriteOutcome::Collision));
        // The original contents must survive an attempted overwrite.
        let contents_after = std::fs::read_to_string(&info_path).unwrap();
        assert_eq!(contents, contents_after);
    }
}
