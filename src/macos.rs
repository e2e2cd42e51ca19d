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

//! macOS backend, adapting `NSFileManager`.
//!
//! Like [`crate::windows`], this is an opaque collaborator outside THE
//! CORE: "move path to the Trash; return ok or error", with no retry or
//! collision logic. `-[NSFileManager trashItemAtURL:resultingItemURL:error:]`
//! isn't exposed as a typed method by `objc2-foundation` yet, so it's
//! invoked directly with `msg_send!`, the same way `objc2` callers reach
//! any Foundation selector the crate hasn't bound.

use std::io;

use camino::Utf8Path;
use objc2::msg_send;
use objc2::rc::Retained;
use objc2_foundation::{NSFileManager, NSError, NSString, NSURL};

use crate::error::TrashError;

/// Move `path` to the Trash via `-[NSFileManager trashItemAtURL:resultingItemURL:error:]`.
pub(crate) fn soft_delete(path: &Utf8Path) -> Result<(), TrashError> {
    let url = file_url(path);
    let manager = unsafe { NSFileManager::defaultManager() };

    let mut error: Option<Retained<NSError>> = None;
    let ok: bool = unsafe {
        msg_send![
            &*manager,
            trashItemAtURL: &*url,
            resultingItemURL: std::ptr::null_mut::<*mut NSURL>(),
            error: &mut error,
        ]
    };

    match (ok, error) {
        (true, _) => Ok(()),
        (false, Some(error)) => Err(TrashError::RenameFailed(io::Error::other(format!(
            "trashItemAtURL failed: {}",
            error.localizedDescription()
        )))),
        (false, None) => Err(TrashError::RenameFailed(io::Error::other(
            "trashItemAtURL failed with no error detail",
        ))),
    }
}

fn file_url(path: &Utf8Path) -> Retained<NSURL> {
    let path = NSString::from_str(path.as_str());
    unsafe { NSURL::fileURLWithPath(&path) }
}
