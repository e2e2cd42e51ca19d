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

//! Windows backend, adapting `IFileOperation`.
//!
//! This is an opaque collaborator, not part of THE CORE: it carries no
//! retry or collision logic of its own, just "move path to the Recycle
//! Bin; return ok or error". Every failure is reported through
//! [`TrashError::RenameFailed`], since the operation it performs is, from
//! the caller's point of view, the same "relocate" step the XDG core's
//! `Mover` performs.

use std::io;
use std::os::windows::ffi::OsStrExt;

use camino::Utf8Path;
use windows::Win32::System::Com::{
    CLSCTX_ALL, COINIT_APARTMENTTHREADED, CoCreateInstance, CoInitializeEx, CoUninitialize,
};
use windows::Win32::UI::Shell::{FOF_ALLOWUNDO, FOF_NO_UI, FOF_WANTNUKEWARNING, FileOperation, IFileOperation, IShellItem, SHCreateItemFromParsingName};
use windows::core::PCWSTR;

use crate::error::TrashError;

fn to_wide(path: &Utf8Path) -> Vec<u16> {
    path.as_std_path().as_os_str().encode_wide().chain(std::iter::once(0)).collect()
}

/// Move `path` to the Recycle Bin via `IFileOperation`.
///
/// COM is initialised for the duration of the call and torn down
/// afterwards; a caller that has already initialised COM on this thread
/// (e.g. apartment-threaded, as required here) may see a harmless
/// `RPC_E_CHANGED_MODE`-free re-entrant initialisation, which `windows`
/// surfaces as `Ok` with an `S_FALSE` success code.
pub(crate) fn soft_delete(path: &Utf8Path) -> Result<(), TrashError> {
    unsafe {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok().map_err(to_trash_error)?;
        let result = delete_via_file_operation(path);
        CoUninitialize();
        result
    }
}

unsafe fn delete_via_file_operation(path: &Utf8Path) -> Result<(), TrashError> {
    unsafe {
        let operation: IFileOperation =
            CoCreateInstance(&FileOperation, None, CLSCTX_ALL).map_err(to_trash_error)?;
        operation
            .SetOperationFlags(FOF_NO_UI | FOF_ALLOWUNDO | FOF_WANTNUKEWARNING)
            .map_err(to_trash_error)?;

        let wide_path = to_wide(path);
        let item: IShellItem =
            SHCreateItemFromParsingName(PCWSTR(wide_path.as_ptr()), None).map_err(to_trash_error)?;
        operation.DeleteItem(&item, None).map_err(to_trash_error)?;
        operation.PerformOperations().map_err(to_trash_error)?;

        if operation.GetAnyOperationsAborted().map_err(to_trash_error)?.as_bool() {
            return Err(TrashError::RenameFailed(io::Error::other(
                "the shell aborted the recycle-bin operation",
            )));
        }
        Ok(())
    }
}

fn to_trash_error(err: windows::core::Error) -> TrashError {
    TrashError::RenameFailed(io::Error::other(format!("IFileOperation failed: {err}")))
}
