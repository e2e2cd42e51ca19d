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

use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn trash_command() -> Result<Command> {
    Ok(Command::cargo_bin("trash")?)
}

#[test]
fn option_version() -> Result<()> {
    let pkg_version = env!("CARGO_PKG_VERSION");
    trash_command()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(pkg_version))
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn option_help() -> Result<()> {
    trash_command()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--help"))
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn no_arguments_fails() -> Result<()> {
    trash_command()?.assert().failure();
    Ok(())
}

#[test]
fn trashes_a_single_file() -> Result<()> {
    let data_home = TempDir::new()?;
    let file = data_home.child("notes.txt");
    file.write_str("hello")?;

    trash_command()?
        .arg(file.path())
        .env("XDG_DATA_HOME", data_home.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    file.assert(predicate::path::missing());
    let files_dir = data_home.child("Trash/files");
    assert_eq!(std::fs::read_dir(files_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn reports_one_missing_path_but_still_trashes_the_rest() -> Result<()> {
    let data_home = TempDir::new()?;
    let present = data_home.child("present.txt");
    present.write_str("hello")?;
    let missing = data_home.child("absent.txt");

    trash_command()?
        .args([present.path(), missing.path()])
        .env("XDG_DATA_HOME", data_home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.txt"));

    present.assert(predicate::path::missing());
    Ok(())
}
