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

mod cli;

use camino::Utf8PathBuf;
use clap::Parser;
use eyre::Result;
use xdg_trash::{status_message, try_soft_delete};

use cli::Cli;

fn main() -> Result<()> {
    init_eyre()?;
    let cli = Cli::parse();
    run(&cli.paths)
}

fn init_eyre() -> Result<()> {
    color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .install()?;
    Ok(())
}

/// Move every path to the trash, reporting failures without aborting the
/// rest of the batch. Exits non-zero if any path could not be trashed.
fn run(paths: &[Utf8PathBuf]) -> Result<()> {
    let mut had_failure = false;
    for path in paths {
        if let Err(err) = try_soft_delete(path) {
            had_failure = true;
            eprintln!("trash: cannot trash '{path}': {}", status_message(err.code()));
        }
    }
    if had_failure {
        std::process::exit(1);
    }
    Ok(())
}
