// Copyright 2025 eraflo
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

// Asset tooling for Jig
// Run with: cargo xtask <command>

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask", version, about = "Asset pipeline tooling for Jig")]
struct Cli {
    /// The asset manifest to read search paths and pack files from.
    #[arg(long, global = true, default_value = "Assets.toml")]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Packs every file under the configured search paths into `data.pack` + `index.bin`.
    Pack {
        /// Where the pack files are written.
        #[arg(long, default_value = ".dist/assets")]
        out_dir: PathBuf,
    },
    /// Loads assets through an asset cache and reports the ones that fail.
    ///
    /// With no names, every file under the search paths is checked.
    Verify {
        /// Asset names, relative to a search path.
        names: Vec<String>,
    },
}

fn main() -> Result<()> {
    jig_telemetry::logging::init("warn");
    let cli = Cli::parse();
    println!("{}", helpers::BANNER);

    match cli.command {
        Command::Pack { out_dir } => commands::pack::run(&cli.manifest, &out_dir),
        Command::Verify { names } => commands::verify::run(&cli.manifest, &names),
    }
}
