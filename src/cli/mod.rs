//! Thin demonstration entry point: wires the disk file source, the
//! built-in registry and any user-supplied descriptor files to the
//! coordinator.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;

use crate::descriptor;
use crate::document::EcLang;
use crate::env::Env;

#[derive(Parser)]
#[command(name = "eclang")]
#[command(about = "EcLang compiler and decompiler", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a source file (or re-encode a compiled one)
    Compile(ConvertArgs),

    /// Decompile a compiled file back to source text
    Decompile(ConvertArgs),

    /// Parse a file and print its node tree as JSON
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input file (path or registered alias)
    pub input: PathBuf,

    /// Output path; defaults to the input name with the language's
    /// other extension
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Language descriptor (.eld) files to register before loading
    #[arg(short, long)]
    pub descriptor: Vec<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Input file (path or registered alias)
    pub input: PathBuf,

    /// Language descriptor (.eld) files to register before loading
    #[arg(short, long)]
    pub descriptor: Vec<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Compile(args) => compile(args, true),
        Commands::Decompile(args) => compile(args, false),
        Commands::Inspect(args) => inspect(args),
    }
}

/// Builds an on-disk environment with the requested descriptor files
/// registered.
fn make_env(descriptors: &[PathBuf]) -> Result<Env> {
    let mut env = Env::on_disk();
    for path in descriptors {
        let file = load(path, &mut env)?;
        descriptor::register_languages(&mut env, &file)
            .with_context(|| format!("failed to interpret descriptor {}", path.display()))?;
    }
    Ok(env)
}

fn load(path: &Path, env: &mut Env) -> Result<EcLang> {
    EcLang::from_file(&path.to_string_lossy(), env)
        .with_context(|| format!("failed to load {}", path.display()))
}

fn compile(args: ConvertArgs, to_binary: bool) -> Result<()> {
    let mut env = make_env(&args.descriptor)?;
    let file = load(&args.input, &mut env)?;
    let bytes = if to_binary {
        file.save_compiled()?
    } else {
        file.save_source()?.into_bytes()
    };
    let output = args
        .output
        .unwrap_or_else(|| default_output(&args.input, &file, to_binary));
    fs::write(&output, bytes).with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let mut env = make_env(&args.descriptor)?;
    let file = load(&args.input, &mut env)?;
    let json = serde_json::to_string_pretty(file.all_objects())?;
    println!("{json}");
    Ok(())
}

/// `menu.elt` compiles to `menu.eltc` next to it, and the other way
/// round for decompilation.
fn default_output(input: &Path, file: &EcLang, to_binary: bool) -> PathBuf {
    let extension = if to_binary {
        file.language().compiled_extension()
    } else {
        file.language().source_extension()
    };
    input.with_extension(extension)
}
