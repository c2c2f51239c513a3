//! CLI subcommands — index, resolve, locate, run, exec, env, workspace.
//!
//! The thin transport over the library: each subcommand parses arguments,
//! makes one call into the core, and prints plain data as JSON or text.

use crate::core::{config, index, resolver, toolchain, types::RunJob, workspace::Workspace};
use crate::exec::runner;
use clap::Subcommand;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a workspace and print its symbol index
    Index {
        /// Workspace root (default: remembered workspace, then cwd)
        path: Option<PathBuf>,
    },

    /// Set and persist the active workspace, then index it
    Workspace {
        /// New workspace root
        path: PathBuf,
    },

    /// Resolve an import specifier to a file on disk
    Resolve {
        /// File containing the import
        base: PathBuf,

        /// Import specifier text
        specifier: String,

        /// Workspace root (default: remembered workspace)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Print the located toolchain binary
    Locate {
        /// Explicit toolchain root override
        #[arg(long)]
        goroot: Option<String>,
    },

    /// Run a source file (or inline code) through the toolchain
    Run {
        /// Target file; written before running and left in place
        file: Option<PathBuf>,

        /// Inline source text; without a file it runs from a scratch file
        #[arg(long)]
        code: Option<String>,

        /// Environment overrides, KEY=VALUE, repeatable
        #[arg(short, long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },

    /// Execute an arbitrary command line, rewriting a leading `go`
    Exec {
        /// Command line tokens
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,

        /// Environment overrides, KEY=VALUE, repeatable
        #[arg(short, long = "env", value_name = "KEY=VALUE")]
        env: Vec<String>,
    },

    /// Report the toolchain environment
    Env {
        /// Explicit toolchain root override
        #[arg(long)]
        goroot: Option<String>,
    },
}

/// Dispatch a CLI command.
pub fn dispatch(cmd: Commands) -> Result<(), String> {
    match cmd {
        Commands::Index { path } => cmd_index(path),
        Commands::Workspace { path } => cmd_workspace(&path),
        Commands::Resolve {
            base,
            specifier,
            root,
        } => cmd_resolve(&base, &specifier, root),
        Commands::Locate { goroot } => cmd_locate(goroot.as_deref()),
        Commands::Run { file, code, env } => cmd_run(file, code, &env),
        Commands::Exec { command, env } => cmd_exec(&command.join(" "), &env),
        Commands::Env { goroot } => cmd_env(goroot.as_deref()),
    }
}

fn config_path() -> PathBuf {
    PathBuf::from(config::CONFIG_FILE)
}

fn cmd_index(path: Option<PathBuf>) -> Result<(), String> {
    let root = match path {
        Some(p) => p,
        None => Workspace::restore(&config_path())
            .root()
            .ok_or("no workspace root and no working directory")?,
    };
    if !root.is_dir() {
        return Err(format!("not a directory: {}", root.display()));
    }

    let symbols = index::scan(&root);
    let json = serde_json::to_string_pretty(&symbols)
        .map_err(|e| format!("serialize error: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn cmd_workspace(path: &Path) -> Result<(), String> {
    let ws = Arc::new(Workspace::new().with_config(config_path()));
    ws.set_root(path)?;
    ws.rebuild();
    println!(
        "workspace {}: {} symbols",
        path.display(),
        ws.symbols().len()
    );
    Ok(())
}

fn cmd_resolve(base: &Path, specifier: &str, root: Option<PathBuf>) -> Result<(), String> {
    let root = root.or_else(|| config::restore_workspace(&config_path()));
    match resolver::resolve(base, specifier, root.as_deref()) {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(format!("not found: {}", specifier)),
    }
}

fn cmd_locate(goroot: Option<&str>) -> Result<(), String> {
    println!("{}", toolchain::locate(goroot).display());
    Ok(())
}

fn cmd_run(file: Option<PathBuf>, code: Option<String>, env: &[String]) -> Result<(), String> {
    let code = match (&file, code) {
        (_, Some(code)) => code,
        (Some(path), None) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        (None, None) => return Err("nothing to run: give a file or --code".to_string()),
    };

    let job = RunJob {
        code,
        path: file,
        env: parse_env(env)?,
    };
    let workspace = Arc::new(Workspace::restore(&config_path()));
    let result = runner::run(&workspace, &job);

    print!("{}", result.output);
    match result.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn cmd_exec(line: &str, env: &[String]) -> Result<(), String> {
    let result = runner::run_command(line, &parse_env(env)?);
    print!("{}", result.output);
    match result.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn cmd_env(goroot: Option<&str>) -> Result<(), String> {
    let mut env = HashMap::new();
    if let Some(root) = goroot {
        env.insert(toolchain::TOOLCHAIN_ROOT_VAR.to_string(), root.to_string());
    }
    let report = runner::env_report(&env);
    let json =
        serde_json::to_string_pretty(&report).map_err(|e| format!("serialize error: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn parse_env(pairs: &[String]) -> Result<HashMap<String, String>, String> {
    let mut env = HashMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid env override '{}', expected KEY=VALUE", pair))?;
        env.insert(key.to_string(), value.to_string());
    }
    Ok(env)
}
