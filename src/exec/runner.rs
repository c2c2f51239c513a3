//! Execution orchestration — run source through the toolchain.
//!
//! `run` writes the job's source to its target (or a scratch file), invokes
//! `go run` from the right working directory, and reports normalized output.
//! The target write happens before any launch attempt and is never rolled
//! back. Scratch files are removed on every exit path.

use crate::core::toolchain;
use crate::core::types::{EnvReport, RunJob, RunResult};
use crate::core::workspace::Workspace;
use crate::exec::{self, ExecOutput};
use crate::platform;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Run a job to completion. Blocks until the subprocess exits; independent
/// calls run in fully parallel subprocesses.
pub fn run(workspace: &Arc<Workspace>, job: &RunJob) -> RunResult {
    let toolchain = toolchain::locate(root_override(&job.env));

    let mut scratch: Option<NamedTempFile> = None;
    let run_path = match job.path {
        Some(ref target) => {
            // The on-disk file becomes authoritative before the run.
            if let Err(e) = std::fs::write(target, &job.code) {
                return failed(format!(
                    "failed to save {} before running: {}",
                    target.display(),
                    e
                ));
            }
            target.clone()
        }
        None => {
            let mut file = match tempfile::Builder::new()
                .prefix("main_")
                .suffix(".go")
                .tempfile()
            {
                Ok(f) => f,
                Err(e) => return failed(format!("failed to create scratch file: {}", e)),
            };
            if let Err(e) = file.write_all(job.code.as_bytes()).and_then(|()| file.flush()) {
                return failed(format!("failed to write scratch file: {}", e));
            }
            let path = file.path().to_path_buf();
            scratch = Some(file);
            path
        }
    };

    let mut cmd = Command::new(&toolchain);
    cmd.arg("run")
        .arg(&run_path)
        .current_dir(working_dir(workspace, &run_path));
    exec::apply_env(&mut cmd, &job.env);

    let result = match exec::run_combined(cmd) {
        Ok(out) => finish(&out, &toolchain),
        Err(launch) => failed(with_hint(launch, &toolchain)),
    };

    // A run may have changed declarations in the active workspace.
    if job.path.is_some() {
        workspace.file_saved(&run_path);
    }

    drop(scratch);
    result
}

/// Execute an arbitrary whitespace-tokenized command line. A first token
/// naming the toolchain is rewritten to the located binary. No file writes,
/// no re-index trigger.
pub fn run_command(line: &str, env: &HashMap<String, String>) -> RunResult {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return RunResult::default();
    };
    let args: Vec<&str> = tokens.collect();

    let mut cmd = if first == toolchain::TOOLCHAIN {
        let mut cmd = Command::new(toolchain::locate(root_override(env)));
        cmd.args(&args);
        cmd
    } else if let Some(shell) = platform::shell_command(line, first) {
        shell
    } else {
        let mut cmd = Command::new(first);
        cmd.args(&args);
        cmd
    };
    exec::apply_env(&mut cmd, env);

    match exec::run_combined(cmd) {
        Ok(out) => {
            let error = (!out.success()).then(|| out.status.to_string());
            RunResult {
                output: platform::decode_output(&out.bytes),
                error,
            }
        }
        Err(launch) => failed(launch),
    }
}

/// Toolchain environment report: `go version`, `go env`, and the host
/// platform. Capture failures land inside the fields, never as errors.
pub fn env_report(env: &HashMap<String, String>) -> EnvReport {
    let toolchain = toolchain::locate(root_override(env));
    EnvReport {
        toolchain_version: capture(&toolchain, "version", env),
        host_os: std::env::consts::OS.to_string(),
        host_arch: std::env::consts::ARCH.to_string(),
        env_vars: capture(&toolchain, "env", env),
    }
}

fn capture(toolchain: &Path, subcommand: &str, env: &HashMap<String, String>) -> String {
    let mut cmd = Command::new(toolchain);
    cmd.arg(subcommand);
    exec::apply_env(&mut cmd, env);
    match exec::run_combined(cmd) {
        Ok(out) if out.success() => platform::decode_output(&out.bytes).trim().to_string(),
        Ok(out) => format!(
            "error running '{} {}': {}\n{}",
            toolchain.display(),
            subcommand,
            out.status,
            platform::decode_output(&out.bytes)
        ),
        Err(launch) => launch,
    }
}

fn root_override(env: &HashMap<String, String>) -> Option<&str> {
    env.get(toolchain::TOOLCHAIN_ROOT_VAR).map(String::as_str)
}

/// Run from the workspace root when the file lives under it, so the
/// toolchain can resolve intra-workspace dependencies; loose single-file
/// scripts run from their own directory.
fn working_dir(workspace: &Workspace, run_path: &Path) -> PathBuf {
    if let Some(root) = workspace.root() {
        if run_path.starts_with(&root) {
            return root;
        }
    }
    run_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn finish(out: &ExecOutput, toolchain: &Path) -> RunResult {
    let output = platform::decode_output(&out.bytes);
    if out.success() {
        return RunResult {
            output,
            error: None,
        };
    }
    let mut error = out.status.to_string();
    if output.is_empty() {
        error = with_hint(error, toolchain);
    }
    RunResult {
        output,
        error: Some(error),
    }
}

fn failed(error: String) -> RunResult {
    RunResult {
        output: String::new(),
        error: Some(error),
    }
}

fn with_hint(mut error: String, toolchain: &Path) -> String {
    error.push_str(&format!(
        "\n(nothing was captured from '{}'. Check that the Go toolchain is installed or {} is configured correctly)",
        toolchain.display(),
        toolchain::TOOLCHAIN_ROOT_VAR
    ));
    error
}

#[cfg(unix)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// A fake toolchain root: `<root>/bin/go` is a shell script, so the
    /// GOROOT override routes every invocation to it.
    fn fake_toolchain(script_body: &str) -> TempDir {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let go = bin.join("go");
        fs::write(&go, format!("#!/bin/sh\n{}\n", script_body)).unwrap();
        fs::set_permissions(&go, fs::Permissions::from_mode(0o755)).unwrap();
        dir
    }

    fn env_for(root: &TempDir) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert(
            "GOROOT".to_string(),
            root.path().to_string_lossy().into_owned(),
        );
        env
    }

    fn wait_until(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        cond()
    }

    #[test]
    fn test_target_overwritten_and_run_from_workspace_root() {
        let toolchain = fake_toolchain("pwd; echo \"file=$2\"");
        let ws_dir = tempfile::tempdir().unwrap();
        let target = ws_dir.path().join("main.go");
        fs::write(&target, "old content").unwrap();

        let workspace = Arc::new(Workspace::new());
        workspace.set_root(ws_dir.path()).unwrap();

        let job = RunJob {
            code: "package main\n\nfunc main() {}\n".to_string(),
            path: Some(target.clone()),
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);

        assert!(result.error.is_none(), "unexpected error: {:?}", result.error);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "package main\n\nfunc main() {}\n"
        );
        let lines: Vec<&str> = result.output.lines().collect();
        assert_eq!(lines[0], ws_dir.path().to_string_lossy());
        assert_eq!(lines[1], format!("file={}", target.display()));
    }

    #[test]
    fn test_file_outside_workspace_runs_from_its_directory() {
        let toolchain = fake_toolchain("pwd");
        let ws_dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let target = other.path().join("loose.go");

        let workspace = Arc::new(Workspace::new());
        workspace.set_root(ws_dir.path()).unwrap();

        let job = RunJob {
            code: "package main\n".to_string(),
            path: Some(target),
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);
        assert_eq!(result.output.trim(), other.path().to_string_lossy());
    }

    #[test]
    fn test_scratch_file_used_and_removed() {
        let toolchain = fake_toolchain("echo \"scratch=$2\"");
        let workspace = Arc::new(Workspace::new());

        let job = RunJob {
            code: "package main\n".to_string(),
            path: None,
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);
        assert!(result.error.is_none());

        let scratch = result
            .output
            .trim()
            .strip_prefix("scratch=")
            .expect("fake toolchain echoes the scratch path");
        assert!(scratch.contains("main_"));
        assert!(scratch.ends_with(".go"));
        assert!(!Path::new(scratch).exists(), "scratch file not removed");
    }

    #[test]
    fn test_scratch_removed_on_nonzero_exit() {
        let toolchain = fake_toolchain("echo \"scratch=$2\"; exit 7");
        let workspace = Arc::new(Workspace::new());

        let job = RunJob {
            code: "package main\n".to_string(),
            path: None,
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);
        assert!(result.error.is_some());

        let scratch = result.output.trim().strip_prefix("scratch=").unwrap();
        assert!(!Path::new(scratch).exists());
    }

    #[test]
    fn test_nonzero_exit_keeps_output_no_hint() {
        let toolchain = fake_toolchain("echo boom >&2; exit 3");
        let workspace = Arc::new(Workspace::new());
        let dir = tempfile::tempdir().unwrap();

        let job = RunJob {
            code: "package main\n".to_string(),
            path: Some(dir.path().join("x.go")),
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);

        assert!(result.output.contains("boom"));
        let error = result.error.unwrap();
        assert!(error.contains("exit status"), "got: {}", error);
        assert!(!error.contains("check that"), "hint on non-empty output");
    }

    #[test]
    fn test_silent_failure_appends_hint() {
        let toolchain = fake_toolchain("exit 1");
        let workspace = Arc::new(Workspace::new());

        let job = RunJob {
            code: "package main\n".to_string(),
            path: None,
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);
        let error = result.error.unwrap();
        assert!(error.contains("check that the Go toolchain is installed"));
    }

    #[test]
    fn test_launch_failure_still_overwrites_target() {
        // GOROOT points at a root with no bin/go at all.
        let empty_root = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("x.go");
        let workspace = Arc::new(Workspace::new());

        let job = RunJob {
            code: "package main\n".to_string(),
            path: Some(target.clone()),
            env: env_for(&empty_root),
        };
        let result = run(&workspace, &job);

        let error = result.error.unwrap();
        assert!(error.contains("failed to execute"));
        assert!(error.contains("check that the Go toolchain is installed"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "package main\n");
    }

    #[test]
    fn test_env_overrides_reach_the_subprocess() {
        let toolchain = fake_toolchain("echo \"proxy=$GOPROXY\"");
        let workspace = Arc::new(Workspace::new());
        let mut env = env_for(&toolchain);
        env.insert("GOPROXY".to_string(), "https://proxy.example".to_string());

        let job = RunJob {
            code: "package main\n".to_string(),
            path: None,
            env,
        };
        let result = run(&workspace, &job);
        assert_eq!(result.output.trim(), "proxy=https://proxy.example");
    }

    #[test]
    fn test_concurrent_runs_do_not_interleave() {
        let toolchain = fake_toolchain("i=0; while [ $i -lt 50 ]; do echo \"tag:$2\"; i=$((i+1)); done");
        let dir = tempfile::tempdir().unwrap();
        let workspace = Arc::new(Workspace::new());

        let mut handles = Vec::new();
        for name in ["one.go", "two.go"] {
            let workspace = Arc::clone(&workspace);
            let target = dir.path().join(name);
            let env = env_for(&toolchain);
            handles.push(std::thread::spawn(move || {
                let job = RunJob {
                    code: "package main\n".to_string(),
                    path: Some(target.clone()),
                    env,
                };
                (target, run(&workspace, &job))
            }));
        }

        for handle in handles {
            let (target, result) = handle.join().unwrap();
            let expected = format!("tag:{}", target.display());
            for line in result.output.lines() {
                assert_eq!(line, expected, "foreign bytes in captured output");
            }
            assert_eq!(result.output.lines().count(), 50);
        }
    }

    #[test]
    fn test_workspace_run_triggers_reindex() {
        let toolchain = fake_toolchain("true");
        let ws_dir = tempfile::tempdir().unwrap();
        let workspace = Arc::new(Workspace::new());
        workspace.set_root(ws_dir.path()).unwrap();

        let job = RunJob {
            code: "package main\n\nfunc Fresh() {}\n".to_string(),
            path: Some(ws_dir.path().join("fresh.go")),
            env: env_for(&toolchain),
        };
        let result = run(&workspace, &job);
        assert!(result.error.is_none());

        assert!(wait_until(Duration::from_secs(5), || {
            workspace.symbols().iter().any(|s| s.name == "Fresh")
        }));
    }

    #[test]
    fn test_run_command_rewrites_toolchain_token() {
        let toolchain = fake_toolchain("echo \"fake-go $*\"");
        let result = run_command("go version -v", &env_for(&toolchain));
        assert!(result.error.is_none());
        assert_eq!(result.output.trim(), "fake-go version -v");
    }

    #[test]
    fn test_run_command_plain_program() {
        let result = run_command("echo plain-cmd", &HashMap::new());
        assert!(result.error.is_none());
        assert_eq!(result.output.trim(), "plain-cmd");
    }

    #[test]
    fn test_run_command_empty_line() {
        let result = run_command("   ", &HashMap::new());
        assert!(result.error.is_none());
        assert!(result.output.is_empty());
    }

    #[test]
    fn test_run_command_reports_exit_status() {
        let result = run_command("false", &HashMap::new());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_env_report_uses_located_toolchain() {
        let toolchain = fake_toolchain("echo \"go version fake1.0 $1\"");
        let report = env_report(&env_for(&toolchain));
        assert_eq!(report.toolchain_version, "go version fake1.0 version");
        assert_eq!(report.env_vars, "go version fake1.0 env");
        assert_eq!(report.host_os, std::env::consts::OS);
        assert_eq!(report.host_arch, std::env::consts::ARCH);
    }

    #[test]
    fn test_env_report_launch_failure_lands_in_fields() {
        let empty_root = tempfile::tempdir().unwrap();
        let report = env_report(&env_for(&empty_root));
        assert!(report.toolchain_version.contains("failed to execute"));
    }
}
