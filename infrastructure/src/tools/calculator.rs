//! `python_calculator` tool: run a Python snippet in a separate process.
//!
//! The snippet runs under `python3 -I` (isolated mode: no user site, no
//! `PYTHON*` variables) with `math` already imported. The child gets an empty
//! environment, the system temp dir as working directory, a wall-clock
//! timeout after which it is killed, and on Linux `RLIMIT_AS` / `RLIMIT_CPU`
//! limits. This bounds runaway snippets; it is not a full sandbox.

use dojo_domain::tool::{
    entities::{ToolCall, ToolKind},
    value_objects::{ToolError, ToolResult},
};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

pub const NO_OUTPUT: &str = "No output (Did you forget to print?)";

const PRELUDE: &str = "import math\n";

pub struct PythonCalculator {
    interpreter: Option<PathBuf>,
    interpreter_name: String,
    timeout: Duration,
    memory_limit_mb: u64,
}

impl PythonCalculator {
    /// Resolve `interpreter` on `PATH`.
    ///
    /// A missing interpreter is not fatal: every call then fails with a
    /// calculation error naming it.
    pub fn new(interpreter: &str) -> Self {
        let resolved = which::which(interpreter).ok();
        if resolved.is_none() {
            warn!(interpreter = %interpreter, "Calculator interpreter not found on PATH");
        }
        Self {
            interpreter: resolved,
            interpreter_name: interpreter.to_string(),
            timeout: Duration::from_secs(10),
            memory_limit_mb: 256,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_memory_limit_mb(mut self, mb: u64) -> Self {
        self.memory_limit_mb = mb;
        self
    }

    pub fn is_available(&self) -> bool {
        self.interpreter.is_some()
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let name = ToolKind::Calculate.name();
        let start = Instant::now();

        let code = match call.require_string("code") {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(name, ToolError::invalid_argument(e)),
        };

        let result = match self.run(code).await {
            Ok(output) => ToolResult::success(name, output),
            Err(e) => ToolResult::failure(name, e),
        };
        result.with_duration(start.elapsed().as_millis() as u64)
    }

    async fn run(&self, code: &str) -> Result<String, ToolError> {
        let Some(interpreter) = &self.interpreter else {
            return Err(calc_error(format!(
                "interpreter '{}' not found",
                self.interpreter_name
            )));
        };

        let mut cmd = Command::new(interpreter);
        cmd.arg("-I")
            .arg("-c")
            .arg(format!("{}{}", PRELUDE, code))
            .env_clear()
            .env("LC_ALL", "C.UTF-8")
            .current_dir(std::env::temp_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(target_os = "linux")]
        {
            let memory_bytes = self.memory_limit_mb.saturating_mul(1024 * 1024);
            let cpu_seconds = self.timeout.as_secs().saturating_add(1);
            // SAFETY: the hook only calls setrlimit, which is async-signal-safe
            unsafe {
                cmd.pre_exec(move || {
                    let memory = rlimit(memory_bytes);
                    let cpu = rlimit(cpu_seconds);
                    if libc::setrlimit(libc::RLIMIT_AS, &memory) != 0
                        || libc::setrlimit(libc::RLIMIT_CPU, &cpu) != 0
                    {
                        return Err(std::io::Error::last_os_error());
                    }
                    Ok(())
                });
            }
        }

        debug!(chars = code.chars().count(), "Running calculator snippet");

        let child = cmd
            .spawn()
            .map_err(|e| calc_error(format!("failed to start interpreter: {}", e)))?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(calc_error(e.to_string())),
            Err(_) => {
                return Err(ToolError::timeout(format!(
                    "calculation ({}s)",
                    self.timeout.as_secs()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .map(str::trim)
                .map(String::from)
                .unwrap_or_else(|| format!("interpreter exited with {}", output.status));
            return Err(calc_error(reason));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let trimmed = stdout.trim();
        Ok(if trimmed.is_empty() {
            NO_OUTPUT.to_string()
        } else {
            trimmed.to_string()
        })
    }
}

fn calc_error(reason: impl std::fmt::Display) -> ToolError {
    ToolError::execution_failed(format!("Calculation Error: {}", reason))
}

#[cfg(target_os = "linux")]
fn rlimit(value: u64) -> libc::rlimit {
    libc::rlimit {
        rlim_cur: value as libc::rlim_t,
        rlim_max: value as libc::rlim_t,
    }
}
