#![forbid(unsafe_code)]

use super::TrackerError;
use serde_json::Value;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

pub(crate) const GRAPHQL_TIMEOUT: Duration = Duration::from_secs(30);
pub(crate) const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// A GraphQL variable as passed to `gh api graphql`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum GraphqlVar {
    /// `-f key=value`, always a string.
    Raw(String),
    /// `-F key=value`, converted by `gh` to a JSON number.
    Int(i64),
}

/// Thin wrapper around the `gh` binary.
#[derive(Clone, Debug)]
pub(crate) struct GhCli {
    bin: String,
    token: Option<String>,
}

impl GhCli {
    pub(crate) fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            token: None,
        }
    }

    /// Children run with `GH_TOKEN` set to `token`.
    pub(crate) fn with_token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// Runs `gh <args>` and returns stdout. A non-zero exit is `CommandFailed`
    /// carrying stderr.
    pub(crate) fn run(&self, args: &[String], timeout: Duration) -> Result<String, TrackerError> {
        let mut command = Command::new(&self.bin);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(token) = &self.token {
            command.env("GH_TOKEN", token);
        }
        debug!(bin = %self.bin, subcommand = args.first().map(String::as_str).unwrap_or(""), "running gh");

        let child = command.spawn().map_err(|source| TrackerError::Spawn {
            program: self.bin.clone(),
            source,
        })?;
        let output = wait_with_timeout(&self.bin, child, timeout)?;
        if !output.success {
            return Err(TrackerError::CommandFailed(output.stderr.trim().to_string()));
        }
        Ok(output.stdout)
    }

    /// Runs a GraphQL document and returns the parsed response.
    pub(crate) fn graphql(
        &self,
        query: &str,
        variables: &[(&str, GraphqlVar)],
    ) -> Result<Value, TrackerError> {
        let args = graphql_args(query, variables);
        let stdout = self.run(&args, GRAPHQL_TIMEOUT)?;
        let response: Value =
            serde_json::from_str(&stdout).map_err(|err| TrackerError::Parse(err.to_string()))?;
        if let Some(errors) = response.get("errors").and_then(Value::as_array)
            && !errors.is_empty()
        {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|err| err.get("message").and_then(Value::as_str))
                .collect();
            return Err(TrackerError::CommandFailed(messages.join("; ")));
        }
        Ok(response)
    }
}

pub(crate) fn graphql_args(query: &str, variables: &[(&str, GraphqlVar)]) -> Vec<String> {
    let mut args = vec![
        "api".to_string(),
        "graphql".to_string(),
        "-f".to_string(),
        format!("query={query}"),
    ];
    for (key, value) in variables {
        match value {
            GraphqlVar::Raw(text) => {
                args.push("-f".to_string());
                args.push(format!("{key}={text}"));
            }
            GraphqlVar::Int(number) => {
                args.push("-F".to_string());
                args.push(format!("{key}={number}"));
            }
        }
    }
    args
}

/// Reads the value at a JSON pointer, naming the path when it is missing.
pub(crate) fn pointer<'a>(value: &'a Value, path: &str) -> Result<&'a Value, TrackerError> {
    value
        .pointer(path)
        .filter(|found| !found.is_null())
        .ok_or_else(|| TrackerError::Parse(format!("missing {path} in response")))
}

struct Output {
    success: bool,
    stdout: String,
    stderr: String,
}

/// Polls the child until it exits or `timeout` elapses, then kills it. Pipes
/// are drained on helper threads so a chatty child cannot block on a full pipe.
fn wait_with_timeout(
    program: &str,
    mut child: Child,
    timeout: Duration,
) -> Result<Output, TrackerError> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TrackerError::Timeout(timeout));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(err) => {
                let _ = child.kill();
                return Err(TrackerError::Spawn {
                    program: program.to_string(),
                    source: err,
                });
            }
        }
    };

    let collect = |handle: Option<thread::JoinHandle<String>>| {
        handle
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    };
    Ok(Output {
        success: status.success(),
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn drain(mut pipe: impl Read + Send + 'static) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    })
}
