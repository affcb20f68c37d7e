use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, instrument};

use crate::config::TriggerConfig;

/// Environment variable carrying the generation username to the child process.
pub const USERNAME_ENV: &str = "GENERATION_USERNAME";
/// Environment variable carrying the generation password to the child process.
pub const PASSWORD_ENV: &str = "GENERATION_PASSWORD";

const OUTPUT_TAIL_CHARS: usize = 2000;

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Missing generation credentials: {0}")]
    MissingCredentials(String),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' failed with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// The external image generation tool.
#[derive(Debug, Clone)]
pub struct GenerationScript {
    program: String,
    args: Vec<String>,
    username: Option<String>,
    password: Option<String>,
}

impl GenerationScript {
    pub fn from_config(config: &TriggerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), ScriptError> {
        let username = self.username.as_deref().filter(|s| !s.is_empty());
        let password = self.password.as_deref().filter(|s| !s.is_empty());

        match (username, password) {
            (Some(u), Some(p)) => Ok((u, p)),
            (u, p) => {
                let mut missing = Vec::new();
                if u.is_none() {
                    missing.push("username");
                }
                if p.is_none() {
                    missing.push("password");
                }
                Err(ScriptError::MissingCredentials(missing.join(", ")))
            }
        }
    }

    /// Run the tool to completion, returning the tail of its stdout.
    ///
    /// Credentials are checked before anything is spawned.
    #[instrument(skip(self), fields(program = %self.program))]
    pub async fn run(&self) -> Result<String, ScriptError> {
        let (username, password) = self.credentials()?;

        let output = Command::new(&self.program)
            .args(&self.args)
            .env(USERNAME_ENV, username)
            .env(PASSWORD_ENV, password)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ScriptError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ScriptError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: tail(&output.stderr),
            });
        }

        info!("Generation script finished");
        Ok(tail(&output.stdout))
    }
}

/// Last [`OUTPUT_TAIL_CHARS`] characters of a process stream, trimmed.
fn tail(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    let skip = text.chars().count().saturating_sub(OUTPUT_TAIL_CHARS);
    text.chars().skip(skip).collect()
}
