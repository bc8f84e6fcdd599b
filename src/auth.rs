use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::config;
use crate::error::{InboxError, Result};

const TOKEN_ENV: &str = "GITHUB_TOKEN";
const KEYCHAIN_SERVICE: &str = "gh-inbox";
const KEYCHAIN_ACCOUNT: &str = "github";

fn non_empty(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        non_empty(&String::from_utf8_lossy(&output.stdout))
    } else {
        None
    }
}

/// Stored token path: ~/.config/gh-inbox/token
fn token_path() -> Option<PathBuf> {
    Some(config::config_dir()?.join("token"))
}

fn load_token_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    non_empty(&content)
}

/// Write the token readable by the owner only.
fn save_token_file(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n", token))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

fn load_keychain_token() -> Option<String> {
    if !cfg!(target_os = "macos") {
        return None;
    }
    let output = std::process::Command::new("security")
        .args([
            "find-generic-password",
            "-s",
            KEYCHAIN_SERVICE,
            "-a",
            KEYCHAIN_ACCOUNT,
            "-w",
        ])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    non_empty(&String::from_utf8_lossy(&output.stdout))
}

fn save_keychain_token(token: &str) -> bool {
    if !cfg!(target_os = "macos") {
        return false;
    }
    std::process::Command::new("security")
        .args([
            "add-generic-password",
            "-s",
            KEYCHAIN_SERVICE,
            "-a",
            KEYCHAIN_ACCOUNT,
            "-w",
            token,
            "-U",
        ])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

/// Read a line from the terminal without echoing it. `None` when the user
/// aborts with Esc or Ctrl-C.
fn read_hidden_line() -> io::Result<Option<String>> {
    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(buf)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char(c) => buf.push(c),
            _ => {}
        }
    }
}

fn prompt_token() -> Result<String> {
    let required = || InboxError::Auth(format!("{} is required", TOKEN_ENV));

    let mut stderr = io::stderr();
    write!(stderr, "Enter {}: ", TOKEN_ENV)?;
    stderr.flush()?;

    enable_raw_mode().map_err(|_| required())?;
    let input = read_hidden_line();
    disable_raw_mode().ok();
    writeln!(stderr)?;

    match input {
        Ok(Some(line)) => non_empty(&line).ok_or_else(required),
        Ok(None) | Err(_) => Err(required()),
    }
}

fn persist_prompted_token(token: &str) {
    if save_keychain_token(token) {
        return;
    }
    let Some(path) = token_path() else {
        return;
    };
    if let Err(e) = save_token_file(&path, token) {
        eprintln!("Warning: could not save token: {}", e);
    }
}

/// Resolve a GitHub token, trying multiple sources:
/// 1. `GITHUB_TOKEN` env var
/// 2. macOS keychain
/// 3. Stored token from ~/.config/gh-inbox/token
/// 4. CLI command (from config)
/// 5. Interactive prompt
pub fn resolve_token(token_command: Option<&str>) -> Result<String> {
    if let Some(token) = std::env::var(TOKEN_ENV).ok().as_deref().and_then(non_empty) {
        return Ok(token);
    }

    if let Some(token) = load_keychain_token() {
        return Ok(token);
    }

    let path = token_path();
    if let Some(token) = path.as_deref().and_then(load_token_file) {
        return Ok(token);
    }

    if let Some(token) = token_command.and_then(try_cli_token) {
        if let Some(path) = &path {
            if let Err(e) = save_token_file(path, &token) {
                tracing::warn!(error = %e, "could not save token");
            }
        }
        return Ok(token);
    }

    let token = prompt_token()?;
    persist_prompted_token(&token);
    Ok(token)
}
