//! Stored credentials and the foreground reauthentication loop.

use babel_reauth::{Notifier, ReauthState};
use colored::Colorize;

use super::describe_expiry;
use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::output::{field, heading, info, success};

/// Prints the session-invalid notice to stderr.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn session_invalid(&self, message: &str) {
        eprintln!("\n  {} {}\n", "⚠".yellow().bold(), message.yellow());
    }
}

/// Show a token without printing it whole.
fn mask(token: &str) -> String {
    let shown: String = token.chars().take(6).collect();
    if shown.len() < token.len() {
        format!("{}…", shown)
    } else {
        "…".to_string()
    }
}

pub async fn show(ctx: &Context) -> CliResult<()> {
    let creds = ctx.client.session().await?;

    heading("Session");
    field("Credentials", &ctx.credentials_path.display().to_string());
    field(
        "CSRF token",
        &creds
            .csrf_token
            .as_deref()
            .map(mask)
            .unwrap_or_else(|| "none".dimmed().to_string()),
    );
    match creds.access_exp {
        Some(exp) => field(
            "Access expires",
            &describe_expiry(exp, chrono::Utc::now().timestamp()),
        ),
        None => field("Access expires", &"not logged in".dimmed().to_string()),
    }
    field("Leeway", &format!("{}s", creds.leeway));
    Ok(())
}

/// Keep the session alive until Ctrl+C or until the server refuses.
pub async fn watch(ctx: &Context) -> CliResult<()> {
    let config = ctx.reauth_config();
    let reauth = ctx
        .client
        .reauth_loop(config.clone())
        .notifier(StderrNotifier)
        .build();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = tx.send(());
    })
    .map_err(|e| CliError::Command(format!("Failed to set Ctrl+C handler: {}", e)))?;

    let mut handle = reauth.spawn()?;
    info(&format!(
        "Keeping the session alive, checking every {}s (Ctrl+C to stop)",
        config.interval.as_secs()
    ));

    tokio::select! {
        _ = rx.recv() => {
            handle.shutdown();
            success("Stopped");
            Ok(())
        }
        _ = handle.wait() => {
            if reauth.state() == ReauthState::Stopped {
                Err(CliError::Reauth("session is no longer valid, log in again".to_string()))
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdefghijkl"), "abcdef…");
        assert_eq!(mask("short"), "…");
    }
}
