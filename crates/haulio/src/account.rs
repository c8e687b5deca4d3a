// SPDX-FileCopyrightText: 2026 Haulio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account subcommands: login, register, logout, whoami, reset-password.

use std::io::{IsTerminal, Write};

use colored::Colorize;
use haulio_core::error::HaulioError;
use haulio_session::{PasswordRecovery, Registration, SessionManager};
use secrecy::SecretString;
use serde::Serialize;

/// Structured output for `whoami --json`.
#[derive(Debug, Serialize)]
struct WhoamiResponse {
    signed_in: bool,
    user_id: Option<String>,
    email: Option<String>,
    full_name: Option<String>,
    expires_at: Option<i64>,
}

fn prompt(label: &str) -> Result<String, HaulioError> {
    print!("{label}: ");
    std::io::stdout().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| HaulioError::Internal(format!("failed to read input: {e}")))?;
    Ok(line.trim().to_string())
}

fn prompt_secret(label: &str) -> Result<SecretString, HaulioError> {
    rpassword::prompt_password(format!("{label}: "))
        .map(SecretString::from)
        .map_err(|e| HaulioError::Internal(format!("failed to read input: {e}")))
}

fn ok_line(message: &str) {
    if std::io::stdout().is_terminal() {
        println!("{} {message}", "ok".green().bold());
    } else {
        println!("ok {message}");
    }
}

pub async fn run_login(
    manager: &SessionManager,
    email: Option<String>,
) -> Result<(), HaulioError> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let password = prompt_secret("Password")?;

    let session = manager.sign_in(&email, &password).await?;
    ok_line(&format!("signed in as {}", session.user_id));
    Ok(())
}

pub async fn run_register(manager: &SessionManager) -> Result<(), HaulioError> {
    let full_name = prompt("Full name")?;
    let email = prompt("Email")?;
    let password = prompt_secret("Password (at least 8 characters)")?;
    let security_question = prompt("Security question")?;
    let security_answer = prompt_secret("Security answer")?;

    let session = manager
        .sign_up(Registration {
            email,
            password,
            full_name,
            security_question,
            security_answer,
        })
        .await?;
    ok_line(&format!("account created, signed in as {}", session.user_id));
    Ok(())
}

pub async fn run_logout(manager: &SessionManager) {
    // Adopt whatever is persisted so the remote revocation has a token.
    manager.restore_session().await;
    manager.sign_out().await;
    ok_line("signed out");
}

pub async fn run_whoami(manager: &SessionManager, json: bool) -> Result<(), HaulioError> {
    let session = manager.restore_session().await;

    let response = match &session {
        Some(session) => {
            let profile = manager.profile(&session.user_id).await.ok();
            WhoamiResponse {
                signed_in: true,
                user_id: Some(session.user_id.clone()),
                email: session.email.clone(),
                full_name: profile.and_then(|p| p.full_name),
                expires_at: Some(session.expires_at),
            }
        }
        None => WhoamiResponse {
            signed_in: false,
            user_id: None,
            email: None,
            full_name: None,
            expires_at: None,
        },
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
        return Ok(());
    }

    match response.signed_in {
        true => {
            println!(
                "signed in as {} ({})",
                response.full_name.as_deref().unwrap_or("unnamed"),
                response.email.as_deref().unwrap_or("no email"),
            );
        }
        false => println!("not signed in -- run `haulio login`"),
    }
    Ok(())
}

pub async fn run_reset_password(
    recovery: &PasswordRecovery,
    email: Option<String>,
) -> Result<(), HaulioError> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };

    let question = recovery.security_question(&email).await?;
    println!("{question}");
    let answer = prompt_secret("Answer")?;

    if !recovery.verify_answer(&email, &answer).await? {
        return Err(HaulioError::Auth(
            haulio_core::error::AuthFailure::InvalidCredentials,
        ));
    }

    let new_password = prompt_secret("New password (at least 8 characters)")?;
    recovery.reset_password(&email, &answer, &new_password).await?;
    ok_line("password updated, sign in with the new password");
    Ok(())
}
