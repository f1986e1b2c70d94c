use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use hayah_core::AuthApi;
use hayah_registration::rules::is_valid_email;
use hayah_registration::{countdown_ticker, LoginFlow, RecoveryFlow};

use super::AppContext;

pub async fn check_email(ctx: &AppContext, email: &str) -> Result<()> {
    let email = email.trim();
    let availability = ctx.backend.check_email(email).await?;

    if availability.exists {
        println!("✗ This email is already registered");
    } else if !is_valid_email(email) {
        println!("✗ Invalid email");
    } else {
        println!("✓ {} is available", email);
    }
    Ok(())
}

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    let flow = LoginFlow::new(ctx.backend.clone(), ctx.jar.clone());
    let session = flow.login(email, password).await?;
    ctx.save_session().await?;
    println!("✓ Logged in as {}", session.user.email);
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    let flow = LoginFlow::new(ctx.backend.clone(), ctx.jar.clone());
    flow.logout();
    ctx.save_session().await?;
    ctx.storage.cache_clear().await?;
    println!("✓ Logged out");
    Ok(())
}

/// Interactive recovery: code from the email, then the new password.
/// Typing `resend` asks for another code once the countdown is over.
pub async fn recover(ctx: &AppContext, email: &str) -> Result<()> {
    let settings = ctx.registration_config()?;
    let mut flow = RecoveryFlow::new(ctx.backend.clone(), settings.recovery_resend_seconds);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", flow.send_code(email).await?);
    let mut ticker = countdown_ticker(settings.recovery_resend_seconds);
    let mut seen = settings.recovery_resend_seconds;

    loop {
        println!("Enter the 6-digit code from your email (or 'resend'):");
        let Some(line) = lines.next_line().await? else {
            bail!("input closed before a code was entered");
        };

        // catch the flow's countdown up with the wall clock
        let remaining = *ticker.borrow();
        for _ in remaining..seen {
            flow.tick();
        }
        seen = remaining;

        if line.trim() == "resend" {
            match flow.resend().await {
                Ok(message) => {
                    println!("{}", message);
                    ticker = countdown_ticker(settings.recovery_resend_seconds);
                    seen = settings.recovery_resend_seconds;
                }
                Err(e) => println!("✗ {}", e),
            }
            continue;
        }

        match flow.verify_code(&line).await {
            Ok(()) => break,
            Err(e) => println!("✗ {}", e),
        }
    }

    loop {
        println!("New password:");
        let password = lines.next_line().await?.unwrap_or_default();
        println!("Repeat the new password:");
        let confirmation = lines.next_line().await?.unwrap_or_default();

        match flow.reset_password(&password, &confirmation).await {
            Ok(message) => {
                info!("Password recovery finished for {}", email);
                println!("✓ {}", message);
                return Ok(());
            }
            Err(e) => {
                println!("✗ {}", e);
                for detail in &e.details {
                    println!("  - {}", detail);
                }
                if password.is_empty() && confirmation.is_empty() {
                    bail!("no password entered");
                }
            }
        }
    }
}
