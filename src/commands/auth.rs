use agenda_core::Credentials;
use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::Context;
use crate::utils::tui::with_spinner;

fn prompt_credentials(email: Option<String>) -> Result<Credentials> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = rpassword::prompt_password("Password: ")?;
    Ok(Credentials { email, password })
}

pub async fn login(ctx: &Context, email: Option<String>) -> Result<()> {
    let credentials = prompt_credentials(email)?;

    let login = with_spinner("Logging in...", ctx.client.login(&credentials)).await?;

    let who = login
        .user
        .map(|u| u.email)
        .unwrap_or(credentials.email);
    println!("{} Logged in as {}", "✓".green(), who.bold());
    Ok(())
}

pub async fn signup(ctx: &Context, email: Option<String>) -> Result<()> {
    let credentials = prompt_credentials(email)?;

    let msg = with_spinner("Creating account...", ctx.client.signup(&credentials)).await?;

    println!("{} {}", "✓".green(), msg);
    println!("\nRun `agenda login` to start a session.");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let session = ctx.client.session();
    if !session.is_authenticated() {
        println!("{}", "Not logged in".dimmed());
        return Ok(());
    }
    session.logout();
    println!("{} Logged out", "✓".green());
    Ok(())
}
