use agenda_core::config::AgendaConfig;
use agenda_core::session::FileTokenStore;
use anyhow::Result;
use owo_colors::OwoColorize;

use super::Context;

pub fn run(ctx: &Context, backend_url: Option<String>) -> Result<()> {
    let config_path = AgendaConfig::config_path()?;

    if let Some(url) = backend_url {
        let config = AgendaConfig {
            backend_url: url,
            ..ctx.config.clone()
        };
        config.save_to(&config_path)?;
        println!("{} Backend set to {}", "✓".green(), config.base_url());
        return Ok(());
    }

    let session_path = FileTokenStore::default_location()?.path().to_path_buf();
    let status = if ctx.client.session().is_authenticated() {
        "logged in".green().to_string()
    } else {
        "not logged in".dimmed().to_string()
    };

    println!("{}", "Paths".bold());
    println!("  Config:   {}", config_path.display());
    println!("  Session:  {} ({})", session_path.display(), status);
    println!();
    println!("{}", "Settings".bold());
    for line in ctx.config.to_toml()?.lines() {
        println!("  {}", line);
    }

    Ok(())
}
