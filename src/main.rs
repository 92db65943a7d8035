mod config;
mod factcheck;
mod feed;
mod open_url;
mod session;
mod ui;
mod util;

use anyhow::{Context, Result};
use console::Term;
use factcheck::OpenAiClient;
use session::{CredentialState, Session};
use std::env;
use ui::{Flow, MenuChoice};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse a minimal CLI: optional --config <path>
    let mut args = env::args().skip(1);
    let mut config_override: Option<String> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if let Some(p) = args.next() {
                    config_override = Some(p);
                }
            }
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            _ => {}
        }
    }

    let cfg = config::load(config_override)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(cfg.log_level())
        .with_target(false)
        .init();

    let _ = Term::stdout().clear_screen();
    let mut session = Session::from_config(&cfg);
    let header = cfg.header.as_deref();

    ui::print_header(header);
    println!("Fact-checking widget");
    println!("Paste a news headline and a chat model will assess how plausible it is.");
    ui::note(&format!(
        "The method follows {}.",
        factcheck::METHOD_REFERENCE
    ));
    println!();
    let api_key = ui::prompt_secret("OpenAI API key")?;
    if api_key.trim().is_empty() {
        ui::warn("Please provide an OpenAI API key to proceed.");
        ui::note("Your key is not stored, and nothing is billed until you fact check a headline.");
        return Ok(());
    }

    let backend = OpenAiClient::new(&cfg.api_base, api_key.trim())
        .with_context(|| format!("failed to set up client for {}", cfg.api_base))?;
    println!("Validating key...");
    session.validate_credential(&backend).await;
    if let CredentialState::Invalid(detail) = session.credential() {
        ui::warn("Whoops! It looks like there was a problem.");
        ui::error(&format!("Invalid API key: {}", detail));
        ui::note("Restart the program to enter a new key.");
        return ui::pause();
    }
    ui::success("API key validated.");

    let feed_client = feed::fetch::feed_client()?;

    loop {
        let temperature_label = if session.model().supports_temperature {
            format!("Set temperature (current: {:.2})", session.temperature())
        } else {
            format!("Set temperature (not used by {})", session.model().label)
        };
        let items = [
            "Fetch recent articles".to_string(),
            "Fact check a headline".to_string(),
            format!("Select model (current: {})", session.model().label),
            temperature_label,
            "Quit".to_string(),
        ];
        let flow = match ui::menu_loop("Main Menu (q = quit)", &items, Some(1), header)? {
            MenuChoice::Back | MenuChoice::Quit | MenuChoice::Index(4) => Flow::Quit,
            MenuChoice::Index(0) => feed::run(&cfg, &mut session, &backend, &feed_client).await?,
            MenuChoice::Index(1) => {
                factcheck::run(&mut session, &backend, header).await?;
                Flow::Continue
            }
            MenuChoice::Index(2) => select_model(&mut session, header)?,
            MenuChoice::Index(3) => set_temperature(&mut session, header)?,
            MenuChoice::Index(_) => Flow::Continue,
        };
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}

fn select_model(session: &mut Session, header: Option<&str>) -> Result<Flow> {
    let labels: Vec<String> = session
        .catalog()
        .models()
        .iter()
        .map(|m| m.menu_label())
        .collect();
    let current = session.catalog().position(session.model());
    match ui::menu_loop("Choose a model for fact-checking", &labels, current, header)? {
        MenuChoice::Quit => Ok(Flow::Quit),
        MenuChoice::Back => Ok(Flow::Continue),
        MenuChoice::Index(i) => {
            if let Some(model) = session.select_model(i) {
                tracing::info!(model = %model.id, "model selected");
            }
            Ok(Flow::Continue)
        }
    }
}

fn set_temperature(session: &mut Session, header: Option<&str>) -> Result<Flow> {
    ui::print_header(header);
    println!("Temperature controls how random the model's answer is.");
    if !session.model().supports_temperature {
        ui::note(&format!(
            "{} does not accept a temperature; the value is kept for other models.",
            session.model().label
        ));
    }
    let value = ui::prompt_temperature(session.temperature())?;
    if let Err(err) = session.set_temperature(value) {
        ui::error(&err.to_string());
        ui::pause()?;
    }
    Ok(Flow::Continue)
}

fn print_help() {
    println!("headline-check");
    println!("Usage: headline-check [--config <path>]");
    println!("  --config <path>   Path to a config.toml (feed, API base, models)");
}
