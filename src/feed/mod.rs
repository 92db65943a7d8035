pub mod fetch;
mod model;
mod sample;

use crate::config::AppConfig;
use crate::factcheck::{self, ChatBackend};
use crate::open_url::open_url;
use crate::session::Session;
use crate::ui::{self, Flow, MenuChoice, menu_loop};
use crate::util::sanitize::sanitize_for_terminal;
use anyhow::Result;
use reqwest::Client;

pub use model::Article;

fn breaking_news_note() -> String {
    format!(
        "Note: developing stories often describe events the model has never seen, \
so fact checks of very recent headlines tend to be poor ({}).",
        factcheck::METHOD_REFERENCE
    )
}

/// Fetch a fresh sample and let the user act on one article.
pub async fn run<B: ChatBackend>(
    cfg: &AppConfig,
    session: &mut Session,
    backend: &B,
    client: &Client,
) -> Result<Flow> {
    let header = cfg.header.as_deref();
    loop {
        ui::print_header(header);
        println!("Fetching recent articles...");
        let articles = {
            let mut rng = rand::thread_rng();
            fetch::fetch_sample(client, &cfg.feed_url, &mut rng).await
        };

        if articles.is_empty() {
            ui::warn("No articles found. Please try again in a few moments.");
            ui::pause()?;
            return Ok(Flow::Continue);
        }

        let mut labels: Vec<String> = articles.iter().map(article_label).collect();
        labels.push("Fetch different articles".into());
        let prompt = format!(
            "Recent articles (select one to fact check or open)\n{}",
            breaking_news_note()
        );

        loop {
            match menu_loop(&prompt, &labels, None, header)? {
                MenuChoice::Back => return Ok(Flow::Continue),
                MenuChoice::Quit => return Ok(Flow::Quit),
                MenuChoice::Index(i) if i == articles.len() => break,
                MenuChoice::Index(i) => {
                    if let Some(article) = articles.get(i) {
                        if article_menu(cfg, session, backend, article).await? == Flow::Quit {
                            return Ok(Flow::Quit);
                        }
                    }
                }
            }
        }
    }
}

async fn article_menu<B: ChatBackend>(
    cfg: &AppConfig,
    session: &mut Session,
    backend: &B,
    article: &Article,
) -> Result<Flow> {
    let prompt = format!(
        "{}\n{} | {}\n{}",
        sanitize_for_terminal(&article.title),
        sanitize_for_terminal(&article.source_title),
        sanitize_for_terminal(&article.published),
        sanitize_for_terminal(&article.link),
    );
    let items = ["Fact check this headline", "Open in browser"];
    loop {
        match menu_loop(&prompt, &items, Some(0), cfg.header.as_deref())? {
            MenuChoice::Back => return Ok(Flow::Continue),
            MenuChoice::Quit => return Ok(Flow::Quit),
            MenuChoice::Index(0) => {
                session.headline = article.title.clone();
                factcheck::check_headline(session, backend).await?;
            }
            MenuChoice::Index(_) => {
                if let Err(err) = open_url(&article.link, cfg.open_command.as_deref()) {
                    ui::error(&format!("{:#}", err));
                    ui::pause()?;
                }
            }
        }
    }
}

/// Title, source and date on one line, link indented below.
fn article_label(article: &Article) -> String {
    format!(
        "{} ({}, {})\n     {}",
        sanitize_for_terminal(&article.title),
        sanitize_for_terminal(&article.source_title),
        sanitize_for_terminal(&article.published),
        sanitize_for_terminal(&article.link),
    )
}
