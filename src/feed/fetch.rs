use super::model::Article;
use super::sample::sample_from_bytes;
use anyhow::{Result, bail};
use futures_util::StreamExt;
use rand::Rng;
use reqwest::Client;
use std::time::Duration;

// 5 MB cap
const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;

pub fn feed_client() -> Result<Client> {
    Ok(Client::builder()
        .user_agent(concat!("headline-check/", env!("CARGO_PKG_VERSION")))
        .gzip(true)
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(20))
        .build()?)
}

/// Fetch the feed and draw a sample. Any fetch failure yields an empty sample.
pub async fn fetch_sample<R: Rng + ?Sized>(client: &Client, url: &str, rng: &mut R) -> Vec<Article> {
    match fetch_body(client, url).await {
        Ok(body) => {
            let sample = sample_from_bytes(&body, rng);
            tracing::info!(url, articles = sample.len(), "sampled feed");
            sample
        }
        Err(err) => {
            tracing::warn!(url, "failed to fetch feed: {:#}", err);
            Vec::new()
        }
    }
}

async fn fetch_body(client: &Client, url: &str) -> Result<Vec<u8>> {
    let resp = client.get(url).send().await?.error_for_status()?;

    let mut stream = resp.bytes_stream();
    let mut buf: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_FEED_BYTES {
            bail!("feed too large (>{} bytes)", MAX_FEED_BYTES);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf)
}
