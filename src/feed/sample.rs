use super::model::Article;
use rand::Rng;
use rand::seq::SliceRandom;
use rss::{Channel, Item};

pub const SAMPLE_SIZE: usize = 5;

/// Items that carry both a title and a link.
pub fn candidates(channel: &Channel) -> Vec<Item> {
    channel
        .items()
        .iter()
        .filter(|it| it.title().is_some_and(|t| !t.is_empty()))
        .filter(|it| it.link().is_some_and(|l| !l.is_empty()))
        .cloned()
        .collect()
}

/// Shuffle `items` and keep the first `SAMPLE_SIZE` that qualify as articles.
pub fn sample_articles<R: Rng + ?Sized>(mut items: Vec<Item>, rng: &mut R) -> Vec<Article> {
    items.shuffle(rng);

    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    for item in &items {
        match Article::from_item(item) {
            Some(article) => sample.push(article),
            None => continue,
        }
        if sample.len() == SAMPLE_SIZE {
            break;
        }
    }
    sample
}

/// Parse raw feed bytes and sample them. A body that does not parse is
/// treated like a feed with no entries.
pub fn sample_from_bytes<R: Rng + ?Sized>(bytes: &[u8], rng: &mut R) -> Vec<Article> {
    match Channel::read_from(bytes) {
        Ok(channel) => sample_articles(candidates(&channel), rng),
        Err(err) => {
            tracing::warn!("failed to parse feed: {}", err);
            Vec::new()
        }
    }
}
