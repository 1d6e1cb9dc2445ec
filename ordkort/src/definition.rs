//! Definition lookup in an online Norwegian dictionary.
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::DefinitionConfig;

/// Online dictionaries that definitions can be scraped from.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Bokmålsordboka and Nynorskordboka at ordbokene.no.
    #[default]
    Ordbokene,
    /// Det Norske Akademis ordbok at naob.no.
    Naob,
}

/// Errors that can occur during execution.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("request error: {0}")]
    Request(#[source] reqwest::Error),
    #[error("unable to read contents: {0}")]
    ReadContents(#[source] reqwest::Error),
}

/// Fetches the first definition of a word from the configured [`Source`].
pub struct DefinitionFetcher {
    client: reqwest::Client,
    source: Source,
    base_url: String,
    selector: Selector,
}

impl Source {
    /// Returns the URL that the word is appended to.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Source::Ordbokene => "https://ordbokene.no/nob/bm,nn/",
            Source::Naob => "https://naob.no/ord/",
        }
    }

    /// Returns the CSS selector of the element holding the definition.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Source::Ordbokene => "div.definition",
            Source::Naob => "span.dictionary-class",
        }
    }

    /// Extracts the definition text from the matched element.
    fn extract(self, elem: ElementRef<'_>) -> String {
        match self {
            Source::Ordbokene => elem
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Source::Naob => elem.text().collect::<String>().trim().to_string(),
        }
    }
}

impl DefinitionFetcher {
    /// Creates a fetcher for the configured source, using the given HTTP client.
    #[must_use]
    pub fn new(client: reqwest::Client, config: &DefinitionConfig) -> DefinitionFetcher {
        let source = config.source;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| source.base_url().to_string());

        DefinitionFetcher::with_base_url(client, source, base_url)
    }

    /// Creates a fetcher for `source` that requests pages below `base_url`.
    #[must_use]
    pub fn with_base_url(
        client: reqwest::Client,
        source: Source,
        base_url: impl Into<String>,
    ) -> DefinitionFetcher {
        let mut base_url: String = base_url.into();

        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        DefinitionFetcher {
            client,
            source,
            base_url,
            selector: Selector::parse(source.selector()).expect("definition selector"),
        }
    }

    /// Fetches the definition of `word`.
    ///
    /// Returns `Ok(None)` if the page doesn't exist or holds no definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if the request fails and [`Error::ReadContents`] if the body
    /// can't be read.
    pub async fn definition(&self, word: &str) -> Result<Option<String>, Error> {
        let url = format!("{}{word}", self.base_url);

        debug!(%word, %url, "requesting definition");

        let response = self.client.get(url).send().await.map_err(Error::Request)?;
        let status = response.status();

        if status != StatusCode::OK {
            warn!(%word, %status, "definition not found");

            return Ok(None);
        }

        let body = response.text().await.map_err(Error::ReadContents)?;
        let definition = self.parse(&body);

        if definition.is_none() {
            warn!(%word, "no definition block found");
        }

        Ok(definition)
    }

    /// Extracts the first definition from a dictionary page.
    #[must_use]
    pub fn parse(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .next()
            .map(|elem| self.source.extract(elem))
            .filter(|text| !text.is_empty())
    }
}
