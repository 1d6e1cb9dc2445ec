//! A client for fetching Norwegian verb conjugations from cooljugator.com.
//!
//! This module provides a high-level async interface for requesting a verb page and parsing it
//! into a [`ConjugationTable`].

use std::time::Duration;

use reqwest::{ClientBuilder, StatusCode, redirect::Policy};

use crate::{ConjugationTable, Error};

/// The base URL of the conjugation site.
const BASE_URL: &str = "https://cooljugator.com";
/// The relative path prefix for Norwegian verb pages.
const LANGUAGE_PATH: &str = "/no/";
/// The path suffix the site redirects to when a verb is unknown.
const NOT_FOUND_SUFFIX: &str = "/404";

/// An asynchronous client for cooljugator.com.
///
/// Unknown verbs are redirected to a `/404` page by the site, so unlike most scrapers this client
/// follows redirects and inspects the final URL.
#[derive(Debug)]
pub struct Client {
    /// The base URL of the site.
    base_url: String,
    /// The underlying [`reqwest::Client`] used for making HTTP requests.
    client: reqwest::Client,
}

impl Client {
    /// Constructs a new `Client` with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be built. For a non-panicking version, see
    /// [`Client::try_new`].
    #[must_use]
    pub fn new() -> Client {
        Client::try_new().expect("could not construct http client")
    }

    /// Attempts to construct a new `Client` with default settings.
    ///
    /// The client is configured with gzip support, a 15-second timeout and follows up to 5
    /// redirects.
    ///
    /// # Errors
    ///
    /// Returns an [`Error::BuildClient`] if the underlying `reqwest` client fails to build.
    pub fn try_new() -> Result<Client, Error> {
        let client = ClientBuilder::new()
            .gzip(true)
            .redirect(Policy::limited(5))
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(Error::BuildClient)?;

        Ok(Self::with_client(client))
    }

    /// Constructs a `Client` using a pre-configured `reqwest::Client`.
    ///
    /// The given client must follow redirects for unknown verbs to be detected reliably.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Client {
        let base_url = String::from(BASE_URL);

        Client { base_url, client }
    }

    /// Replaces the base URL, e.g. to point the client at a mirror.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Client {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the URL of the verb page for `word`.
    #[must_use]
    pub fn url_for(&self, word: &str) -> String {
        format!("{base_url}{LANGUAGE_PATH}{word}", base_url = self.base_url)
    }

    /// Fetches and parses the conjugation table for `word`.
    ///
    /// Returns `Ok(None)` when the site does not know the word, when the page has no conjugation
    /// section, or when no recognizable tense could be parsed from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Request`] if the HTTP request fails due to network issues, a timeout, or if
    /// the server returns a non-successful status code other than 404.
    pub async fn conjugate(&self, word: &str) -> Result<Option<ConjugationTable>, Error> {
        let url = self.url_for(word);
        let response = self.client.get(url).send().await.map_err(Error::Request)?;

        if response.status() == StatusCode::NOT_FOUND
            || response.url().path().ends_with(NOT_FOUND_SUFFIX)
        {
            #[cfg(feature = "log")]
            tracing::info!(%word, "verb not found");

            return Ok(None);
        }

        let response = response.error_for_status().map_err(Error::Request)?;
        let body = response.text().await.map_err(Error::Request)?;

        match ConjugationTable::from_html(&body) {
            Ok(table) if table.is_empty() => {
                #[cfg(feature = "log")]
                tracing::info!(%word, "no valid conjugations parsed");

                Ok(None)
            }
            Ok(table) => {
                #[cfg(feature = "log")]
                tracing::info!(%word, num_tenses = table.num_tenses(), "conjugations fetched");

                Ok(Some(table))
            }
            Err(Error::MissingElement(_selector)) => {
                #[cfg(feature = "log")]
                tracing::info!(%word, selector = _selector, "no conjugation section");

                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl Default for Client {
    /// Creates a default `Client` instance.
    ///
    /// This is equivalent to calling [`Client::new`].
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::Tense;

    fn client_for(server: &MockServer) -> Client {
        Client::new().with_base_url(server.uri())
    }

    #[test]
    fn test_with_client() {
        let http_client = reqwest::Client::new();
        let _ = Client::with_client(http_client);
    }

    #[test]
    fn test_url_for() {
        let client = Client::new().with_base_url("http://localhost:1234/");

        assert_eq!(client.url_for("snakke"), "http://localhost:1234/no/snakke");
    }

    #[tokio::test]
    async fn test_conjugate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/no/snakke"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../tests/fixtures/conjugations/snakke.html")),
            )
            .mount(&server)
            .await;

        let table = client_for(&server)
            .conjugate("snakke")
            .await
            .expect("request")
            .expect("conjugation table");

        assert_eq!(
            table
                .get("Bokmål")
                .and_then(|tenses| tenses.get(&Tense::Future))
                .map(String::as_str),
            Some("vil snakke (will speak)")
        );
    }

    #[tokio::test]
    async fn test_conjugate_redirected_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/no/bil"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("Location", format!("{}/404", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/404"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("../tests/fixtures/not_found.html")),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).conjugate("bil").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_conjugate_not_found_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).conjugate("hus").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_conjugate_without_section() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
            .mount(&server)
            .await;

        let result = client_for(&server).conjugate("hus").await;

        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_conjugate_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = client_for(&server).conjugate("hus").await;

        assert!(matches!(result, Err(Error::Request(_))));
    }
}
