//! HTTP features

use reqwest::{Client, ClientBuilder, redirect::Policy};

use crate::{Error, config::HttpConfig, consts};

/// Returns a HTTP client builder with the configured timeout and user agent.
///
/// Redirects are followed since the conjugation site signals unknown verbs by redirecting to a
/// not-found page.
#[must_use]
pub fn builder(config: &HttpConfig) -> ClientBuilder {
    ClientBuilder::new()
        .redirect(Policy::limited(consts::HTTP_MAX_REDIRECTS))
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .gzip(true)
}

/// Builds the HTTP client shared by every fetcher.
///
/// # Errors
///
/// Returns [`Error::BuildHttpClient`] if the TLS backend fails to initialize.
pub fn build_client(config: &HttpConfig) -> Result<Client, Error> {
    builder(config).build().map_err(Error::BuildHttpClient)
}
