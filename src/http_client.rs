use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, COOKIE, REFERER};
use reqwest::{redirect, Client};
use std::time::Duration;

use crate::app_config::Config;

// @module: HTTP client construction

/// Headers every watch page request carries on top of the User-Agent
pub fn page_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.headers.accept_language)
            .context("Invalid Accept-Language header value")?,
    );
    Ok(headers)
}

/// Referer and Cookie. The resolver only sends them while the redirect
/// chain stays on the host it started from.
pub fn session_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.headers.referer).context("Invalid Referer header value")?,
    );
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&config.headers.cookie).context("Invalid Cookie header value")?,
    );
    Ok(headers)
}

/// Client for the watch page. Redirects are followed by the resolver
/// itself, so the transport must not follow them.
pub fn build_page_client(config: &Config) -> Result<Client> {
    if config.accept_invalid_certs {
        log::warn!("TLS certificate verification is disabled for the watch page request");
    }

    Client::builder()
        .user_agent(config.headers.user_agent.clone())
        .default_headers(page_headers(config)?)
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build page HTTP client")
}

/// Client for the legacy listing endpoints and caption downloads
pub fn build_api_client(config: &Config) -> Result<Client> {
    Client::builder()
        .user_agent(config.headers.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}
