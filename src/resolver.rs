use log::debug;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::Client;
use url::Url;

use crate::errors::FetchError;

// @module: Redirect resolution for the watch page

/// Final page reached after following redirects
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    /// Canonical URL
    pub url: Url,
    /// Status of the terminal response
    pub status: u16,
    /// Response body, possibly empty
    pub body: String,
}

/// Follow redirects from `url`, issuing at most `max_hops` requests
///
/// A 2xx ends the chain. Any other non-redirect status, or a redirect
/// without a `Location` header, ends it as well and the page is returned
/// as-is. Running out of hops while still being redirected is an error.
pub async fn resolve(client: &Client, url: &str, max_hops: u32) -> Result<ResolvedPage, FetchError> {
    resolve_with_session(client, url, max_hops, &HeaderMap::new()).await
}

/// Like [`resolve`], attaching `session_headers` to every request whose
/// host and port match the starting URL
pub async fn resolve_with_session(
    client: &Client,
    url: &str,
    max_hops: u32,
    session_headers: &HeaderMap,
) -> Result<ResolvedPage, FetchError> {
    let start = Url::parse(url)?;
    let mut current = start.clone();
    let mut remaining = max_hops;

    loop {
        if remaining == 0 {
            return Err(FetchError::TooManyRedirects { max_hops });
        }
        remaining -= 1;

        let mut request = client.get(current.clone());
        if same_host(&start, &current) {
            request = request.headers(session_headers.clone());
        } else if !session_headers.is_empty() {
            debug!("Dropping session headers for {}", current);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            if let Some(location) = location {
                let next = current.join(&location)?;
                debug!("Redirected to: {}", next);
                current = next;
                continue;
            }
            debug!("Redirect without Location header at {}", current);
        }

        let body = response.text().await?;
        debug!("Response status: {} for {}", status.as_u16(), current);

        return Ok(ResolvedPage {
            url: current,
            status: status.as_u16(),
            body,
        });
    }
}

// Default ports compare equal across schemes, so http -> https keeps the session
fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}
