//! Utility functions for API operations

use crate::error::{Result, VenueXError};
use crate::normalizer::Normalizer;
use reqwest::Response;
use std::collections::HashMap;
use url::Url;

/// Join a base URL and a request path with exactly one `/` between them
pub fn join_url(base_url: &str, path: &str) -> String {
    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base_url.trim_end_matches('/'), path),
        (false, false) if !path.is_empty() => format!("{}/{}", base_url, path),
        _ => format!("{}{}", base_url, path),
    }
}

/// Merge `params` into the URL's query string.
///
/// Existing pairs with a name in `params` are replaced; all other pairs keep
/// their order. New pairs are appended in name order so the resulting URL is
/// stable.
pub fn merge_query_params(url: &mut Url, params: &HashMap<String, String>) {
    if params.is_empty() {
        return;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !params.contains_key(name.as_ref()))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut added: Vec<(&String, &String)> = params.iter().collect();
    added.sort();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (name, value) in &kept {
        pairs.append_pair(name, value);
    }
    for (name, value) in added {
        pairs.append_pair(name, value);
    }
}

/// Body of a successful response, or the classified venue error
pub fn venue_result(status: u16, body: &[u8], normalizer: &dyn Normalizer) -> Result<Vec<u8>> {
    if (200..300).contains(&status) {
        Ok(body.to_vec())
    } else {
        Err(VenueXError::Venue(normalizer.normalize_error(status, body)))
    }
}

/// Read a venue response body, turning non-success statuses into a
/// classified [`VenueXError::Venue`]
pub async fn read_venue_response(
    response: Response,
    normalizer: &dyn Normalizer,
) -> Result<Vec<u8>> {
    let status = response.status().as_u16();
    let body = response.bytes().await?;
    venue_result(status, &body, normalizer)
}
