use super::document::parse_entries;
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::RawEntry;
use encoding_rs::Encoding;
use tracing::info;
use url::Url;

/// Downloads the source document and extracts its entries.
///
/// Issues a single GET request, decodes the body with the configured
/// `source_encoding` and hands the text to [`parse_entries`]. Any `charset` in the
/// response's `Content-Type` header is ignored. There is no retry.
///
/// # Returns
///
/// - `Some(entries)` when the document has the configured root and at least one entry
/// - `None` when the root tag differs or no entry elements are present
///
/// # Errors
///
/// Returns `InvalidInput` if `source_encoding` is not a known encoding label,
/// `NetworkError` if the request fails or the server answers with a non-success
/// status, and `ParseError` if the body is not well-formed XML.
pub async fn fetch_entries(
    client: &reqwest::Client,
    url: &Url,
    config: &ResolvedConfig,
) -> AppResult<Option<Vec<RawEntry>>> {
    let encoding = lookup_encoding(&config.source_encoding)?;
    info!(url = %url, encoding = encoding.name(), "Fetching country list");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| AppError::NetworkError(format!("Failed to fetch {url}: {e}")))?;

    let status = response.status();
    let bytes = response
        .error_for_status()
        .map_err(|e| AppError::NetworkError(format!("HTTP {}: {e}", status.as_u16())))?
        .bytes()
        .await?;

    info!(bytes = bytes.len(), "Country list downloaded");
    let body = decode_body(&bytes, encoding);
    parse_entries(&body, config)
}

/// Resolves an encoding label such as `utf-8` or `iso-8859-1`.
fn lookup_encoding(label: &str) -> AppResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown source encoding '{label}'")))
}

/// Decodes the body with `encoding`. A byte order mark for that encoding is dropped.
fn decode_body(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _) = encoding.decode_with_bom_removal(bytes);
    text.into_owned()
}
