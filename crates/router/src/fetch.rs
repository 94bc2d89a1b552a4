use anyhow::{Error, anyhow};
use dom::Document;
use futures::future::LocalBoxFuture;
use url::Url;

/// Network seam: fetches a URL's full response body as text.
///
/// The production implementation is [`HttpTransport`]; tests substitute a
/// canned in-memory transport.
pub trait Transport {
    /// Fetch the full response body at `url` as text.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response status is not
    /// a success.
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'_, Result<String, Error>>;
}

/// [`Transport`] backed by `reqwest`.
pub struct HttpTransport;

impl Transport for HttpTransport {
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'_, Result<String, Error>> {
        let url = url.clone();
        Box::pin(async move {
            let response = reqwest::get(url.clone())
                .await
                .map_err(|err| anyhow!("Failed to fetch URL {url}: {err}"))?;
            if !response.status().is_success() {
                return Err(anyhow!(
                    "Failed to fetch URL: {} (Status: {})",
                    url,
                    response.status()
                ));
            }
            Ok(response.text().await?)
        })
    }
}

/// A freshly fetched page, parsed into a detached tree.
///
/// Owned by the navigation cycle that created it; only the changed boundary
/// region is ever adopted into the live document.
pub struct ParsedPage {
    pub document: Document,
    pub title: String,
}

/// Fetch and parse the page at `url`, extracting its title (empty when the
/// page has no title element). Not retried; failures propagate and abort the
/// in-flight navigation.
///
/// # Errors
/// Returns an error if the fetch fails.
pub async fn fetch_page(transport: &dyn Transport, url: &Url) -> Result<ParsedPage, Error> {
    let body = transport.fetch_text(url).await?;
    let document = Document::parse(&body);
    let title = document.title();
    Ok(ParsedPage { document, title })
}
