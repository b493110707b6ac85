use super::CssSource;
use crate::config::FetchConfig;
use crate::error::{SnapshotError, classify_fetch_error};
use futures::future::join_all;
use scraper::{Html, Selector};
use url::Url;

/// A directly fetched document with its successfully retrieved external
/// stylesheets.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub html: String,
    pub stylesheets: Vec<CssSource>,
}

/// Fetches the primary document only.
pub async fn fetch_document(url: &Url, config: &FetchConfig) -> Result<String, SnapshotError> {
    let client = http_client(config)?;
    fetch_primary(&client, url, config).await
}

/// Fetches the primary document and its linked stylesheets.
///
/// A failed individual stylesheet fetch is logged and excluded; only the
/// primary request can fail the call.
pub async fn fetch_page(url: &Url, config: &FetchConfig) -> Result<FetchedDocument, SnapshotError> {
    let client = http_client(config)?;
    let html = fetch_primary(&client, url, config).await?;
    let stylesheets = fetch_linked_stylesheets(&client, &html, url, config).await;
    Ok(FetchedDocument { html, stylesheets })
}

/// Fetches the stylesheets linked from already-harvested markup.
///
/// Used by rendered mode, where the document itself came from the browser
/// session but external CSS still has to be retrieved for aggregation.
pub async fn supplement_stylesheets(
    html: &str,
    page_url: &Url,
    config: &FetchConfig,
) -> Vec<CssSource> {
    match http_client(config) {
        Ok(client) => fetch_linked_stylesheets(&client, html, page_url, config).await,
        Err(e) => {
            ::log::warn!("Skipping stylesheet supplementation: {}", e.detail());
            Vec::new()
        }
    }
}

fn http_client(config: &FetchConfig) -> Result<reqwest::Client, SnapshotError> {
    reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()
        .map_err(|e| SnapshotError::Internal(e.to_string()))
}

async fn fetch_primary(
    client: &reqwest::Client,
    url: &Url,
    config: &FetchConfig,
) -> Result<String, SnapshotError> {
    ::log::info!("Fetching: {}", url);
    let response = client
        .get(url.as_str())
        .header("user-agent", &config.user_agent)
        .header(
            "accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("accept-language", &config.accept_language)
        .header("referer", origin_of(url))
        .send()
        .await
        .map_err(classify_fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SnapshotError::UpstreamStatus {
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(classify_fetch_error)
}

/// Referer presented to the target, derived from its own origin.
fn origin_of(url: &Url) -> String {
    format!("{}://{}/", url.scheme(), url.host_str().unwrap_or_default())
}

/// Resolved `<link rel=stylesheet>` targets, capped at the configured
/// maximum, in document order.
pub fn stylesheet_links(html: &str, page_url: &Url, max: usize) -> Vec<Url> {
    let doc = Html::parse_document(html);
    let selector = Selector::parse(r#"link[rel="stylesheet"]"#).unwrap();
    doc.select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| page_url.join(href).ok())
        .take(max)
        .collect()
}

async fn fetch_linked_stylesheets(
    client: &reqwest::Client,
    html: &str,
    page_url: &Url,
    config: &FetchConfig,
) -> Vec<CssSource> {
    let links = stylesheet_links(html, page_url, config.max_stylesheets);
    if links.is_empty() {
        return Vec::new();
    }
    ::log::debug!("Fetching {} linked stylesheets for {}", links.len(), page_url);

    let fetches = links.into_iter().map(|link| async move {
        let result = fetch_stylesheet(client, &link, config).await;
        (link, result)
    });

    let mut sources = Vec::new();
    for (link, result) in join_all(fetches).await {
        match result {
            Ok(text) => sources.push(CssSource { url: link, text }),
            // Partial data: a lost stylesheet degrades the palette, never
            // the request
            Err(e) => ::log::warn!("Skipping stylesheet {}: {}", link, e.detail()),
        }
    }
    sources
}

async fn fetch_stylesheet(
    client: &reqwest::Client,
    link: &Url,
    config: &FetchConfig,
) -> Result<String, SnapshotError> {
    let response = client
        .get(link.as_str())
        .timeout(config.stylesheet_timeout())
        .header("user-agent", &config.user_agent)
        .header("accept", "text/css,*/*;q=0.1")
        .send()
        .await
        .map_err(classify_fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SnapshotError::UpstreamStatus {
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(classify_fetch_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_links_resolve_and_cap() {
        let html = r#"
            <html><head>
              <link rel="stylesheet" href="/a.css">
              <link rel="stylesheet" href="https://cdn.example.com/b.css">
              <link rel="icon" href="/favicon.ico">
              <link rel="stylesheet" href="c.css">
              <link rel="stylesheet" href="d.css">
            </head></html>
        "#;
        let page_url = Url::parse("https://site.com/docs/page").unwrap();

        let links = stylesheet_links(html, &page_url, 3);

        assert_eq!(
            links.iter().map(|u| u.as_str()).collect::<Vec<_>>(),
            vec![
                "https://site.com/a.css",
                "https://cdn.example.com/b.css",
                "https://site.com/docs/c.css",
            ]
        );
    }

    #[test]
    fn test_origin_referer() {
        let url = Url::parse("https://site.com/deep/page?q=1").unwrap();
        assert_eq!(origin_of(&url), "https://site.com/");
    }
}
