use super::{WaitOutcome, bounded_wait};
use crate::config::RenderConfig;
use crate::error::{SnapshotError, classify_webdriver_error};
use crate::rules::ExtractionRules;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use fantoccini::{Client, ClientBuilder, Locator};
use tokio::time::timeout;

/// Renders a page and returns its final markup once the readiness state
/// machine declares it harvestable.
///
/// The session is torn down on every exit path, fatal errors included.
pub async fn harvest_page(
    url: &str,
    config: &RenderConfig,
    rules: &ExtractionRules,
) -> Result<String, SnapshotError> {
    let client = launch(config).await?;

    let html = match drive_to_ready(&client, url, config, rules).await {
        Ok(()) => match timeout(config.navigation_timeout(), client.source()).await {
            Ok(result) => result.map_err(classify_webdriver_error),
            Err(_) => Err(SnapshotError::Timeout("reading page source".to_string())),
        },
        Err(e) => Err(e),
    };

    close_session(client).await;
    html
}

/// Renders a page and captures a viewport screenshot as a
/// `data:image/png;base64,...` payload.
pub async fn capture_screenshot(
    url: &str,
    config: &RenderConfig,
    rules: &ExtractionRules,
) -> Result<String, SnapshotError> {
    let client = launch(config).await?;

    let shot = match drive_to_ready(&client, url, config, rules).await {
        Ok(()) => match timeout(config.navigation_timeout(), client.screenshot()).await {
            Ok(result) => result.map_err(classify_webdriver_error),
            Err(_) => Err(SnapshotError::Timeout("capturing screenshot".to_string())),
        },
        Err(e) => Err(e),
    };

    close_session(client).await;
    let bytes = shot?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(&bytes)))
}

/// Starts a rendering session with the fixed browser identity and viewport.
async fn launch(config: &RenderConfig) -> Result<Client, SnapshotError> {
    let mut caps = serde_json::map::Map::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::json!({
            "args": [
                "--headless=new",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                format!("--window-size={},{}", config.viewport_width, config.viewport_height),
                format!("--user-agent={}", config.user_agent),
                format!("--accept-lang={}", config.accept_language),
            ]
        }),
    );

    ::log::debug!("Connecting to WebDriver at {}", config.webdriver_url);
    ClientBuilder::native()
        .capabilities(caps)
        .connect(&config.webdriver_url)
        .await
        .map_err(|e| {
            SnapshotError::Renderer(format!(
                "failed to connect to WebDriver at {}: {}",
                config.webdriver_url, e
            ))
        })
}

/// Navigate → AwaitBody → AwaitChallengeClear → Settle.
///
/// Navigation failures are fatal; body and challenge waits degrade to
/// sparse output rather than failing the request.
async fn drive_to_ready(
    client: &Client,
    url: &str,
    config: &RenderConfig,
    rules: &ExtractionRules,
) -> Result<(), SnapshotError> {
    ::log::info!("Navigating to: {}", url);
    match timeout(config.navigation_timeout(), client.goto(url)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(classify_webdriver_error(e)),
        Err(_) => {
            return Err(SnapshotError::Timeout(format!(
                "navigation to {} exceeded {}s",
                url, config.navigation_timeout_secs
            )));
        }
    }

    let outcome = bounded_wait(
        config.body_timeout(),
        config.poll_interval(),
        WaitOutcome::TimedOutContinue,
        || {
            let client = client.clone();
            async move { client.find(Locator::Css("body")).await.is_ok() }
        },
    )
    .await;
    if outcome == WaitOutcome::TimedOutContinue {
        ::log::warn!(
            "No body element within {}s, continuing: {}",
            config.body_timeout_secs,
            url
        );
    }

    let outcome = bounded_wait(
        config.challenge_timeout(),
        config.poll_interval(),
        WaitOutcome::TimedOutContinue,
        || {
            let client = client.clone();
            let rules = rules.clone();
            async move { !challenge_visible(&client, &rules).await }
        },
    )
    .await;
    if outcome == WaitOutcome::TimedOutContinue {
        // A persistent challenge degrades extraction quality but never
        // fails the request
        ::log::warn!(
            "Challenge interstitial persisted for {}s, applying {}s grace: {}",
            config.challenge_timeout_secs,
            config.challenge_grace_secs,
            url
        );
        tokio::time::sleep(config.challenge_grace()).await;
    }

    tokio::time::sleep(config.settle()).await;
    Ok(())
}

/// Whether the page currently shows a bot-challenge interstitial, judged
/// from its title and body text.
async fn challenge_visible(client: &Client, rules: &ExtractionRules) -> bool {
    let title = client.title().await.unwrap_or_default();
    let body_text = match client.find(Locator::Css("body")).await {
        Ok(body) => body.text().await.unwrap_or_default(),
        Err(_) => String::new(),
    };

    rules.challenge_matches(&body_text, &title)
}

async fn close_session(client: Client) {
    if let Err(e) = client.close().await {
        ::log::warn!("Failed to close rendering session: {}", e);
    }
}
