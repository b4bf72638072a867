use std::time::Duration;

use crate::{AdMetadata, AdType, Platform};

const SCRAPE_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Mozilla/5.0 (compatible; ads-analyzer/0.1)";

pub async fn scrape(url: &str) -> AdMetadata {
    match fetch_page(url).await {
        Ok(body) => parse_metadata(url, &body),
        Err(err) => {
            tracing::warn!("metadata scrape failed for {}: {}", url, err);
            AdMetadata::fallback(url)
        }
    }
}

pub fn parse_metadata(url: &str, body: &str) -> AdMetadata {
    AdMetadata {
        title: meta_content(body, "og:title")
            .or_else(|| meta_content(body, "title"))
            .unwrap_or_else(|| "N/A".to_string()),
        description: meta_content(body, "og:description")
            .or_else(|| meta_content(body, "description"))
            .unwrap_or_else(|| "N/A".to_string()),
        image_url: meta_content(body, "og:image").unwrap_or_default(),
        platform: Platform::from_url(url),
        ad_type: AdType::classify(body),
        url: url.to_string(),
    }
}

async fn fetch_page(url: &str) -> Result<String, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SCRAPE_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|err| format!("scrape client build failed: {}", err))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|err| format!("scrape request failed: {}", err))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("scrape error: {}", status));
    }

    response
        .text()
        .await
        .map_err(|err| format!("scrape body read failed: {}", err))
}

fn meta_content(body: &str, property: &str) -> Option<String> {
    for attribute in ["property", "name"] {
        for quote in ['"', '\''] {
            let marker = format!("{}={}{}{}", attribute, quote, property, quote);
            let position = match body.find(&marker) {
                Some(position) => position,
                None => continue,
            };
            let tag_start = body[..position].rfind('<').unwrap_or(0);
            let tag_end = body[position..]
                .find('>')
                .map(|offset| position + offset)
                .unwrap_or(body.len());
            if let Some(value) = attribute_value(&body[tag_start..tag_end], "content") {
                return Some(value);
            }
        }
    }
    None
}

fn attribute_value(tag: &str, attribute: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let marker = format!("{}={}", attribute, quote);
        let position = match tag.find(&marker) {
            Some(position) => position,
            None => continue,
        };
        let rest = &tag[position + marker.len()..];
        let end = match rest.find(quote) {
            Some(end) => end,
            None => continue,
        };
        let value = rest[..end].trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}
