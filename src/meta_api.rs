use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::fmt;

use crate::config::MetaApiSettings;
use crate::{safe_f64, text_or};

const CAMPAIGN_FIELDS: &str = "id,name,objective,status,start_time,stop_time,buying_type";
const ADSET_FIELDS: &str =
    "id,name,daily_budget,lifetime_budget,start_time,end_time,optimization_goal,billing_event,bid_strategy";
const AD_FIELDS: &str = "id,name,status,created_time,adset_id,bid_amount,conversion_domain";
const INSIGHT_FIELDS: &str = "impressions,reach,frequency,spend,cpm,cpp,ctr,clicks,conversions,\
actions,action_values,cost_per_conversion,cost_per_action_type,cost_per_unique_click,\
cost_per_unique_action_type,unique_clicks,unique_actions,quality_ranking,\
engagement_rate_ranking,conversion_rate_ranking,video_p25_watched_actions,\
video_p50_watched_actions,video_p75_watched_actions,video_p95_watched_actions,\
video_p100_watched_actions,video_avg_time_watched_actions";
const DAILY_FIELDS: &str = "date_start,impressions,reach,spend,clicks,ctr,frequency,cpm,\
conversions,cost_per_conversion,unique_clicks,actions";
const DEMOGRAPHIC_FIELDS: &str =
    "impressions,reach,clicks,spend,cpm,cpp,ctr,conversions,cost_per_conversion";

const MAX_RANGE_DAYS: i64 = 37 * 30;

#[derive(Debug, Clone)]
pub struct RemoteServiceError {
    message: String,
}

impl RemoteServiceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RemoteServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteServiceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Last7d,
    Last30d,
    Custom { since: NaiveDate, until: NaiveDate },
}

impl DateRange {
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim();
        match trimmed {
            "last_7d" => return Ok(DateRange::Last7d),
            "last_30d" => return Ok(DateRange::Last30d),
            _ => {}
        }
        let (since, until) = trimmed.split_once("_to_").ok_or_else(|| {
            format!(
                "invalid date range '{}': expected last_7d, last_30d or YYYY-MM-DD_to_YYYY-MM-DD",
                input
            )
        })?;
        let since = NaiveDate::parse_from_str(since.trim(), "%Y-%m-%d")
            .map_err(|err| format!("invalid range start '{}': {}", since, err))?;
        let until = NaiveDate::parse_from_str(until.trim(), "%Y-%m-%d")
            .map_err(|err| format!("invalid range end '{}': {}", until, err))?;
        Ok(DateRange::Custom { since, until })
    }

    pub fn resolve(self, reference: NaiveDate) -> Result<(NaiveDate, NaiveDate), RemoteServiceError> {
        match self {
            DateRange::Last7d => Ok((reference - Duration::days(7), reference)),
            DateRange::Last30d => Ok((reference - Duration::days(30), reference)),
            DateRange::Custom { since, until } => {
                let since = if (until - since).num_days() > MAX_RANGE_DAYS {
                    until - Duration::days(MAX_RANGE_DAYS)
                } else {
                    since
                };
                if since > until {
                    return Err(RemoteServiceError::new(format!(
                        "date range starts after it ends: {} > {}",
                        since, until
                    )));
                }
                Ok((since, until))
            }
        }
    }
}

#[derive(Clone)]
pub struct MetaAdsClient {
    client: Client,
    api_base: String,
    access_token: String,
    account_id: String,
}

impl MetaAdsClient {
    pub fn from_env(settings: &MetaApiSettings) -> Option<Self> {
        let access_token = env::var("META_ACCESS_TOKEN")
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        let account_id = env::var("META_AD_ACCOUNT_ID")
            .ok()
            .filter(|value| !value.trim().is_empty())?;
        let account_id = if account_id.starts_with("act_") {
            account_id
        } else {
            format!("act_{}", account_id)
        };
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(settings.timeout_ms))
            .build()
            .ok()?;
        Some(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            access_token,
            account_id,
        })
    }

    pub async fn campaigns(&self) -> Result<Vec<CampaignSummary>, RemoteServiceError> {
        let params = vec![
            ("fields".to_string(), CAMPAIGN_FIELDS.to_string()),
            ("limit".to_string(), "200".to_string()),
        ];
        let records = self
            .fetch(&format!("{}/campaigns", self.account_id), &params)
            .await?;
        Ok(records.iter().map(CampaignSummary::from_record).collect())
    }

    pub async fn adsets(&self, campaign_id: &str) -> Result<Vec<AdsetSummary>, RemoteServiceError> {
        let params = vec![
            ("fields".to_string(), ADSET_FIELDS.to_string()),
            ("limit".to_string(), "100".to_string()),
        ];
        let records = self
            .fetch(&format!("{}/adsets", campaign_id), &params)
            .await?;
        Ok(records.iter().map(AdsetSummary::from_record).collect())
    }

    pub async fn ads(&self, adset_id: &str) -> Result<Vec<AdSummary>, RemoteServiceError> {
        let params = vec![
            ("fields".to_string(), AD_FIELDS.to_string()),
            ("limit".to_string(), "100".to_string()),
        ];
        let records = self.fetch(&format!("{}/ads", adset_id), &params).await?;
        Ok(records.iter().map(AdSummary::from_record).collect())
    }

    pub async fn insights_summary(
        &self,
        ad_id: &str,
        range: DateRange,
    ) -> Result<Option<Value>, RemoteServiceError> {
        let mut params = insight_params(INSIGHT_FIELDS, range)?;
        params.push(("limit".to_string(), "100".to_string()));
        let records = self.fetch(&format!("{}/insights", ad_id), &params).await?;
        Ok(records.into_iter().next())
    }

    pub async fn insights_daily(
        &self,
        ad_id: &str,
        range: DateRange,
    ) -> Result<Vec<Value>, RemoteServiceError> {
        let mut params = insight_params(DAILY_FIELDS, range)?;
        params.push(("time_increment".to_string(), "1".to_string()));
        self.fetch(&format!("{}/insights", ad_id), &params).await
    }

    pub async fn insights_demographics(
        &self,
        ad_id: &str,
        range: DateRange,
    ) -> Result<Vec<Value>, RemoteServiceError> {
        let mut params = insight_params(DEMOGRAPHIC_FIELDS, range)?;
        params.push(("breakdowns".to_string(), "age,gender".to_string()));
        let mut records = self.fetch(&format!("{}/insights", ad_id), &params).await?;

        let mut country_params = insight_params(DEMOGRAPHIC_FIELDS, range)?;
        country_params.push(("breakdowns".to_string(), "country".to_string()));
        let countries = self
            .fetch(&format!("{}/insights", ad_id), &country_params)
            .await?;

        records.extend(countries);
        Ok(records)
    }

    async fn fetch(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<Value>, RemoteServiceError> {
        tracing::debug!("GET {}/{}", self.api_base, path);
        let response = self
            .client
            .get(format!("{}/{}", self.api_base, path))
            .query(params)
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(|err| RemoteServiceError::new(format!("Meta API request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(RemoteServiceError::new(format!("Meta API error: {}", status)));
            }
            return Err(RemoteServiceError::new(format!(
                "Meta API error: {} {}",
                status, detail
            )));
        }

        let body: GraphEnvelope = response.json().await.map_err(|err| {
            RemoteServiceError::new(format!("Meta API response parse failed: {}", err))
        })?;

        Ok(body.data.unwrap_or_default())
    }
}

fn insight_params(fields: &str, range: DateRange) -> Result<Vec<(String, String)>, RemoteServiceError> {
    let (since, until) = range.resolve(Utc::now().date_naive())?;
    Ok(vec![
        ("fields".to_string(), fields.to_string()),
        (
            "time_range".to_string(),
            json!({
                "since": since.format("%Y-%m-%d").to_string(),
                "until": until.format("%Y-%m-%d").to_string(),
            })
            .to_string(),
        ),
        ("level".to_string(), "ad".to_string()),
    ])
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub objective: String,
    pub status: String,
    pub buying_type: String,
    pub start_time: String,
    pub stop_time: String,
}

impl CampaignSummary {
    fn from_record(record: &Value) -> Self {
        Self {
            id: text_or(record, "id", "N/A"),
            name: text_or(record, "name", "Unnamed"),
            objective: text_or(record, "objective", "N/A"),
            status: text_or(record, "status", "N/A"),
            buying_type: text_or(record, "buying_type", "N/A"),
            start_time: text_or(record, "start_time", "N/A"),
            stop_time: text_or(record, "stop_time", "N/A"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdsetSummary {
    pub id: String,
    pub name: String,
    pub daily_budget: f64,
    pub lifetime_budget: f64,
    pub start_time: String,
    pub end_time: String,
    pub optimization_goal: String,
    pub billing_event: String,
    pub bid_strategy: String,
}

impl AdsetSummary {
    fn from_record(record: &Value) -> Self {
        Self {
            id: text_or(record, "id", "N/A"),
            name: text_or(record, "name", "Unnamed"),
            daily_budget: safe_f64(record.get("daily_budget"), 0.0),
            lifetime_budget: safe_f64(record.get("lifetime_budget"), 0.0),
            start_time: text_or(record, "start_time", "N/A"),
            end_time: text_or(record, "end_time", "N/A"),
            optimization_goal: text_or(record, "optimization_goal", "N/A"),
            billing_event: text_or(record, "billing_event", "N/A"),
            bid_strategy: text_or(record, "bid_strategy", "N/A"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdSummary {
    pub id: String,
    pub name: String,
    pub status: String,
    pub created_time: String,
    pub adset_id: String,
    pub bid_amount: f64,
    pub conversion_domain: String,
}

impl AdSummary {
    fn from_record(record: &Value) -> Self {
        Self {
            id: text_or(record, "id", "N/A"),
            name: text_or(record, "name", "Unnamed"),
            status: text_or(record, "status", "N/A"),
            created_time: text_or(record, "created_time", "N/A"),
            adset_id: text_or(record, "adset_id", "N/A"),
            bid_amount: safe_f64(record.get("bid_amount"), 0.0),
            conversion_domain: text_or(record, "conversion_domain", "N/A"),
        }
    }
}

#[derive(Deserialize)]
struct GraphEnvelope {
    data: Option<Vec<Value>>,
}
