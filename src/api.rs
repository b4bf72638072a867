use serde::{Deserialize, Serialize};

use ads_analyzer::demographics::DemographicBreakdown;
use ads_analyzer::estimate::{platform_tips, EstimationBundle, PlatformBenchmarks, VideoCompletion};
use ads_analyzer::meta_api::DateRange;
use ads_analyzer::recommend::{Recommendation, StrategicAnalysis};
use ads_analyzer::series::TemporalSeries;
use ads_analyzer::{AdAnalysis, AdMetadata, AdType, NormalizedInsight, Platform};

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub url: Option<String>,
    pub platform: Option<String>,
    pub ad_type: Option<String>,
}

impl EstimateRequest {
    pub fn url(&self) -> Result<String, String> {
        let url = self.url.clone().unwrap_or_default().trim().to_string();
        if url.is_empty() {
            return Err("url is required".to_string());
        }
        Ok(url)
    }

    pub fn apply_overrides(&self, metadata: &mut AdMetadata) -> Result<(), String> {
        if let Some(platform) = self.platform.as_deref() {
            metadata.platform = Platform::from_str(platform)
                .ok_or_else(|| format!("invalid platform: {}", platform))?;
        }
        if let Some(ad_type) = self.ad_type.as_deref() {
            metadata.ad_type =
                AdType::from_str(ad_type).ok_or_else(|| format!("invalid ad type: {}", ad_type))?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub url: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub platform: String,
    pub ad_type: String,
    pub impressions: i64,
    pub reach: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub engagements: i64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub spend: f64,
    pub frequency: f64,
    pub conversion_rate: f64,
    pub cost_per_conversion: f64,
    pub engagement_rate: f64,
    pub video_completion: Option<VideoCompletion>,
    pub benchmarks: PlatformBenchmarks,
    pub tips: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl EstimateResponse {
    pub fn from_bundle(bundle: EstimationBundle, recommendations: Vec<Recommendation>) -> Self {
        let benchmarks = PlatformBenchmarks::for_platform(bundle.metadata.platform);
        let tips = platform_tips(bundle.metadata.platform);
        Self {
            url: bundle.metadata.url,
            title: bundle.metadata.title,
            description: bundle.metadata.description,
            image_url: bundle.metadata.image_url,
            platform: bundle.metadata.platform.label().to_string(),
            ad_type: bundle.metadata.ad_type.label().to_string(),
            impressions: bundle.impressions,
            reach: bundle.reach,
            clicks: bundle.clicks,
            conversions: bundle.conversions,
            engagements: bundle.engagements,
            ctr: bundle.ctr,
            cpc: bundle.cpc,
            cpm: bundle.cpm,
            spend: bundle.spend,
            frequency: bundle.frequency,
            conversion_rate: bundle.conversion_rate,
            cost_per_conversion: bundle.cost_per_conversion,
            engagement_rate: bundle.engagement_rate,
            video_completion: bundle.video_completion,
            benchmarks,
            tips,
            recommendations,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub ad_id: Option<String>,
    pub range: Option<String>,
    pub objective: Option<String>,
    pub request_id: Option<String>,
}

impl AnalyzeRequest {
    pub fn ad_id(&self) -> Result<String, String> {
        let ad_id = self.ad_id.clone().unwrap_or_default().trim().to_string();
        if ad_id.is_empty() {
            return Err("ad_id is required".to_string());
        }
        Ok(ad_id)
    }

    pub fn range(&self) -> Result<DateRange, String> {
        DateRange::parse(self.range.as_deref().unwrap_or("last_30d"))
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub request_id: String,
    pub ad_id: String,
    pub insight: NormalizedInsight,
    pub series: Option<TemporalSeries>,
    pub demographics: DemographicBreakdown,
    pub recommendations: Vec<Recommendation>,
    pub strategic: StrategicAnalysis,
    pub objective_guidance: Vec<String>,
    pub warnings: Vec<String>,
}

impl AnalyzeResponse {
    pub fn from_analysis(
        analysis: AdAnalysis,
        ad_id: String,
        objective_guidance: Vec<String>,
        warnings: Vec<String>,
        request_id: String,
    ) -> Self {
        Self {
            request_id,
            ad_id,
            insight: analysis.insight,
            series: analysis.series,
            demographics: analysis.demographics,
            recommendations: analysis.recommendations,
            strategic: analysis.strategic,
            objective_guidance,
            warnings,
        }
    }
}
