use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{AdMetadata, AdType, NormalizedInsight, Platform};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoCompletion {
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationBundle {
    pub metadata: AdMetadata,
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
}

impl EstimationBundle {
    pub fn to_insight(&self) -> NormalizedInsight {
        NormalizedInsight {
            impressions: self.impressions.max(0) as f64,
            reach: self.reach.max(0) as f64,
            frequency: self.frequency.max(0.0),
            spend: self.spend.max(0.0),
            cpm: self.cpm.max(0.0),
            ctr: (self.ctr / 100.0).max(0.0),
            clicks: self.clicks.max(0) as f64,
            conversions: self.conversions.max(0) as f64,
            cost_per_conversion: self.cost_per_conversion.max(0.0),
            ..NormalizedInsight::default()
        }
    }
}

pub fn simulate(metadata: AdMetadata) -> EstimationBundle {
    let mut rng = StdRng::seed_from_u64(url_seed(&metadata.url));
    let params = BaseParams::lookup(metadata.platform, metadata.ad_type);

    let impressions = lognormal_draw(&mut rng, 10.5, 0.3).floor() as i64;
    let ctr = round2(normal_draw(&mut rng, params.ctr, 0.3));
    let cpc = round2(lognormal_draw(&mut rng, params.cpc.ln(), 0.2));
    let frequency = round1(rng.gen_range(1.2..3.5));

    let video_completion = params.completion_means.map(|means| VideoCompletion {
        p25: normal_draw(&mut rng, means[0], 0.1),
        p50: normal_draw(&mut rng, means[1], 0.1),
        p75: normal_draw(&mut rng, means[2], 0.1),
        p95: normal_draw(&mut rng, means[3], 0.05),
    });

    let clicks = (impressions as f64 * ctr / 100.0).floor() as i64;
    let spend = clicks as f64 * cpc;
    let cpm = if impressions > 0 {
        spend / impressions as f64 * 1000.0
    } else {
        0.0
    };
    let reach = (impressions as f64 / frequency).floor() as i64;

    let conversion_base = if metadata.ad_type == AdType::Video { 3.5 } else { 2.0 };
    let conversion_rate = round2(normal_draw(&mut rng, conversion_base, 0.5));
    let conversions = (clicks as f64 * conversion_rate / 100.0).floor() as i64;
    let cost_per_conversion = if conversions > 0 {
        spend / conversions as f64
    } else {
        0.0
    };

    let engagement_rate = round2(normal_draw(&mut rng, 1.5, 0.3));
    let engagements = (impressions as f64 * engagement_rate / 100.0).floor() as i64;

    EstimationBundle {
        metadata,
        impressions,
        reach,
        clicks,
        conversions,
        engagements,
        ctr,
        cpc,
        cpm,
        spend,
        frequency,
        conversion_rate,
        cost_per_conversion,
        engagement_rate,
        video_completion,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlatformBenchmarks {
    pub ctr: f64,
    pub cpc: f64,
    pub cost_per_conversion: f64,
    pub engagement_rate: f64,
}

impl PlatformBenchmarks {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Facebook => Self {
                ctr: 2.0,
                cpc: 1.3,
                cost_per_conversion: 15.0,
                engagement_rate: 1.8,
            },
            Platform::Instagram => Self {
                ctr: 1.5,
                cpc: 0.9,
                cost_per_conversion: 12.0,
                engagement_rate: 2.2,
            },
        }
    }
}

pub fn platform_tips(platform: Platform) -> Vec<String> {
    let tips: [&str; 3] = match platform {
        Platform::Facebook => [
            "Video creatives tend to earn cheaper engagement on Facebook",
            "Test broad audiences and let delivery optimization explore",
            "Retarget page engagers and recent site visitors",
        ],
        Platform::Instagram => [
            "Stories and Reels placements reach younger audiences",
            "Strong visuals carry more weight than long copy",
            "Use interactive stickers in Stories to lift engagement",
        ],
    };
    tips.iter().map(|tip| (*tip).to_string()).collect()
}

struct BaseParams {
    ctr: f64,
    cpc: f64,
    completion_means: Option<[f64; 4]>,
}

impl BaseParams {
    fn lookup(platform: Platform, ad_type: AdType) -> Self {
        match (platform, ad_type) {
            (Platform::Facebook, AdType::Video) => Self {
                ctr: 2.5,
                cpc: 1.2,
                completion_means: Some([0.65, 0.45, 0.30, 0.15]),
            },
            (Platform::Facebook, _) => Self {
                ctr: 1.8,
                cpc: 1.5,
                completion_means: None,
            },
            (Platform::Instagram, AdType::Stories) => Self {
                ctr: 1.2,
                cpc: 0.8,
                completion_means: Some([0.75, 0.55, 0.35, 0.20]),
            },
            (Platform::Instagram, _) => Self {
                ctr: 1.5,
                cpc: 1.0,
                completion_means: None,
            },
        }
    }
}

fn url_seed(url: &str) -> u64 {
    Sha256::digest(url.as_bytes())
        .iter()
        .fold(0u64, |acc, byte| (acc * 256 + u64::from(*byte)) % 100_000_000)
}

fn normal_draw(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev)
        .map(|dist| dist.sample(rng))
        .unwrap_or(mean)
}

fn lognormal_draw(rng: &mut StdRng, location: f64, scale: f64) -> f64 {
    LogNormal::new(location, scale)
        .map(|dist| dist.sample(rng))
        .unwrap_or_else(|_| location.exp())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
