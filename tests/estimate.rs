use ads_analyzer::estimate::{simulate, EstimationBundle, PlatformBenchmarks, VideoCompletion};
use ads_analyzer::{AdMetadata, AdType, Platform};

fn metadata(url: &str, platform: Platform, ad_type: AdType) -> AdMetadata {
    AdMetadata {
        title: "Spring collection".to_string(),
        description: "New arrivals".to_string(),
        image_url: String::new(),
        platform,
        ad_type,
        url: url.to_string(),
    }
}

#[test]
fn same_url_reproduces_the_same_estimate() {
    let first = simulate(metadata(
        "https://facebook.com/ads/spring-sale",
        Platform::Facebook,
        AdType::Video,
    ));
    let second = simulate(metadata(
        "https://facebook.com/ads/spring-sale",
        Platform::Facebook,
        AdType::Video,
    ));

    assert_eq!(first, second);
}

#[test]
fn different_urls_change_the_estimate() {
    let first = simulate(metadata(
        "https://facebook.com/ads/spring-sale",
        Platform::Facebook,
        AdType::Image,
    ));
    let second = simulate(metadata(
        "https://facebook.com/ads/summer-sale",
        Platform::Facebook,
        AdType::Image,
    ));

    assert_ne!(first.impressions, second.impressions);
}

#[test]
fn seeding_tracks_the_url_not_the_page_copy() {
    let url = "https://facebook.com/ads/spring-sale";
    let first = simulate(metadata(url, Platform::Facebook, AdType::Image));

    let mut renamed = metadata(url, Platform::Facebook, AdType::Image);
    renamed.title = "Autumn collection".to_string();
    renamed.description = "Clearance".to_string();
    let second = simulate(renamed);

    assert_eq!(first.impressions, second.impressions);
    assert!((first.ctr - second.ctr).abs() < 1e-9);
    assert!((first.cpc - second.cpc).abs() < 1e-9);
    assert!((first.spend - second.spend).abs() < 1e-9);
}

#[test]
fn base_parameters_follow_platform_and_format() {
    let url = "https://facebook.com/ads/spring-sale";
    let video = simulate(metadata(url, Platform::Facebook, AdType::Video));
    let image = simulate(metadata(url, Platform::Facebook, AdType::Image));

    assert_eq!(video.impressions, image.impressions);
    assert_ne!(video.ctr, image.ctr);
}

#[test]
fn completion_quartiles_follow_the_format() {
    let url = "https://instagram.com/p/launch";

    let fb_video = simulate(metadata(url, Platform::Facebook, AdType::Video));
    assert!(fb_video.video_completion.is_some());

    let ig_stories = simulate(metadata(url, Platform::Instagram, AdType::Stories));
    assert!(ig_stories.video_completion.is_some());

    let fb_carousel = simulate(metadata(url, Platform::Facebook, AdType::Carousel));
    assert!(fb_carousel.video_completion.is_none());

    let ig_video = simulate(metadata(url, Platform::Instagram, AdType::Video));
    assert!(ig_video.video_completion.is_none());
}

#[test]
fn completion_quartiles_keep_the_raw_draws() {
    let bundle = simulate(metadata(
        "https://facebook.com/ads/spring-sale",
        Platform::Facebook,
        AdType::Video,
    ));

    let completion = bundle.video_completion.unwrap();
    assert!((completion.p25 - round2(completion.p25)).abs() > 1e-9);
    assert!((completion.p50 - round2(completion.p50)).abs() > 1e-9);
    assert!((completion.p75 - round2(completion.p75)).abs() > 1e-9);
    assert!((completion.p95 - round2(completion.p95)).abs() > 1e-9);
}

#[test]
fn derived_metrics_stay_consistent() {
    let bundle = simulate(metadata(
        "https://facebook.com/ads/spring-sale",
        Platform::Facebook,
        AdType::Image,
    ));

    assert_eq!(
        bundle.clicks,
        (bundle.impressions as f64 * bundle.ctr / 100.0).floor() as i64
    );
    assert!((bundle.spend - bundle.clicks as f64 * bundle.cpc).abs() < 1e-9);
    assert_eq!(
        bundle.reach,
        (bundle.impressions as f64 / bundle.frequency).floor() as i64
    );
    assert_eq!(
        bundle.conversions,
        (bundle.clicks as f64 * bundle.conversion_rate / 100.0).floor() as i64
    );
    assert_eq!(
        bundle.engagements,
        (bundle.impressions as f64 * bundle.engagement_rate / 100.0).floor() as i64
    );

    assert!(bundle.impressions > 0);
    assert!((bundle.cpm - bundle.spend / bundle.impressions as f64 * 1000.0).abs() < 1e-9);
    if bundle.conversions > 0 {
        assert!(
            (bundle.cost_per_conversion - bundle.spend / bundle.conversions as f64).abs() < 1e-9
        );
    } else {
        assert!((bundle.cost_per_conversion - 0.0).abs() < 1e-9);
    }
}

#[test]
fn frequency_stays_in_the_sampling_window() {
    let bundle = simulate(metadata(
        "https://instagram.com/p/launch",
        Platform::Instagram,
        AdType::Image,
    ));

    assert!(bundle.frequency >= 1.2);
    assert!(bundle.frequency <= 3.5);
}

#[test]
fn estimates_bridge_into_insights() {
    let bundle = EstimationBundle {
        metadata: metadata(
            "https://facebook.com/ads/spring-sale",
            Platform::Facebook,
            AdType::Image,
        ),
        impressions: 20000,
        reach: -5,
        clicks: 400,
        conversions: 12,
        engagements: 300,
        ctr: 2.5,
        cpc: 0.8,
        cpm: 16.0,
        spend: 320.0,
        frequency: -0.5,
        conversion_rate: 3.0,
        cost_per_conversion: -1.0,
        engagement_rate: 1.5,
        video_completion: Some(VideoCompletion {
            p25: 0.6,
            p50: 0.4,
            p75: 0.3,
            p95: 0.1,
        }),
    };

    let insight = bundle.to_insight();

    assert!((insight.impressions - 20000.0).abs() < 1e-6);
    assert!((insight.reach - 0.0).abs() < 1e-6);
    assert!((insight.frequency - 0.0).abs() < 1e-6);
    assert!((insight.ctr - 0.025).abs() < 1e-9);
    assert!((insight.ctr_percent() - 2.5).abs() < 1e-9);
    assert!((insight.cost_per_conversion - 0.0).abs() < 1e-6);
    assert!(insight.actions.is_empty());
}

#[test]
fn benchmarks_differ_per_platform() {
    let facebook = PlatformBenchmarks::for_platform(Platform::Facebook);
    let instagram = PlatformBenchmarks::for_platform(Platform::Instagram);

    assert!((facebook.ctr - 2.0).abs() < 1e-6);
    assert!((facebook.cost_per_conversion - 15.0).abs() < 1e-6);
    assert!((instagram.ctr - 1.5).abs() < 1e-6);
    assert!((instagram.engagement_rate - 2.2).abs() < 1e-6);
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
