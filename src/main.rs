mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use ads_analyzer::config::AnalyzerConfig;
use ads_analyzer::estimate::{platform_tips, simulate, PlatformBenchmarks};
use ads_analyzer::meta_api::{DateRange, MetaAdsClient};
use ads_analyzer::recommend::{
    evaluate_rules, objective_guidance, ProjectedScenario, Recommendation,
};
use ads_analyzer::scraper;
use ads_analyzer::{
    analyze_with_config, format_float, format_money, format_number, format_percent, AdType,
    Platform,
};

#[derive(Parser)]
#[command(name = "ads-analyzer", about = "Meta ads performance analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Estimate(EstimateArgs),
    Analyze(AnalyzeArgs),
    Campaigns,
    Adsets(AdsetsArgs),
    Ads(AdsArgs),
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct EstimateArgs {
    #[arg(long)]
    url: String,
    #[arg(long)]
    platform: Option<String>,
    #[arg(long)]
    ad_type: Option<String>,
    #[arg(long)]
    details: bool,
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    #[arg(long)]
    ad_id: String,
    #[arg(long, default_value = "last_30d")]
    range: String,
    #[arg(long)]
    objective: Option<String>,
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct AdsetsArgs {
    #[arg(long)]
    campaign_id: String,
}

#[derive(Args, Debug, Clone)]
struct AdsArgs {
    #[arg(long)]
    adset_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long, default_value = "web/dist")]
    web_root: String,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Estimate(args) => run_estimate(args).await,
        Command::Analyze(args) => run_analyze(args).await,
        Command::Campaigns => run_campaigns().await,
        Command::Adsets(args) => run_adsets(args).await,
        Command::Ads(args) => run_ads(args).await,
        Command::Serve(args) => server::serve(args).await,
    }
}

async fn run_estimate(args: EstimateArgs) -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(None)?;

    let mut metadata = scraper::scrape(&args.url).await;
    if let Some(platform) = args.platform.as_deref() {
        metadata.platform =
            Platform::from_str(platform).ok_or_else(|| format!("invalid platform: {}", platform))?;
    }
    if let Some(ad_type) = args.ad_type.as_deref() {
        metadata.ad_type =
            AdType::from_str(ad_type).ok_or_else(|| format!("invalid ad type: {}", ad_type))?;
    }

    let bundle = simulate(metadata);
    let insight = bundle.to_insight();
    let recommendations = evaluate_rules(&insight, None, &config.rules);

    println!("Ad: {}", bundle.metadata.title);
    println!(
        "Platform: {} | format: {}",
        bundle.metadata.platform.label(),
        bundle.metadata.ad_type.label()
    );
    println!(
        "Estimated impressions: {} (reach {})",
        format_number(bundle.impressions as f64),
        format_number(bundle.reach as f64)
    );
    println!(
        "Estimated clicks: {} (CTR {})",
        format_number(bundle.clicks as f64),
        format_percent(bundle.ctr)
    );
    println!(
        "Estimated spend: {} (CPC {} | CPM {})",
        format_money(bundle.spend),
        format_money(bundle.cpc),
        format_money(bundle.cpm)
    );
    println!(
        "Estimated conversions: {} (rate {} | cost {})",
        format_number(bundle.conversions as f64),
        format_percent(bundle.conversion_rate),
        format_money(bundle.cost_per_conversion)
    );
    println!(
        "Engagements: {} (rate {} | frequency {})",
        format_number(bundle.engagements as f64),
        format_percent(bundle.engagement_rate),
        format_float(bundle.frequency, 1)
    );
    if let Some(completion) = bundle.video_completion {
        println!(
            "Video completion: 25% {} | 50% {} | 75% {} | 95% {}",
            format_percent(completion.p25 * 100.0),
            format_percent(completion.p50 * 100.0),
            format_percent(completion.p75 * 100.0),
            format_percent(completion.p95 * 100.0)
        );
    }

    if args.details {
        let benchmarks = PlatformBenchmarks::for_platform(bundle.metadata.platform);
        println!("\n{} benchmarks:", bundle.metadata.platform.label());
        println!("  CTR: {}", format_percent(benchmarks.ctr));
        println!("  CPC: {}", format_money(benchmarks.cpc));
        println!(
            "  Cost per conversion: {}",
            format_money(benchmarks.cost_per_conversion)
        );
        println!(
            "  Engagement rate: {}",
            format_percent(benchmarks.engagement_rate)
        );
        println!("\nTips:");
        for tip in platform_tips(bundle.metadata.platform) {
            println!("- {}", tip);
        }
    }

    print_recommendations(&recommendations);

    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(None)?;
    let client = require_client(&config)?;
    let range = DateRange::parse(&args.range)?;

    let summary = client
        .insights_summary(&args.ad_id, range)
        .await
        .map_err(|err| err.to_string())?;
    let daily = client
        .insights_daily(&args.ad_id, range)
        .await
        .unwrap_or_else(|err| {
            eprintln!("Warning: daily insights unavailable: {}", err);
            Vec::new()
        });
    let breakdowns = client
        .insights_demographics(&args.ad_id, range)
        .await
        .unwrap_or_else(|err| {
            eprintln!("Warning: demographic insights unavailable: {}", err);
            Vec::new()
        });

    let analysis = analyze_with_config(summary.as_ref(), &daily, &breakdowns, &config)
        .ok_or_else(|| format!("no insight data for ad {}", args.ad_id))?;

    let insight = &analysis.insight;
    println!("Ad {} performance:", args.ad_id);
    println!(
        "Impressions: {} (reach {} | frequency {})",
        format_number(insight.impressions),
        format_number(insight.reach),
        format_float(insight.frequency, 1)
    );
    println!(
        "Clicks: {} (CTR {})",
        format_number(insight.clicks),
        format_percent(insight.ctr_percent())
    );
    println!(
        "Spend: {} (CPM {} | CPP {})",
        format_money(insight.spend),
        format_money(insight.cpm),
        format_money(insight.cpp)
    );
    println!(
        "Conversions: {} (cost {})",
        format_number(insight.conversions),
        format_money(insight.cost_per_conversion)
    );

    if let Some(series) = &analysis.series {
        println!(
            "\nDaily series: {} days (mean frequency {})",
            series.len(),
            format_float(series.mean_frequency(), 1)
        );
        if let Some(growth) = series.growth_rates() {
            println!(
                "Growth (day over day): impressions {} | ctr {} | conversions {}",
                format_percent(growth.impressions),
                format_percent(growth.ctr),
                format_percent(growth.conversions)
            );
        }
    }

    if !analysis.demographics.is_empty() {
        if let Some(segment) = analysis.demographics.top_segment() {
            println!(
                "\nTop segment: {} {} (CTR {})",
                segment.gender,
                segment.age,
                format_percent(segment.ctr)
            );
        }
        let countries = analysis.demographics.top_countries(10);
        if !countries.is_empty() {
            println!("Top countries:");
            for country in countries {
                println!(
                    "  {}: {} impressions ({} spend)",
                    country.country,
                    format_number(country.impressions),
                    format_money(country.spend)
                );
            }
        }
    }

    if analysis.recommendations.is_empty() {
        println!("\nNo critical recommendations, the ad is performing within expected parameters");
    } else {
        print_recommendations(&analysis.recommendations);
    }

    let strategic = &analysis.strategic;
    if !strategic.strengths.is_empty() {
        println!("\nStrengths:");
        for strength in &strategic.strengths {
            println!("- {}", strength);
        }
    }
    if !strategic.improvements.is_empty() {
        println!("\nImprovement areas:");
        for improvement in &strategic.improvements {
            println!("- {}", improvement);
        }
    }

    println!("\nAction plan:");
    for entry in &strategic.action_plan {
        println!(
            "[{}] {} ({}, target: {})",
            entry.priority.label(),
            entry.action,
            entry.timeframe,
            entry.target
        );
        for task in &entry.tasks {
            println!("  - {}", task);
        }
    }

    if let Some(projections) = &strategic.projections {
        println!("\nProjected scenarios:");
        print_scenario("Conservative", &projections.conservative);
        print_scenario("Optimistic", &projections.optimistic);
        print_scenario("Pessimistic", &projections.pessimistic);
        if let Some(growth) = &projections.growth {
            println!(
                "  Recent growth: impressions {} | ctr {} | conversions {}",
                format_percent(growth.impressions),
                format_percent(growth.ctr),
                format_percent(growth.conversions)
            );
        }
    }

    if let Some(objective) = args.objective.as_deref() {
        println!("\nObjective guidance:");
        for tip in objective_guidance(objective) {
            println!("- {}", tip);
        }
    }

    if let Some(path) = args.export {
        let series = analysis
            .series
            .as_ref()
            .ok_or_else(|| "no daily series to export".to_string())?;
        std::fs::write(&path, series.to_csv())
            .map_err(|err| format!("failed writing {}: {}", path.display(), err))?;
        println!("\nSeries exported to {}", path.display());
    }

    Ok(())
}

async fn run_campaigns() -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(None)?;
    let client = require_client(&config)?;
    let campaigns = client.campaigns().await.map_err(|err| err.to_string())?;

    if campaigns.is_empty() {
        println!("No campaigns found");
        return Ok(());
    }
    for campaign in campaigns {
        println!(
            "{} | {} | {} | {} | {}",
            campaign.id, campaign.name, campaign.status, campaign.objective, campaign.buying_type
        );
    }
    Ok(())
}

async fn run_adsets(args: AdsetsArgs) -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(None)?;
    let client = require_client(&config)?;
    let adsets = client
        .adsets(&args.campaign_id)
        .await
        .map_err(|err| err.to_string())?;

    if adsets.is_empty() {
        println!("No ad sets found for campaign {}", args.campaign_id);
        return Ok(());
    }
    for adset in adsets {
        println!(
            "{} | {} | daily {} | lifetime {} | {}",
            adset.id,
            adset.name,
            format_money(adset.daily_budget),
            format_money(adset.lifetime_budget),
            adset.optimization_goal
        );
    }
    Ok(())
}

async fn run_ads(args: AdsArgs) -> Result<(), String> {
    let (config, _) = AnalyzerConfig::load(None)?;
    let client = require_client(&config)?;
    let ads = client
        .ads(&args.adset_id)
        .await
        .map_err(|err| err.to_string())?;

    if ads.is_empty() {
        println!("No ads found for ad set {}", args.adset_id);
        return Ok(());
    }
    for ad in ads {
        println!(
            "{} | {} | {} | bid {} | {}",
            ad.id,
            ad.name,
            ad.status,
            format_money(ad.bid_amount),
            ad.created_time
        );
    }
    Ok(())
}

fn print_recommendations(recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        return;
    }
    println!("\nRecommendations:");
    for recommendation in recommendations {
        println!(
            "[{}] {}: {}",
            recommendation.severity.label(),
            recommendation.title,
            recommendation.message
        );
        for action in &recommendation.actions {
            println!("  - {}", action);
        }
    }
}

fn print_scenario(label: &str, scenario: &ProjectedScenario) {
    println!(
        "  {}: {} impressions | {} conversions | {} spend | ROI {}",
        label,
        format_number(scenario.impressions),
        format_number(scenario.conversions),
        format_money(scenario.spend),
        format_percent(scenario.roi_percent)
    );
}

fn require_client(config: &AnalyzerConfig) -> Result<MetaAdsClient, String> {
    MetaAdsClient::from_env(&config.meta)
        .ok_or_else(|| "META_ACCESS_TOKEN and META_AD_ACCOUNT_ID must be set".to_string())
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
