//! Pipeline driver for training and analysis.

use anyhow::Result;
use clap::{Parser, Subcommand};
use news_reaction::config::Config;
use news_reaction::nlp::{attach_probability_features, SentimentModel, TfidfVectorizer};
use news_reaction::{
    aggregate, align, clean_news, feature_matrix, load_market, load_news, prepare_market, rank,
    seed_sentiment, AlignedEvent, PriceSeries, ReactionModel,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "news_reaction")]
#[command(about = "News sentiment and market reaction analysis")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the sentiment and reaction models
    Train,

    /// Aggregate returns around news events into event-study curves
    EventStudy {
        /// Calendar days on each side of each event
        #[arg(short, long)]
        window: Option<i64>,
    },

    /// Rank sentiment probability features by correlation with the reaction
    Correlate,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Train => train(&config),
        Commands::EventStudy { window } => {
            event_study(&config, window.unwrap_or(config.event_study.window_days))
        }
        Commands::Correlate => correlate(&config),
    }
}

fn train(config: &Config) -> Result<()> {
    let (aligned, _) = aligned_events(config)?;

    info!("training sentiment model on {} events", aligned.len());
    let sentiment = fit_sentiment(config, &aligned)?;
    sentiment.save(&config.paths.sentiment_model)?;
    info!(path = %config.paths.sentiment_model, "sentiment model saved");

    let mut featured = aligned;
    attach_probability_features(
        &mut featured,
        &sentiment,
        &config.correlation.feature_prefix,
        &config.alignment.required_attribute,
    )?;

    info!("training reaction regression");
    let (x, y, names) = feature_matrix(&featured, &config.correlation.feature_prefix)?;
    let mut reaction = ReactionModel::default();
    reaction.feature_names = names;
    reaction.fit(&x, &y)?;
    if let Some(r_squared) = reaction.r_squared {
        info!(r_squared, "reaction model fitted");
    }
    reaction.save(&config.paths.reaction_model)?;
    info!(path = %config.paths.reaction_model, "reaction model saved");

    Ok(())
}

fn event_study(config: &Config, window: i64) -> Result<()> {
    info!("loading market data");
    let market_rows = load_market(&config.paths.market_csv)?;
    let series = prepare_market(&market_rows)?;

    info!("loading news data");
    let news_rows = load_news(&config.paths.news_csv)?;
    let events = clean_news(&news_rows);
    let event_times: Vec<_> = events.iter().map(|event| event.timestamp).collect();

    let result = aggregate(&event_times, &series, window)?;
    if result.is_empty() {
        println!("no event has market coverage inside the window");
        return Ok(());
    }

    println!("{:>7}  {:>12}  {:>12}", "offset", "avg return", "cumulative");
    for (offset, avg) in &result.avg_abnormal_return {
        let cumulative = result.cumulative_abnormal_return[offset];
        println!("{:>7}  {:>12.6}  {:>12.6}", offset, avg, cumulative);
    }
    Ok(())
}

fn correlate(config: &Config) -> Result<()> {
    let (aligned, _) = aligned_events(config)?;

    let sentiment = fit_sentiment(config, &aligned)?;
    let mut featured = aligned;
    attach_probability_features(
        &mut featured,
        &sentiment,
        &config.correlation.feature_prefix,
        &config.alignment.required_attribute,
    )?;

    let table = rank(&featured, &config.correlation.feature_prefix)?;
    println!("{:<30}  {:>12}", "feature", "correlation");
    for (feature, correlation) in table {
        println!("{:<30}  {:>12.6}", feature, correlation);
    }
    Ok(())
}

/// Load, clean, seed-label, and align both datasets.
fn aligned_events(config: &Config) -> Result<(Vec<AlignedEvent>, PriceSeries)> {
    info!("loading raw datasets");
    let news_rows = load_news(&config.paths.news_csv)?;
    let market_rows = load_market(&config.paths.market_csv)?;

    info!("preprocessing news");
    let mut events = clean_news(&news_rows);
    seed_sentiment(&mut events);

    info!("aligning events to market");
    let series = prepare_market(&market_rows)?;
    let aligned = align(&events, &series, &config.alignment.to_align_config())?;
    info!("{} of {} events aligned", aligned.len(), events.len());

    Ok((aligned, series))
}

/// Fit the sentiment model on aligned events using their seed labels.
fn fit_sentiment(config: &Config, aligned: &[AlignedEvent]) -> Result<SentimentModel> {
    let texts: Vec<String> = aligned
        .iter()
        .map(|entry| {
            entry
                .event
                .text(&config.alignment.required_attribute)
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    let labels: Vec<i64> = aligned
        .iter()
        .map(|entry| {
            entry
                .event
                .number(news_reaction::defaults::SEED_ATTRIBUTE)
                .unwrap_or(0.0) as i64
        })
        .collect();

    let vectorizer = TfidfVectorizer::new(config.training.max_features);
    let mut model = SentimentModel::new(vectorizer)
        .with_learning_rate(config.training.learning_rate)
        .with_max_iter(config.training.max_iter);
    model.fit(&texts, &labels)?;
    Ok(model)
}
