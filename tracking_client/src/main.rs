use std::{fs::OpenOptions, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracking_client::{
    cache::{FileCache, PositionCache},
    config::TrackerConfig,
    directions::GoogleDirections,
    map::HeadlessMap,
    realtime::{BroadcastProvider, LocalBroadcast, TcpBroadcast, FEED_CAPACITY},
    TrackingView, LOG_DIR, LOG_FILE,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let root: PathBuf = project_root::get_project_root().unwrap_or_else(|_| PathBuf::from("."));
    std::fs::create_dir_all(root.join(LOG_DIR)).context("Failed to create log directory")?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(root.join(LOG_FILE))
        .context("Failed to open log file")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("{}=trace", env!("CARGO_CRATE_NAME")).into())
        )
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file))
        .init();

    let config = TrackerConfig::parse();
    let session = config.session()?;
    let zoom = config.zoom()?;

    tracing::info!("Starting tracking client...");

    let file_cache = match &config.cache_dir {
        Some(dir) => FileCache::open_in(dir)?,
        None => FileCache::open()?,
    };
    let position_cache = PositionCache::new(Box::new(file_cache), &session);
    let directions = Arc::new(GoogleDirections::new(config.maps_api_key.clone())?);

    let event = session.event_name();
    let messages = match &config.feed_addr {
        Some(addr) => TcpBroadcast::new(addr.clone()).subscribe(&config.channel, &event).await?,
        None => {
            let hub = LocalBroadcast::new(FEED_CAPACITY);
            let messages = hub.subscribe(&config.channel, &event).await?;
            tokio::spawn(async move {
                match hub.publish_lines(BufReader::new(tokio::io::stdin())).await {
                    Ok(published) => tracing::info!("Replayed {published} messages from stdin"),
                    Err(err) => tracing::error!("Failed to replay stdin: {err}"),
                }
            });
            messages
        }
    };

    let mut view = TrackingView::bootstrap(session, HeadlessMap::new(), position_cache, directions, zoom);

    tokio::select! {
        _ = view.run(messages) => {}
        _ = tokio::signal::ctrl_c() => tracing::info!("Interrupted"),
    }

    match view.route() {
        Some(route) => {
            let panel = route.panel();
            println!("{}: {}", panel.label, panel.distance_text);
        }
        None => println!("No location received"),
    }

    Ok(())
}
