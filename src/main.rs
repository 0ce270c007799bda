use clap::Parser;
use rmqmon::collectors::Collector;
use rmqmon::config::Config;
use rmqmon::falcon::FalconSink;
use rmqmon::management::ManagementClient;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_tracing(config.json_logs);

    let source = ManagementClient::new(&config.management())?;
    let sink = FalconSink::new(config.falcon_api.clone(), config.http_timeout())?;
    let collector = Collector::new(source, sink, config.collector_settings());

    tracing::info!(
        endpoint = %collector.settings().endpoint,
        interval_secs = config.interval_secs,
        api = %config.api_url,
        "rmqmon starting"
    );

    if config.once {
        collector.run_cycle().await?;
        return Ok(());
    }

    // cycles never overlap: a slow cycle swallows the ticks it missed
    let mut tick = tokio::time::interval(config.collect_interval());
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(e) = collector.run_cycle().await {
                    tracing::error!(error = %e, "push failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}
