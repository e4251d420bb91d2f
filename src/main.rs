use std::sync::Arc;

use clap::Parser;

mod channels;
mod cli;
mod config;
mod enrich;
mod logging;
mod metadata;
mod platform;
mod scrape;
#[cfg(test)]
mod tests;
mod web;

use channels::{ChannelQuery, Metric, Period};
use config::{ApiCredentials, Config};
use metadata::{Cancellation, MetadataResolver, ResolveRequest};

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    logging::init_logging(args.verbose)?;

    let config = Config::load_with(args.config.as_deref())?;
    let credentials = ApiCredentials::from_env();
    log::debug!("credentials: {credentials:?}");

    let resolver = Arc::new(MetadataResolver::with_reqwest(&credentials, &config.resolver)?);
    metadata::install_global_resolver(resolver.clone())?;

    match args.command {
        cli::Command::Resolve {
            platform,
            handle,
            fallback_url,
            fallback_profile_image,
            report,
        } => {
            if report {
                let req = ResolveRequest::new(platform, handle).with_fallbacks(fallback_url, fallback_profile_image);
                let (meta, report) = resolver.resolve_with_report(&req, &Cancellation::new());
                let out = serde_json::json!({ "metadata": meta, "report": report });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                let meta = metadata::resolve_channel_metadata(
                    platform,
                    &handle,
                    fallback_url.as_deref(),
                    fallback_profile_image.as_deref(),
                );
                println!("{}", serde_json::to_string_pretty(&meta)?);
            }
            Ok(())
        }

        cli::Command::Channels {
            platform,
            period,
            metric,
            page,
            per_page,
            no_enrich,
        } => {
            let query = ChannelQuery {
                platform: platform::parse_platform_filter(Some(platform.as_str()))?,
                period: Period::parse_lenient(Some(period.as_str())),
                metric: Metric::parse_lenient(Some(metric.as_str())),
                page,
                per_page: per_page.unwrap_or(config.listing.default_per_page),
            };

            let catalogue = channels::generate_channels();
            let mut page = channels::list_channels(&catalogue, &query, config.listing.max_per_page);

            if !no_enrich {
                let cancel = Cancellation::new();
                ctrlc::set_handler({
                    let cancel = cancel.clone();
                    move || {
                        log::warn!("interrupted, skipping pending resolutions");
                        cancel.cancel();
                    }
                })?;

                let enricher = enrich::Enricher::from_config(&config.listing)?;
                enricher.enrich(&resolver, &mut page.channels, &cancel);
            }

            println!("{}", serde_json::to_string_pretty(&page)?);
            Ok(())
        }

        cli::Command::Daemon {} => {
            let state = web::SharedState {
                resolver,
                catalogue: Arc::new(channels::generate_channels()),
                enricher: Arc::new(enrich::Enricher::from_config(&config.listing)?),
                config: Arc::new(config),
            };
            web::start_daemon(state)
        }
    }
}
