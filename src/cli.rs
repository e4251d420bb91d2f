use crate::platform::Platform;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a YAML config file. Defaults apply when it does not exist.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging for this crate (RUST_LOG overrides)
    #[clap(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a channel's profile URL and profile image
    Resolve {
        #[clap(value_enum)]
        platform: Platform,

        /// Channel handle, with or without a leading @
        handle: String,

        /// URL to use when nothing better is found
        #[clap(long)]
        fallback_url: Option<String>,

        /// Profile image to use when nothing better is found
        #[clap(long)]
        fallback_profile_image: Option<String>,

        /// Print a per-stage report alongside the result
        #[clap(long, default_value = "false")]
        report: bool,
    },

    /// List ranked channels
    Channels {
        /// youtube, tiktok, instagram or all
        #[clap(long, default_value = "all")]
        platform: String,

        /// 1m, 2w or 1w
        #[clap(long, default_value = "1m")]
        period: String,

        /// subscribers, views or likes
        #[clap(long, default_value = "subscribers")]
        metric: String,

        #[clap(long, default_value = "1")]
        page: usize,

        #[clap(long)]
        per_page: Option<usize>,

        /// Don't resolve channel metadata
        #[clap(long, default_value = "false")]
        no_enrich: bool,
    },

    /// Run the HTTP API
    Daemon {},
}
