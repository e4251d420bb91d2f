use crate::platform::{Platform, ALL_PLATFORMS};
use serde::{Deserialize, Serialize};

const CHANNELS_PER_PLATFORM: usize = 120;
const SUBSCRIBER_CAP: u64 = 99_000;
const LISTING_SUBSCRIBER_LIMIT: u64 = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub handle: String,
    pub url: String,
    pub profile_image: String,
    pub total_subscribers: u64,
    pub subscribers_gain: u64,
    pub views_gain: u64,
    pub likes_gain: u64,
    pub platform: Platform,
}

struct BaseGains {
    subscribers: f64,
    views: f64,
    likes: f64,
}

struct PlatformSeed {
    platform: Platform,
    prefix: &'static str,
    start_subscribers: f64,
    subscriber_step: f64,
    gains: BaseGains,
    /// Catalogue URLs are this base followed by the channel's position.
    url_base: &'static str,
    profile_image_base: &'static str,
}

fn seed_for(platform: Platform) -> PlatformSeed {
    match platform {
        Platform::Youtube => PlatformSeed {
            platform,
            prefix: "YouTube Frontier",
            start_subscribers: 18_000.0,
            subscriber_step: 520.0,
            gains: BaseGains {
                subscribers: 13_500.0,
                views: 620_000.0,
                likes: 42_000.0,
            },
            url_base: "https://www.youtube.com/@sgw_youtube_",
            profile_image_base: "https://images.unsplash.com/photo-1500648767791-00dcc994a43e?auto=format&fit=crop&w=100&q=60",
        },
        Platform::Tiktok => PlatformSeed {
            platform,
            prefix: "TikTok Riser",
            start_subscribers: 14_000.0,
            subscriber_step: 470.0,
            gains: BaseGains {
                subscribers: 11_800.0,
                views: 720_000.0,
                likes: 56_000.0,
            },
            url_base: "https://www.tiktok.com/@sgw_tiktok_",
            profile_image_base: "https://images.unsplash.com/photo-1524504388940-b1c1722653e1?auto=format&fit=crop&w=100&q=60",
        },
        Platform::Instagram => PlatformSeed {
            platform,
            prefix: "Instagram Blossom",
            start_subscribers: 10_000.0,
            subscriber_step: 430.0,
            gains: BaseGains {
                subscribers: 9_800.0,
                views: 310_000.0,
                likes: 64_000.0,
            },
            url_base: "https://www.instagram.com/sgw_instagram_",
            profile_image_base: "https://images.unsplash.com/photo-1504593811423-6dd665756598?auto=format&fit=crop&w=100&q=60",
        },
    }
}

fn subscribers_at(seed: &PlatformSeed, index: usize) -> u64 {
    ((seed.start_subscribers + index as f64 * seed.subscriber_step).round() as u64).min(SUBSCRIBER_CAP)
}

/// Growth decays with rank but never below a floor.
fn momentum_for_index(index: usize) -> f64 {
    let decay = index as f64 / (CHANNELS_PER_PLATFORM as f64 * 1.2);
    (1.0 - decay).max(0.32)
}

fn generate_for(seed: &PlatformSeed) -> Vec<Channel> {
    (0..CHANNELS_PER_PLATFORM)
        .map(|index| {
            let position = index + 1;
            let momentum = momentum_for_index(index);
            let handle = format!("sgw_{}_{position}", seed.platform);

            Channel {
                name: format!("{} {position:03}", seed.prefix),
                url: format!("{}{position}", seed.url_base),
                profile_image: format!("{}&sig={}-{position}", seed.profile_image_base, seed.platform),
                handle,
                total_subscribers: subscribers_at(seed, index),
                subscribers_gain: ((seed.gains.subscribers * momentum).round() as u64).max(400),
                views_gain: ((seed.gains.views * momentum).round() as u64).max(15_000),
                likes_gain: ((seed.gains.likes * momentum).round() as u64).max(800),
                platform: seed.platform,
            }
        })
        .collect()
}

/// Deterministic synthetic catalogue, 120 channels per platform.
pub fn generate_channels() -> Vec<Channel> {
    ALL_PLATFORMS.iter().flat_map(|p| generate_for(&seed_for(*p))).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Period {
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "2w")]
    TwoWeeks,
    #[serde(rename = "1w")]
    OneWeek,
}

impl Period {
    /// Unknown values fall back to one month.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("2w") => Period::TwoWeeks,
            Some("1w") => Period::OneWeek,
            _ => Period::OneMonth,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Period::OneMonth => 1.0,
            Period::TwoWeeks => 0.65,
            Period::OneWeek => 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Subscribers,
    Views,
    Likes,
}

impl Metric {
    /// Unknown values fall back to subscribers.
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("views") => Metric::Views,
            Some("likes") => Metric::Likes,
            _ => Metric::Subscribers,
        }
    }

    fn value(&self, channel: &Channel) -> u64 {
        match self {
            Metric::Subscribers => channel.subscribers_gain,
            Metric::Views => channel.views_gain,
            Metric::Likes => channel.likes_gain,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChannelQuery {
    /// `None` means every platform
    pub platform: Option<Platform>,
    pub period: Period,
    pub metric: Metric,
    /// 1-based
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Filters, scales, sorts and paginates the catalogue.
pub fn list_channels(catalogue: &[Channel], query: &ChannelQuery, max_per_page: usize) -> ChannelPage {
    let multiplier = query.period.multiplier();
    let scale = |v: u64| (v as f64 * multiplier).round() as u64;

    let mut channels: Vec<Channel> = catalogue
        .iter()
        .filter(|c| query.platform.map_or(true, |p| c.platform == p))
        .filter(|c| c.total_subscribers <= LISTING_SUBSCRIBER_LIMIT)
        .map(|c| Channel {
            subscribers_gain: scale(c.subscribers_gain),
            views_gain: scale(c.views_gain),
            likes_gain: scale(c.likes_gain),
            ..c.clone()
        })
        .collect();

    // Stable sort keeps catalogue order among ties.
    channels.sort_by(|a, b| query.metric.value(b).cmp(&query.metric.value(a)));

    let total = channels.len();
    let per_page = query.per_page.clamp(1, max_per_page.max(1));
    let page = query.page.max(1);
    let channels = channels
        .into_iter()
        .skip((page - 1).saturating_mul(per_page))
        .take(per_page)
        .collect();

    ChannelPage {
        channels,
        total,
        page,
        per_page,
    }
}
