use crate::platform::Platform;

/// Ordered URLs worth probing for a profile.
///
/// The best guess always comes first, followed by platform-specific variants
/// that get progressively more generic; the bare homepage is always last.
/// Duplicates are dropped keeping the earliest position.
pub fn candidates(platform: Platform, handle: &str, best_guess: &str) -> Vec<String> {
    let variants = match platform {
        Platform::Youtube => vec![
            format!("https://www.youtube.com/@{handle}"),
            format!("https://m.youtube.com/@{handle}"),
            format!("https://www.youtube.com/c/{handle}"),
            format!("https://www.youtube.com/user/{handle}"),
            format!("https://www.youtube.com/@{handle}?hl=en"),
        ],
        Platform::Tiktok => vec![
            format!("https://www.tiktok.com/@{handle}"),
            format!("https://m.tiktok.com/@{handle}"),
            format!("https://www.tiktok.com/@{handle}?lang=en"),
        ],
        Platform::Instagram => vec![
            format!("https://www.instagram.com/{handle}/"),
            format!("https://instagram.com/{handle}/"),
            format!("https://www.instagram.com/{handle}/?hl=en"),
        ],
    };

    let homepage = platform.homepage().to_string();
    let mut out: Vec<String> = Vec::with_capacity(variants.len() + 2);
    let best_guess = best_guess.trim();
    if !best_guess.is_empty() {
        out.push(best_guess.to_string());
    }

    // No variants for an empty handle or a homepage best guess.
    if !handle.is_empty() && best_guess != homepage {
        for variant in variants {
            if !out.contains(&variant) {
                out.push(variant);
            }
        }
    }

    if !out.contains(&homepage) {
        out.push(homepage);
    }

    out
}
