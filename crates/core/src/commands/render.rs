//! Chat message formatting.

use chrono::{DateTime, Utc};

use crate::catalog::{AssetRef, ServerStats};
use crate::policy::format_size;
use crate::prefs::Preferences;

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%m/%d/%y - %H:%M:%S UTC").to_string()
}

/// Detail block sent alongside each delivered asset.
pub fn format_asset_details(asset: &AssetRef) -> String {
    let mut details = format!(
        "**File Details:**\nID: {}\nOriginal File Name: {}\nType: {}\nSize: {}",
        asset.id,
        asset.file_name,
        asset.media_type.as_str(),
        format_size(asset.size_bytes),
    );
    if let (Some(w), Some(h)) = (asset.width, asset.height) {
        details.push_str(&format!("\nResolution: {}x{}", w, h));
    }
    if let Some(created) = &asset.created_at {
        details.push_str(&format!("\nCreated: {}", format_date(created)));
    }
    details
}

pub fn format_stats(stats: &ServerStats) -> String {
    let mut text = format!(
        "**Server Statistics**\n\n**Total Assets:** {}\n**Photos:** {}\n**Videos:** {}\n",
        stats.total_assets(),
        stats.photos,
        stats.videos,
    );
    if let Some(usage) = stats.usage_bytes {
        text.push_str(&format!("**Storage Used:** {}\n", format_size(usage)));
    }
    text
}

/// Current-preferences listing for `.prefs`.
pub fn format_preferences(prefix: &str, prefs: &Preferences) -> String {
    let media = prefs
        .default_media_type
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "All types".to_string());
    let min = prefs
        .min_size_bytes
        .map(format_size)
        .unwrap_or_else(|| "Not set".to_string());
    let max = prefs
        .max_size_bytes
        .map(format_size)
        .unwrap_or_else(|| "Not set".to_string());

    format!(
        "**Your Current Preferences**\n\
         Default Media Type (mt): {}\n\
         Minimum File Size (min): {}\n\
         Maximum File Size (max): {}\n\
         Account Tier (tier): {}\n\
         API Retry Attempts (attempts): {}\n\
         Progress Update Interval (interval): {} attempts\n\n\
         Use `{p}prefs set <setting> <value>` to change a setting\n\
         Use `{p}helppref` for detailed setting information\n\
         Use `{p}prefs reset` to reset to defaults",
        media,
        min,
        max,
        prefs.account_tier.as_str(),
        prefs.max_attempts,
        prefs.progress_update_interval,
        p = prefix,
    )
}

/// The `.help` menu, including the user's effective limits.
pub fn format_help(prefix: &str, prefs: &Preferences) -> String {
    format!(
        "```\n\
         📋 SHUFFLEBOT HELP\n\
         ═══════════════════════\n\n\
         ⚙️ Current Settings\n\
         \x20 • Max File Size: {}\n\
         \x20 • Max Attempts: {}\n\
         \x20 • Update Interval: {} attempts\n\
         \n\
         🎲 Random Assets\n\
         \x20 └─ {p}random [options]\n\
         \x20    ├─ min:size    Minimum file size (e.g., min:2mb)\n\
         \x20    ├─ max:size    Maximum file size (e.g., max:5mb)\n\
         \x20    ├─ image/video Filter by type\n\
         \x20    ├─ count:n     Number of assets (max 10)\n\
         \x20    └─ Example: {p}random min:2mb max:5mb image count:3\n\
         \n\
         📁 Assets\n\
         \x20 ├─ {p}get <id>             Fetch a specific asset\n\
         \x20 ├─ {p}favorite <id|last>   Mark as favorite\n\
         \x20 ├─ {p}unfavorite <id|last> Unmark as favorite\n\
         \x20 ├─ {p}delete <id|last>     Delete an asset\n\
         \x20 └─ {p}stats                Server statistics\n\
         \n\
         ⚙️ Preferences\n\
         \x20 └─ {p}prefs [set <setting> <value>|reset]\n\
         \n\
         🛑 Control\n\
         \x20 └─ {p}cancel    Stop ongoing search\n\
         ```",
        format_size(prefs.account_tier.max_bytes()),
        prefs.max_attempts,
        prefs.progress_update_interval,
        p = prefix,
    )
}

/// Detailed settings help for `.helppref`.
pub fn format_pref_help(prefix: &str) -> String {
    format!(
        "```\n\
         Preference Settings Help\n\
         =======================\n\
         \n\
         media_type (mt, type)      : Default media type\n\
         \x20   Values: image, video, all\n\
         \x20   Example: {p}prefs set mt image\n\
         \n\
         min_size (mins, min)       : Default minimum file size\n\
         \x20   Format: number + mb/kb\n\
         \x20   Example: {p}prefs set min 2mb\n\
         \n\
         max_size (maxs, max)       : Default maximum file size\n\
         \x20   Format: number + mb/kb\n\
         \x20   Example: {p}prefs set max 5mb\n\
         \n\
         tier (account)             : Account tier for upload ceilings\n\
         \x20   Values: basic, nitro_basic, nitro\n\
         \x20   Example: {p}prefs set tier nitro\n\
         \n\
         max_attempts (attempts)    : Fetch failures tolerated per search\n\
         \x20   Format: positive number\n\
         \x20   Example: {p}prefs set attempts 50\n\
         \n\
         update_interval (interval) : Progress update interval in attempts\n\
         \x20   Format: positive number\n\
         \x20   Example: {p}prefs set interval 5\n\
         ```",
        p = prefix,
    )
}
