//! The `.prefs` command group.

use std::sync::Arc;

use crate::catalog::MediaType;
use crate::policy::{parse_size, AccountTier};

use super::render::format_preferences;
use super::{BotContext, CommandError};

/// Dispatch `.prefs`, `.prefs set <setting> <value>` and `.prefs reset`.
pub async fn handle_prefs(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    args: &[String],
) -> Result<(), CommandError> {
    match args.first().map(|s| s.as_str()) {
        None => {
            let prefs = ctx.prefs.load(user_id);
            let text = format_preferences(&ctx.command_prefix, &prefs);
            ctx.transport.send_message(channel, &text).await?;
            Ok(())
        }
        Some("set") => {
            let setting = args
                .get(1)
                .ok_or(CommandError::MissingArgument("setting name"))?;
            let value = args
                .get(2)
                .ok_or(CommandError::MissingArgument("setting value"))?;
            set_preference(ctx, user_id, channel, setting, value).await
        }
        Some("reset") => {
            ctx.prefs.reset(user_id)?;
            ctx.transport
                .send_message(channel, "Preferences reset to defaults.")
                .await?;
            Ok(())
        }
        Some(other) => Err(CommandError::Parse(format!(
            "Unknown prefs subcommand: '{}' (expected set or reset)",
            other
        ))),
    }
}

/// Canonical setting name for an alias, from the original command table.
fn canonical_setting(alias: &str) -> Option<&'static str> {
    match alias.to_ascii_lowercase().as_str() {
        "media_type" | "mt" | "type" => Some("media_type"),
        "min_size" | "mins" | "min" => Some("min_size"),
        "max_size" | "maxs" | "max" => Some("max_size"),
        "tier" | "account" => Some("tier"),
        "max_attempts" | "attempts" | "retry" => Some("max_attempts"),
        "update_interval" | "interval" | "update" => Some("update_interval"),
        _ => None,
    }
}

async fn set_preference(
    ctx: &Arc<BotContext>,
    user_id: &str,
    channel: &str,
    setting: &str,
    value: &str,
) -> Result<(), CommandError> {
    let setting = canonical_setting(setting).ok_or_else(|| {
        CommandError::Parse(format!(
            "Invalid setting: '{}'. Use {}helppref to see available settings.",
            setting, ctx.command_prefix
        ))
    })?;

    match setting {
        "media_type" => {
            let media = match value.to_ascii_lowercase().as_str() {
                "all" => None,
                other => Some(MediaType::parse(other).ok_or_else(|| {
                    CommandError::Parse(
                        "Media type must be 'image', 'video' or 'all'".to_string(),
                    )
                })?),
            };
            ctx.prefs
                .update(user_id, &mut |p| p.default_media_type = media)?;
        }
        "min_size" | "max_size" => {
            let bytes = parse_size(value).map_err(|e| CommandError::Parse(e.to_string()))?;
            ctx.prefs.update(user_id, &mut |p| {
                if setting == "min_size" {
                    p.min_size_bytes = Some(bytes);
                } else {
                    p.max_size_bytes = Some(bytes);
                }
            })?;
        }
        "tier" => {
            let tier = AccountTier::parse(value).ok_or_else(|| {
                CommandError::Parse(
                    "Tier must be 'basic', 'nitro_basic' or 'nitro'".to_string(),
                )
            })?;
            ctx.prefs.update(user_id, &mut |p| p.account_tier = tier)?;
        }
        "max_attempts" => {
            let attempts = parse_positive(value, "Max attempts")?;
            ctx.prefs.update(user_id, &mut |p| p.max_attempts = attempts)?;
        }
        "update_interval" => {
            let interval = parse_positive(value, "Update interval")?;
            ctx.prefs
                .update(user_id, &mut |p| p.progress_update_interval = interval)?;
        }
        _ => unreachable!("canonical_setting restricts names"),
    }

    ctx.transport
        .send_message(channel, &format!("Updated {} preference.", setting))
        .await?;
    Ok(())
}

fn parse_positive(value: &str, what: &str) -> Result<u32, CommandError> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(CommandError::Parse(format!(
            "{} must be a positive number",
            what
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use crate::catalog::MediaType;
    use crate::policy::AccountTier;

    #[tokio::test]
    async fn test_aliases_resolve() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set type video").await;
        h.router.dispatch("alice", "chan", ".prefs set maxs 5mb").await;
        h.router.dispatch("alice", "chan", ".prefs set retry 7").await;
        h.router.dispatch("alice", "chan", ".prefs set account nitro").await;

        let prefs = h.ctx.prefs.load("alice");
        assert_eq!(prefs.default_media_type, Some(MediaType::Video));
        assert_eq!(prefs.max_size_bytes, Some(5_000_000));
        assert_eq!(prefs.max_attempts, 7);
        assert_eq!(prefs.account_tier, AccountTier::Nitro);
    }

    #[tokio::test]
    async fn test_media_type_all_clears_filter() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set mt image").await;
        h.router.dispatch("alice", "chan", ".prefs set mt all").await;
        assert!(h.ctx.prefs.load("alice").default_media_type.is_none());
    }

    #[tokio::test]
    async fn test_invalid_setting_rejected() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set color blue").await;
        assert!(h.transport.last_text().unwrap().contains("Invalid setting"));
    }

    #[tokio::test]
    async fn test_zero_attempts_rejected() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set attempts 0").await;
        assert!(h
            .transport
            .last_text()
            .unwrap()
            .contains("must be a positive number"));
        assert_eq!(h.ctx.prefs.load("alice").max_attempts, 50);
    }

    #[tokio::test]
    async fn test_bad_size_rejected() {
        let h = harness();
        h.router.dispatch("alice", "chan", ".prefs set min huge").await;
        assert!(h.transport.last_text().unwrap().contains("Invalid input"));
    }
}
