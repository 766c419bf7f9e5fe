//! Command line parsing.

use crate::catalog::MediaType;
use crate::policy::parse_size;

use super::CommandError;

/// A prefixed command split into name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub name: String,
    pub args: Vec<String>,
}

/// Split a raw chat line into a command, if it carries the prefix.
///
/// Returns `None` for ordinary chat messages.
pub fn parse_line(prefix: &str, line: &str) -> Option<CommandLine> {
    let line = line.trim();
    let rest = line.strip_prefix(prefix)?;
    let mut words = rest.split_whitespace();
    let name = words.next()?.to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }
    Some(CommandLine {
        name,
        args: words.map(|w| w.to_string()).collect(),
    })
}

/// Parsed arguments of the `.random` command.
///
/// Grammar: `[min:<size>] [max:<size>] [image|video] [count:<n>]`,
/// in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RandomArgs {
    pub min_size_bytes: Option<u64>,
    pub max_size_bytes: Option<u64>,
    pub media: Option<MediaType>,
    pub count: Option<usize>,
}

pub fn parse_random_args(args: &[String]) -> Result<RandomArgs, CommandError> {
    let mut parsed = RandomArgs::default();

    for arg in args {
        let arg = arg.to_ascii_lowercase();
        if let Some(value) = arg.strip_prefix("min:") {
            parsed.min_size_bytes = Some(
                parse_size(value).map_err(|e| CommandError::Parse(e.to_string()))?,
            );
        } else if let Some(value) = arg.strip_prefix("max:") {
            parsed.max_size_bytes = Some(
                parse_size(value).map_err(|e| CommandError::Parse(e.to_string()))?,
            );
        } else if let Some(value) = arg.strip_prefix("count:") {
            let count: usize = value.parse().map_err(|_| {
                CommandError::Parse(format!("Invalid count: '{}'", value))
            })?;
            parsed.count = Some(count);
        } else if let Some(media) = MediaType::parse(&arg) {
            parsed.media = Some(media);
        } else {
            return Err(CommandError::Parse(format!(
                "Unknown argument: '{}' (expected min:<size>, max:<size>, image, video or count:<n>)",
                arg
            )));
        }
    }

    Ok(parsed)
}
