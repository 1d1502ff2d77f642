//! Slash commands accepted at the prompt.

/// Supported slash commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// Store a fact directly.
    Remember { key: String, value: String },
    /// Show the record stored under a key.
    Lookup(String),
    Forget(String),
    Memories,
    History,
    Insights,
    /// Start a new conversation against the same memory.
    New,
    Help,
    Quit,
}

pub const HELP: &str = "\
/memory <key> = <value>  store a fact
/memory <key>            show a stored fact
/forget <key>            forget a fact
/memories                list everything remembered
/history                 show this conversation
/insights                analyze this conversation
/new                     start a new conversation
/help                    show this help
/quit                    save and exit";

/// Parse a slash command. Plain input returns `Ok(None)`.
pub fn parse_slash_command(input: &str) -> Result<Option<SlashCommand>, String> {
    let trimmed = input.trim();
    let Some(body) = trimmed.strip_prefix('/') else {
        return Ok(None);
    };
    let (command, rest) = body
        .split_once(char::is_whitespace)
        .map(|(command, rest)| (command, rest.trim()))
        .unwrap_or((body, ""));
    match command.to_lowercase().as_str() {
        "memory" | "remember" => parse_memory(rest).map(Some),
        "forget" => {
            if rest.is_empty() {
                return Err("usage: /forget <key>".to_string());
            }
            Ok(Some(SlashCommand::Forget(rest.to_string())))
        }
        "memories" => Ok(Some(SlashCommand::Memories)),
        "history" => Ok(Some(SlashCommand::History)),
        "insights" => Ok(Some(SlashCommand::Insights)),
        "new" => Ok(Some(SlashCommand::New)),
        "help" => Ok(Some(SlashCommand::Help)),
        "quit" | "exit" => Ok(Some(SlashCommand::Quit)),
        other => Err(format!("unknown command: /{other} (try /help)")),
    }
}

/// `<key> = <value>` stores; a bare key looks up. Without `=`, the first
/// word is the key and the remainder is the value.
fn parse_memory(rest: &str) -> Result<SlashCommand, String> {
    if rest.is_empty() {
        return Err("usage: /memory <key> = <value>".to_string());
    }
    let (key, value) = match rest.split_once('=') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => rest
            .split_once(char::is_whitespace)
            .map(|(key, value)| (key, value.trim()))
            .unwrap_or((rest, "")),
    };
    if key.is_empty() {
        return Err("usage: /memory <key> = <value>".to_string());
    }
    if value.is_empty() && !rest.contains('=') {
        return Ok(SlashCommand::Lookup(key.to_string()));
    }
    Ok(SlashCommand::Remember {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{SlashCommand, parse_slash_command};
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_slash_command("hello"), Ok(None));
    }

    #[test]
    fn memory_forms() {
        assert_eq!(
            parse_slash_command("/memory car keys = kitchen counter"),
            Ok(Some(SlashCommand::Remember {
                key: "car keys".to_string(),
                value: "kitchen counter".to_string(),
            }))
        );
        assert_eq!(
            parse_slash_command("/memory wallet bedroom drawer"),
            Ok(Some(SlashCommand::Remember {
                key: "wallet".to_string(),
                value: "bedroom drawer".to_string(),
            }))
        );
        assert_eq!(
            parse_slash_command("/memory car_keys"),
            Ok(Some(SlashCommand::Lookup("car_keys".to_string())))
        );
        assert!(parse_slash_command("/memory").is_err());
        assert!(parse_slash_command("/memory = x").is_err());
    }

    #[test]
    fn blank_value_with_separator_is_passed_through() {
        assert_eq!(
            parse_slash_command("/memory wallet ="),
            Ok(Some(SlashCommand::Remember {
                key: "wallet".to_string(),
                value: String::new(),
            }))
        );
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_slash_command(" /QUIT "), Ok(Some(SlashCommand::Quit)));
        assert_eq!(parse_slash_command("/new"), Ok(Some(SlashCommand::New)));
        assert_eq!(
            parse_slash_command("/forget car keys"),
            Ok(Some(SlashCommand::Forget("car keys".to_string())))
        );
        assert!(parse_slash_command("/forget").is_err());
        assert!(parse_slash_command("/bogus").is_err());
    }
}
