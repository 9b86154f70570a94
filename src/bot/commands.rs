//! Chat input parsing: slash commands and menu buttons map onto one
//! [`Action`] each.

pub const BTN_SAVE: &str = "💾 Save link";
pub const BTN_VIEWED: &str = "✅ Mark viewed";
pub const BTN_RANDOM: &str = "🎲 Random";
pub const BTN_RANDOM_ARTICLE: &str = "📰 Random article";
pub const BTN_RANDOM_VIDEO: &str = "🎬 Random video";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `/start`
    Start,
    /// `/save <url>`; the payload may be empty.
    Save(String),
    /// `/viewed <id>`; the payload may be empty.
    Viewed(String),
    /// `/random [resource]` and the three random buttons.
    Random(Option<String>),
    /// "Save link" button.
    SaveHint,
    /// "Mark viewed" button.
    ViewedHint,
    /// A slash command we do not know.
    Unknown,
    /// Free text that is neither a command nor a button.
    Help,
}

/// Classify a text message. Blank text yields `None`.
pub fn parse(text: &str) -> Option<Action> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let action = match text {
        BTN_SAVE => Action::SaveHint,
        BTN_VIEWED => Action::ViewedHint,
        BTN_RANDOM => Action::Random(None),
        BTN_RANDOM_ARTICLE => Action::Random(Some("article".into())),
        BTN_RANDOM_VIDEO => Action::Random(Some("video".into())),
        _ if text.starts_with('/') => parse_command(&text[1..]),
        _ => Action::Help,
    };
    Some(action)
}

fn parse_command(text: &str) -> Action {
    let (head, payload) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    // "/save@my_bot" in group chats
    let name = head.split('@').next().unwrap_or(head).to_ascii_lowercase();

    match name.as_str() {
        "start" => Action::Start,
        "save" => Action::Save(payload.to_owned()),
        "viewed" => Action::Viewed(payload.to_owned()),
        "random" => Action::Random(Some(payload.to_owned()).filter(|p| !p.is_empty())),
        _ => Action::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_with_payloads() {
        assert_eq!(parse("/start"), Some(Action::Start));
        assert_eq!(
            parse("/save  https://example.com/a "),
            Some(Action::Save("https://example.com/a".into()))
        );
        assert_eq!(parse("/viewed abc-123"), Some(Action::Viewed("abc-123".into())));
        assert_eq!(parse("/random video"), Some(Action::Random(Some("video".into()))));
    }

    #[test]
    fn missing_payloads_are_empty() {
        assert_eq!(parse("/save"), Some(Action::Save(String::new())));
        assert_eq!(parse("/viewed   "), Some(Action::Viewed(String::new())));
        assert_eq!(parse("/random"), Some(Action::Random(None)));
    }

    #[test]
    fn bot_mentions_and_case_are_ignored() {
        assert_eq!(
            parse("/SAVE@linkkeeper_bot https://x.io"),
            Some(Action::Save("https://x.io".into()))
        );
        assert_eq!(parse("/start@linkkeeper_bot"), Some(Action::Start));
    }

    #[test]
    fn buttons_map_to_actions() {
        assert_eq!(parse(BTN_SAVE), Some(Action::SaveHint));
        assert_eq!(parse(BTN_VIEWED), Some(Action::ViewedHint));
        assert_eq!(parse(BTN_RANDOM), Some(Action::Random(None)));
        assert_eq!(parse(BTN_RANDOM_ARTICLE), Some(Action::Random(Some("article".into()))));
        assert_eq!(parse(BTN_RANDOM_VIDEO), Some(Action::Random(Some("video".into()))));
    }

    #[test]
    fn everything_else() {
        assert_eq!(parse("   "), None);
        assert_eq!(parse("/frobnicate"), Some(Action::Unknown));
        assert_eq!(parse("hello there"), Some(Action::Help));
    }
}
