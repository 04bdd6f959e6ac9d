//! Message composition
//!
//! Builds the text of each notification and prepares it for the sink:
//! control characters are removed and the result is cut to
//! [`MAX_MESSAGE_CHARS`].

use crate::state::Tournament;

/// Hard ceiling on message length, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Message sent the first time tournaments are seen
pub fn baseline_message(monitor_name: &str, source_url: &str, count: usize) -> String {
    format!(
        "✅ **{} Active**\n\n\
         Now monitoring: {}\n\n\
         Baseline tournament count: {}\n\n\
         You'll be notified when new tournaments are added to the schedule.",
        monitor_name, source_url, count
    )
}

/// Message listing newly added tournaments, followed by a link to the page
pub fn new_tournaments_message(source_url: &str, tournaments: &[Tournament]) -> String {
    let mut message = format!(
        "🏆 **{} New Tournament(s) Added!**\n\n",
        tournaments.len()
    );

    for tournament in tournaments {
        message.push_str(&format!("📅 **{}**\n", tournament.name));
        match tournament.details() {
            Some(details) => message.push_str(&format!("{}\n\n", details)),
            None => message.push('\n'),
        }
    }

    // Angle brackets keep the chat client from embedding a preview
    message.push_str(&format!("<{}>", source_url));
    message
}

/// Message reporting a failed run
pub fn error_message(monitor_name: &str, error: &str) -> String {
    format!(
        "❌ **{} Error**\n\nFailed to check tournament schedule:\n```\n{}\n```",
        monitor_name, error
    )
}

/// Strips control characters and truncates to [`MAX_MESSAGE_CHARS`]
///
/// Newlines are kept since they separate the lines of every message; all
/// other C0 and C1 control characters are removed.
pub fn sanitize(message: &str) -> String {
    message
        .chars()
        .filter(|&c| c == '\n' || !c.is_control())
        .take(MAX_MESSAGE_CHARS)
        .collect()
}
