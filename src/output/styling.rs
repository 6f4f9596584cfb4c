//! Terminal styles named by what they mark, not by color.

use std::fmt::Display;

use console::{style, StyledObject};

type Styled = StyledObject<String>;

fn styled(text: impl Display) -> Styled {
    style(text.to_string())
}

/// Emoji followed by an underlined title.
pub fn heading(emoji: &str, title: &str) -> String {
    format!("{} {}", styled(emoji).bright(), styled(title).bright().underlined())
}

/// Field names and secondary text such as URLs and timestamps.
pub fn muted(text: impl Display) -> Styled {
    styled(text).dim()
}

/// Values the reader should look at: thresholds, repositories.
pub fn accent(text: impl Display) -> Styled {
    styled(text).cyan()
}

pub fn flagged(text: impl Display) -> Styled {
    styled(text).bright().red()
}

pub fn healthy(text: impl Display) -> Styled {
    styled(text).bright().green()
}

/// Counts, in-progress work and results that are neither good nor bad.
pub fn attention(text: impl Display) -> Styled {
    styled(text).bright().yellow()
}

/// Green when nothing is flagged, red otherwise.
pub fn flag_count(count: usize) -> Styled {
    if count == 0 {
        healthy(count)
    } else {
        flagged(count)
    }
}

pub fn brand(text: impl Display) -> Styled {
    styled(text).magenta().bold()
}
