use pulldown_cmark::Options;
use serde::{Deserialize, Serialize};

/// Knobs for a [`Parser`](crate::parsing::Parser).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Reuse blocks from the previous parse and skip unchanged container subtrees.
    pub incremental: bool,
    /// GitHub-style pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~` spans (text is passed through either way).
    pub strikethrough: bool,
    /// Curly quotes and dashes in text.
    pub smart_punctuation: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            tables: true,
            strikethrough: true,
            smart_punctuation: false,
        }
    }
}

impl ParserOptions {
    pub(crate) fn cmark_options(&self) -> Options {
        let mut options = Options::empty();
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.smart_punctuation {
            options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }
        options
    }
}
