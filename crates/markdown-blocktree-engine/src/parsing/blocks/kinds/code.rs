/// A code block leaf. Content is kept verbatim apart from its final newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// First word of a fenced block's info string.
    pub lang_hint: Option<String>,
    pub text: String,
}

impl CodeBlock {
    pub fn new(text: &str, lang_hint: Option<String>) -> Self {
        Self {
            lang_hint,
            text: text.strip_suffix('\n').unwrap_or(text).to_string(),
        }
    }
}
