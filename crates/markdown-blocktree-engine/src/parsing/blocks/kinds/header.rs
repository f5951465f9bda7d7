/// A heading leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
    /// 1 to 6.
    pub level: u8,
    pub text: String,
}

impl HeaderBlock {
    /// Deepest heading level that is rendered with a divider line underneath.
    pub const DIVIDER_MAX_LEVEL: u8 = 2;

    pub fn new(level: u8, text: &str) -> Self {
        Self {
            level,
            text: text.to_string(),
        }
    }

    pub fn has_divider_below(&self) -> bool {
        self.level <= Self::DIVIDER_MAX_LEVEL
    }
}
