pub mod parsing;

// Re-export key types for easier usage
pub use parsing::{
    AnnotatedText, Block, BlockId, BlockKind, Digest, Document, IntentComponent, IntentKind,
    ParseError, ParseStats, Parser, ParserOptions, PresentationIntent, Run, annotate,
    snapshot::{format_tree, format_tree_with},
};
