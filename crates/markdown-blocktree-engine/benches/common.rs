// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with some content.\n\n- Bullet point\n  - Nested item\n- Another item\n\n> Quoted text\n> > nested\n\n| a | b |\n|---|--:|\n| 1 | 2 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_complex_markdown(sections: usize, depth: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {}\n\n", section));
        content.push_str(&generate_nested_list(depth, 0, section));
        content.push('\n');
    }

    content
}

#[allow(dead_code)]
fn generate_nested_list(remaining_depth: usize, level: usize, section: usize) -> String {
    if remaining_depth == 0 {
        return String::new();
    }

    let mut content = String::new();
    let indent = "  ".repeat(level);
    for i in 0..3 {
        content.push_str(&format!(
            "{}- Item {} at level {} of section {}\n",
            indent, i, level, section
        ));
        if i == 1 {
            content.push_str(&generate_nested_list(remaining_depth - 1, level + 1, section));
        }
    }
    content
}

/// Same document with the first heading reworded: one leaf changes, everything
/// after it is reusable.
#[allow(dead_code)]
pub fn edit_first_heading(content: &str) -> String {
    content.replacen("# Section 0", "# Section zero", 1)
}
