//! Free-text sanitizer for notes, comments and other user-authored prose.
//!
//! [`sanitize`] strips markup and control characters. It never fails and is
//! idempotent: every removal shortens the string, and the passes repeat until
//! nothing changes, so the output is always a fixed point.

use std::sync::LazyLock;

use regex::Regex;

/// `<script>` / `<style>` blocks, including their content.
static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
        .expect("valid regex")
});

/// HTML comments.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

/// Any tag-shaped run: opening, closing, self-closing, doctype, processing
/// instruction. A bare `<` followed by a digit or space ("a < b") is text.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[/!?]?[A-Za-z][^<>]*>").expect("valid regex"));

/// C0 controls except tab, line feed and carriage return, plus DEL.
static CONTROL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("valid regex"));

/// Strip unsafe markup and control sequences from `input`.
///
/// Entities such as `&lt;` are left encoded; decoding them would let a second
/// pass see markup the first pass never saw.
pub fn sanitize(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn sanitize_pass(input: &str) -> String {
    let s = SCRIPT_STYLE_RE.replace_all(input, "");
    let s = COMMENT_RE.replace_all(&s, "");
    let s = TAG_RE.replace_all(&s, "");
    let s = CONTROL_RE.replace_all(&s, "");
    s.trim().to_string()
}
