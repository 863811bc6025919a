use std::sync::LazyLock;

use regex::Regex;

/// `<script ...>` with any attributes, body up to the first `</script>`.
/// Tag names fold ASCII case only, as HTML does.
static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(<(?i-u:script)\b[^>]*>)(.*?)(</(?i-u:script)>)")
        .expect("script block pattern is valid")
});

/// Where a removed code block sat in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSpan {
    /// Byte offset in `SplitOutput::markup`
    pub at: usize,
    pub open_tag: String,
    pub close_tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutput {
    /// Input with every matched code block removed
    pub markup: String,
    /// Code block bodies, verbatim, in source order
    pub scripts: Vec<String>,
    /// One span per script, same order
    pub spans: Vec<BlockSpan>,
}

impl SplitOutput {
    /// Puts every code block back where it was, reproducing the split input
    pub fn reassemble(&self) -> String {
        let mut out = String::with_capacity(
            self.markup.len() + self.scripts.iter().map(|s| s.len() + 20).sum::<usize>(),
        );
        let mut last = 0;
        for (span, script) in self.spans.iter().zip(&self.scripts) {
            out.push_str(&self.markup[last..span.at]);
            out.push_str(&span.open_tag);
            out.push_str(script);
            out.push_str(&span.close_tag);
            last = span.at;
        }
        out.push_str(&self.markup[last..]);
        out
    }
}

/// Separates `<script>` blocks from the rest of the compiled text.
///
/// Never fails: a marker without its counterpart is not a block and stays in
/// the markup.
pub fn split(raw: &str) -> SplitOutput {
    let mut out = SplitOutput {
        markup: String::with_capacity(raw.len()),
        ..Default::default()
    };

    let mut last = 0;
    for caps in SCRIPT_BLOCK.captures_iter(raw) {
        let (Some(whole), Some(open), Some(body), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };

        out.markup.push_str(&raw[last..whole.start()]);
        out.spans.push(BlockSpan {
            at: out.markup.len(),
            open_tag: open.as_str().to_string(),
            close_tag: close.as_str().to_string(),
        });
        out.scripts.push(body.as_str().to_string());
        last = whole.end();
    }
    out.markup.push_str(&raw[last..]);

    out
}

/// Unwraps text that arrives as a single markdown fence (```` ```html ... ``` ````).
/// Anything else is returned unchanged.
pub fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text
        .trim()
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return text;
    };

    let Some((info, body)) = inner.split_once('\n') else {
        return text;
    };
    let info_ok = info
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !info_ok || body.contains("```") {
        return text;
    }

    body.strip_suffix('\n').unwrap_or(body)
}
