use regex::{Captures, Regex};
use std::sync::LazyLock;

static BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{code(?::([A-Za-z0-9_+#-]+))?(?:\|[^}]*)?\}(.*?)\{code\}|\{noformat(?:\|[^}]*)?\}(.*?)\{noformat\}")
        .expect("invalid code block regex")
});
static QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{quote\}\n?(.*?)\n?\{quote\}").expect("invalid quote regex"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^h([1-6])\.\s+(.*)$").expect("invalid heading regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([*#-]+)\s+(.*)$").expect("invalid list regex"));
static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bq\.\s+(.*)$").expect("invalid bq regex"));
static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|\|(.*)\|\|\s*$").expect("invalid table regex"));
static MONOSPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("invalid monospace regex"));
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\S(?:[^*\n]*\S)?)\*").expect("invalid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b_(\S(?:[^_\n]*\S)?)_\b").expect("invalid italic regex"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\s)-(\S(?:[^-\n]*\S)?)-(\s|$)").expect("invalid strikethrough regex")
});
static CITE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\?\?([^?\n]+)\?\?").expect("invalid citation regex"));
static COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{color:[^}]+\}(.*?)\{color\}").expect("invalid color regex")
});
static NAMED_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^|\]\n]+)\|([^\]\n]+)\]").expect("invalid named link regex")
});
static BARE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[((?:https?|mailto):[^\]\s]+)\]").expect("invalid link regex"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!([^!\s|]+)(?:\|[^!\n]*)?!").expect("invalid image regex"));

/// Convert Jira wiki markup into Markdown.
///
/// Code and noformat blocks are copied verbatim; everything between them gets
/// block and inline rewriting.
pub fn to_markdown(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in BLOCK.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&convert_text(&input[last..whole.start()]));

        let (lang, body) = match caps.get(2) {
            Some(body) => (caps.get(1).map_or("", |m| m.as_str()), body.as_str()),
            None => ("", caps.get(3).map_or("", |m| m.as_str())),
        };
        out.push_str(&fence(lang, body));
        last = whole.end();
    }

    out.push_str(&convert_text(&input[last..]));
    out
}

fn fence(lang: &str, body: &str) -> String {
    let body = body.strip_suffix('\n').unwrap_or(body);
    if body.starts_with('\n') {
        format!("```{lang}{body}\n```")
    } else {
        format!("```{lang}\n{body}\n```")
    }
}

fn convert_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = COLOR.replace_all(text, "$1");
    let text = QUOTE.replace_all(&text, |caps: &Captures| {
        caps[1]
            .lines()
            .map(|line| format!("> {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    });

    let mut lines = Vec::new();
    for line in text.split('\n') {
        lines.push(convert_line(line));
    }
    lines.join("\n")
}

fn convert_line(line: &str) -> String {
    if let Some(caps) = TABLE_HEADER.captures(line) {
        let cells: Vec<&str> = caps[1].split("||").collect();
        let header = format!("|{}|", cells.join("|"));
        let rule = format!("|{}|", vec!["---"; cells.len()].join("|"));
        return format!("{}\n{rule}", convert_inline(&header));
    }
    if let Some(caps) = HEADING.captures(line) {
        let level: usize = caps[1].parse().unwrap_or(1);
        return format!("{} {}", "#".repeat(level), convert_inline(&caps[2]));
    }
    if let Some(caps) = BLOCKQUOTE.captures(line) {
        return format!("> {}", convert_inline(&caps[1]));
    }
    if let Some(caps) = LIST_ITEM.captures(line) {
        let markers = &caps[1];
        let indent = "  ".repeat(markers.len() - 1);
        let bullet = if markers.ends_with('#') { "1." } else { "-" };
        return format!("{indent}{bullet} {}", convert_inline(&caps[2]));
    }
    convert_inline(line)
}

fn convert_inline(text: &str) -> String {
    let text = MONOSPACE.replace_all(text, "`$1`");
    let text = IMAGE.replace_all(&text, "![]($1)");
    let text = NAMED_LINK.replace_all(&text, "[$1]($2)");
    let text = BARE_LINK.replace_all(&text, "<$1>");
    let text = CITE.replace_all(&text, "<cite>$1</cite>");
    let text = BOLD.replace_all(&text, "**$1**");
    let text = ITALIC.replace_all(&text, "*$1*");
    let text = STRIKE.replace_all(&text, "${1}~~${2}~~${3}");
    text.into_owned()
}
