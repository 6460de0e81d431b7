use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Comment leaders accepted in front of a marker regardless of the
/// configured prefix.
const ALTERNATE_PREFIXES: [&str; 4] = ["*", "#", ";", "\""];

// Group 1 is the comment leader, group 2 the value token.
static INTEGRITY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.*?)\s*@sha256sum\s+(0x\S*)").expect("integrity marker regex is valid")
});
static PROVENANCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.*?)\s*@eip191signature\s+(0x\S*)")
        .expect("provenance marker regex is valid")
});

/// The two marker lines a document can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKey {
    /// `@sha256sum`: checksum of the document with this line removed.
    Integrity,
    /// `@eip191signature`: personal-message signature over the bare body.
    Provenance,
}

impl MarkerKey {
    pub fn label(self) -> &'static str {
        match self {
            MarkerKey::Integrity => "@sha256sum",
            MarkerKey::Provenance => "@eip191signature",
        }
    }

    fn line_regex(self) -> &'static Regex {
        match self {
            MarkerKey::Integrity => &INTEGRITY_LINE,
            MarkerKey::Provenance => &PROVENANCE_LINE,
        }
    }
}

impl fmt::Display for MarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Content with (at most) one marker line stripped or rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub content: String,
    /// Value token of the first recognized marker, `None` when absent.
    pub value: Option<String>,
}

/// Line matcher for one marker key under one configured prefix.
///
/// A line matches when it is, in order: optional whitespace, an optional
/// comment leader (the configured prefix or one of `* # ; "`), optional
/// whitespace, the key, whitespace, and a `0x` value token. The prefix is
/// compared as plain text, so any string is a usable prefix.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    key: MarkerKey,
    prefix: String,
}

impl MarkerPattern {
    pub fn new(key: MarkerKey, prefix: &str) -> Self {
        Self {
            key,
            prefix: prefix.trim().to_string(),
        }
    }

    pub fn key(&self) -> MarkerKey {
        self.key
    }

    /// Byte range of the value token when `line` is a marker line.
    pub fn value_span(&self, line: &str) -> Option<Range<usize>> {
        let captures = self.key.line_regex().captures(line)?;
        let leader = captures.get(1).map_or("", |leader| leader.as_str());
        if !self.accepts_leader(leader) {
            return None;
        }
        captures.get(2).map(|value| value.range())
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.value_span(line).is_some()
    }

    fn accepts_leader(&self, leader: &str) -> bool {
        leader.is_empty() || leader == self.prefix || ALTERNATE_PREFIXES.contains(&leader)
    }
}

/// Splits `content` into lines, each paired with the run of `\n` that
/// ends it. The last line's run is empty when `content` has no trailing
/// newline. Concatenating every pair gives back `content`.
fn lines_with_breaks(content: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = Some(content);
    std::iter::from_fn(move || {
        let current = rest?;
        let (text, tail) = current.split_at(current.find('\n').unwrap_or(current.len()));
        let (breaks, next) = tail.split_at(tail.find(|c: char| c != '\n').unwrap_or(tail.len()));
        rest = (!next.is_empty()).then_some(next);
        Some((text, breaks))
    })
}

/// Finds the first `key` marker line in `content`.
///
/// With a `replacement`, only the value token of that line is rewritten and
/// every byte around it is kept. Without one, the line is dropped together
/// with the blank lines that follow it. Every other line, including later
/// lines that look like the same marker, is copied through untouched. When
/// nothing matches the content comes back byte-identical with `value: None`.
pub fn extract(content: &str, key: MarkerKey, prefix: &str, replacement: Option<&str>) -> Extracted {
    let pattern = MarkerPattern::new(key, prefix);
    let mut out = String::with_capacity(content.len());
    let mut value = None;

    for (line, breaks) in lines_with_breaks(content) {
        if value.is_none() {
            if let Some(span) = pattern.value_span(line) {
                value = Some(line[span.clone()].to_string());
                if let Some(replacement) = replacement {
                    out.push_str(&line[..span.start]);
                    out.push_str(replacement);
                    out.push_str(&line[span.end..]);
                    out.push_str(breaks);
                }
                continue;
            }
        }
        out.push_str(line);
        out.push_str(breaks);
    }

    Extracted {
        content: out,
        value,
    }
}

/// Renders a fresh marker line, e.g. `// @sha256sum 0x…`.
pub fn render_line(key: MarkerKey, prefix: &str, value: &str) -> String {
    if prefix.is_empty() {
        format!("{key} {value}")
    } else {
        format!("{prefix} {key} {value}")
    }
}
