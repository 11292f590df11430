//! A single ignore pattern compiled to a regex.

use regex::Regex;
use tracing::trace;

/// One exclusion (or re-inclusion) rule from an ignore file.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Line text after trailing-space stripping and without the `!` prefix.
    text: String,

    /// Leading `!`: re-include paths excluded by earlier patterns.
    negated: bool,

    /// Trailing `/`: only directories match.
    dir_only: bool,

    /// Contains a leading or inner `/`: matched from the ignore file's directory.
    anchored: bool,

    /// The compiled regex over `/`-separated relative paths.
    regex: Regex,
}

impl Pattern {
    /// Parse one line of an ignore file.
    ///
    /// Returns `None` for blank lines, comments and lines that cannot match
    /// anything (a lone `!` or `/`, or a glob with no valid translation).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        Self::try_parse(line).ok().flatten()
    }

    /// Like [`parse`](Self::parse), but reports globs that do not compile,
    /// such as a reversed range in `[z-a]`.
    ///
    /// # Errors
    ///
    /// Returns the regex error for a glob that cannot be compiled.
    pub fn try_parse(line: &str) -> std::result::Result<Option<Self>, regex::Error> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with('#') {
            return Ok(None);
        }

        let text = strip_trailing_spaces(line);
        if text.is_empty() {
            return Ok(None);
        }

        let (negated, text) = match text.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let mut body = text;
        let dir_only = body.ends_with('/') && !body.ends_with("\\/");
        if dir_only {
            body = &body[..body.len() - 1];
        }

        let leading_slash = body.starts_with('/');
        if leading_slash {
            body = &body[1..];
        }
        if body.is_empty() {
            return Ok(None);
        }
        let anchored = leading_slash || body.contains('/');

        let translated = translate(body);
        let source = if anchored {
            format!("^{translated}$")
        } else {
            format!("^(?:.*/)?{translated}$")
        };
        trace!(pattern = %text, regex = %source, "Compiled ignore pattern");

        let regex = Regex::new(&source)?;

        Ok(Some(Self {
            text: text.to_string(),
            negated,
            dir_only,
            anchored,
            regex,
        }))
    }

    /// The pattern as written, without a `!` prefix.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether this pattern re-includes paths.
    #[must_use]
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Whether this pattern only matches directories.
    #[must_use]
    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// Whether this pattern is anchored to the ignore file's directory.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// The generated regex, for diagnostics.
    #[must_use]
    pub fn regex(&self) -> &str {
        self.regex.as_str()
    }

    /// Check whether a relative path matches this pattern.
    ///
    /// `path` uses `/` separators; leading `./` and `/` are ignored.
    #[must_use]
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        self.regex.is_match(normalize_path(path))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}", self.text)
    }
}

/// Strip leading `./` and `/` and a trailing `/` from a relative path.
pub(crate) fn normalize_path(path: &str) -> &str {
    let mut path = path;
    while let Some(rest) = path.strip_prefix("./") {
        path = rest;
    }
    path.trim_start_matches('/').trim_end_matches('/')
}

/// Remove trailing spaces unless escaped with a backslash.
pub(crate) fn strip_trailing_spaces(line: &str) -> &str {
    let mut end = line.len();
    while end > 0 && line.as_bytes()[end - 1] == b' ' {
        let backslashes = line.as_bytes()[..end - 1]
            .iter()
            .rev()
            .take_while(|b| **b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &line[..end]
}

/// Find the index of the `]` closing a bracket class opened at `start`.
pub(crate) fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!' | '^')) {
        i += 1;
    }
    // A `]` right after the opening is a literal member
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Translate a glob body into a regex fragment.
fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                match chars.get(i + 1) {
                    Some(next) => out.push_str(&regex::escape(&next.to_string())),
                    None => out.push_str(r"\\"),
                }
                i += 2;
            }
            '*' => {
                let run = chars[i..].iter().take_while(|c| **c == '*').count();
                let at_start = i == 0 || chars[i - 1] == '/';
                let next = chars.get(i + run);
                if run >= 2 && at_start {
                    match next {
                        // `**/` or `/**/`
                        Some('/') => {
                            out.push_str("(?:.*/)?");
                            i += run + 1;
                            continue;
                        }
                        // `/**` or a bare `**`
                        None => {
                            out.push_str(".*");
                            i += run;
                            continue;
                        }
                        Some(_) => {}
                    }
                }
                out.push_str("[^/]*");
                i += run;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end + 1;
                }
                None => {
                    out.push_str(r"\[");
                    i += 1;
                }
            },
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    out
}

/// Translate the inside of a `[...]` class.
fn translate_class(inner: &[char]) -> String {
    let (negated, members) = match inner.first() {
        Some('!' | '^') => (true, &inner[1..]),
        _ => (false, inner),
    };

    let mut out = String::from(if negated { "[^/" } else { "[" });
    let mut i = 0;
    while i < members.len() {
        let c = members[i];
        if c == '\\' {
            if let Some(next) = members.get(i + 1) {
                push_class_char(&mut out, *next);
            }
            i += 2;
            continue;
        }
        push_class_char(&mut out, c);
        i += 1;
    }
    out.push(']');
    out
}

fn push_class_char(out: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '&' | '~') {
        out.push('\\');
    }
    out.push(c);
}
