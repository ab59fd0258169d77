//! Shell glob patterns, matched segment by segment
//!
//! The syntax follows Python's `glob` module: `*`, `?`, `[seq]` and `[!seq]`
//! never cross a `/`, wildcards skip names starting with `.`, and a `**`
//! segment spans any number of directories when matching recursively.
//!
//! A recursive pattern without any `/` is matched against file names at every
//! depth, so `*.py` finds `a.py` as well as `sub/c.py`.

use crate::errors::FilesError;
use regex::Regex;
use std::path::{Component, Path};

#[derive(Debug, Clone)]
enum Segment {
    /// `**` in recursive mode: zero or more directories
    AnyDirs,
    Name { regex: Regex, matches_hidden: bool },
}

/// A compiled glob pattern relative to a root directory
#[derive(Debug, Clone)]
pub struct GlobPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl GlobPattern {
    pub fn new(pattern: &str, recursive: bool) -> Result<Self, FilesError> {
        let invalid = |reason: &str| FilesError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern.starts_with('/') || Path::new(pattern).has_root() {
            return Err(invalid("pattern must be relative to its root"));
        }

        let mut segments = Vec::new();
        for part in pattern.split(is_separator) {
            match part {
                "" | "." => continue,
                ".." => return Err(invalid("pattern must not leave its root")),
                "**" if recursive => {
                    if !matches!(segments.last(), Some(Segment::AnyDirs)) {
                        segments.push(Segment::AnyDirs);
                    }
                }
                name => {
                    let regex = Regex::new(&translate(name))
                        .map_err(|e| invalid(&e.to_string()))?;
                    segments.push(Segment::Name {
                        regex,
                        matches_hidden: name.starts_with('.'),
                    });
                }
            }
        }

        if segments.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        if recursive && !pattern.contains(is_separator) && segments.len() == 1 {
            if let Some(Segment::Name { .. }) = segments.first() {
                segments.insert(0, Segment::AnyDirs);
            }
        }

        Ok(GlobPattern {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Deepest path (in components) that can match, if bounded
    pub fn max_depth(&self) -> Option<usize> {
        if self
            .segments
            .iter()
            .any(|segment| matches!(segment, Segment::AnyDirs))
        {
            None
        } else {
            Some(self.segments.len())
        }
    }

    /// Whether `relative` (a path below the root) matches
    pub fn matches(&self, relative: &Path) -> bool {
        let mut components = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => components.push(name.to_string_lossy()),
                Component::CurDir => {}
                _ => return false,
            }
        }
        let components: Vec<&str> = components.iter().map(|name| &**name).collect();
        match_segments(&self.segments, &components)
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn match_segments(segments: &[Segment], components: &[&str]) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return components.is_empty();
    };

    match segment {
        Segment::AnyDirs => (0..=components.len()).any(|skip| {
            components[..skip].iter().all(|name| !is_hidden(name))
                && match_segments(rest, &components[skip..])
        }),
        Segment::Name {
            regex,
            matches_hidden,
        } => match components.split_first() {
            Some((name, remaining)) => {
                (*matches_hidden || !is_hidden(name))
                    && regex.is_match(name)
                    && match_segments(rest, remaining)
            }
            None => false,
        },
    }
}

/// Translate one glob segment into an anchored regex
fn translate(segment: &str) -> String {
    let chars: Vec<char> = segment.chars().collect();
    let mut out = String::from(if cfg!(windows) { "(?si)^" } else { "(?s)^" });
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end;
                }
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Index of the `]` closing the class opened at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // a `]` right after the opening bracket is a literal member
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}

fn translate_class(body: &[char]) -> String {
    let (negated, members) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut out = String::from(if negated { "[^" } else { "[" });
    for (idx, &c) in members.iter().enumerate() {
        let is_range = c == '-' && idx > 0 && idx + 1 < members.len();
        if is_range {
            out.push('-');
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str, recursive: bool) -> GlobPattern {
        GlobPattern::new(pattern, recursive).unwrap_or_else(|e| panic!("valid pattern: {e}"))
    }

    #[test]
    fn test_star_stays_within_segment() {
        let pattern = glob("*.txt", false);
        assert!(pattern.matches(Path::new("notes.txt")));
        assert!(!pattern.matches(Path::new("sub/notes.txt")));
        assert!(!pattern.matches(Path::new("notes.txt.bak")));
        assert_eq!(pattern.max_depth(), Some(1));
    }

    #[test]
    fn test_wildcards_skip_hidden_names() {
        assert!(!glob("*", false).matches(Path::new(".hidden")));
        assert!(glob(".*", false).matches(Path::new(".hidden")));
        assert!(!glob("**/*.py", true).matches(Path::new(".git/hooks.py")));
    }

    #[test]
    fn test_double_star_spans_directories() {
        let pattern = glob("src/**/*.py", true);
        assert!(pattern.matches(Path::new("src/a.py")));
        assert!(pattern.matches(Path::new("src/dunc/api.py")));
        assert!(pattern.matches(Path::new("src/dunc/deep/er.py")));
        assert!(!pattern.matches(Path::new("tests/a.py")));
        assert_eq!(pattern.max_depth(), None);
    }

    #[test]
    fn test_double_star_without_recursion_is_a_single_star() {
        let pattern = glob("src/**/*.py", false);
        assert!(pattern.matches(Path::new("src/dunc/api.py")));
        assert!(!pattern.matches(Path::new("src/a.py")));
        assert!(!pattern.matches(Path::new("src/dunc/deep/er.py")));
    }

    #[test]
    fn test_recursive_name_pattern_matches_at_any_depth() {
        let pattern = glob("*.py", true);
        assert!(pattern.matches(Path::new("a.py")));
        assert!(pattern.matches(Path::new("sub/c.py")));
        assert!(!pattern.matches(Path::new("sub/c.txt")));
    }

    #[test]
    fn test_question_mark_and_classes() {
        assert!(glob("file?.txt", false).matches(Path::new("file1.txt")));
        assert!(!glob("file?.txt", false).matches(Path::new("file10.txt")));
        assert!(glob("[abc].rs", false).matches(Path::new("b.rs")));
        assert!(!glob("[!abc].rs", false).matches(Path::new("b.rs")));
        assert!(glob("[!abc].rs", false).matches(Path::new("d.rs")));
        assert!(glob("v[0-9]", false).matches(Path::new("v7")));
        assert!(glob("[]]x", false).matches(Path::new("]x")));
        assert!(glob("a[b", false).matches(Path::new("a[b")));
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        let pattern = glob("lib+(1).so", false);
        assert!(pattern.matches(Path::new("lib+(1).so")));
        assert!(!pattern.matches(Path::new("libx(1)xso")));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(GlobPattern::new("", true).is_err());
        assert!(GlobPattern::new("/etc/*", true).is_err());
        assert!(GlobPattern::new("../*.py", true).is_err());
    }
}
