//! Parsing of ctags JSON output and grouping of tags by file
//!
//! Kept free of process handling so the grouping can be driven by canned
//! line sequences.

use crate::domain::{is_allowed_kind, Ctag};
use serde::Deserialize;
use std::io::{self, BufRead};

#[derive(Deserialize)]
struct RawTag {
    path: Option<String>,
    kind: Option<String>,
    name: Option<String>,
}

/// Parse one JSON line. Returns `None` for malformed lines, lines missing
/// path, name or kind, and kinds outside the allow-list.
pub fn parse_tag_line(line: &str) -> Option<Ctag> {
    let raw: RawTag = serde_json::from_str(line).ok()?;
    let path = raw.path.filter(|p| !p.is_empty())?;
    let name = raw.name.filter(|n| !n.is_empty())?;
    let kind = raw.kind.filter(|k| is_allowed_kind(k))?;
    Some(Ctag { path, kind, name })
}

/// All symbols reported for one file, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub path: String,
    pub symbols: Vec<String>,
}

impl TagGroup {
    fn start(tag: &Ctag) -> Self {
        Self {
            path: tag.path.clone(),
            symbols: vec![tag.format()],
        }
    }

    /// Newline-joined `"<kind> <name>"` lines.
    pub fn content(&self) -> String {
        self.symbols.join("\n")
    }
}

/// Groups consecutive tags that share a path.
///
/// A group is emitted when the path changes or the input ends. Blank lines
/// and rejected tags are skipped. After an I/O error the error is yielded
/// once and iteration stops; the partial group is discarded.
pub struct TagGroups<I> {
    lines: I,
    current: Option<TagGroup>,
    done: bool,
}

impl<I> TagGroups<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            current: None,
            done: false,
        }
    }
}

impl<I> Iterator for TagGroups<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<TagGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next() {
                None => {
                    self.done = true;
                    return self.current.take().map(Ok);
                }
                Some(Err(err)) => {
                    self.done = true;
                    self.current = None;
                    return Some(Err(err));
                }
                Some(Ok(line)) => line,
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(tag) = parse_tag_line(line) else {
                continue;
            };

            if let Some(group) = self.current.as_mut().filter(|g| g.path == tag.path) {
                group.symbols.push(tag.format());
                continue;
            }

            if let Some(finished) = self.current.replace(TagGroup::start(&tag)) {
                return Some(Ok(finished));
            }
        }
    }
}

/// Line iterator that decodes invalid UTF-8 with replacement characters
/// instead of failing. A zero-length read is end of stream.
pub struct LossyLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => Some(Ok(String::from_utf8_lossy(&self.buf).into_owned())),
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tag(path: &str, kind: &str, name: &str) -> String {
        format!(r#"{{"_type":"tag","name":"{name}","path":"{path}","kind":"{kind}","line":1}}"#)
    }

    fn groups(lines: &[String]) -> Vec<TagGroup> {
        TagGroups::new(lines.iter().cloned().map(Ok)).collect::<io::Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_parse_valid_line() {
        let parsed = parse_tag_line(&tag("/r/a.py", "class", "User")).unwrap();
        assert_eq!(parsed.path, "/r/a.py");
        assert_eq!(parsed.kind, "class");
        assert_eq!(parsed.name, "User");
    }

    #[test]
    fn test_parse_rejects_disallowed_kind() {
        assert!(parse_tag_line(&tag("/r/a.py", "variable", "x")).is_none());
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(parse_tag_line(r#"{"path":"a.py","kind":"function"}"#).is_none());
        assert!(parse_tag_line(r#"{"name":"f","kind":"function"}"#).is_none());
        assert!(parse_tag_line(r#"{"name":"f","path":"a.py"}"#).is_none());
        assert!(parse_tag_line(r#"{"name":"","path":"a.py","kind":"function"}"#).is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(parse_tag_line("not json").is_none());
        assert!(parse_tag_line(r#"{"name": 3, "path": "a.py", "kind": "function"}"#).is_none());
        assert!(parse_tag_line("[1,2]").is_none());
    }

    #[test]
    fn test_groups_consecutive_tags_by_path() {
        let lines = vec![
            tag("a.py", "class", "A"),
            tag("a.py", "method", "run"),
            tag("b.py", "function", "helper"),
        ];
        let result = groups(&lines);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].path, "a.py");
        assert_eq!(result[0].content(), "class A\nmethod run");
        assert_eq!(result[1].content(), "function helper");
    }

    #[test]
    fn test_groups_skip_blank_and_invalid_lines() {
        let lines = vec![
            "".to_string(),
            "   \n".to_string(),
            tag("a.py", "variable", "x"),
            "{broken".to_string(),
            tag("a.py", "function", "f"),
            "\n".to_string(),
        ];
        let result = groups(&lines);
        assert_eq!(
            result,
            vec![TagGroup {
                path: "a.py".into(),
                symbols: vec!["function f".into()]
            }]
        );
    }

    #[test]
    fn test_reappearing_path_starts_new_group() {
        let lines = vec![
            tag("a.py", "function", "f"),
            tag("b.py", "function", "g"),
            tag("a.py", "class", "C"),
        ];
        let result = groups(&lines);
        let paths: Vec<&str> = result.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(paths, vec!["a.py", "b.py", "a.py"]);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(groups(&[]).is_empty());
    }

    #[test]
    fn test_io_error_stops_iteration() {
        let lines: Vec<io::Result<String>> = vec![
            Ok(tag("a.py", "function", "f")),
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed")),
            Ok(tag("b.py", "function", "g")),
        ];
        let mut iter = TagGroups::new(lines.into_iter());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_lossy_lines_replace_invalid_utf8() {
        let data: &[u8] = b"first\nsec\xffond\nlast";
        let lines: Vec<String> =
            LossyLines::new(Cursor::new(data)).collect::<io::Result<Vec<_>>>().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "first\n");
        assert_eq!(lines[1], "sec\u{fffd}ond\n");
        assert_eq!(lines[2], "last");
    }
}
