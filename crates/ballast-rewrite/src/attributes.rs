//! `.gitattributes` line construction and merge.
//!
//! The attributes blob is trusted as line-structured text: existing content
//! is never validated or rewritten, only scanned for a verbatim line match
//! and appended to. Malformed content is treated as an arbitrary line
//! sequence.

/// Name of the attributes entry within a tree.
pub const ATTRIBUTES_FILE: &str = ".gitattributes";

/// Render the declarative attributes line for a filename pattern.
pub fn attributes_line(pattern: &str) -> String {
    format!("{pattern} filter=lfs diff=lfs merge=lfs -text")
}

/// Returns `true` if `content` already contains `line` verbatim.
pub fn contains_line(content: &str, line: &str) -> bool {
    content.lines().any(|l| l == line)
}

/// Append `line` to `content`, preserving existing lines.
///
/// Inserts a separating newline if the existing content lacks a trailing
/// one; the result always ends with a newline.
pub fn append_line(content: &str, line: &str) -> String {
    let mut out = String::with_capacity(content.len() + line.len() + 2);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out.push('\n');
    out
}

/// Merge `line` into `content` without duplication.
///
/// Returns `None` if the line is already present (the caller keeps the
/// existing blob untouched), otherwise the new content with the line
/// appended.
pub fn merge_line(content: &str, line: &str) -> Option<String> {
    if contains_line(content, line) {
        None
    } else {
        Some(append_line(content, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "*.bin filter=lfs diff=lfs merge=lfs -text";

    #[test]
    fn line_format() {
        assert_eq!(attributes_line("*.bin"), LINE);
        assert_eq!(
            attributes_line("assets/*.psd"),
            "assets/*.psd filter=lfs diff=lfs merge=lfs -text"
        );
    }

    #[test]
    fn contains_is_literal_per_line() {
        assert!(contains_line(LINE, LINE));
        assert!(contains_line(&format!("# header\n{LINE}\n"), LINE));
        // Substring of a longer line is not a match.
        assert!(!contains_line(
            "*.bin filter=lfs diff=lfs merge=lfs -text -crlf\n",
            LINE
        ));
        assert!(!contains_line("", LINE));
    }

    #[test]
    fn merge_into_empty() {
        assert_eq!(merge_line("", LINE).unwrap(), format!("{LINE}\n"));
    }

    #[test]
    fn merge_preserves_existing_lines() {
        let existing = "*.txt text\n*.jpg binary\n";
        let merged = merge_line(existing, LINE).unwrap();
        assert_eq!(merged, format!("*.txt text\n*.jpg binary\n{LINE}\n"));
    }

    #[test]
    fn merge_handles_missing_trailing_newline() {
        let existing = "*.txt text";
        let merged = merge_line(existing, LINE).unwrap();
        assert_eq!(merged, format!("*.txt text\n{LINE}\n"));
    }

    #[test]
    fn merge_is_idempotent() {
        let once = merge_line("", LINE).unwrap();
        assert!(merge_line(&once, LINE).is_none());
    }
}
