use crate::error::{RewriteError, RewriteResult};

/// Filename filter deciding which tree entries qualify for conversion.
///
/// Wraps a compiled glob pattern with the standard wildcards: `*`, `?` and
/// bracket classes. The match is applied to the full filename string the
/// caller supplies; no path normalization happens here.
#[derive(Debug, Clone)]
pub struct PathFilter {
    pattern: glob::Pattern,
}

impl PathFilter {
    /// Compile a glob pattern into a filter.
    pub fn new(pattern: &str) -> RewriteResult<Self> {
        let compiled = glob::Pattern::new(pattern).map_err(|source| RewriteError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern: compiled })
    }

    /// Returns `true` iff the filename should be considered for conversion.
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
