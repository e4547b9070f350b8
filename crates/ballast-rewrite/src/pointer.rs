use std::fmt;

use ballast_types::Digest;

use crate::error::{RewriteError, RewriteResult};

/// Version URL carried on the first line of every pointer document.
pub const VERSION_URL: &str = "https://git-lfs.github.com/spec/v1";

/// A pointer document: digest and size of side-stored content.
///
/// The rendered form is a fixed three-line text artifact,
///
/// ```text
/// version https://git-lfs.github.com/spec/v1
/// oid sha256:<64-hex-digest>
/// size <decimal-byte-count>
/// ```
///
/// with a trailing newline. The declared size is always the original
/// content's byte length, never the pointer's own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pointer {
    /// Digest of the side-stored content.
    pub digest: Digest,
    /// Byte length of the side-stored content.
    pub size: u64,
}

impl Pointer {
    /// Create a pointer for already-stored content.
    pub fn new(digest: Digest, size: u64) -> Self {
        Self { digest, size }
    }

    /// Render the canonical pointer document text.
    pub fn to_text(&self) -> String {
        format!(
            "version {VERSION_URL}\noid sha256:{}\nsize {}\n",
            self.digest, self.size
        )
    }

    /// Parse a canonical pointer document.
    ///
    /// Accepts exactly the layout produced by [`to_text`](Self::to_text):
    /// three lines in fixed order. Anything else is rejected.
    pub fn parse(text: &str) -> RewriteResult<Self> {
        let mut lines = text.lines();

        let version = lines
            .next()
            .ok_or_else(|| RewriteError::MalformedPointer("empty document".into()))?;
        let expected_version = format!("version {VERSION_URL}");
        if version != expected_version {
            return Err(RewriteError::MalformedPointer(format!(
                "bad version line: {version:?}"
            )));
        }

        let oid_line = lines
            .next()
            .ok_or_else(|| RewriteError::MalformedPointer("missing oid line".into()))?;
        let hex = oid_line
            .strip_prefix("oid sha256:")
            .ok_or_else(|| RewriteError::MalformedPointer(format!("bad oid line: {oid_line:?}")))?;
        let digest = Digest::from_hex(hex)
            .map_err(|e| RewriteError::MalformedPointer(format!("bad digest: {e}")))?;

        let size_line = lines
            .next()
            .ok_or_else(|| RewriteError::MalformedPointer("missing size line".into()))?;
        let size = size_line
            .strip_prefix("size ")
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                RewriteError::MalformedPointer(format!("bad size line: {size_line:?}"))
            })?;

        if lines.next().is_some() {
            return Err(RewriteError::MalformedPointer(
                "trailing content after size line".into(),
            ));
        }

        Ok(Self { digest, size })
    }

    /// Cheap probe: does this blob content look like a pointer document?
    pub fn is_pointer(data: &[u8]) -> bool {
        data.starts_with(format!("version {VERSION_URL}\n").as_bytes())
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
