use crate::{EmptyPattern, PatternKind, SearchError};
use globset::GlobBuilder;
use regex::bytes::{Regex, RegexBuilder};

/**
 A name/path matcher compiled once per search and shared read-only by every worker.

 Candidates are raw bytes (file names or root-relative paths as the OS hands them over),
 so non-UTF-8 names are matched rather than skipped.

 # Examples
 ```
 use fdr_core::{CompiledPattern, EmptyPattern, PatternKind};

 let pattern = CompiledPattern::compile(Some("*.RS"), PatternKind::Glob, false, EmptyPattern::MatchAll)?;
 assert!(pattern.matches(b"main.rs"));
 assert!(!pattern.matches(b"main.rs.bak"));
 # Ok::<(), fdr_core::SearchError>(())
 ```
*/
#[derive(Clone, Debug)]
pub enum CompiledPattern {
    /// Every candidate matches
    Everything,
    /// No candidate matches
    Nothing,
    /// A compiled regex (globs are lowered to one)
    Regex(Regex),
}

impl CompiledPattern {
    /**
     Compiles `pattern` according to `kind`.

     Case-insensitivity is a flag on the compiled regex, the candidate is never folded.
     `None` always yields [`CompiledPattern::Everything`]; `Some("")` follows `empty`.

     # Errors
     Returns [`SearchError::InvalidRegex`] for malformed regex syntax and
     [`SearchError::InvalidGlob`] for malformed globs (e.g. an unclosed `[`).
    */
    pub fn compile(
        pattern: Option<&str>,
        kind: PatternKind,
        case_sensitive: bool,
        empty: EmptyPattern,
    ) -> Result<Self, SearchError> {
        let Some(raw) = pattern else {
            return Ok(Self::Everything);
        };

        if raw.is_empty() {
            return Ok(match empty {
                EmptyPattern::MatchAll => Self::Everything,
                EmptyPattern::MatchNothing => Self::Nothing,
            });
        }

        let source = match kind {
            PatternKind::Regex => raw.to_owned(),
            PatternKind::Glob => glob_to_regex(raw)?,
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(!case_sensitive)
            .build()?;

        Ok(Self::Regex(regex))
    }

    /// Tests a candidate (a file name or a root-relative path).
    #[inline]
    #[must_use]
    pub fn matches(&self, candidate: &[u8]) -> bool {
        match *self {
            Self::Everything => true,
            Self::Nothing => false,
            Self::Regex(ref regex) => regex.is_match(candidate),
        }
    }

    /// True when matching can be skipped entirely.
    #[inline]
    #[must_use]
    pub const fn is_match_all(&self) -> bool {
        matches!(*self, Self::Everything)
    }
}

/**
 Lowers a glob to an anchored regex.

 `*` and `?` stay inside one path segment, `**` crosses segments, `{a,b}` alternates
 and `[...]` is a class. The result is byte-oriented (`(?-u)`), so compile it with
 [`regex::bytes`].

 # Errors
 Returns [`SearchError::InvalidGlob`] when the glob does not parse.
*/
pub fn glob_to_regex(glob: &str) -> Result<String, SearchError> {
    let compiled = GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map_err(SearchError::InvalidGlob)?;

    Ok(compiled.regex().to_owned())
}
