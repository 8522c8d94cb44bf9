//! Diagnostic payloads for the bsc analyzer.
//!
//! Diagnostics, not exceptions, are the analyzer's primary output. The
//! [`messages`] module is the catalog: one pure factory function per
//! emittable kind, each producing a [`DiagnosticData`] payload (code,
//! severity, message) that the caller anchors to a source range with
//! [`DiagnosticData::at`].

use std::fmt;

use bsc_source::SourceRange;

pub mod messages;

/// How severe a diagnostic is.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Information => "info",
            Severity::Hint => "hint",
        };
        f.write_str(text)
    }
}

/// A `uri` + range pair, used by [`RelatedInformation`] and definition
/// lookups.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub uri: String,
    pub range: SourceRange,
}

/// Secondary locations attached to a diagnostic, e.g. the namespace
/// declaration a colliding parameter name points back to.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelatedInformation {
    pub message: String,
    pub location: Location,
}

/// The catalog payload of a diagnostic: everything except its anchor.
///
/// Factory functions in [`messages`] return these; call [`at`](Self::at)
/// to attach the source range and obtain a full [`Diagnostic`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticData {
    pub code: u32,
    pub severity: Severity,
    pub message: String,
}

impl DiagnosticData {
    /// Anchors this payload at `range`.
    #[must_use]
    pub fn at(self, range: SourceRange) -> Diagnostic {
        Diagnostic {
            code: self.code,
            severity: self.severity,
            message: self.message,
            range,
            related_information: Vec::new(),
        }
    }
}

/// A fully formed diagnostic, anchored to a range within some file.
///
/// Which file is the concern of the layer that owns file identity; this
/// crate only carries the in-file payload.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub code: u32,
    pub severity: Severity,
    pub message: String,
    pub range: SourceRange,
    pub related_information: Vec<RelatedInformation>,
}

impl Diagnostic {
    #[must_use]
    pub fn with_related_information(mut self, related: Vec<RelatedInformation>) -> Self {
        self.related_information = related;
        self
    }

    /// Returns a copy with `severity` replaced, keeping everything else.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Formats `path` as a `file://` URI for [`Location::uri`].
#[must_use]
pub fn file_uri(path: &str) -> String {
    if path.starts_with("file://") {
        path.to_string()
    } else {
        format!("file://{path}")
    }
}
