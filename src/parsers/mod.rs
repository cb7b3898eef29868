//! Checklist and scan result parsers.
//!
//! This module reads the two XML dialects the tool consumes:
//! - STIG checklists (`.ckl`), parsed into [`ArtifactMetadata`] via
//!   [`extract_metadata`]
//! - SCAP/XCCDF scan results (`.xml`), parsed into
//!   [`ScapResultSet`](crate::model::ScapResultSet) via [`parse_scan`]
//!
//! Both dialects share a small DOM layer ([`XmlElement`]) built on the
//! `quick-xml` event reader. Checklist files exported by common tooling carry
//! literal newline and tab characters between markup; every entry point strips
//! those before parsing so element text is stable regardless of the exporting
//! tool's formatting.
//!
//! [`ArtifactMetadata`]: crate::model::ArtifactMetadata

mod checklist;
mod dom;
mod scap;

pub use checklist::{extract_metadata, raw_stig_title};
pub use dom::{canonicalize, parse_document, XmlElement};
pub use scap::parse_scan;

use thiserror::Error;

/// Errors produced while parsing checklist or scan XML.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("Invalid XML structure: {0}")]
    InvalidXml(String),

    /// The document contained no root element
    #[error("Document has no root element")]
    NoRoot,

    /// A section the dialect requires is absent
    #[error("Missing required {0} section")]
    MissingSection(&'static str),

    /// Re-emitting a parsed document failed
    #[error("Failed to write XML: {0}")]
    Write(String),
}

/// Remove literal newline and tab characters from exported XML.
///
/// Checklist exporters pad markup with layout characters that would otherwise
/// surface inside element text.
pub(crate) fn strip_layout_whitespace(raw: &str) -> String {
    raw.replace('\n', "").replace('\t', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_layout_whitespace() {
        assert_eq!(
            strip_layout_whitespace("<A>\n\t<B>x</B>\n</A>"),
            "<A><B>x</B></A>"
        );
        assert_eq!(strip_layout_whitespace("no layout"), "no layout");
    }
}
