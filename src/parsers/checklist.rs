//! STIG checklist (`.ckl`) metadata extraction.
//!
//! A checklist document nests its identifying metadata in two places:
//! `CHECKLIST/ASSET/HOST_NAME` for the scanned host, and
//! `CHECKLIST/STIGS/iSTIG/STIG_INFO` for the benchmark title, version and
//! release. `STIG_INFO` holds a flat list of `SI_DATA` pairs, each pairing a
//! `SID_NAME` (the field name, lowercase) with an optional `SID_DATA` (the
//! value).

use crate::model::{ArtifactMetadata, UNKNOWN_HOST};
use crate::normalize::{shorten_stig_release, shorten_stig_type};

use super::{strip_layout_whitespace, ParseError};

/// Extract artifact metadata from raw checklist XML.
///
/// Only the first `ASSET` and first `STIG_INFO` elements are consulted. A
/// missing or empty `HOST_NAME` falls back to [`UNKNOWN_HOST`]; a missing
/// `ASSET` or `STIG_INFO` section is a parse error. The benchmark title and
/// release are shortened on the way out. The returned metadata stores
/// `raw_xml` untouched.
pub fn extract_metadata(raw_xml: &str) -> Result<ArtifactMetadata, ParseError> {
    let stripped = strip_layout_whitespace(raw_xml);
    let root = super::parse_document(&stripped)?;

    let asset = root
        .find_descendant("ASSET")
        .ok_or(ParseError::MissingSection("ASSET"))?;
    let host_name = match asset.find_child("HOST_NAME") {
        Some(host) if !host.text.is_empty() => host.text.clone(),
        _ => UNKNOWN_HOST.to_string(),
    };

    let stig_info = root
        .find_descendant("STIG_INFO")
        .ok_or(ParseError::MissingSection("STIG_INFO"))?;

    let mut stig_type = String::new();
    let mut stig_release = String::new();
    let mut version = String::new();
    for (name, value) in si_data_pairs(stig_info) {
        match name {
            "releaseinfo" => stig_release = value.to_string(),
            "title" => stig_type = value.to_string(),
            "version" => version = value.to_string(),
            _ => {}
        }
    }

    Ok(ArtifactMetadata {
        host_name,
        stig_type: shorten_stig_type(&stig_type),
        stig_release: shorten_stig_release(&stig_release),
        version,
        raw_checklist: raw_xml.to_string(),
    })
}

/// The unshortened benchmark title of a checklist, if its `STIG_INFO`
/// carries one. Used to index checklist templates by the title a SCAP scan
/// reports.
pub fn raw_stig_title(raw_xml: &str) -> Result<Option<String>, ParseError> {
    let stripped = strip_layout_whitespace(raw_xml);
    let root = super::parse_document(&stripped)?;
    let stig_info = root
        .find_descendant("STIG_INFO")
        .ok_or(ParseError::MissingSection("STIG_INFO"))?;

    let mut title = None;
    for (name, value) in si_data_pairs(stig_info) {
        if name == "title" {
            title = Some(value.to_string());
        }
    }
    Ok(title)
}

/// Iterate the (name, value) pairs of a `STIG_INFO` element.
///
/// The pair name is the first child's text and the value the last child's
/// text, so a pair missing its `SID_DATA` yields its name as the value.
/// Childless pairs are skipped. Later pairs with a repeated name win.
fn si_data_pairs(stig_info: &super::XmlElement) -> impl Iterator<Item = (&str, &str)> {
    stig_info.children.iter().filter_map(|pair| {
        let name = pair.children.first()?;
        let value = pair.children.last()?;
        Some((name.text.as_str(), value.text.as_str()))
    })
}
