//! SCAP-into-checklist merge engine.
//!
//! Takes a parsed [`ScapResultSet`] and a checklist template and produces a
//! graded checklist: the template's `VULN` statuses are updated from the
//! scan's per-rule outcomes and the host name is overwritten with the
//! scanned host.
//!
//! Grading policy:
//! - `fail` opens a finding only on a new checklist. On an existing
//!   checklist a fail leaves the current status alone, so findings that were
//!   manually dispositioned stay dispositioned across re-scans.
//! - `pass` always sets `NotAFinding`, new or not.
//! - A `VULN` with no matching rule result is left entirely untouched.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::model::{ScapResultSet, ScapRuleResult};
use crate::parsers::{self, ParseError, XmlElement};

/// Errors from merging scan results into a checklist template.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The template text did not parse as XML
    #[error("Checklist template is not usable: {0}")]
    Template(#[source] ParseError),

    /// The template parsed but lacks a section the checklist format requires
    #[error("Checklist template is missing its {0} section")]
    MissingSection(&'static str),

    /// The merged document failed to serialize back to XML
    #[error("Failed to serialize merged checklist: {0}")]
    Serialize(#[source] ParseError),
}

/// Merges scan results into checklist templates.
///
/// `new_checklist` selects the grading policy for failed rules and defaults
/// to true. Re-grading a stored checklist should clear it:
///
/// ```
/// use stig_tools::merge::MergeEngine;
///
/// let engine = MergeEngine::new().with_new_checklist(false);
/// # let _ = engine;
/// ```
#[derive(Debug, Clone)]
pub struct MergeEngine {
    new_checklist: bool,
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeEngine {
    /// Engine for grading a fresh template.
    #[must_use]
    pub fn new() -> Self {
        Self { new_checklist: true }
    }

    /// Set whether the target is a brand-new checklist (true) or a stored
    /// one being re-graded (false).
    #[must_use]
    pub fn with_new_checklist(mut self, new_checklist: bool) -> Self {
        self.new_checklist = new_checklist;
        self
    }

    /// Merge `results` into `template_xml` and return the graded checklist
    /// as canonical XML.
    ///
    /// Rule ids match case-insensitively; when the scan reports the same
    /// rule twice, the first occurrence wins. The output carries no XML
    /// declaration and no insignificant whitespace.
    pub fn merge(&self, results: &ScapResultSet, template_xml: &str) -> Result<String, MergeError> {
        let stripped = parsers::strip_layout_whitespace(template_xml);
        let mut root = parsers::parse_document(&stripped).map_err(MergeError::Template)?;

        let asset = root
            .find_descendant_mut("ASSET")
            .ok_or(MergeError::MissingSection("ASSET"))?;
        if let Some(hostname) = results.hostname.as_deref() {
            if !hostname.is_empty() {
                set_child_text(asset, "HOST_NAME", hostname);
            }
        }

        let mut rule_index: IndexMap<String, &ScapRuleResult> = IndexMap::new();
        for rule_result in &results.rule_results {
            rule_index
                .entry(rule_result.rule_id.to_lowercase())
                .or_insert(rule_result);
        }

        let stigs = root
            .find_descendant_mut("STIGS")
            .ok_or(MergeError::MissingSection("STIGS"))?;

        let mut graded = 0usize;
        let new_checklist = self.new_checklist;
        stigs.for_each_descendant_mut("VULN", &mut |vuln| {
            let Some(rule_id) = vuln_rule_id(vuln) else {
                return;
            };
            let Some(rule_result) = rule_index.get(&rule_id.to_lowercase()) else {
                return;
            };
            if rule_result.is_fail() && new_checklist {
                set_child_text(vuln, "STATUS", "Open");
                graded += 1;
            } else if rule_result.is_pass() {
                set_child_text(vuln, "STATUS", "NotAFinding");
                graded += 1;
            }
        });
        debug!(
            graded,
            rules = results.rule_results.len(),
            new_checklist,
            "merged scan results into checklist"
        );

        let serialized = root.to_xml().map_err(MergeError::Serialize)?;
        parsers::canonicalize(&serialized).map_err(MergeError::Serialize)
    }
}

/// Replace the text of the first `name` child, or append a new child when
/// none exists.
fn set_child_text(parent: &mut XmlElement, name: &str, text: &str) {
    match parent.find_child_mut(name) {
        Some(child) => {
            child.text = text.to_string();
            child.children.clear();
        }
        None => parent.children.push(XmlElement::with_text(name, text)),
    }
}

/// The value of a `VULN` item's first `Rule_ID` attribute pair.
fn vuln_rule_id(vuln: &XmlElement) -> Option<String> {
    vuln.children
        .iter()
        .filter(|child| child.name == "STIG_DATA")
        .find(|pair| {
            pair.find_child("VULN_ATTRIBUTE")
                .is_some_and(|attribute| attribute.text == "Rule_ID")
        })
        .and_then(|pair| pair.find_child("ATTRIBUTE_DATA"))
        .map(|data| data.text.clone())
}
