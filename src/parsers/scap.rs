//! SCAP/XCCDF scan result (`.xml`) parsing.
//!
//! Scan exports qualify every element with the `cdf:` namespace prefix.
//! Names are matched with the prefix included; a scan emitted under a
//! different prefix is treated as carrying no recognizable content, which
//! parses to an empty result set rather than an error.

use crate::model::{ScapResultSet, ScapRuleResult, RULE_ID_PREFIX};

use super::{strip_layout_whitespace, ParseError};

/// Parse a SCAP scan export into its benchmark title, target hostname and
/// per-rule results.
///
/// The hostname comes from the first `cdf:fact` whose second attribute value
/// ends with `host_name`. Every `cdf:rule-result` contributes one entry: the
/// `idref` attribute with the fixed XCCDF prefix removed (empty when the
/// attribute is absent) and the text of its first `cdf:result` child (empty
/// when missing). Empty fact or rule-result collections are valid and yield
/// an empty set.
pub fn parse_scan(raw_xml: &str) -> Result<ScapResultSet, ParseError> {
    let stripped = strip_layout_whitespace(raw_xml);
    let root = super::parse_document(&stripped)?;

    let mut results = ScapResultSet {
        title: root
            .find_descendant("cdf:title")
            .map(|title| title.text.clone())
            .unwrap_or_default(),
        ..ScapResultSet::default()
    };

    for fact in root.descendants_named("cdf:fact") {
        if let Some((_, value)) = fact.attributes.get(1) {
            if value.ends_with("host_name") {
                results.hostname = Some(fact.inner_text());
                break;
            }
        }
    }

    for rule_result in root.descendants_named("cdf:rule-result") {
        results.rule_results.push(ScapRuleResult {
            rule_id: rule_result
                .attributes
                .iter()
                .find(|(key, _)| key == "idref")
                .map(|(_, idref)| idref.replace(RULE_ID_PREFIX, ""))
                .unwrap_or_default(),
            result: rule_result
                .find_child("cdf:result")
                .map(|result| result.text.clone())
                .unwrap_or_default(),
        });
    }

    Ok(results)
}
