//! SCAP scan result types.

use serde::{Deserialize, Serialize};

/// Fixed prefix XCCDF rule identifiers carry in scan exports. Stripped so
/// rule ids line up with the `Rule_ID` values found in checklists.
pub const RULE_ID_PREFIX: &str = "xccdf_mil.disa.stig_rule_";

/// Everything pulled out of one SCAP scan export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScapResultSet {
    /// Benchmark title the scan ran against
    pub title: String,
    /// Scanned host, when the scan recorded a host_name fact
    pub hostname: Option<String>,
    /// Scanned address. Present in some exports but not read from the
    /// current fact layout, so it stays unset.
    pub ip_address: Option<String>,
    /// Per-rule outcomes in document order
    pub rule_results: Vec<ScapRuleResult>,
}

/// Outcome of a single rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScapRuleResult {
    /// Rule identifier with the XCCDF prefix removed (e.g. "SV-78007r1_rule")
    pub rule_id: String,
    /// Raw outcome text, typically "pass" or "fail"
    pub result: String,
}

impl ScapRuleResult {
    /// True when the outcome is "pass", case-insensitively.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.result.eq_ignore_ascii_case("pass")
    }

    /// True when the outcome is "fail", case-insensitively.
    #[must_use]
    pub fn is_fail(&self) -> bool {
        self.result.eq_ignore_ascii_case("fail")
    }
}
