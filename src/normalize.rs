//! Abbreviation tables for STIG benchmark titles and release strings.
//!
//! Checklist templates carry verbose benchmark names ("Windows Server 2016
//! Security Technical Implementation Guide") and release banners ("Release: 3
//! Benchmark Date: 23 Oct 2020"). Artifact titles use compact forms of both,
//! produced by ordered literal substitution.

/// Replacements applied to a benchmark title, in order. Longer phrases come
/// before the words they contain ("MS SQL Server" before "Server").
const STIG_TYPE_REPLACEMENTS: &[(&str, &str)] = &[
    ("Security Technical Implementation Guide", "STIG"),
    ("Windows", "WIN"),
    ("Application Security and Development", "ASD"),
    ("Microsoft Internet Explorer", "MSIE"),
    ("Red Hat Enterprise Linux", "REL"),
    ("MS SQL Server", "MSSQL"),
    ("Server", "SVR"),
    ("Workstation", "WRK"),
];

/// Replacements applied to a release info string, in order.
const STIG_RELEASE_REPLACEMENTS: &[(&str, &str)] = &[
    ("Release: ", "R"),
    ("Benchmark Date:", "dated"),
];

/// Shorten a verbose STIG benchmark title to its abbreviated form.
///
/// Every occurrence of each table entry is replaced; text not covered by the
/// table passes through unchanged.
#[must_use]
pub fn shorten_stig_type(title: &str) -> String {
    apply(title, STIG_TYPE_REPLACEMENTS)
}

/// Shorten a release info string ("Release: 3 Benchmark Date: ...") to the
/// compact "R3 dated ..." form.
#[must_use]
pub fn shorten_stig_release(release: &str) -> String {
    apply(release, STIG_RELEASE_REPLACEMENTS)
}

fn apply(value: &str, replacements: &[(&str, &str)]) -> String {
    let mut shortened = value.to_string();
    for (pattern, replacement) in replacements {
        shortened = shortened.replace(pattern, replacement);
    }
    shortened
}
