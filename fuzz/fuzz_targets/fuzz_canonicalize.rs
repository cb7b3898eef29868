#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz XML canonicalization.
///
/// Any input that canonicalizes successfully must canonicalize again to the
/// same string; storage equality checks depend on that fixed point.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(canonical) = stig_tools::canonicalize(s) {
            let again = stig_tools::canonicalize(&canonical)
                .expect("canonical output must stay parseable");
            assert_eq!(canonical, again, "canonicalize must be idempotent");
        }
    }
});
