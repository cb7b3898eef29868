#![no_main]
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz SCAP scan parsing.
///
/// Tries arbitrary UTF-8 raw, then wrapped in an XCCDF benchmark envelope to
/// exercise the fact and rule-result extraction paths.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = stig_tools::parse_scan(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                "<cdf:Benchmark><cdf:title>T</cdf:title>\
                 <cdf:TestResult>{s}</cdf:TestResult></cdf:Benchmark>"
            );
            let _ = stig_tools::parse_scan(&wrapped);
        }
    }
});
