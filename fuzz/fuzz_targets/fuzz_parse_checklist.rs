#![no_main]
use libfuzzer_sys::fuzz_target;

const MAX_WRAPPED_INPUT_LEN: usize = 10_000;

/// Fuzz checklist metadata extraction.
///
/// Feeds arbitrary UTF-8 strings to `extract_metadata` raw, then wrapped in
/// a checklist envelope so the `STIG_INFO` walking code is reached too.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = stig_tools::extract_metadata(s);

        if s.len() < MAX_WRAPPED_INPUT_LEN {
            let wrapped = format!(
                "<CHECKLIST><ASSET><HOST_NAME>H</HOST_NAME></ASSET>\
                 <STIGS><iSTIG><STIG_INFO>{s}</STIG_INFO></iSTIG></STIGS></CHECKLIST>"
            );
            let _ = stig_tools::extract_metadata(&wrapped);
        }
    }
});
