#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let opts = urlsift::ScanOptions {
        extract_from_query_string: true,
        ..Default::default()
    };
    let _ = urlsift::extract_urls(&text, &opts);
});
