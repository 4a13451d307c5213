#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let opts = urlsift::NormalizeOptions::default();
    if let Ok(once) = urlsift::normalize_url(text, &opts) {
        let _ = urlsift::normalize_url(&once, &opts);
    }
});
