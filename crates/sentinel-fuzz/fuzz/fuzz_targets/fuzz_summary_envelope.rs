#![no_main]

use arxiv_vault::models::{CitationGraph, StatusResponse};
use arxiv_vault::summarizer::{decode_envelope, decode_result};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(nested) = decode_envelope(body) {
        let _ = decode_result(&nested);
    }
    let _ = serde_json::from_str::<StatusResponse>(body);
    let _ = serde_json::from_str::<CitationGraph>(body);
});
