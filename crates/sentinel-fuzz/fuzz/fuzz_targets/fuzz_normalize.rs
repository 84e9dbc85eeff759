#![no_main]

use arxiv_vault::identifier::{extract_id, normalize, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let once = normalize(input);
    assert_eq!(normalize(&once), once, "normalize must be idempotent");

    // Anything that validates must yield an identifier
    if validate(&once) {
        assert!(extract_id(input).is_ok());
    }
});
