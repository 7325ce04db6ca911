#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_core::terminfo;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode or fail with an error, never panic.
    let _ = terminfo::parse(data, "<fuzz>");

    // Force a valid magic so the header and section walk gets exercised
    // instead of stopping at the first two bytes.
    if data.len() >= 2 {
        let mut patched = data.to_vec();
        patched[0] = 0x1a;
        patched[1] = if data[0] & 1 == 0 { 0x01 } else { 0x02 };
        let _ = terminfo::parse(&patched, "<fuzz>");
    }
});
