#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use weft_core::termcap::{self, TermcapDb};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    text: &'a str,
    term: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let db = TermcapDb::parse(input.text);
    let _ = db.store_for(input.term, "<fuzz>");

    // Every entry name must resolve or report a tc= problem.
    for entry in db.entries() {
        if let Some(name) = entry.names.first() {
            let _ = db.store_for(name, "<fuzz>");
        }
    }

    let _ = termcap::unescape(input.text);
});
