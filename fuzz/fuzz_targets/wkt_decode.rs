//! Fuzz target for the WKT decoder.
//!
//! Any finite geometry that decodes must encode back to text that decodes
//! to the same geometry.

#![no_main]

use libfuzzer_sys::fuzz_target;
use resplan_export::geometry::wkt::{decode, encode};

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(geom) = decode(text) {
        if geom.is_finite() {
            let again = decode(&encode(&geom)).expect("re-encoded WKT must decode");
            assert_eq!(geom, again);
        }
    }
});
