//! Fuzz target for dataset parsing and plan assembly.
//!
//! Feeds arbitrary bytes to the dataset parser and assembles whatever plans
//! come out, checking for panics, crashes, or hangs.

#![no_main]

use libfuzzer_sys::fuzz_target;
use resplan_export::dataset::from_json_slice;
use resplan_export::export::Assembler;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(plans) = from_json_slice(data) {
        let assembler = Assembler::new();
        for (i, plan) in plans.iter().enumerate() {
            let _ = assembler.assemble(plan, i);
        }
    }
});
