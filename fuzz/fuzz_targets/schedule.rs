#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeSet;
use std::path::Path;
use testbatch_rs::{run::schedule, UnitKind};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    names: Vec<String>,
    single: Vec<usize>,
    batch_size: u8,
}

fuzz_target!(|input: FuzzInput| {
    let batch_size = usize::from(input.batch_size.max(1));
    let single: BTreeSet<String> = input
        .single
        .iter()
        .filter_map(|i| input.names.get(*i).cloned())
        .collect();

    let units = match schedule(Path::new("t"), &input.names, &single, batch_size) {
        Ok(units) => units,
        Err(_) => return,
    };

    // No test may be lost or duplicated
    let dispatched: usize = units.iter().map(|u| u.paths.len()).sum();
    assert_eq!(dispatched, input.names.len(), "Dispatched count mismatch");

    for unit in &units {
        assert!(!unit.paths.is_empty(), "Empty unit");
        match unit.kind {
            UnitKind::Batch => assert!(unit.paths.len() <= batch_size, "Oversized batch"),
            UnitKind::Http | UnitKind::Single => assert_eq!(unit.paths.len(), 1),
        }
    }
});
