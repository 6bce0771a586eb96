#![no_main]

use libfuzzer_sys::fuzz_target;
use testbatch_rs::directives;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    let parsed = directives::parse(&input);

    // Every name comes from a trimmed, non-comment line
    for name in parsed.skip.iter() {
        assert!(!name.is_empty(), "Empty skip entry");
        assert!(!name.starts_with('#'), "Comment parsed as skip entry");
        assert!(!name.starts_with('^'), "Single-run marker kept in skip entry");
        assert_eq!(name.trim(), name, "Skip entry not trimmed");
    }
    for name in parsed.single.iter() {
        assert!(input.contains(&format!("^{}", name)), "Single entry not in input");
    }

    assert_eq!(parsed, directives::parse(&input), "Parser is not deterministic");
});
