//! Parser fuzz target: feed arbitrary text to the flattened type parser.
//! The parser must not panic; it should return Ok(types) or Err(ParseError).
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let s = match std::str::from_utf8(data) {
        Ok(x) => x,
        Err(_) => return,
    };
    let _ = nifpga_fxp::parse_fixed_point("FXP", s);
    let _ = nifpga_fxp::parse_fixed_point("CFXP", s);
    let _ = nifpga_fxp::parse_cluster(&["FXP", "I8", "CFXP", "Bool", "U64"], s);
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
