//! Assertion helpers for tests.

use lqip_core::{Lqip, LQIP_MAX, LQIP_MIN};
use pretty_assertions::assert_eq;

/// Assert an encode produced a value, and that it is in range and unpacks
pub fn assert_valid_lqip(value: Option<i32>) -> Lqip {
    let value = value.expect("Expected a placeholder, got None");
    assert!(
        (LQIP_MIN..=LQIP_MAX).contains(&(value as i64)),
        "Placeholder {value} outside of {LQIP_MIN}..={LQIP_MAX}"
    );
    Lqip::unpack(value).expect("Placeholder should unpack")
}

/// Assert all six offset levels are the same
pub fn assert_uniform_offsets(lqip: &Lqip) {
    let offsets = lqip.offsets();
    assert_eq!(
        offsets,
        [offsets[0]; 6],
        "Expected uniform offsets for {lqip}"
    );
}
