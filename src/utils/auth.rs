/// Compare a provided secret against the expected one in constant time
///
/// Every byte of `expected` is examined whatever `provided` holds, so the
/// running time depends on the length of `expected` alone. A length mismatch
/// is folded into the result instead of returning early.
pub fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let mut diff = provided.len() ^ expected.len();
    for (i, b) in expected.iter().enumerate() {
        let a = provided.get(i).copied().unwrap_or(!b);
        diff |= usize::from(a ^ b);
    }

    diff == 0
}
