//! Custom assertion utilities for tests.

use abi_calldata::abi_coerce::CoerceError;

/// Assert that a result is Ok and return the inner value.
///
/// # Panics
///
/// Panics with `context` and the error if the result is `Err`.
#[allow(dead_code)]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("{} failed: {:?}", context, e),
    }
}

/// Assert that a coercion failed with the given taxonomy code and return the error.
#[allow(dead_code)]
pub fn assert_code<T: std::fmt::Debug>(
    result: Result<T, CoerceError>,
    code: &str,
    context: &str,
) -> CoerceError {
    match result {
        Ok(v) => panic!("{} should have failed with {} but got: {:?}", context, code, v),
        Err(e) => {
            assert_eq!(e.code(), code, "{}: unexpected error {}", context, e);
            e
        }
    }
}

/// Assert that an error message contains expected text (case-insensitive).
#[allow(dead_code)]
pub fn assert_error_contains<E: std::fmt::Display>(error: E, expected_text: &str, context: &str) {
    let error_str = error.to_string().to_lowercase();
    let expected_lower = expected_text.to_lowercase();

    assert!(
        error_str.contains(&expected_lower),
        "{}: error message should contain '{}', got: {}",
        context,
        expected_text,
        error
    );
}

/// Assert that two byte slices are equal, printing both as 32-byte hex words.
#[allow(dead_code)]
pub fn assert_bytes_eq(actual: &[u8], expected: &[u8], context: &str) {
    if actual != expected {
        panic!(
            "{}: byte mismatch\n  expected len: {}\n  actual len: {}\n  expected:\n{}\n  actual:\n{}",
            context,
            expected.len(),
            actual.len(),
            hex_words(expected),
            hex_words(actual)
        );
    }
}

fn hex_words(bytes: &[u8]) -> String {
    bytes
        .chunks(32)
        .map(|chunk| format!("    {}", hex::encode(chunk)))
        .collect::<Vec<_>>()
        .join("\n")
}
