pub fn hello_message() -> &'static str {
    "Hello, World!"
}

/// Reverses `s` by Unicode scalar value.
pub fn reverse_message(s: &str) -> String {
    s.chars().rev().collect()
}
