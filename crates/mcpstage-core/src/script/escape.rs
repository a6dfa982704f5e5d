//! Shell quoting for values interpolated into generated scripts.

/// Quote a value as a single POSIX shell word.
///
/// The value is wrapped in single quotes, inside which the shell performs no
/// expansion at all. An embedded `'` closes the quote, emits an escaped quote,
/// and reopens it (`'\''`). The empty string becomes `''`.
pub fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}
