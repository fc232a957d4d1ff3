//! Name-based normalization of submitted values.

/// Whether a field name marks a phone number (`phone` or `tel`, any case).
///
/// This looks at the name only, so a `text` field called `mobile_phone`
/// is normalized while a `tel` field called `contact` is not.
pub fn is_phone_like(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("phone") || lower.contains("tel")
}

/// Strip everything but digits, keeping a `+` only in leading position.
///
/// `"+1 (555) 123-4567"` becomes `"+15551234567"`.
pub fn normalize_phone(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c == '+' && out.is_empty() {
            out.push(c);
        }
    }
    out
}
