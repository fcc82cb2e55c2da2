use axum::http::HeaderValue;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anything that is not an ASCII digit
    static ref NON_DIGIT_REGEX: Regex = Regex::new(r"\D").unwrap();

    /// Plain file extension as found at the end of an uploaded filename
    /// - Valid: ".pdf", ".tiff", ".PNG"
    /// - Invalid: ".tar.gz/..", ". pdf", ".verylongextension"
    pub static ref EXTENSION_REGEX: Regex = Regex::new(r"^\.[A-Za-z0-9]{1,10}$").unwrap();

    /// SIP subdomain label for inbound faxes
    /// - Valid: "acme", "front-desk-2"
    /// - Invalid: "-acme", "acme.example", "front desk"
    pub static ref SIP_SUBDOMAIN_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{0,62}$").unwrap();
}

/// Return the first value that is not blank
pub fn first_non_empty(values: &[String]) -> Option<String> {
    values.iter().find(|v| !v.trim().is_empty()).cloned()
}

/// Normalize a phone number to E.164, assuming North America when no
/// country code is present. SIP URIs pass through untouched.
pub fn normalize_phone_number(phone: &str) -> String {
    let phone = phone.trim();
    if phone.is_empty() {
        return String::new();
    }

    if phone.to_lowercase().starts_with("sip:") {
        return phone.to_string();
    }

    let has_plus = phone.starts_with('+');
    let digits = NON_DIGIT_REGEX.replace_all(phone, "");

    if has_plus && digits.len() >= 10 {
        return format!("+{}", digits);
    }

    match digits.len() {
        10 => format!("+1{}", digits),
        11 if digits.starts_with('1') => format!("+{}", digits),
        11 => format!("+1{}", digits),
        12..=15 => format!("+{}", digits),
        0 => phone.to_string(),
        _ => format!("+{}", digits),
    }
}

/// Keep a post-login redirect only if it is a same-origin path.
///
/// `//host` and absolute URLs would send the user off-site. The target must
/// also be usable as a `Location` header as-is.
pub fn safe_redirect_target(target: Option<&str>) -> String {
    match target {
        Some(t)
            if t.starts_with('/')
                && !t.starts_with("//")
                && HeaderValue::from_str(t).is_ok() =>
        {
            t.to_string()
        }
        _ => "/".to_string(),
    }
}
