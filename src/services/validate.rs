/// Top-level domains accepted for account email addresses
const ALLOWED_TLDS: &[&str] = &["com", "net"];

/// Validate email format
///
/// Syntactic check only: one `@`, a non-empty local part, a domain of at
/// least two non-empty labels, and an allowed top-level domain.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty() || l.chars().any(char::is_whitespace)) {
        return false;
    }

    let tld = labels[labels.len() - 1].to_ascii_lowercase();
    ALLOWED_TLDS.contains(&tld.as_str())
}
