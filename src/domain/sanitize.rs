//! Input hygiene shared by every form the site accepts.

/// Longest address accepted by [`validate_email`], per RFC 5321.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Free-text fields are cut to this many characters by [`sanitize_input`].
pub const MAX_INPUT_LENGTH: usize = 1000;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Trim the input, drop angle brackets and keep at most [`MAX_INPUT_LENGTH`] characters.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>'))
        .take(MAX_INPUT_LENGTH)
        .collect()
}

/// Accepts `local@domain.tld` shaped addresses of at most [`MAX_EMAIL_LENGTH`] characters.
pub fn validate_email(email: &str) -> bool {
    if email.chars().count() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }

    let has_dotted_domain = email
        .rsplit_once('@')
        .map(|(_, domain)| {
            domain
                .split_once('.')
                .map_or(false, |(host, tld)| !host.is_empty() && !tld.is_empty())
        })
        .unwrap_or(false);

    has_dotted_domain && validator::validate_email(email)
}

/// FNV-1a (32 bit) digest of `input`, rendered as 8 hex digits.
///
/// Used to correlate log lines and analytics events without recording the raw
/// value. Collisions are possible and the digest is trivially reversible by
/// brute force, so it must never stand in for a cryptographic hash.
pub fn pseudonymize(input: &str) -> String {
    let hash = input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    });

    format!("{hash:08x}")
}
