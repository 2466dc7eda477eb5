//! Input sanitization and id validation.
//!
//! Search input reaches the API as a path segment, so it is reduced to
//! a conservative allow-list before any request is built. Ids are
//! bounded to keep obviously bogus values from ever producing traffic.

/// Upper bound for a plausible pokemon id.
pub const MAX_POKEMON_ID: u32 = 100_000;

/// Maximum length of a sanitized search term.
const MAX_SEARCH_LEN: usize = 100;

/// Sanitize a search term.
///
/// Trims, truncates to 100 characters, drops `<...>` tag sequences and
/// `--` runs, then keeps only letters, digits, whitespace and hyphens.
///
/// ```rust
/// # use rotomdex::sanitize_search_input;
/// assert_eq!(sanitize_search_input("  bulba<script>saur  "), "bulbasaur");
/// assert_eq!(
///     sanitize_search_input("pikachu'; DROP TABLE pokemon;--"),
///     "pikachu DROP TABLE pokemon"
/// );
/// ```
pub fn sanitize_search_input(input: &str) -> String {
    let truncated: String = input.trim().chars().take(MAX_SEARCH_LEN).collect();
    strip_tags(&truncated)
        .replace("--", "")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect()
}

/// Drop `<...>` sequences, including the angle brackets.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Whether `id` is a plausible pokemon id: an integer in `[1, 100000]`.
pub fn is_valid_pokemon_id(id: i64) -> bool {
    id >= 1 && id <= i64::from(MAX_POKEMON_ID)
}

/// Extract a pokemon id from a resource URL.
///
/// Takes the last non-empty path segment and accepts it only if it
/// parses to a valid id. Split-based rather than regex: the URLs are
/// machine-generated and always end in `/{id}/`.
pub fn extract_pokemon_id_from_url(url: &str) -> Option<u32> {
    let last = url.trim_end_matches('/').rsplit('/').next()?;
    let id: i64 = last.parse().ok()?;
    if is_valid_pokemon_id(id) {
        Some(id as u32)
    } else {
        None
    }
}
