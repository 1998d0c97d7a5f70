//! Blob key derivation.

/// Maximum length kept from an uploaded file name.
const MAX_NAME_LEN: usize = 128;

/// Reduce an uploaded file name to a safe single path segment.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
/// Leading dots are stripped so the result can never be `.` or `..`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    let truncated: String = trimmed.chars().take(MAX_NAME_LEN).collect();
    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated
    }
}

/// Key under which the blob of content `id` is stored.
pub fn blob_key(id: &str, file_name: &str) -> String {
    format!("{id}/{}", sanitize_file_name(file_name))
}
