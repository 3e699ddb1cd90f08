//! Label sanitization for use in Linux file names.

/// Maps a manifest label to a filename-safe component.
///
/// - Replaces NUL, `/`, `\`, whitespace, and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots, spaces, and underscores
/// - Caps length at 200 bytes so the appended index and extension stay
///   under Linux NAME_MAX
pub fn sanitize_label(label: &str) -> String {
    const MAX_LEN: usize = 200;

    let mut out = String::with_capacity(label.len());
    let mut prev_underscore = false;
    for c in label.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };
        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == ' ' || c == '_');
    if trimmed.len() > MAX_LEN {
        let mut take = MAX_LEN;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
