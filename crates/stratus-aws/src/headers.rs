//! Header name formatting for proxy results.

/// Capitalizes a lower-case header name.
///
/// Dash-separated names keep their dashes; space-separated names are joined.
///
/// ```
/// use stratus_aws::capitalize_header;
///
/// assert_eq!(capitalize_header("content-type"), "Content-Type");
/// assert_eq!(capitalize_header("authorization"), "Authorization");
/// assert_eq!(capitalize_header("x api key"), "XApiKey");
/// ```
pub fn capitalize_header(name: &str) -> String {
    let (separator, joiner) = if name.contains('-') { ('-', "-") } else { (' ', "") };
    name.split(separator)
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(joiner)
}

fn capitalize_first(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
