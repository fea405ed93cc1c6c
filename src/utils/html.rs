// src/utils/html.rs

/// Sanitizes admin-entered free text (subject and chapter descriptions)
/// with ammonia's whitelist before it is stored and later rendered.
///
/// Safe formatting tags like `<b>` survive; `<script>` and event handler
/// attributes are stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input).trim().to_string()
}
