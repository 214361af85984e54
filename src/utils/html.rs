/// Sanitizes teacher-authored question text before it is stored.
///
/// Whitelist based: harmless formatting tags such as `<b>` survive, while
/// `<script>` (including its content), `<iframe>` and event-handler
/// attributes are removed. Text outside tags comes back entity-encoded,
/// so the result is always an HTML fragment, never plain text.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
