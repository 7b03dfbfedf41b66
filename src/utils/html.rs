/// Clean HTML content using the ammonia library.
///
/// Whitelist-based: safe inline tags (like <b>, <p>) survive, dangerous tags
/// (like <script>, <iframe>) are removed together with their content, and
/// event attributes (like onclick) are dropped.
///
/// Comment text is rendered by other clients, so it is cleaned before it is
/// stored rather than on every read.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
