use regex::Regex;
use std::sync::LazyLock;

static DANGEROUS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|iframe|object|embed)\b[^>]*>.*?</(script|style|iframe|object|embed)\s*>")
        .expect("valid block pattern")
});
static DANGEROUS_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(script|style|iframe|object|embed|link|meta)\b[^>]*>").expect("valid tag pattern")
});
static EVENT_HANDLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid handler pattern")
});
static JS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(href|src)\s*=\s*(["']?)\s*javascript:[^"'\s>]*(["']?)"#).expect("valid url pattern")
});
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// 清理 CMS 富文本：移除 script/style 等區塊、on* 事件屬性與 javascript: 連結，保留一般標記
pub fn sanitize_html(html: &str) -> String {
    let without_blocks = DANGEROUS_BLOCK_RE.replace_all(html, "");
    let without_tags = DANGEROUS_TAG_RE.replace_all(&without_blocks, "");
    let without_handlers = EVENT_HANDLER_RE.replace_all(&without_tags, "");
    JS_URL_RE
        .replace_all(&without_handlers, "$1=$2#$3")
        .into_owned()
}

/// 移除所有標籤並壓縮空白，用於摘要與 meta description
pub fn strip_tags(html: &str) -> String {
    let without_blocks = DANGEROUS_BLOCK_RE.replace_all(html, " ");
    let text = ANY_TAG_RE.replace_all(&without_blocks, " ");
    let text = decode_basic_entities(&text);
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// 擷取純文字摘要，超過 `max_chars` 時在字元邊界截斷並加上省略號
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_tags(html);
    if text.chars().count() <= max_chars {
        return text;
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}…", truncated.trim_end())
}

fn decode_basic_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_removes_scripts_and_handlers() {
        let html = r#"<p onclick="steal()">Hi <b>there</b></p><script>alert(1)</script><a href="javascript:evil()">x</a>"#;
        let clean = sanitize_html(html);

        assert_eq!(clean, r##"<p>Hi <b>there</b></p><a href="#">x</a>"##);
    }

    #[test]
    fn test_sanitize_keeps_regular_markup() {
        let html = r#"<h2>Title</h2><img src="/a.png" alt="a"><a href="https://techhouse.io">link</a>"#;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<p>Hello&nbsp;<b>world</b></p>\n<style>p{}</style><p>again &amp; again</p>"),
            "Hello world again & again"
        );
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundary() {
        assert_eq!(excerpt("<p>مرحبا بكم في تك هاوس</p>", 5), "مرحبا…");
        assert_eq!(excerpt("<p>short</p>", 50), "short");
    }
}
