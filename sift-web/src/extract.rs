use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

// html5ever synthesises a <body> for every document, so presence is decided
// on the source markup.
static BODY_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body(?:[\s/>]|$)").expect("valid body regex"));
static BODY_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid body close regex"));
// An unterminated comment runs to the end of the input.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("valid comment regex"));

const STRIPPED_TAGS: &[&str] = &["script", "style"];

/// Return the `<body>...</body>` markup of `html`, or an empty string when
/// the markup has no body.
///
/// When the body is closed the result is the exact slice of the input, from
/// the opening tag through the last closing tag. An unclosed body is repaired
/// the way a browser would and re-serialized; parsing never fails.
pub fn extract_body_content(html: &str) -> String {
    let comments: Vec<Range<usize>> = COMMENT_RE.find_iter(html).map(|m| m.range()).collect();
    let outside_comments = |m: &regex::Match<'_>| !comments.iter().any(|c| c.contains(&m.start()));

    let Some(open) = BODY_OPEN_RE.find_iter(html).find(|m| outside_comments(m)) else {
        return String::new();
    };

    if let Some(close) = BODY_CLOSE_RE
        .find_iter(&html[open.end()..])
        .filter(|m| !comments.iter().any(|c| c.contains(&(open.end() + m.start()))))
        .last()
    {
        return html[open.start()..open.end() + close.end()].to_string();
    }

    let document = Html::parse_document(&html[open.start()..]);
    document
        .tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .map(|body| body.html())
        .unwrap_or_default()
}

/// Strip `script`/`style` elements from `body` and return its visible text,
/// one trimmed, non-empty line per line of text content.
pub fn clean_body_content(body: &str) -> String {
    let mut text = Vec::new();
    collect_text(Html::parse_document(body), &mut text);
    collapse_blank_lines(&text.join("\n"))
}

// scraper parses with scripting enabled, which leaves <noscript> content as
// one raw text node; that text is parsed again as a fragment.
fn collect_text(mut document: Html, out: &mut Vec<String>) {
    let stripped: Vec<_> = document
        .tree
        .root()
        .descendants()
        .filter(|node| {
            node.value()
                .as_element()
                .is_some_and(|el| STRIPPED_TAGS.contains(&el.name()))
        })
        .map(|node| node.id())
        .collect();
    for id in stripped {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let in_noscript = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name() == "noscript"))
            .unwrap_or(false);
        if in_noscript {
            collect_text(Html::parse_fragment(text), out);
        } else {
            out.push(String::from(&**text));
        }
    }
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str =
        "<html><body><script>x()</script><p>Hello</p>  <p>World</p></body></html>";

    #[test]
    fn body_is_the_source_substring() {
        let body = extract_body_content(PAGE);
        assert_eq!(
            body,
            "<body><script>x()</script><p>Hello</p>  <p>World</p></body>"
        );
        assert!(PAGE.contains(&body));
    }

    #[test]
    fn body_keeps_attributes() {
        let html = r#"<!DOCTYPE html><html><head><title>t</title></head><body class="main" id="top"><div>hi</div></body></html>"#;
        assert_eq!(
            extract_body_content(html),
            r#"<body class="main" id="top"><div>hi</div></body>"#
        );
    }

    #[test]
    fn uppercase_body_tag_is_found() {
        let body = extract_body_content("<HTML><BODY><P>shout</P></BODY></HTML>");
        assert_eq!(body, "<BODY><P>shout</P></BODY>");
    }

    #[test]
    fn browser_page_source_body_is_sliced_verbatim() {
        let page = "<html>\n<head><title>t</title></head>\n<body>\n<p>x</p>\n</body>\n</html>\n";
        let body = extract_body_content(page);
        assert_eq!(body, "<body>\n<p>x</p>\n</body>");
        assert!(page.contains(&body));
    }

    #[test]
    fn quoting_void_tags_and_entities_are_untouched() {
        let page = "<html><body><p class='a'>it&#39;s<br/>here</p></body>\n</html>";
        assert_eq!(
            extract_body_content(page),
            "<body><p class='a'>it&#39;s<br/>here</p></body>"
        );
    }

    #[test]
    fn body_tags_inside_comments_are_ignored() {
        assert_eq!(extract_body_content("<!-- <body> --><p>x</p>"), "");
        assert_eq!(extract_body_content("<!-- <body> unterminated"), "");
        let page = "<html><!-- <body>old</body> --><body><p>new</p></body><!-- </body> --></html>";
        assert_eq!(extract_body_content(page), "<body><p>new</p></body>");
    }

    #[test]
    fn missing_body_yields_empty_string() {
        assert_eq!(extract_body_content(""), "");
        assert_eq!(extract_body_content("<p>orphan paragraph</p>"), "");
        assert_eq!(
            extract_body_content("<html><head><title>only head</title></head></html>"),
            ""
        );
        // <bodyguard> is not a body element.
        assert_eq!(extract_body_content("<bodyguard>x</bodyguard>"), "");
    }

    #[test]
    fn malformed_markup_is_repaired_not_rejected() {
        let body = extract_body_content("<html><body><div><p>open <b>bold</div>");
        assert!(body.starts_with("<body>"));
        assert!(body.ends_with("</body>"));
        assert_eq!(clean_body_content(&body), "open\nbold");
    }

    #[test]
    fn scripts_and_styles_never_reach_the_text() {
        let body = r#"<body>
            <style>.a { color: red }</style>
            <div>Visible<script type="text/javascript">var secret = 1;</script></div>
            <section><style>p{}</style><p>Also visible</p></section>
        </body>"#;
        let text = clean_body_content(body);
        assert_eq!(text, "Visible\nAlso visible");
        assert!(!text.contains("secret"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn lines_are_trimmed_and_blank_lines_dropped() {
        let body = "<body><pre>\n   first  \n\n\t\n  second\n</pre><p>   </p><p> third </p></body>";
        let text = clean_body_content(body);
        assert_eq!(text, "first\nsecond\nthird");
        assert!(text.lines().all(|l| !l.is_empty() && l.trim() == l));
    }

    #[test]
    fn inline_elements_become_separate_lines() {
        assert_eq!(
            clean_body_content("<body><p>Price: <b>42</b> EUR</p></body>"),
            "Price:\n42\nEUR"
        );
    }

    #[test]
    fn entities_are_decoded_and_comments_skipped() {
        assert_eq!(
            clean_body_content("<body><!-- note --><p>Fish &amp; Chips</p></body>"),
            "Fish & Chips"
        );
    }

    #[test]
    fn noscript_fallback_markup_is_reduced_to_text() {
        let body = r#"<body><p>before</p><noscript><p>nojs</p><img src="pixel.gif"><iframe src="https://tracker.example/"></iframe></noscript><p>after</p></body>"#;
        let text = clean_body_content(body);
        assert_eq!(text, "before\nnojs\nafter");
        assert!(!text.contains('<'));
    }

    #[test]
    fn empty_input_cleans_to_empty() {
        assert_eq!(clean_body_content(""), "");
    }

    #[test]
    fn scenario_body_cleans_to_two_lines() {
        assert_eq!(clean_body_content(&extract_body_content(PAGE)), "Hello\nWorld");
    }
}
