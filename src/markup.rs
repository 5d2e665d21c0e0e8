//! HTML to wiki-markup translation
//!
//! Second stage of the normalizer: converts the constrained HTML subset
//! found in email bodies into the tracker's wiki syntax. The passes run
//! in a fixed order; each one replaces elements with plain text, so a
//! later pass only ever sees text produced by earlier ones. Entities are
//! decoded once at the end so that decoded angle brackets can never
//! re-enter parsing.

use crate::extract::{IMG_TAG_REGEX, src_attribute};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::LazyLock;

static ALT_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\salt\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static HREF_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

static HEADING_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    (1..=6)
        .map(|level| {
            Regex::new(&format!(r"(?is)<h{level}\b[^>]*>(.*?)</h{level}\s*>")).unwrap()
        })
        .collect()
});

static BOLD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:b|strong)\b[^>]*>(.*?)</(?:b|strong)\s*>").unwrap());

static ITALIC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:i|em)\b[^>]*>(.*?)</(?:i|em)\s*>").unwrap());

static UNDERLINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<u\b[^>]*>(.*?)</u\s*>").unwrap());

static STRIKE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:s|strike|del)\b[^>]*>(.*?)</(?:s|strike|del)\s*>").unwrap()
});

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b([^>]*)>(.*?)</a\s*>").unwrap());

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code\s*>").unwrap());

static BR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<br\b[^>]*>").unwrap());

static NEWLINE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static SPACE_RUN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").unwrap());

/// Translate an HTML fragment into tracker wiki markup
///
/// Empty or blank input yields an empty string. The function never
/// fails; anything it does not recognize is flattened to its text
/// content.
#[must_use]
pub fn html_to_markup(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let text = replace_images(html);
    let text = replace_headings(&text);
    let text = replace_inline(&text);
    let text = replace_links(&text);
    let text = replace_lists(&text);
    let text = replace_code(&text);
    let text = replace_blockquotes(&text);
    let text = BR_REGEX.replace_all(&text, "\n");
    let text = replace_containers(&text);
    let text = decode_entities(&strip_tags(&text));
    normalize_whitespace(&text)
}

/// Images the extractor left behind: external references and odd shapes
fn replace_images(text: &str) -> String {
    IMG_TAG_REGEX
        .replace_all(text, |caps: &Captures| {
            let tag = &caps[0];
            let alt = attribute(tag, &ALT_ATTR_REGEX).unwrap_or_default();
            match src_attribute(tag) {
                Some(src) if !src.is_empty() => {
                    let filename = image_filename(src);
                    if alt.is_empty() {
                        format!("!{filename}|thumbnail!")
                    } else {
                        format!("!{filename}|alt={alt},thumbnail!")
                    }
                }
                _ if !alt.is_empty() => alt.to_string(),
                _ => "[Image]".to_string(),
            }
        })
        .into_owned()
}

/// Filename referenced by an image src: last path segment, query string
/// and fragment stripped
fn image_filename(src: &str) -> &str {
    let name = src.rsplit('/').next().unwrap_or(src);
    let name = name.split('?').next().unwrap_or(name);
    name.split('#').next().unwrap_or(name)
}

fn replace_headings(text: &str) -> String {
    let mut out = text.to_string();
    for (i, regex) in HEADING_REGEXES.iter().enumerate() {
        let level = i + 1;
        out = regex
            .replace_all(&out, |caps: &Captures| {
                format!("h{level}. {}\n", strip_tags(&caps[1]))
            })
            .into_owned();
    }
    out
}

fn replace_inline(text: &str) -> String {
    let passes: [(&Regex, char); 4] = [
        (&BOLD_REGEX, '*'),
        (&ITALIC_REGEX, '_'),
        (&UNDERLINE_REGEX, '+'),
        (&STRIKE_REGEX, '-'),
    ];

    let mut out = text.to_string();
    for (regex, marker) in passes {
        out = regex
            .replace_all(&out, |caps: &Captures| {
                format!("{marker}{}{marker}", strip_tags(&caps[1]))
            })
            .into_owned();
    }
    out
}

fn replace_links(text: &str) -> String {
    LINK_REGEX
        .replace_all(text, |caps: &Captures| {
            let label = strip_tags(&caps[2]);
            match attribute(&caps[1], &HREF_ATTR_REGEX) {
                Some(href) if !href.is_empty() => format!("[{label}|{href}]"),
                _ => label,
            }
        })
        .into_owned()
}

fn replace_lists(text: &str) -> String {
    let text = replace_list(text, "ul", "* ");
    replace_list(&text, "ol", "# ")
}

fn replace_list(text: &str, tag: &str, prefix: &str) -> String {
    replace_element(text, tag, |inner| {
        let items: Vec<String> = list_items(inner)
            .iter()
            .map(|item| format!("{prefix}{}", strip_tags(item).trim()))
            .collect();
        format!("\n{}\n", items.join("\n"))
    })
}

/// Preformatted blocks first, then standalone inline code. Code elements
/// inside a `<pre>` are consumed by the block pass and never get inline
/// markers.
fn replace_code(text: &str) -> String {
    let text = replace_element(text, "pre", |inner| {
        format!("{{code}}\n{}\n{{code}}\n", strip_tags(inner))
    });
    CODE_REGEX
        .replace_all(&text, |caps: &Captures| {
            format!("{{{{{}}}}}", strip_tags(&caps[1]))
        })
        .into_owned()
}

fn replace_blockquotes(text: &str) -> String {
    replace_element(text, "blockquote", |inner| {
        let flat = strip_tags(inner);
        let quoted: Vec<String> = flat
            .trim()
            .lines()
            .map(|line| format!("bq. {line}"))
            .collect();
        format!("\n{}\n", quoted.join("\n"))
    })
}

/// Paragraphs and generic block containers become text surrounded by
/// blank lines; inline markup applied by earlier passes survives inside.
fn replace_containers(text: &str) -> String {
    let text = replace_element(text, "p", |inner| format!("\n{}\n", strip_tags(inner)));
    replace_element(&text, "div", |inner| format!("\n{}\n", strip_tags(inner)))
}

/// Replace every `tag` element with `render(inner)`, outermost first.
/// Rendered output never re-enters the search because `render` flattens
/// its input to plain text.
fn replace_element(text: &str, tag: &str, render: impl Fn(&str) -> String) -> String {
    let lower = ascii_lower(text);
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    while let Some((whole, inner)) = find_element(&lower, tag, cursor) {
        out.push_str(&text[cursor..whole.start]);
        out.push_str(&render(&text[inner]));
        cursor = whole.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Byte ranges of the first complete `tag` element at or after `from`:
/// the whole element and its inner content. Nested same-tag elements are
/// kept inside the returned ranges. Unclosed elements are skipped.
fn find_element(lower: &str, tag: &str, from: usize) -> Option<(Range<usize>, Range<usize>)> {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}");

    let mut search = from;
    loop {
        let start = find_tag_token(lower, &open_pat, search)?;
        let Some(gt) = lower[start..].find('>') else {
            return None;
        };
        let inner_start = start + gt + 1;

        let mut depth = 1usize;
        let mut pos = inner_start;
        let matched = loop {
            let Some(close) = find_tag_token(lower, &close_pat, pos) else {
                break None;
            };
            match find_tag_token(lower, &open_pat, pos) {
                Some(open) if open < close => {
                    depth += 1;
                    pos = open + open_pat.len();
                }
                _ => {
                    depth -= 1;
                    pos = close + close_pat.len();
                    if depth == 0 {
                        break Some(close);
                    }
                }
            }
        };

        match matched {
            Some(close) => {
                let end = lower[close..].find('>').map_or(lower.len(), |g| close + g + 1);
                return Some((start..end, inner_start..close));
            }
            // Unbalanced: skip this opening tag, the final flatten
            // removes it
            None => search = start + open_pat.len(),
        }
    }
}

/// First occurrence of `pattern` at a tag-name boundary, so `<li` does
/// not match `<link`
fn find_tag_token(lower: &str, pattern: &str, mut from: usize) -> Option<usize> {
    while let Some(offset) = lower[from..].find(pattern) {
        let start = from + offset;
        let end = start + pattern.len();
        if token_boundary(lower, end) {
            return Some(start);
        }
        from = end;
    }
    None
}

fn token_boundary(lower: &str, at: usize) -> bool {
    lower[at..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_ascii_alphanumeric() && c != '-')
}

fn token_at(lower: &str, at: usize, token: &str) -> bool {
    lower[at..].starts_with(token) && token_boundary(lower, at + token.len())
}

/// Direct items of a list body. A nested list stays inside the item that
/// contains it, so its entries end up flattened into that item's text.
fn list_items(inner: &str) -> Vec<&str> {
    let lower = ascii_lower(inner);
    let mut items = Vec::new();
    let mut current: Option<usize> = None;
    let mut depth = 0usize;

    let mut pos = 0;
    while let Some(lt) = lower[pos..].find('<').map(|i| pos + i) {
        pos = lt + 1;
        if depth == 0 && token_at(&lower, lt, "</li") {
            if let Some(start) = current.take() {
                items.push(&inner[start..lt]);
            }
        } else if depth == 0 && token_at(&lower, lt, "<li") {
            // An unclosed previous item ends where the next one starts
            if let Some(start) = current.take() {
                items.push(&inner[start..lt]);
            }
            match lower[lt..].find('>') {
                Some(gt) => {
                    current = Some(lt + gt + 1);
                    pos = lt + gt + 1;
                }
                None => break,
            }
        } else if token_at(&lower, lt, "<ul") || token_at(&lower, lt, "<ol") {
            depth += 1;
        } else if token_at(&lower, lt, "</ul") || token_at(&lower, lt, "</ol") {
            depth = depth.saturating_sub(1);
        }
    }
    if let Some(start) = current {
        items.push(&inner[start..]);
    }
    items
}

/// Attribute value out of a tag or attribute list, quoted or bare
fn attribute<'t>(tag: &'t str, regex: &Regex) -> Option<&'t str> {
    regex.captures(tag).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
    })
}

/// Text content of an HTML fragment: tags dropped, script and style
/// bodies dropped, whitespace kept verbatim. Entities are left encoded
/// for the final decode step.
fn strip_tags(html: &str) -> String {
    let lower = ascii_lower(html);
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut skip_until: Option<&'static str> = None;

    for (i, c) in html.char_indices() {
        if let Some(end_token) = skip_until {
            if c == '<' && token_at(&lower, i, end_token) {
                skip_until = None;
                in_tag = true;
            }
            continue;
        }
        if in_tag {
            if c == '>' {
                in_tag = false;
            }
            continue;
        }
        if c == '<' {
            if token_at(&lower, i, "<script") {
                skip_until = Some("</script");
            } else if token_at(&lower, i, "<style") {
                skip_until = Some("</style");
            }
            in_tag = true;
            continue;
        }
        result.push(c);
    }
    result
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = NEWLINE_RUN_REGEX.replace_all(&text, "\n\n");
    let text = SPACE_RUN_REGEX.replace_all(&text, " ");
    text.trim().to_string()
}

fn ascii_lower(text: &str) -> String {
    let mut lower = text.to_string();
    lower.make_ascii_lowercase();
    lower
}
