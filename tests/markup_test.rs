use mail2ticket::html_to_markup;

#[test]
fn test_empty_input() {
    assert_eq!(html_to_markup(""), "");
    assert_eq!(html_to_markup("   \n  "), "");
}

#[test]
fn test_plain_text_unchanged() {
    assert_eq!(html_to_markup("hello world"), "hello world");
    assert_eq!(html_to_markup("line one\nline two"), "line one\nline two");
}

#[test]
fn test_paragraph_with_bold() {
    assert_eq!(html_to_markup("<p>Hello <b>World</b></p>"), "Hello *World*");
}

#[test]
fn test_headings() {
    assert_eq!(
        html_to_markup("<h1>Big</h1><h3>Small</h3>"),
        "h1. Big\nh3. Small"
    );
}

#[test]
fn test_inline_styles() {
    assert_eq!(html_to_markup("<i>a</i> <u>b</u> <s>c</s>"), "_a_ +b+ -c-");
    assert_eq!(html_to_markup("<strong>x</strong>"), "*x*");
    assert_eq!(html_to_markup("<em>y</em>"), "_y_");
    assert_eq!(html_to_markup("<del>z</del>"), "-z-");
}

#[test]
fn test_link_with_href() {
    assert_eq!(
        html_to_markup(r#"<a href="https://example.com">site</a>"#),
        "[site|https://example.com]"
    );
}

#[test]
fn test_link_without_href() {
    assert_eq!(html_to_markup("<a>just text</a>"), "just text");
}

#[test]
fn test_unordered_list() {
    assert_eq!(
        html_to_markup("<ul><li>one</li><li>two</li></ul>"),
        "* one\n* two"
    );
}

#[test]
fn test_ordered_list() {
    assert_eq!(
        html_to_markup("<ol><li>first</li><li>second</li></ol>"),
        "# first\n# second"
    );
}

#[test]
fn test_nested_list_flattened_into_item() {
    let html = "<ul><li>top<ul><li>nested</li></ul></li><li>other</li></ul>";
    assert_eq!(html_to_markup(html), "* topnested\n* other");
}

#[test]
fn test_preformatted_block() {
    assert_eq!(
        html_to_markup("<pre>line one\nline two</pre>"),
        "{code}\nline one\nline two\n{code}"
    );
}

#[test]
fn test_inline_code() {
    assert_eq!(
        html_to_markup("<p>run <code>cargo test</code> now</p>"),
        "run {{cargo test}} now"
    );
}

#[test]
fn test_code_inside_pre_not_double_marked() {
    let output = html_to_markup("<pre><code>let x = 1;</code></pre>");
    assert_eq!(output, "{code}\nlet x = 1;\n{code}");
    assert!(!output.contains("{{"));
}

#[test]
fn test_blockquote_prefixes_every_line() {
    assert_eq!(
        html_to_markup("<blockquote>line one\nline two</blockquote>"),
        "bq. line one\nbq. line two"
    );
}

#[test]
fn test_line_breaks() {
    assert_eq!(html_to_markup("first<br>second"), "first\nsecond");
    assert_eq!(html_to_markup("a<br/>b"), "a\nb");
}

#[test]
fn test_divs_become_blocks() {
    assert_eq!(
        html_to_markup("<div>alpha</div><div>beta</div>"),
        "alpha\n\nbeta"
    );
}

#[test]
fn test_image_with_alt() {
    assert_eq!(
        html_to_markup(r#"<img src="https://cdn.example.com/a/logo.png?size=2" alt="Logo">"#),
        "!logo.png|alt=Logo,thumbnail!"
    );
}

#[test]
fn test_image_without_alt_strips_query_and_fragment() {
    assert_eq!(
        html_to_markup(r#"<img src="/x/y/photo.jpg#top">"#),
        "!photo.jpg|thumbnail!"
    );
}

#[test]
fn test_image_without_src() {
    assert_eq!(html_to_markup(r#"<img alt="Chart">"#), "Chart");
    assert_eq!(html_to_markup("<img>"), "[Image]");
}

#[test]
fn test_newline_runs_collapse_to_two() {
    assert_eq!(html_to_markup("a\n\n\n\nb"), "a\n\nb");
}

#[test]
fn test_space_runs_collapse_to_one() {
    assert_eq!(html_to_markup("too    many spaces"), "too many spaces");
}

#[test]
fn test_entities_decoded_last() {
    assert_eq!(html_to_markup("&lt;tag&gt; &amp; more"), "<tag> & more");
    assert_eq!(html_to_markup("a&nbsp;b"), "a b");
}

#[test]
fn test_unknown_tags_flattened() {
    assert_eq!(
        html_to_markup("<span>keep</span> <table><tr><td>cell</td></tr></table>"),
        "keep cell"
    );
}

#[test]
fn test_style_content_dropped() {
    assert_eq!(
        html_to_markup("<style>body { color: red; }</style>hello"),
        "hello"
    );
}

#[test]
fn test_uppercase_tags() {
    assert_eq!(html_to_markup("<P>Hi <B>there</B></P>"), "Hi *there*");
}

#[test]
fn test_mixed_document() {
    let html = concat!(
        "<h2>Request</h2>",
        r#"<p>Please see <a href="https://example.com/doc">the doc</a>.</p>"#,
        "<ul><li>item <b>one</b></li><li>item two</li></ul>",
    );
    assert_eq!(
        html_to_markup(html),
        "h2. Request\n\nPlease see [the doc|https://example.com/doc].\n\n* item *one*\n* item two"
    );
}
