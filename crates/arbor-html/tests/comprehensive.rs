//! Comprehensive tests for arbor-html
//!
//! Parsing, serialization and markup mutation together with selector queries.

use arbor_css::ElementQuery;
use arbor_dom::{NodeStore, ns};
use arbor_html::{DomParser, HtmlMarkup, HtmlParser, HtmlSerializer, ParseOptions};

#[test]
fn test_select_in_source_order() {
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(
        &mut store,
        r#"<div class="one">first</div><div id="two">second</div>"#,
    );

    let divs = store.query_selector_all(doc, "div").unwrap();
    assert_eq!(divs.len(), 2);
    assert_eq!(store.outer_html(divs[0]), r#"<div class="one">first</div>"#);
    assert_eq!(store.outer_html(divs[1]), r#"<div id="two">second</div>"#);
    assert_eq!(store.get_element_by_id(doc, "two"), Some(divs[1]));
}

#[test]
fn test_roundtrip_preserves_attributes_and_text() {
    let markup = concat!(
        "<html><head><title>T</title></head><body>",
        r#"<p id="a" class="x y" data-n="1">one &amp; two</p>"#,
        r#"<input type="checkbox" checked=""><br>"#,
        "<!--note--></body></html>"
    );
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(&mut store, markup);
    let serialized = store.outer_html(doc);
    assert_eq!(serialized, markup);

    let reparsed = arbor_html::parse(&mut store, &serialized);
    let p = store.query_selector(reparsed, "p").unwrap().unwrap();
    assert_eq!(store.get_attribute_names(p), vec!["id", "class", "data-n"]);
    assert_eq!(store.text_content(p).as_deref(), Some("one & two"));
}

#[test]
fn test_doctype_serialization() {
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(&mut store, "<!DOCTYPE html><p>x</p>");
    assert_eq!(
        store.outer_html(doc),
        "<!DOCTYPE html><html><head></head><body><p>x</p></body></html>"
    );
}

#[test]
fn test_script_content_is_raw() {
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(&mut store, "<script>if (a < b && c) {}</script>");
    let script = store.query_selector(doc, "script").unwrap().unwrap();
    assert_eq!(store.inner_html(script), "if (a < b && c) {}");
}

#[test]
fn test_noscript_follows_scripting_flag() {
    let markup = "<body><noscript><p>off</p></noscript></body>";

    let mut store = NodeStore::new();
    let scripted = arbor_html::parse(&mut store, markup);
    // with scripting the content stays text
    assert!(store.query_selector(scripted, "noscript p").unwrap().is_none());

    let options = ParseOptions {
        scripting_enabled: false,
        ..Default::default()
    };
    let unscripted = HtmlParser::with_options(options).parse(&mut store, markup);
    assert!(store.query_selector(unscripted, "noscript p").unwrap().is_some());
}

#[test]
fn test_foreign_content() {
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(
        &mut store,
        "<svg><foreignObject><div>x</div></foreignObject><circle r=\"1\"/></svg>",
    );
    let circle = store.query_selector(doc, "circle").unwrap().unwrap();
    assert_eq!(store.namespace_uri(circle), Some(ns::SVG));
    let foreign = store.query_selector(doc, "foreignObject").unwrap().unwrap();
    assert_eq!(store.local_name(foreign), Some("foreignObject"));

    let svg = store.query_selector(doc, "svg").unwrap().unwrap();
    assert_eq!(
        store.outer_html(svg),
        "<svg><foreignObject><div>x</div></foreignObject><circle r=\"1\"></circle></svg>"
    );
}

#[test]
fn test_markup_setters_with_queries() {
    let mut store = NodeStore::new();
    let doc = DomParser::new()
        .parse_from_string(&mut store, "<main><ul></ul></main>", "text/html")
        .unwrap();
    let ul = store.query_selector(doc, "ul").unwrap().unwrap();

    store.set_inner_html(ul, "<li>1</li><li class=on>2</li>").unwrap();
    let on = store.query_selector(doc, "li.on").unwrap().unwrap();
    assert_eq!(store.closest(on, "main").unwrap(), store.query_selector(doc, "main").unwrap());

    store.set_outer_html(on, "<li>2a</li><li>2b</li>").unwrap();
    assert_eq!(store.query_selector_all(doc, "li").unwrap().len(), 3);
    assert!(store.query_selector(doc, ".on").unwrap().is_none());
}

#[test]
fn test_pretty_serializer() {
    let mut store = NodeStore::new();
    let doc = arbor_html::parse(&mut store, "<div><p>a</p></div>");
    let div = store.query_selector(doc, "div").unwrap().unwrap();
    assert_eq!(
        HtmlSerializer::pretty().serialize_outer(&store, div),
        "<div>\n  <p>a</p>\n</div>"
    );
}

#[test]
fn test_serialize_deep_tree() {
    const DEPTH: usize = 200_000;
    let mut store = NodeStore::new();
    let doc = store.create_document();

    // built leaf first so each insert stays cheap
    let mut root = store.create_text_node(doc, "x");
    for _ in 0..DEPTH {
        let div = store.create_element(doc, "div");
        store.append_child(div, root).unwrap();
        root = div;
    }

    let html = store.outer_html(root);
    assert_eq!(html.len(), DEPTH * "<div></div>".len() + 1);
    assert!(html.starts_with("<div><div>"));
    assert!(html.ends_with("</div></div>"));
    assert_eq!(html.matches('x').count(), 1);

    let inner = store.inner_html(root);
    assert_eq!(inner.len(), html.len() - "<div></div>".len());
}
