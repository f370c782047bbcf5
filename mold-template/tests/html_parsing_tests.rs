use mold_dom::Document;
use mold_dom::serialize::to_html;
use mold_template::{Template, TemplateError};

fn create(src: &str) -> (Document, Vec<mold_dom::NodeId>) {
    let mut doc = Document::new();
    let roots = Template::new(src).unwrap().create(&mut doc).unwrap();
    (doc, roots)
}

#[test]
fn parses_a_string_of_text() {
    let (doc, dom) = create("Stop trying to hit me and hit me");
    assert_eq!(dom.len(), 1);
    assert_eq!(doc.node_name(dom[0]), "#text");
    assert_eq!(
        doc.node_value(dom[0]),
        Some("Stop trying to hit me and hit me")
    );
}

#[test]
fn parses_a_simple_element() {
    let (doc, dom) = create("<div></div>");
    assert_eq!(dom.len(), 1);
    assert_eq!(doc.node_name(dom[0]), "DIV");
}

#[test]
fn parses_multiple_elements() {
    let (doc, dom) = create("<section></section><div></div><span></span>");
    let names: Vec<&str> = dom.iter().map(|n| doc.node_name(*n)).collect();
    assert_eq!(names, vec!["SECTION", "DIV", "SPAN"]);
}

#[test]
fn parses_nested_elements() {
    let (doc, dom) = create("<section><div></div><span></span></section>");
    assert_eq!(dom.len(), 1);
    let children = doc.child_nodes(dom[0]);
    assert_eq!(children.len(), 2);
    assert_eq!(doc.node_name(children[0]), "DIV");
    assert_eq!(doc.node_name(children[1]), "SPAN");
}

#[test]
fn void_tags_are_siblings() {
    let (doc, dom) = create("<img><input>");
    assert_eq!(dom.len(), 2);
    assert_eq!(doc.node_name(dom[0]), "IMG");
    assert_eq!(doc.node_name(dom[1]), "INPUT");
    assert!(doc.child_nodes(dom[0]).is_empty());
    assert_eq!(doc.parent(dom[1]), None);
}

#[test]
fn parses_attributes() {
    let (doc, dom) =
        create(r#"<input type="text"><a href="/gurus"><div class="good morning folks"></div></a>"#);
    assert_eq!(doc.get_attribute(dom[0], "type"), Some("text"));
    assert_eq!(doc.get_attribute(dom[1], "href"), Some("/gurus"));
    let children = doc.child_nodes(dom[1]);
    assert_eq!(
        doc.get_attribute(children[0], "class"),
        Some("good morning folks")
    );
}

#[test]
fn inner_text_becomes_text_nodes() {
    let (doc, dom) =
        create("<div>My name is <span>Robot</span> thanks for reading the tests.</div>");
    let children = doc.child_nodes(dom[0]);
    assert_eq!(children.len(), 3);
    assert_eq!(doc.node_name(children[0]), "#text");
    assert_eq!(doc.node_value(children[0]), Some("My name is "));

    assert_eq!(doc.node_name(children[1]), "SPAN");
    let span_children = doc.child_nodes(children[1]);
    assert_eq!(span_children.len(), 1);
    assert_eq!(doc.node_value(span_children[0]), Some("Robot"));

    assert_eq!(doc.node_name(children[2]), "#text");
    assert_eq!(
        doc.node_value(children[2]),
        Some(" thanks for reading the tests.")
    );
}

#[test]
fn self_closing_slash_is_not_an_attribute() {
    for src in ["<input />", "<input/>", "<input type=\"a\"/>"] {
        let (doc, dom) = create(src);
        assert_eq!(dom.len(), 1, "{src}");
        assert!(
            doc.attributes(dom[0]).iter().all(|(k, _)| k != "/"),
            "{src}"
        );
    }
}

#[test]
fn literal_markup_round_trips() {
    let src = "<section>Intro<br><img alt=\"logo\"><p class=\"a b\">Body text</p>end</section>";
    let (doc, dom) = create(src);
    assert_eq!(
        to_html(&doc, &dom),
        "<SECTION>Intro<BR><IMG alt=\"logo\"><P class=\"a b\">Body text</P>end</SECTION>"
    );
}

#[test]
fn character_references_round_trip() {
    let src = "<p title=\"a &amp; b\">Tom &amp; Jerry, 2 > 1 < 3</p>";
    let (doc, dom) = create(src);
    let text = doc.child_nodes(dom[0])[0];
    assert_eq!(doc.node_value(text), Some("Tom &amp; Jerry, 2 > 1 < 3"));
    assert_eq!(
        to_html(&doc, &dom),
        "<P title=\"a &amp; b\">Tom &amp; Jerry, 2 > 1 < 3</P>"
    );
}

#[test]
fn unquoted_value_before_self_close() {
    let (doc, dom) = create("<div id=a/><span></span>");
    assert_eq!(dom.len(), 2);
    assert_eq!(doc.get_attribute(dom[0], "id"), Some("a"));
    assert!(doc.child_nodes(dom[0]).is_empty());
    assert_eq!(to_html(&doc, &dom), "<DIV id=\"a\"></DIV><SPAN></SPAN>");
}

#[test]
fn bang_markup_other_than_comments_is_text() {
    let (doc, dom) = create("<!DOCTYPE html><!-- note --><p>x</p>");
    assert_eq!(dom.len(), 2);
    assert_eq!(doc.node_value(dom[0]), Some("<!DOCTYPE html>"));
    assert_eq!(doc.node_name(dom[1]), "P");
}

#[test]
fn empty_template_creates_nothing() {
    let (doc, dom) = create("");
    assert!(dom.is_empty());
    assert!(doc.is_empty());
}

#[test]
fn create_twice_is_rejected() {
    let mut doc = Document::new();
    let mut tpl = Template::new("<div>{{a}}</div>").unwrap();
    let first = tpl.create(&mut doc).unwrap();
    let nodes_before = doc.len();
    assert_eq!(tpl.create(&mut doc), Err(TemplateError::AlreadyCreated));
    assert_eq!(doc.len(), nodes_before);
    assert!(tpl.is_created());
    assert_eq!(tpl.slots("a").len(), 1);
    assert_eq!(doc.parent(doc.child_nodes(first[0])[0]), Some(first[0]));
}

#[test]
fn malformed_source_fails_construction() {
    let err = Template::new("<div><p></div>").unwrap_err();
    assert!(matches!(err, TemplateError::Parse(_)));
}
