use super::*;
use crate::document::{serialize, Document};

const PAGE: &str = r#"<html>
<body>
  <p>Welcome</p>
  <p>Welcome</p>
  <p>Contact us</p>
  <nav>
    <a href="/" class="home">Home</a>
    <a href=about.html>About</a>
    <a href="/join">Join</a>
    <a href="/join">Join</a>
  </nav>
</body>
</html>
"#;

fn load() -> (Document, NodeIndex) {
    let document = Document::parse("index.html", PAGE).unwrap();
    let index = NodeIndex::build(&document);
    (document, index)
}

#[test]
fn duplicate_text_is_edited_only_where_the_handle_points() {
    let (mut document, index) = load();
    assert_eq!(index.len(), 2);

    set_text(&mut document, &index, 0, "Welcome Team").unwrap();

    assert_eq!(
        serialize(&document),
        PAGE.replacen("<p>Welcome</p>", "<p>Welcome Team</p>", 1)
    );
}

#[test]
fn only_the_edited_region_changes() {
    let (mut document, index) = load();

    set_text(&mut document, &index, 1, "Write to <em>us</em>").unwrap();

    assert_eq!(
        serialize(&document),
        PAGE.replace("<p>Contact us</p>", "<p>Write to <em>us</em></p>")
    );
}

#[test]
fn handles_stay_bound_after_content_collides() {
    let (mut document, index) = load();

    set_text(&mut document, &index, 1, "Welcome").unwrap();
    set_text(&mut document, &index, 1, "Contact the crew").unwrap();

    let paragraphs = document
        .find_elements(|element| element.name() == "p")
        .into_iter()
        .map(|id| document.inner_markup(id))
        .collect::<Vec<_>>();
    assert_eq!(paragraphs, vec!["Welcome", "Welcome", "Contact the crew"]);
}

#[test]
fn editing_inside_replaced_content_changes_nothing_visible() {
    let source = "<div><p>Inner</p></div>\n";
    let mut document = Document::parse("index.html", source).unwrap();
    let index = NodeIndex::build(&document);
    let inner = index.get(1).unwrap().node;
    assert!(document.is_attached(inner));

    set_text(&mut document, &index, 0, "<p>Fresh</p>").unwrap();
    assert!(!document.is_attached(inner));

    set_text(&mut document, &index, 1, "Lost").unwrap();
    assert_eq!(serialize(&document), "<div><p>Fresh</p></div>\n");
}

#[test]
fn unknown_handle_is_rejected_without_changes() {
    let (mut document, index) = load();

    let error = set_text(&mut document, &index, 2, "anything").unwrap_err();

    assert!(matches!(error, EditorError::InvalidHandle(2)));
    assert_eq!(serialize(&document), PAGE);
}

#[test]
fn malformed_replacement_leaves_the_document_untouched() {
    let (mut document, index) = load();

    let error = set_text(&mut document, &index, 0, "<strong class=\"x\"").unwrap_err();

    assert!(matches!(error, EditorError::Parse { .. }));
    assert_eq!(serialize(&document), PAGE);
}

#[test]
fn stray_ampersands_in_replacement_are_escaped() {
    let (mut document, index) = load();

    set_text(&mut document, &index, 1, "Tea & cake").unwrap();

    assert!(serialize(&document).contains("<p>Tea &amp; cake</p>"));
}

#[test]
fn set_link_rewrites_label_and_target() {
    let (mut document, _) = load();

    let link = set_link(&mut document, 1, "About <us>", "/about/").unwrap();

    assert_eq!(link.position, 1);
    assert_eq!(link.label, "About <us>");
    assert_eq!(link.target, "/about/");
    assert_eq!(
        serialize(&document),
        PAGE.replace(
            "<a href=about.html>About</a>",
            "<a href=\"/about/\">About &lt;us&gt;</a>"
        )
    );

    let links = list_links(&document);
    assert_eq!(links[1].label, "About <us>");
    assert_eq!(links[1].target, "/about/");
}

#[test]
fn set_link_keeps_other_attributes() {
    let (mut document, _) = load();

    set_link(&mut document, 0, "Start", "/index.html").unwrap();

    assert!(serialize(&document).contains(r#"<a href="/index.html" class="home">Start</a>"#));
}

#[test]
fn target_with_apostrophe_keeps_single_quoted_tag_parseable() {
    let mut document =
        Document::parse("index.html", "<p><a href='/old' class='x'>Old</a></p>\n").unwrap();

    set_link(&mut document, 0, "New", "/it's").unwrap();

    let written = serialize(&document);
    assert_eq!(written, "<p><a href='/it&#39;s' class='x'>New</a></p>\n");
    let reparsed = Document::parse("index.html", &written).unwrap();
    let links = list_links(&reparsed);
    assert_eq!(links[0].target, "/it's");
    assert_eq!(links[0].label, "New");
}

#[test]
fn duplicate_links_are_addressed_separately() {
    let (mut document, _) = load();

    set_link(&mut document, 3, "Sign up", "/signup").unwrap();

    let links = list_links(&document)
        .into_iter()
        .map(|link| (link.label, link.target))
        .collect::<Vec<_>>();
    assert_eq!(links[2], ("Join".to_string(), "/join".to_string()));
    assert_eq!(links[3], ("Sign up".to_string(), "/signup".to_string()));
}

#[test]
fn link_position_out_of_range_is_rejected() {
    let (mut document, _) = load();

    let error = set_link(&mut document, 4, "x", "/x").unwrap_err();

    assert!(matches!(
        error,
        EditorError::InvalidLinkPosition {
            position: 4,
            count: 4
        }
    ));
    assert_eq!(serialize(&document), PAGE);
}
