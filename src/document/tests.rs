use super::*;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Rowing Club</title>
  <style>p { color: #333; }</style>
</head>
<body>
  <!-- hero -->
  <h1 class=hero>Rowing&nbsp;Club</h1>
  <p>Welcome   aboard &amp; enjoy</p>
  <img src="boat.png" alt=boat>
  <br/>
  <script>if (a < b && c) { go(); }</script>
</body>
</html>
"#;

#[test]
fn untouched_document_serializes_to_its_input() {
    let document = Document::parse("index.html", PAGE).unwrap();
    assert_eq!(serialize(&document), PAGE);
}

#[test]
fn round_trip_keeps_unusual_formatting() {
    let source = "<DIV  Class = 'a'  >\r\n\t<p>one</p>\n</DIV>\n<!-- trailing -->";
    let document = Document::parse("odd.html", source).unwrap();
    assert_eq!(serialize(&document), source);
}

#[test]
fn text_content_decodes_references_and_skips_scripts() {
    let document = Document::parse("index.html", PAGE).unwrap();

    let heading = document.find_elements(|element| element.name() == "h1")[0];
    assert_eq!(document.text_content(heading), "Rowing\u{a0}Club");

    let paragraph = document.find_elements(|element| element.name() == "p")[0];
    assert_eq!(document.text_content(paragraph), "Welcome   aboard & enjoy");
    assert_eq!(
        document.inner_markup(paragraph),
        "Welcome   aboard &amp; enjoy"
    );

    let body = document.find_elements(|element| element.name() == "body")[0];
    let text = document.text_content(body);
    assert!(!text.contains("go()"));
    assert!(!text.contains("hero"));
}

#[test]
fn attributes_are_read_from_the_start_tag() {
    let document = Document::parse("index.html", PAGE).unwrap();
    let image = document.find_elements(|element| element.name() == "img")[0];
    let image = document.element(image).unwrap();

    assert_eq!(image.attribute("src").as_deref(), Some("boat.png"));
    assert_eq!(image.attribute("alt").as_deref(), Some("boat"));
    assert_eq!(image.attribute("title"), None);
}

#[test]
fn elements_are_visited_in_document_order() {
    let document =
        Document::parse("order.html", "<div><p>a</p><span>b</span></div><p>c</p>").unwrap();
    let names = document
        .descendants()
        .filter_map(|id| document.element(id))
        .map(|element| element.name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["div", "p", "span", "p"]);
}

#[test]
fn malformed_document_is_rejected_with_an_excerpt() {
    let source = "<html>\n<body>\n<p class=\"intro\"\n</body>\n</html>\n";
    let error = Document::parse("broken.html", source).unwrap_err();

    let (path, message) = match error {
        EditorError::Parse { path, message } => (path, message),
        other => panic!("expected a parse error, got {other:?}"),
    };
    assert_eq!(path, PathBuf::from("broken.html"));
    assert!(message.starts_with("===SYNTAX ERRORS===\n"));
    assert!(message.contains("->⎸"));
}

#[test]
fn bare_ampersands_and_angle_brackets_in_text_are_accepted() {
    let source = "<p>Tom & Jerry</p>\n<p>1 < 2 and 3 > 2</p>\n";
    let document = Document::parse("shows.html", source).unwrap();

    assert_eq!(serialize(&document), source);
    let paragraphs = document.find_elements(|element| element.name() == "p");
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(document.text_content(paragraphs[0]), "Tom & Jerry");
    assert_eq!(document.inner_markup(paragraphs[1]), "1 < 2 and 3 > 2");
}

#[test]
fn elements_left_open_at_the_end_are_accepted() {
    let document = Document::parse("short.html", "<p>One\n").unwrap();
    assert_eq!(serialize(&document), "<p>One\n");
    let paragraph = document.find_elements(|element| element.name() == "p")[0];
    assert_eq!(document.inner_markup(paragraph), "One\n");

    let source = "<html><body><div class=intro><p>Intro & more";
    let document = Document::parse("open.html", source).unwrap();
    assert_eq!(serialize(&document), source);
    let div = document.find_elements(|element| element.name() == "div")[0];
    assert_eq!(document.inner_markup(div), "<p>Intro & more");
    assert_eq!(document.text_content(div), "Intro & more");
}

#[test]
fn implicitly_closed_list_items_are_accepted() {
    let source = "<ul><li>One<li>Two</ul>\n";
    let document = Document::parse("list.html", source).unwrap();

    assert_eq!(serialize(&document), source);
    assert_eq!(
        document
            .find_elements(|element| element.name() == "li")
            .len(),
        2
    );
}

#[test]
fn load_reports_missing_files_as_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let error = load(dir.path(), "missing.html").unwrap_err();
    assert!(matches!(error, EditorError::Parse { .. }));
}

#[test]
fn load_reads_relative_to_the_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("pages")).unwrap();
    std::fs::write(dir.path().join("pages/about.html"), "<p>About us</p>\n").unwrap();

    let document = load(dir.path(), "pages/about.html").unwrap();
    assert_eq!(document.path(), Path::new("pages/about.html"));
    assert_eq!(serialize(&document), "<p>About us</p>\n");
}

#[test]
fn documents_are_listed_sorted_and_without_git_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("pages")).unwrap();
    std::fs::create_dir_all(root.join(".git/hooks")).unwrap();
    for file in [
        "index.html",
        "pages/contact.html",
        "pages/about.HTML",
        "styles.css",
        ".git/hooks/sample.html",
    ] {
        std::fs::write(root.join(file), "<p>x</p>").unwrap();
    }

    let first = list_documents(root, "html").unwrap();
    assert_eq!(
        first,
        vec![
            PathBuf::from("index.html"),
            PathBuf::from("pages/about.HTML"),
            PathBuf::from("pages/contact.html"),
        ]
    );
    assert_eq!(list_documents(root, "html").unwrap(), first);
}

#[test]
fn fragments_tolerate_stray_ampersands() {
    let mut document = Document::parse("index.html", "<p>x</p>").unwrap();
    let nodes = document.parse_fragment("Fish & chips &amp; peas").unwrap();

    let mut output = String::new();
    for node in nodes {
        tree::write_node(&document.nodes, node, &mut output);
    }
    assert_eq!(output, "Fish &amp; chips &amp; peas");
}

#[test]
fn malformed_fragments_are_rejected() {
    let mut document = Document::parse("index.html", "<p>x</p>").unwrap();
    let before = document.nodes.len();

    let error = document.parse_fragment("<em class=\"a\"").unwrap_err();

    assert!(error
        .to_string()
        .contains("replacement content is not valid markup"));
    assert_eq!(document.nodes.len(), before);
}
