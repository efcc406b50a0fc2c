use serde_ini_tree::xml::{resolve_entity, DTD, DTD_URI};
use serde_ini_tree::{
    from_str, from_xml_reader, from_xml_slice, from_xml_str, ini, load_xml_str, to_xml_string,
    to_xml_writer, Encoding, Error, LoadPolicy, SharedTree, Tree,
};
use std::io::Cursor;

const SCENARIO: &str = r#"<ini version="1.0"><comment>hi</comment><entry key="k">v</entry><section name="s"><entry key="k2">v2</entry></section></ini>"#;

#[test]
fn test_scenario() {
    let tree = from_xml_str(SCENARIO).unwrap();
    assert_eq!(tree.root().get("k"), Some("v"));
    assert_eq!(tree.root().footer(), Some("hi"));
    assert_eq!(tree.get_section(Some("s")).and_then(|s| s.get("k2")), Some("v2"));
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_document_with_declaration_and_doctype() {
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
         <!DOCTYPE ini SYSTEM \"{DTD_URI}\">\n\
         <ini version=\"1.0\">\n\
         \x20   <entry key=\"a b\">  padded  </entry>\n\
         \x20   <section name=\"outer\">\n\
         \x20       <section name=\"inner\">\n\
         \x20           <entry key=\"k\"><![CDATA[<raw>]]></entry>\n\
         \x20       </section>\n\
         \x20   </section>\n\
         </ini>\n"
    );
    let tree = from_xml_str(&xml).unwrap();
    assert_eq!(tree.root().get("a b"), Some("  padded  "));
    assert_eq!(
        tree.get_section(Some("outer.inner")).and_then(|s| s.get("k")),
        Some("<raw>")
    );
}

#[test]
fn test_dtd_is_served_locally() {
    assert_eq!(resolve_entity(DTD_URI).unwrap(), DTD);
    assert!(DTD.contains("<!ELEMENT ini ( comment?, ( section | entry )* ) >"));
    assert_eq!(
        resolve_entity("http://java.sun.com/dtd/properties.dtd"),
        Err(Error::UnresolvableEntity("http://java.sun.com/dtd/properties.dtd".to_string()))
    );

    let public = "<!DOCTYPE ini PUBLIC \"-//x//y\" \"file:///etc/ini.dtd\"><ini/>";
    assert!(matches!(from_xml_str(public), Err(Error::UnresolvableEntity(_))));
}

#[test]
fn test_grammar_violations() {
    let cases = [
        ("<ini><entry>v</entry></ini>", Error::missing_attribute("entry", "key")),
        ("<ini><section/></ini>", Error::missing_attribute("section", "name")),
        ("<ini><comment/><comment/></ini>", Error::DuplicateComment),
        ("<ini><value key=\"k\"/></ini>", Error::unknown_element("value")),
        ("<properties/>", Error::unknown_element("properties")),
    ];
    for (xml, expected) in cases {
        assert_eq!(from_xml_str(xml), Err(expected), "{xml}");
    }

    for xml in [
        "<ini version=\"1.1\"/>",
        "<ini><entry key=\"k\">v</entry><comment>late</comment></ini>",
        "<ini><section name=\"s\"><comment>x</comment></section></ini>",
        "<ini><entry key=\"k\">v</entry>",
        "",
    ] {
        assert!(matches!(from_xml_str(xml), Err(Error::InvalidFormat(_))), "{xml}");
    }
}

#[test]
fn test_explicit_comment_overrides_footer() {
    let mut tree = ini!({ "k" => "v" });
    tree.root_mut().set_footer(Some("footer".to_string()));

    let xml = to_xml_string(&tree, Some("explicit")).unwrap();
    assert!(xml.contains("<comment>explicit</comment>"));
    assert!(!xml.contains("footer"));
}

#[test]
fn test_text_to_xml_and_back() {
    let text = "\
# dropped in xml
owner=Alice
#root footer
[server]
port=8080
[server.tls]
enabled=true
";
    let tree = from_str(text).unwrap();
    let xml = to_xml_string(&tree, None).unwrap();
    println!("{}", xml);

    let back = from_xml_str(&xml).unwrap();
    assert_eq!(back.root().footer(), Some("root footer"));
    assert!(back.root().comment("owner").is_none());
    assert!(back.root().eq_ignore_comments(tree.root()));
    for (path, store) in tree.sections() {
        assert_eq!(back.get_section(Some(path)), Some(store));
    }
}

#[test]
fn test_encodings() {
    let tree = ini!({ "greeting" => "gr\u{fc}\u{df} \u{263A}" }, ["s"] { "k" => "<&>" });

    for encoding in [
        Encoding::Utf8,
        Encoding::Utf16,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Latin1,
        Encoding::Ascii,
    ] {
        let mut buffer = Vec::new();
        to_xml_writer(&tree, &mut buffer, None, encoding).unwrap();
        let back = from_xml_reader(Cursor::new(&buffer)).unwrap();
        assert_eq!(back, tree, "{}", encoding.name());
    }

    let mut buffer = Vec::new();
    to_xml_writer(&tree, &mut buffer, None, Encoding::Ascii).unwrap();
    assert!(buffer.is_ascii());
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("encoding=\"US-ASCII\""));
    assert!(text.contains("gr&#xFC;&#xDF; &#x263A;"));
}

#[test]
fn test_unsupported_declared_encoding() {
    let xml = b"<?xml version=\"1.0\" encoding=\"Shift_JIS\"?><ini/>";
    assert_eq!(
        from_xml_slice(xml),
        Err(Error::UnsupportedEncoding("Shift_JIS".to_string()))
    );
    assert!(matches!(
        Encoding::for_label("EUC-KR"),
        Err(Error::UnsupportedEncoding(_))
    ));
}

#[test]
fn test_load_policies_and_cursor() {
    let mut tree = ini!({ "old" => "1" }, ["keep"] { "x" => "1" });
    tree.switch_section(Some("keep"));

    load_xml_str(&mut tree, SCENARIO, LoadPolicy::Merge).unwrap();
    assert_eq!(tree.current_path(), Some("keep"));
    assert_eq!(tree.root().get("old"), Some("1"));
    assert_eq!(tree.root().get("k"), Some("v"));

    load_xml_str(&mut tree, SCENARIO, LoadPolicy::Replace).unwrap();
    assert!(tree.root().get("old").is_none());
    assert!(tree.get_section(Some("keep")).is_none());
}

#[test]
fn test_shared_tree_xml() {
    let shared = SharedTree::new(Tree::new());
    shared.load_xml_str(SCENARIO, LoadPolicy::Replace).unwrap();
    let xml = shared.store_xml_string(None).unwrap();
    assert!(xml.contains("<comment>hi</comment>"));
    assert_eq!(from_xml_str(&xml).unwrap(), shared.snapshot());
}
