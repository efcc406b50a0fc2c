//! The XML form of a tree, in several encodings.
//!
//! Run with: cargo run --example xml

use serde_ini_tree::{from_xml_reader, from_xml_str, ini, to_xml_string, to_xml_writer, Encoding};
use std::error::Error;
use std::io::Cursor;

fn main() -> Result<(), Box<dyn Error>> {
    let tree = ini!(
        { "greeting" => "gr\u{fc}\u{df} dich" },
        ["paths"] { "home" => "/home/alice", "markup" => "<b>&</b>" },
        ["paths.cache"] { "dir" => "/var/cache" },
    );

    let xml = to_xml_string(&tree, Some("exported settings"))?;
    println!("XML document:\n{}", xml);

    let back = from_xml_str(&xml)?;
    assert_eq!(back.root().footer(), Some("exported settings"));
    assert_eq!(back.get_section(Some("paths")), tree.get_section(Some("paths")));

    for encoding in [Encoding::Utf16, Encoding::Latin1, Encoding::Ascii] {
        let mut buffer = Vec::new();
        to_xml_writer(&tree, &mut buffer, None, encoding)?;
        let decoded = from_xml_reader(Cursor::new(&buffer))?;
        println!("{:<10} {:>5} bytes", encoding.name(), buffer.len());
        assert_eq!(decoded, tree);
    }

    println!("\n✓ XML round-trips in every encoding");

    Ok(())
}
