//! Reader and writer options: comment signs, delimiters, escaping,
//! line separators and the plain properties mode.
//!
//! Run with: cargo run --example custom_options

use serde_ini_tree::{
    from_str_with_options, ini, to_string_with_header, to_string_with_options, IniOptions,
    LineSeparator, LoadPolicy,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let tree = ini!(
        { "title" => "caf\u{e9} \u{263A}", "path" => "C:\\temp" },
        ["net"] { "proxy" => "http://proxy:3128" },
    );

    // Default options
    let text = to_string_with_options(&tree, &IniOptions::default())?;
    println!("Default:\n{}", text);

    // Escape everything outside ASCII and use ':' between key and value
    let options = IniOptions::new()
        .with_escape_unicode(true)
        .with_delimiter(':')
        .with_comment_sign(';');
    let text = to_string_with_header(&tree, Some("escaped copy"), &options)?;
    println!("Escaped with ':' delimiter:\n{}", text);
    assert_eq!(from_str_with_options(&text, &options)?.root().get("title"), tree.root().get("title"));

    // Windows line endings
    let options = IniOptions::new().with_line_separator(LineSeparator::CrLf);
    let text = to_string_with_options(&tree, &options)?;
    println!("CRLF output: {:?}", text);

    // Properties mode treats brackets as ordinary key characters
    let properties = "! java style\n[literal]=yes\nkey value\n";
    let flat = from_str_with_options(properties, &IniOptions::properties())?;
    println!("\nProperties mode: {:#?}", flat.root());

    // Merge a second document instead of replacing
    let merge = IniOptions::new().with_load_policy(LoadPolicy::Merge);
    let mut merged = tree.clone();
    serde_ini_tree::load_str(&mut merged, "[net]\ntimeout=30\n", &merge)?;
    println!("Merged net section: {:?}", merged.get_section(Some("net")));

    Ok(())
}
