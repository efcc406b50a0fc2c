//! Basic reading and writing of an INI document.
//!
//! Run with: cargo run --example simple

use serde_ini_tree::{from_str, to_string, Tree};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut tree = Tree::new();
    tree.put("name", "Alice Johnson");
    tree.put("email", "alice@example.com");
    tree.set_comment("name", " account owner")?;

    tree.switch_section(Some("server"));
    tree.put("host", "0.0.0.0");
    tree.put("port", "8080");
    tree.switch_section(None);

    // Serialize to INI
    let text = to_string(&tree)?;
    println!("Serialized INI:\n{}", text);

    // Deserialize back
    let back = from_str(&text)?;
    println!("Deserialized: {:#?}", back);

    assert_eq!(tree, back);
    println!("\n✓ Round-trip successful!");

    Ok(())
}
