//! Hierarchical sections: relative paths, parents and the outline order
//! used when writing.
//!
//! Run with: cargo run --example sections

use serde_ini_tree::{from_str, ini, to_string};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let mut tree = ini!(
        { "app" => "shop" },
        ["database"] { "url" => "postgres://db/app" },
    );

    // A leading dot resolves against the current section
    tree.switch_section(Some("database"));
    tree.switch_section(Some(".replica"));
    tree.put("url", "postgres://replica/app");
    println!("Current section: {:?}", tree.current_path());
    println!("Has parent: {}", tree.has_parent_section());
    println!("Parent url: {:?}", tree.parent_section().get("url"));

    // Empty ancestors still get a header when a descendant has content
    tree.switch_section(Some("cache.redis.primary"));
    tree.put("host", "redis-1");
    tree.switch_section(None);

    println!("\nOutline:");
    for section in tree.outline() {
        let marker = if section.store.is_some() { "" } else { " (implied)" };
        println!("{}{}{}", "  ".repeat(section.depth), section.path, marker);
    }

    let text = to_string(&tree)?;
    println!("\nSerialized INI:\n{}", text);

    let back = from_str(&text)?;
    assert_eq!(
        back.get_section(Some("cache.redis.primary")).and_then(|s| s.get("host")),
        Some("redis-1")
    );

    println!("All sections:");
    tree.list_all(std::io::stdout())?;

    Ok(())
}
