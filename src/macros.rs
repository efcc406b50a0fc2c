/// Builds a [`Store`](crate::Store) from `key => value` pairs.
///
/// ```rust
/// use serde_ini_tree::store;
///
/// let store = store! {
///     "host" => "localhost",
///     "port" => 8080.to_string(),
/// };
/// assert_eq!(store.get("port"), Some("8080"));
/// ```
#[macro_export]
macro_rules! store {
    () => {
        $crate::Store::new()
    };

    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut store = $crate::Store::new();
        $(
            store.put($key, $value);
        )+
        store
    }};
}

/// Builds a [`Tree`](crate::Tree) from blocks of entries.
///
/// A bare `{ ... }` block fills the root store; `[path] { ... }` fills the
/// section at `path`, creating it if needed. The cursor of the returned tree
/// is at the root.
///
/// ```rust
/// use serde_ini_tree::ini;
///
/// let tree = ini!(
///     { "name" => "demo" },
///     ["server"] { "port" => "8080" },
///     ["server.tls"] { "enabled" => "true" },
/// );
/// assert_eq!(tree.root().get("name"), Some("demo"));
/// assert_eq!(tree.get_section(Some("server.tls")).and_then(|s| s.get("enabled")), Some("true"));
/// ```
#[macro_export]
macro_rules! ini {
    (@item $tree:ident;) => {};

    (@item $tree:ident; { $($key:expr => $value:expr),* $(,)? } $(, $($rest:tt)*)?) => {
        $(
            $tree.root_mut().put($key, $value);
        )*
        $crate::ini!(@item $tree; $($($rest)*)?);
    };

    (@item $tree:ident; [$path:expr] { $($key:expr => $value:expr),* $(,)? } $(, $($rest:tt)*)?) => {
        $tree.switch_section(Some(::core::convert::AsRef::<str>::as_ref(&$path)));
        $(
            $tree.put($key, $value);
        )*
        $tree.switch_section(None);
        $crate::ini!(@item $tree; $($($rest)*)?);
    };

    ($($items:tt)*) => {{
        let mut tree = $crate::Tree::new();
        $crate::ini!(@item tree; $($items)*);
        tree
    }};
}
