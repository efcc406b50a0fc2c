//! A section tree shared between threads.
//!
//! [`SharedTree`] is a cloneable handle to one [`Tree`]. Each load or store
//! holds the lock for the whole operation, so a reader never observes a
//! half-loaded tree and two loads never interleave.
//!
//! ```rust
//! use serde_ini_tree::{IniOptions, SharedTree};
//! use std::thread;
//!
//! let shared = SharedTree::default();
//! let writer = shared.clone();
//! thread::spawn(move || writer.load_str("k=v\n", &IniOptions::new()))
//!     .join()
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(shared.with(|tree| tree.root().get("k").map(str::to_string)), Some("v".to_string()));
//! ```

use crate::{Encoding, IniOptions, Result, Tree};
use crate::options::LoadPolicy;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug, Default)]
pub struct SharedTree {
    inner: Arc<Mutex<Tree>>,
}

impl SharedTree {
    pub fn new(tree: Tree) -> Self {
        SharedTree {
            inner: Arc::new(Mutex::new(tree)),
        }
    }

    // A panic while holding the lock leaves the tree structurally valid, so
    // poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Tree> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with shared access to the tree.
    pub fn with<R>(&self, f: impl FnOnce(&Tree) -> R) -> R {
        f(&self.lock())
    }

    /// Runs `f` with exclusive access to the tree.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Tree) -> R) -> R {
        f(&mut self.lock())
    }

    /// Returns a copy of the current tree.
    #[must_use]
    pub fn snapshot(&self) -> Tree {
        self.lock().clone()
    }

    pub fn load_str(&self, text: &str, options: &IniOptions) -> Result<()> {
        crate::load_str(&mut self.lock(), text, options)
    }

    pub fn load_reader<R: io::Read>(&self, reader: R, options: &IniOptions) -> Result<()> {
        crate::load_reader(&mut self.lock(), reader, options)
    }

    pub fn load_xml_str(&self, xml: &str, policy: LoadPolicy) -> Result<()> {
        crate::load_xml_str(&mut self.lock(), xml, policy)
    }

    pub fn store_string(&self, header: Option<&str>, options: &IniOptions) -> Result<String> {
        crate::to_string_with_header(&self.lock(), header, options)
    }

    pub fn store_writer<W: io::Write>(
        &self,
        writer: W,
        header: Option<&str>,
        options: &IniOptions,
        encoding: Encoding,
    ) -> Result<()> {
        crate::to_writer_with_encoding(&self.lock(), writer, header, options, encoding)
    }

    pub fn store_xml_string(&self, comment: Option<&str>) -> Result<String> {
        crate::to_xml_string(&self.lock(), comment)
    }
}

impl From<Tree> for SharedTree {
    fn from(tree: Tree) -> Self {
        SharedTree::new(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_merges_do_not_interleave() {
        let shared = SharedTree::default();
        let options = IniOptions::new().with_load_policy(LoadPolicy::Merge);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                let options = options.clone();
                thread::spawn(move || {
                    let text = format!("[t{i}]\na=1\nb=2\n");
                    shared.load_str(&text, &options)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let tree = shared.snapshot();
        assert_eq!(tree.len(), 8);
        for i in 0..8 {
            let path = format!("t{i}");
            let store = tree.get_section(Some(&path)).unwrap();
            assert_eq!(store.len(), 2);
        }
    }

    #[test]
    fn test_with_mut_and_store() {
        let shared = SharedTree::new(Tree::new());
        shared.with_mut(|tree| {
            tree.put("k", "v");
        });
        assert_eq!(
            shared.store_string(Some("c"), &IniOptions::new()).unwrap(),
            "#c\nk=v\n"
        );
        assert!(shared.store_xml_string(None).unwrap().contains("<entry key=\"k\">v</entry>"));
    }
}
