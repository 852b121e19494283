//! Interned identifiers for nodes and clusters.
//!
//! Every node and cluster in a diagram carries an [`Id`]. Identifiers are
//! interned in a process-wide table so they are `Copy`, cheap to compare and
//! cheap to hash, while still rendering back to their original text.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner backing all [`Id`] values.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Interned reference to a node or cluster.
///
/// # Examples
///
/// ```
/// use cloudsketch_core::identifier::Id;
///
/// let web = Id::new("web");
/// assert_eq!(web, "web");
///
/// let anon = Id::from_anonymous("node", 3);
/// assert_eq!(anon, "__node_3");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates a generated identifier for an element the caller did not name.
    ///
    /// Generated identifiers start with `__` so they never collide with
    /// identifiers written in a manifest.
    pub fn from_anonymous(prefix: &str, idx: usize) -> Self {
        Self::new(&format!("__{prefix}_{idx}"))
    }

    /// Returns `true` if this identifier was produced by [`Id::from_anonymous`].
    pub fn is_anonymous(&self) -> bool {
        interner()
            .resolve(self.0)
            .is_some_and(|name| name.starts_with("__"))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner.resolve(self.0).unwrap_or_default();
        f.write_str(name)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner.resolve(self.0).unwrap_or_default();
        f.debug_tuple("Id").field(&name).finish()
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        interner().resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}
