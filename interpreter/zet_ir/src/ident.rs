//! Interned identifiers.
//!
//! Every identifier mentioned in a program is interned exactly once into a
//! process-wide table, so equality is pointer identity (a fat-pointer
//! comparison) while ordering stays lexicographic for use inside `Ord`
//! implementations that have no interner handle available.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;

/// Interned identifier.
///
/// Construction goes through [`Ident::new`], which leaks the string into the
/// process-wide intern table. Two `Ident`s built from equal text always wrap
/// the same `&'static str`, so equality is identity.
#[derive(Copy, Clone)]
pub struct Ident(&'static str);

static INTERN_TABLE: LazyLock<RwLock<FxHashSet<&'static str>>> =
    LazyLock::new(|| RwLock::new(FxHashSet::default()));

impl Ident {
    /// Intern `text` and return its identifier.
    pub fn new(text: &str) -> Ident {
        // Fast path: already interned.
        {
            let table = INTERN_TABLE.read();
            if let Some(&interned) = table.get(text) {
                return Ident(interned);
            }
        }

        let mut table = INTERN_TABLE.write();
        // Double-check after acquiring the write lock.
        if let Some(&interned) = table.get(text) {
            return Ident(interned);
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        table.insert(leaked);
        Ident(leaked)
    }

    /// The identifier's text.
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl PartialEq for Ident {
    #[inline]
    fn eq(&self, other: &Ident) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Ident {}

impl PartialOrd for Ident {
    #[inline]
    fn partial_cmp(&self, other: &Ident) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ident {
    fn cmp(&self, other: &Ident) -> Ordering {
        if std::ptr::eq(self.0, other.0) {
            Ordering::Equal
        } else {
            self.0.cmp(other.0)
        }
    }
}

impl Hash for Ident {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Interned strings are unique, so the address is a stable hash key.
        (self.0.as_ptr() as usize).hash(state);
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({:?})", self.0)
    }
}
