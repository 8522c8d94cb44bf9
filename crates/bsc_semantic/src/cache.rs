//! Per-scope memoization of derived lookup tables.
//!
//! Values are tagged records over `Rc` payloads so that handing a cached
//! view to a caller is a pointer clone. The distinguished
//! [`CacheValue::Absent`] marker is stored like any other value, which
//! keeps factories for known-absent results from running again. Not
//! thread-safe; the owning scope serializes access (single-threaded
//! cooperative model).

use std::cell::RefCell;
use std::rc::Rc;

use bsc_ast::BscFile;
use rustc_hash::FxHashMap;

use crate::namespace::NamespaceLookup;
use crate::scope::ClassMap;

/// A memoized value. One variant per kind of derived table a scope
/// caches, plus the known-absent sentinel.
#[derive(Clone)]
pub enum CacheValue {
    /// The factory ran and found nothing.
    Absent,
    Files(Rc<Vec<Rc<BscFile>>>),
    Classes(Rc<ClassMap>),
    Namespaces(Rc<NamespaceLookup>),
    Name(Rc<str>),
}

impl CacheValue {
    /// # Panics
    /// If the slot holds a different value kind; that is a programming
    /// error, not a recoverable condition.
    pub(crate) fn expect_files(self) -> Rc<Vec<Rc<BscFile>>> {
        match self {
            CacheValue::Files(files) => files,
            _ => panic!("cache slot does not hold a file list"),
        }
    }

    pub(crate) fn expect_classes(self) -> Rc<ClassMap> {
        match self {
            CacheValue::Classes(classes) => classes,
            _ => panic!("cache slot does not hold a class map"),
        }
    }

    pub(crate) fn expect_namespaces(self) -> Rc<NamespaceLookup> {
        match self {
            CacheValue::Namespaces(namespaces) => namespaces,
            _ => panic!("cache slot does not hold a namespace lookup"),
        }
    }

    /// `Name` or `Absent`; anything else is a programming error.
    pub(crate) fn expect_name(self) -> Option<Rc<str>> {
        match self {
            CacheValue::Name(name) => Some(name),
            CacheValue::Absent => None,
            _ => panic!("cache slot does not hold a name"),
        }
    }
}

/// String-slot memo store, cleared atomically on invalidation.
#[derive(Default)]
pub struct Cache {
    slots: RefCell<FxHashMap<&'static str, CacheValue>>,
}

impl Cache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored value for `slot`, or stores and returns
    /// `factory()`. A stored [`CacheValue::Absent`] short-circuits the
    /// factory like any other hit.
    pub fn get_or_add(&self, slot: &'static str, factory: impl FnOnce() -> CacheValue) -> CacheValue {
        if let Some(value) = self.slots.borrow().get(slot) {
            return value.clone();
        }
        let value = factory();
        self.slots.borrow_mut().insert(slot, value.clone());
        value
    }

    /// Drops every slot.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }
}
