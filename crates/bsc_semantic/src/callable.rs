use std::rc::Rc;

use bsc_ast::{BscFile, Callable};

use crate::FxIndexMap;

/// A callable paired with the scope that surfaced it.
///
/// The surfacing scope settles override and ancestry disputes: a
/// container whose `scope_name` matches the validating scope is "own", a
/// container surfaced by the global scope is a built-in, anything else
/// came from an ancestor.
#[derive(Clone, Debug)]
pub struct CallableContainer {
    pub callable: Rc<Callable>,
    /// The file declaring the callable.
    pub file: Rc<BscFile>,
    pub scope_name: String,
}

impl CallableContainer {
    #[must_use]
    pub fn new(callable: Rc<Callable>, file: Rc<BscFile>, scope_name: impl Into<String>) -> Self {
        Self {
            callable,
            file,
            scope_name: scope_name.into(),
        }
    }
}

/// Lowercase callable name to the ordered containers carrying that name.
///
/// Insertion order is the sorted callable order built during validation;
/// it seeds deterministic diagnostic emission, which is why this is an
/// ordered map.
pub type CallableContainerMap = FxIndexMap<String, Vec<CallableContainer>>;
