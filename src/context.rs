//! Request-scoped, immutable carrier of typed values.
//!
//! A [`Context`] is a chain of nodes, each holding one value stored under a
//! key type. Deriving a child with [`Context::with_value`] never touches the
//! parent, so a context can be cloned and shared between tasks freely.
//!
//! Key types are plain zero-size structs. A module that keeps its key type
//! private is the only one able to read or write values under that key.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

#[derive(Clone, Default)]
pub struct Context {
    node: Option<Arc<Node>>,
}

struct Node {
    parent: Context,
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
}

impl Context {
    /// The empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child of `self` carrying `value` under the key type `K`.
    ///
    /// A value already stored under `K` by an ancestor is shadowed in the
    /// child and stays visible through the parent.
    pub fn with_value<K, V>(&self, value: V) -> Self
    where
        K: 'static,
        V: Any + Send + Sync,
    {
        Context {
            node: Some(Arc::new(Node {
                parent: self.clone(),
                key: TypeId::of::<K>(),
                value: Box::new(value),
            })),
        }
    }

    /// Looks up the nearest value stored under `K`.
    ///
    /// Returns `None` when no ancestor carries `K`, or when the stored value
    /// is not a `V`.
    pub fn value<K, V>(&self) -> Option<&V>
    where
        K: 'static,
        V: Any,
    {
        let key = TypeId::of::<K>();
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            if node.key == key {
                return node.value.downcast_ref::<V>();
            }
            current = node.parent.node.as_deref();
        }
        None
    }

    /// Whether both handles point at the very same context.
    pub fn ptr_eq(a: &Context, b: &Context) -> bool {
        match (&a.node, &b.node) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.node.as_deref();
        while let Some(node) = current {
            depth += 1;
            current = node.parent.node.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.depth())
            .finish()
    }
}
