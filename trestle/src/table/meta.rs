use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque caller data reachable from header and cell renderers.
///
/// Lets a column defined once read per-table context (permissions, a
/// currency, a query refetch handle) without widening every signature.
#[derive(Clone, Default)]
pub struct TableMeta(Option<Arc<dyn Any + Send + Sync>>);

impl TableMeta {
    pub fn new<M: Any + Send + Sync>(meta: M) -> Self {
        Self(Some(Arc::new(meta)))
    }

    /// Borrow the stored value if it has type `M`.
    pub fn get<M: Any>(&self) -> Option<&M> {
        self.0.as_deref().and_then(|meta| meta.downcast_ref::<M>())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for TableMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            write!(f, "TableMeta(..)")
        } else {
            write!(f, "TableMeta(None)")
        }
    }
}
