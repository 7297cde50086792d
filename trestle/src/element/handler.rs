use std::fmt;
use std::sync::Arc;

/// A callback attached to an element (click, pointer enter, pointer leave).
///
/// Handlers are built at render time and capture whatever state they need,
/// usually a cloned [`State`](crate::state::State) handle.
#[derive(Clone)]
pub struct Handler(Arc<dyn Fn() + Send + Sync>);

impl Handler {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler(..)")
    }
}

impl<F> From<F> for Handler
where
    F: Fn() + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}
