//! Request-scoped context.
//!
//! A [`Context`] is an immutable, append-only set of key → value bindings
//! that travels with one invocation. Publishing a value never mutates the
//! context a middleware received; it derives a child that holds the new
//! binding plus a pointer to its parent:
//!
//! ```text
//! Context::new()                     ← empty
//!   .with_value(request_id, "abc")   ← child 1 → empty
//!   .with_value(user, User { .. })   ← child 2 → child 1 → empty
//! ```
//!
//! Lookups walk from the newest binding towards the root, so a handler only
//! ever sees what was bound by the layers outside it.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Identity of a context binding.
///
/// Built-in middleware use a private marker type per family
/// (`ContextKey::of::<Marker>()`), which no other code can name. Callers
/// running several instances of the same middleware give each one its own
/// key, either from their own marker type or by name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ContextKey(KeyId);

#[derive(Clone, PartialEq, Eq, Hash)]
enum KeyId {
    Type(TypeId, &'static str),
    Name(Cow<'static, str>),
}

impl ContextKey {
    /// A key identified by the type `K`.
    pub fn of<K: 'static>() -> Self {
        Self(KeyId::Type(TypeId::of::<K>(), std::any::type_name::<K>()))
    }

    /// A key identified by name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self(KeyId::Name(name.into()))
    }
}

impl fmt::Debug for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            KeyId::Type(_, name) => write!(f, "ContextKey({name})"),
            KeyId::Name(name) => write!(f, "ContextKey({name:?})"),
        }
    }
}

struct Binding {
    key: ContextKey,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Binding>>,
}

/// Immutable request-scoped key → value bindings.
///
/// Cloning is one atomic increment; bindings are shared, never copied.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Binding>>,
}

impl Context {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a context that adds `key → value` on top of `self`.
    ///
    /// `self` is left untouched. Binding an existing key shadows the older
    /// value for readers of the derived context only.
    pub fn with_value<V>(&self, key: ContextKey, value: V) -> Self
    where
        V: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Binding {
                key,
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The newest value bound under `key`, if it has type `V`.
    ///
    /// A newer binding of another type shadows older ones, in which case
    /// `None` is returned.
    pub fn value<V: Any>(&self, key: &ContextKey) -> Option<&V> {
        self.bindings()
            .find(|binding| &binding.key == key)
            .and_then(|binding| binding.value.downcast_ref::<V>())
    }

    /// Whether anything is bound under `key`.
    pub fn contains(&self, key: &ContextKey) -> bool {
        self.bindings().any(|binding| &binding.key == key)
    }

    /// Number of bindings, shadowed ones included.
    pub fn len(&self) -> usize {
        self.bindings().count()
    }

    /// Whether the context has no bindings.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    fn bindings(&self) -> impl Iterator<Item = &Binding> {
        std::iter::successors(self.head.as_deref(), |binding| binding.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.bindings().map(|binding| &binding.key))
            .finish()
    }
}
