//! Middleware composition
//!
//! A middleware turns the *next* handler into a new handler that wraps it.
//! A [`Chain`] holds an ordered list of middleware and folds them around a
//! terminal handler so that the first declared middleware is outermost:
//!
//! ```text
//! Chain::new().then(m1).then(m2).then(m3).handler(h)
//!   == m1(m2(m3(h)))
//!   → m1-pre → m2-pre → m3-pre → h → m3-post → m2-post → m1-post
//! ```

use std::fmt;
use std::sync::Arc;

use crate::handler::Handler;

/// Trait for middleware that can be placed in a [`Chain`].
///
/// `wrap` runs once per composed handler, not once per request: prepare
/// anything static (error responses, lookup tables) there or in the
/// layer's constructor, and capture it in the returned handler.
pub trait MiddlewareLayer: Send + Sync + 'static {
    /// Wrap `next`, returning the handler that runs this layer's logic.
    fn wrap(&self, next: Handler) -> Handler;
}

struct FnLayer<F>(F);

impl<F> MiddlewareLayer for FnLayer<F>
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    fn wrap(&self, next: Handler) -> Handler {
        (self.0)(next)
    }
}

/// A cloneable, type-erased middleware.
#[derive(Clone)]
pub struct Middleware(Arc<dyn MiddlewareLayer>);

impl Middleware {
    /// Erase a concrete layer.
    pub fn new<L: MiddlewareLayer>(layer: L) -> Self {
        Self(Arc::new(layer))
    }

    /// Build a middleware from a closure over the next handler.
    ///
    /// ```rust,ignore
    /// let timing = Middleware::from_fn(|next: Handler| {
    ///     Handler::new(move |ctx, req| {
    ///         let next = next.clone();
    ///         async move {
    ///             let start = std::time::Instant::now();
    ///             let result = next.call(ctx, req).await;
    ///             tracing::debug!(elapsed = ?start.elapsed(), "handled");
    ///             result
    ///         }
    ///     })
    /// });
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self::new(FnLayer(f))
    }

    /// Apply this middleware to `next`.
    pub fn wrap(&self, next: Handler) -> Handler {
        self.0.wrap(next)
    }
}

impl<L: MiddlewareLayer> From<L> for Middleware {
    fn from(layer: L) -> Self {
        Self::new(layer)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// An ordered, immutable list of middleware.
///
/// [`then`](Chain::then) returns a new chain; the receiver keeps its own
/// list, so a base chain can be extended in several directions.
#[derive(Clone, Debug)]
pub struct Chain {
    middlewares: Arc<[Middleware]>,
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            middlewares: Arc::from(Vec::new()),
        }
    }
}

impl Chain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new chain with `middleware` appended as the innermost layer.
    pub fn then(&self, middleware: impl Into<Middleware>) -> Self {
        let middlewares: Vec<Middleware> = self
            .middlewares
            .iter()
            .cloned()
            .chain(std::iter::once(middleware.into()))
            .collect();
        Self {
            middlewares: middlewares.into(),
        }
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Get the number of middleware
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Wrap `terminal` in every middleware of the chain.
    pub fn handler(&self, terminal: Handler) -> Handler {
        // Build the chain from inside out so that the first declared
        // middleware ends up outermost.
        self.middlewares
            .iter()
            .rev()
            .fold(terminal, |next, middleware| middleware.wrap(next))
    }

    /// Like [`handler`](Chain::handler), substituting [`Handler::missing`]
    /// when no terminal handler is given.
    pub fn handler_opt(&self, terminal: Option<Handler>) -> Handler {
        self.handler(terminal.unwrap_or_else(Handler::missing))
    }
}

impl FromIterator<Middleware> for Chain {
    fn from_iter<I: IntoIterator<Item = Middleware>>(iter: I) -> Self {
        Self {
            middlewares: iter.into_iter().collect(),
        }
    }
}

/// Apply `middlewares` to `terminal` in one step.
///
/// Equivalent to collecting `middlewares` into a [`Chain`] and calling
/// [`Chain::handler`]; execution order is the iteration order.
pub fn compose<I>(terminal: Handler, middlewares: I) -> Handler
where
    I: IntoIterator<Item = Middleware>,
{
    middlewares.into_iter().collect::<Chain>().handler(terminal)
}
