//! Error types for lambda-chain

/// Boxed error carried on the handler error channel.
///
/// Terminal handlers can `?` any `std::error::Error + Send + Sync` into it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for lambda-chain operations
pub type Result<T, E = BoxError> = std::result::Result<T, E>;

/// Failures raised by the chain itself.
///
/// Middleware rejections are not errors: they are complete
/// [`ProxyResponse`](crate::ProxyResponse) values. This type only covers
/// wiring mistakes that surface when the composed handler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// The chain was finished without a terminal handler.
    #[error("no handler provided")]
    NoHandler,
}
