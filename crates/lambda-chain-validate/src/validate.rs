//! Validation traits.

use crate::error::ValidationError;

/// Rule-driven validation for types deriving `validator::Validate`.
///
/// Field rules are declared with attributes; the rules most request types
/// need are `length(min = 1)` (required string), `required` (required
/// `Option`), `email`, and `range(min = .., max = ..)`.
///
/// ## Example
///
/// ```rust,ignore
/// use lambda_chain_validate::Validate;
/// use validator::Validate as ValidatorValidate;
///
/// #[derive(ValidatorValidate)]
/// struct CreateUser {
///     #[validate(email)]
///     email: String,
///
///     #[validate(range(min = 0, max = 130))]
///     age: i32,
/// }
///
/// fn example(user: CreateUser) {
///     match Validate::validate(&user) {
///         Ok(()) => println!("Valid!"),
///         Err(e) => println!("Errors: {:?}", e.fields),
///     }
/// }
/// ```
pub trait Validate: validator::Validate {
    /// Validate the struct and return a `ValidationError` on failure.
    fn validate(&self) -> Result<(), ValidationError> {
        validator::Validate::validate(self).map_err(ValidationError::from_validator_errors)
    }
}

// Blanket implementation for all types that implement validator::Validate
impl<T: validator::Validate> Validate for T {}

/// Hand-written validation that replaces attribute rules entirely.
///
/// Types implementing this trait are checked only by
/// [`self_validate`](SelfValidate::self_validate) when the layer is built
/// with `custom_validate()`; their `validator` attributes, if any, are ignored.
/// A layer built without that call never looks at this impl.
pub trait SelfValidate {
    /// Check the decoded value.
    fn self_validate(&self) -> Result<(), ValidationError>;
}
