//! # lambda-chain Validation
//!
//! Body decoding and validation building blocks used by the decode &
//! validate middleware.
//!
//! ## Decoding
//!
//! - Generic: [`BodyFormat::detect`] looks at the first non-whitespace
//!   character (`{`/`[` → JSON, `<` → XML, anything else → JSON attempt).
//! - Custom: implement [`RequestUnmarshaler`] and select [`CustomDecode`].
//!
//! ## Validation
//!
//! - Generic: derive `validator::Validate` and use attribute rules such as
//!   `length(min = 1)`, `email`, and `range(min = 0, max = 130)`.
//! - Custom: implement [`SelfValidate`] and select [`CustomValidate`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use serde::Deserialize;
//! use validator::Validate;
//!
//! #[derive(Deserialize, Validate)]
//! struct CreateUser {
//!     #[validate(length(min = 1))]
//!     name: String,
//!
//!     #[validate(email)]
//!     email: String,
//!
//!     #[validate(range(min = 0, max = 130))]
//!     age: i32,
//! }
//! ```

mod capability;
mod decode;
mod error;
mod validate;

pub use capability::{AutoDetect, CustomDecode, CustomValidate, DecodeWith, TagRules, ValidateWith};
pub use decode::{decode_base64, decode_body, BodyFormat, BoxError, DecodeError, RequestUnmarshaler};
pub use error::{FieldError, ValidationError};
pub use validate::{SelfValidate, Validate};

// Re-export the derive macro from validator
pub use validator::Validate as ValidatorValidate;

/// Prelude module for validation
pub mod prelude {
    pub use crate::decode::RequestUnmarshaler;
    pub use crate::error::{FieldError, ValidationError};
    pub use crate::validate::{SelfValidate, Validate};
    pub use validator::Validate as ValidatorValidate;
}
