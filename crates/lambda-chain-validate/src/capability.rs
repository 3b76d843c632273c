//! Decode and validate strategies.
//!
//! A request type either relies on the generic behaviour (format detection
//! plus attribute rules) or overrides one or both steps with its own
//! implementation. The choice is a type parameter, fixed when the layer is
//! built, so dispatch costs nothing per request.

use serde::de::DeserializeOwned;

use crate::decode::{decode_body, DecodeError, RequestUnmarshaler};
use crate::error::ValidationError;
use crate::validate::{SelfValidate, Validate};

/// How a body is turned into a `T`.
pub trait DecodeWith<T>: Send + Sync + 'static {
    /// Decode the raw (already base64-decoded) body.
    fn decode(body: &[u8]) -> Result<T, DecodeError>;
}

/// How a decoded `T` is checked.
pub trait ValidateWith<T>: Send + Sync + 'static {
    /// Check `value`, returning the reason on failure.
    fn check(value: &T) -> Result<(), ValidationError>;
}

/// JSON/XML decoding chosen from the body's first non-whitespace character.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDetect;

/// Decoding through [`RequestUnmarshaler`] only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomDecode;

/// Validation through `validator` attribute rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagRules;

/// Validation through [`SelfValidate`] only.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomValidate;

impl<T: DeserializeOwned> DecodeWith<T> for AutoDetect {
    fn decode(body: &[u8]) -> Result<T, DecodeError> {
        decode_body(body)
    }
}

impl<T: RequestUnmarshaler> DecodeWith<T> for CustomDecode {
    fn decode(body: &[u8]) -> Result<T, DecodeError> {
        T::unmarshal_request(body).map_err(DecodeError::Custom)
    }
}

impl<T: validator::Validate> ValidateWith<T> for TagRules {
    fn check(value: &T) -> Result<(), ValidationError> {
        Validate::validate(value)
    }
}

impl<T: SelfValidate> ValidateWith<T> for CustomValidate {
    fn check(value: &T) -> Result<(), ValidationError> {
        value.self_validate()
    }
}
