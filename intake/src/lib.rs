//! Sanitizer/Validator for every untrusted string that enters the registry.
//!
//! `sanitize` normalizes, `validate` checks. Both are pure and deterministic.
//! Chain addresses are never corrected, only stripped of whitespace: a
//! corrected address is a different address.

pub mod error;
pub mod form;
pub mod kind;
pub mod rules;
pub mod sanitize;
pub mod suspicious;
pub mod validate;

pub use error::IntakeError;
pub use form::{
    validate_registration, ChainAddressesForm, CleanRegistration, FieldErrors, HandlesForm,
    RegistrationForm,
};
pub use kind::FieldKind;
pub use rules::{address_rules, example_address, AddressRule};
pub use sanitize::{sanitize, MAX_TEXT_LEN, MAX_URL_LEN};
pub use suspicious::check_suspicious_address;
pub use validate::{validate, validate_address_named, validate_secure_url};

/// Sanitize then validate in one step, returning the cleaned value.
pub fn clean(kind: &FieldKind, raw: &str) -> Result<String, IntakeError> {
    let cleaned = sanitize(kind, raw);
    validate(kind, &cleaned)?;
    Ok(cleaned)
}
