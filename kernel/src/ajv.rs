//! The reference-validator adapter interface (§4.9, §6).
//!
//! The engine never constructs a validator itself -- callers supply two
//! instances (Source + Planning/Generation) implementing
//! [`ValidatorAdapter`]. This module only defines the interface and the
//! required-parity check; the "Repair" and "Validate" phases that consume
//! it are external collaborators.

use std::collections::BTreeMap;

/// The JSON Schema dialect a validator instance is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Draft04,
    Draft06,
    Draft07,
    Draft201909,
    Draft202012,
}

impl Dialect {
    /// Infer from a `$schema` URI, when recognized.
    #[must_use]
    pub fn from_schema_uri(uri: &str) -> Option<Self> {
        if uri.contains("draft-04") {
            Some(Self::Draft04)
        } else if uri.contains("draft-06") {
            Some(Self::Draft06)
        } else if uri.contains("draft-07") {
            Some(Self::Draft07)
        } else if uri.contains("2019-09") {
            Some(Self::Draft201909)
        } else if uri.contains("2020-12") {
            Some(Self::Draft202012)
        } else {
            None
        }
    }
}

/// Metadata describing one validator instance's configuration, used both
/// for memo-key derivation (Compose) and parity checking (§6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjvMetadata {
    /// Validator major version.
    pub major: u32,
    /// Validator implementation class/identifier string.
    pub class: String,
    /// Named boolean flags (`unicodeRegExp`, `discriminator`, ...).
    pub flags: BTreeMap<String, bool>,
    /// The dialect this instance validates against.
    pub dialect: Dialect,
    /// Whether format assertions are validated (`validateFormats`).
    pub validate_formats: bool,
    /// `multipleOf` precision (must equal `plan.rational.decimalPrecision`).
    pub multiple_of_precision: u32,
}

/// A validation failure reported by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

/// The minimal interface the engine needs from an external JSON Schema validator.
pub trait ValidatorAdapter {
    /// Validate `instance` against `schema`. Returns the list of errors on
    /// failure (empty `Ok(())` on success).
    ///
    /// # Errors
    ///
    /// Returns the validator's error list when `instance` does not satisfy `schema`.
    fn validate(
        &self,
        schema: &serde_json::Value,
        instance: &serde_json::Value,
    ) -> Result<(), Vec<ValidationError>>;

    /// This instance's configuration metadata.
    fn metadata(&self) -> &AjvMetadata;
}

/// A detected parity mismatch between Source and Planning/Generation validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjvFlagsMismatch {
    pub field: String,
    pub source: String,
    pub planning: String,
}

/// Required-parity check (§6): `unicodeRegExp=true` on both, matching
/// dialect, identical `validateFormats`, identical `multipleOfPrecision`
/// equal to `plan.rational.decimalPrecision`, consistent discriminator setting.
///
/// # Errors
///
/// Returns every detected mismatch (not just the first).
pub fn check_parity(
    source: &AjvMetadata,
    planning: &AjvMetadata,
    expected_decimal_precision: u32,
) -> Result<(), Vec<AjvFlagsMismatch>> {
    let mut mismatches = Vec::new();

    for (label, metadata) in [("source", source), ("planning", planning)] {
        if metadata.flags.get("unicodeRegExp").copied() != Some(true) {
            mismatches.push(AjvFlagsMismatch {
                field: "unicodeRegExp".into(),
                source: label.into(),
                planning: "expected true".into(),
            });
        }
    }

    if source.dialect != planning.dialect {
        mismatches.push(AjvFlagsMismatch {
            field: "dialect".into(),
            source: format!("{:?}", source.dialect),
            planning: format!("{:?}", planning.dialect),
        });
    }

    if source.validate_formats != planning.validate_formats {
        mismatches.push(AjvFlagsMismatch {
            field: "validateFormats".into(),
            source: source.validate_formats.to_string(),
            planning: planning.validate_formats.to_string(),
        });
    }

    if source.multiple_of_precision != planning.multiple_of_precision
        || source.multiple_of_precision != expected_decimal_precision
    {
        mismatches.push(AjvFlagsMismatch {
            field: "multipleOfPrecision".into(),
            source: source.multiple_of_precision.to_string(),
            planning: planning.multiple_of_precision.to_string(),
        });
    }

    let source_discriminator = source.flags.get("discriminator").copied();
    let planning_discriminator = planning.flags.get("discriminator").copied();
    if source_discriminator != planning_discriminator {
        mismatches.push(AjvFlagsMismatch {
            field: "discriminator".into(),
            source: format!("{source_discriminator:?}"),
            planning: format!("{planning_discriminator:?}"),
        });
    }

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(mismatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> AjvMetadata {
        let mut flags = BTreeMap::new();
        flags.insert("unicodeRegExp".to_string(), true);
        flags.insert("discriminator".to_string(), false);
        AjvMetadata {
            major: 8,
            class: "ajv".into(),
            flags,
            dialect: Dialect::Draft202012,
            validate_formats: true,
            multiple_of_precision: 6,
        }
    }

    #[test]
    fn identical_metadata_passes_parity() {
        let m = metadata();
        assert!(check_parity(&m, &m, 6).is_ok());
    }

    #[test]
    fn dialect_mismatch_is_detected() {
        let source = metadata();
        let mut planning = metadata();
        planning.dialect = Dialect::Draft07;
        let errs = check_parity(&source, &planning, 6).unwrap_err();
        assert!(errs.iter().any(|e| e.field == "dialect"));
    }

    #[test]
    fn missing_unicode_regexp_is_detected() {
        let mut source = metadata();
        source.flags.insert("unicodeRegExp".to_string(), false);
        let planning = metadata();
        let errs = check_parity(&source, &planning, 6).unwrap_err();
        assert!(errs.iter().any(|e| e.field == "unicodeRegExp"));
    }

    #[test]
    fn precision_mismatch_against_plan_option_is_detected() {
        let source = metadata();
        let planning = metadata();
        let errs = check_parity(&source, &planning, 4).unwrap_err();
        assert!(errs.iter().any(|e| e.field == "multipleOfPrecision"));
    }

    #[test]
    fn dialect_from_schema_uri() {
        assert_eq!(
            Dialect::from_schema_uri("https://json-schema.org/draft/2020-12/schema"),
            Some(Dialect::Draft202012)
        );
        assert_eq!(Dialect::from_schema_uri("unknown"), None);
    }
}
