//! Derived registration-field attributes
//!
//! The platform wants a complete field record on every upsert: locale
//! metadata, a base data type and, for consent fields, the rendered consent
//! label. All of it is computed from the primary attributes.

use tenantform_domain::constants::{
    CONSENT_DATA_TYPE, CUSTOM_FIELD_TYPE, FIELD_DEFINITION_LANGUAGE, FIELD_DEFINITION_LOCALE,
};
use tenantform_domain::{
    ConsentLabel, DerivationError, FieldDefinition, LocaleText, RegistrationFieldComplete,
    RegistrationFieldInput,
};

/// Data type → base data type. Unknown data types map to [`FALLBACK_BASE_TYPE`].
const BASE_DATA_TYPES: &[(&str, &str)] = &[
    (CONSENT_DATA_TYPE, "bool"),
    ("CHECKBOX", "bool"),
    ("TEXT", "string"),
    ("RADIO", "string"),
    ("SELECT", "string"),
    ("NUMBER", "number"),
    ("DATE", "date"),
];

const FALLBACK_BASE_TYPE: &str = "string";

/// Computes the derived attributes of a registration field.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldDerivationEngine;

impl FieldDerivationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Expand primary attributes into a complete field record.
    ///
    /// # Errors
    /// [`DerivationError::MissingConsentRef`] when the data type is
    /// `CONSENT` and no consent reference is given.
    pub fn derive(
        &self,
        input: &RegistrationFieldInput,
    ) -> Result<RegistrationFieldComplete, DerivationError> {
        let settings = &input.settings;
        let consent_label = if settings.data_type == CONSENT_DATA_TYPE {
            let href = settings.consent_refs.first().ok_or_else(|| {
                DerivationError::MissingConsentRef { field_key: settings.field_key.clone() }
            })?;
            let markup = consent_markup(href);
            ConsentLabel { label: markup.clone(), label_text: markup }
        } else {
            ConsentLabel::default()
        };

        Ok(RegistrationFieldComplete {
            id: input.id.clone(),
            settings: settings.clone(),
            internal: false,
            scopes: Vec::new(),
            is_group: false,
            is_list: false,
            field_type: CUSTOM_FIELD_TYPE.to_string(),
            base_data_type: base_data_type(&settings.data_type).to_string(),
            field_definition: FieldDefinition {
                language: FIELD_DEFINITION_LANGUAGE.to_string(),
                locale: FIELD_DEFINITION_LOCALE.to_string(),
            },
            locale_text: LocaleText {
                locale: FIELD_DEFINITION_LOCALE.to_string(),
                language: FIELD_DEFINITION_LANGUAGE.to_string(),
                consent_label,
            },
        })
    }
}

/// Base data type for a field data type.
pub fn base_data_type(data_type: &str) -> &'static str {
    BASE_DATA_TYPES
        .iter()
        .find(|(known, _)| *known == data_type)
        .map_or(FALLBACK_BASE_TYPE, |(_, base)| base)
}

fn consent_markup(href: &str) -> String {
    format!("<a href=\"{href}\">Consent</a>")
}

#[cfg(test)]
mod tests {
    use tenantform_domain::RegistrationFieldPlan;

    use super::*;

    fn input(data_type: &str, consent_refs: &[&str]) -> RegistrationFieldInput {
        RegistrationFieldInput {
            id: None,
            settings: RegistrationFieldPlan {
                field_key: "terms".into(),
                data_type: data_type.into(),
                consent_refs: consent_refs.iter().map(|r| r.to_string()).collect(),
                ..RegistrationFieldPlan::default()
            },
        }
    }

    #[test]
    fn consent_field_gets_label_markup_and_bool_base_type() {
        let complete = FieldDerivationEngine::new()
            .derive(&input("CONSENT", &["https://example.com/terms", "https://ignored"]))
            .unwrap();

        let expected = "<a href=\"https://example.com/terms\">Consent</a>";
        assert_eq!(complete.base_data_type, "bool");
        assert_eq!(complete.locale_text.consent_label.label, expected);
        assert_eq!(complete.locale_text.consent_label.label_text, expected);
        assert_eq!(complete.locale_text.locale, "de-DE");
        assert_eq!(complete.field_definition.language, "de");
        assert_eq!(complete.field_type, "CUSTOM");
        assert!(!complete.is_group && !complete.is_list);
        assert!(complete.scopes.is_empty());
    }

    #[test]
    fn consent_without_reference_fails() {
        let err = FieldDerivationEngine::new().derive(&input("CONSENT", &[])).unwrap_err();
        assert_eq!(err, DerivationError::MissingConsentRef { field_key: "terms".into() });
    }

    #[test]
    fn non_consent_fields_have_empty_label() {
        let complete = FieldDerivationEngine::new().derive(&input("TEXT", &[])).unwrap();
        assert_eq!(complete.base_data_type, "string");
        assert_eq!(complete.locale_text.consent_label, ConsentLabel::default());
    }

    #[test]
    fn unknown_data_types_fall_back_to_string() {
        assert_eq!(base_data_type("COLOUR"), "string");
        assert_eq!(base_data_type("NUMBER"), "number");
        assert_eq!(base_data_type("DATE"), "date");
    }

    #[test]
    fn derivation_is_deterministic() {
        let engine = FieldDerivationEngine::new();
        let input = input("CONSENT", &["https://example.com/terms"]);
        assert_eq!(engine.derive(&input).unwrap(), engine.derive(&input).unwrap());
    }
}
