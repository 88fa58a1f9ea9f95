//! Registration field wire format (`registration-setup-srv`)
//!
//! Upserts send the complete derived record. Reads go through the flat
//! field endpoint and are decoded field by field, so a malformed attribute
//! is reported by its wire name.

use serde::Serialize;
use serde_json::Number;
use tenantform_domain::{
    ReconcileError, RegistrationField, RegistrationFieldComplete, RegistrationFieldPlan, Result,
};

use super::{decode_envelope_object, encode_json, WireObject};

const RESOURCE: &str = "registration field";

#[derive(Debug, Default, Clone, Copy)]
pub struct RegistrationFieldCodec;

impl RegistrationFieldCodec {
    /// Request body for `POST /registration-setup-srv/fields`.
    pub fn encode(&self, field: &RegistrationFieldComplete) -> Result<Vec<u8>> {
        encode_json(&RegistrationFieldWire::from(field))
    }

    /// Decode the flat field read response.
    pub fn decode(&self, body: &[u8]) -> Result<RegistrationField> {
        let object = decode_envelope_object(body, RESOURCE)?;
        let mut id: String = object.or_default("id")?;
        if id.is_empty() {
            id = object.or_default("_id")?;
        }
        Ok(RegistrationField {
            id,
            settings: RegistrationFieldPlan {
                field_key: object.required("fieldKey")?,
                data_type: object.required("dataType")?,
                required: object.or_default("required")?,
                enabled: object.or_default("enabled")?,
                read_only: object.or_default("readOnly")?,
                claimable: object.or_default("claimable")?,
                parent_group_id: object.or_default("parent_group_id")?,
                order: lenient_order(&object)?,
                consent_refs: object.or_default("consent_refs")?,
            },
        })
    }

    /// Platform id from an upsert response; empty when the platform omits it.
    pub fn decode_upsert_id(&self, body: &[u8]) -> Result<String> {
        let object = decode_envelope_object(body, RESOURCE)?;
        object.or_default("id")
    }
}

/// `order` arrives as an integer or as a float with no fractional part.
fn lenient_order(object: &WireObject) -> Result<i64> {
    let Some(number) = object.optional::<Number>("order")? else {
        return Ok(0);
    };
    if let Some(order) = number.as_i64() {
        return Ok(order);
    }
    match number.as_f64() {
        Some(order) if order.fract() == 0.0 => Ok(order as i64),
        _ => Err(ReconcileError::decode(
            "order",
            format!("{RESOURCE} `order` is not a whole number: {number}"),
        )),
    }
}

#[derive(Debug, Serialize)]
struct RegistrationFieldWire<'a> {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    internal: bool,
    #[serde(rename = "readOnly")]
    read_only: bool,
    claimable: bool,
    required: bool,
    scopes: &'a [String],
    enabled: bool,
    #[serde(rename = "localeText")]
    locale_text: LocaleTextWire<'a>,
    is_group: bool,
    is_list: bool,
    parent_group_id: &'a str,
    #[serde(rename = "fieldType")]
    field_type: &'a str,
    consent_refs: &'a [String],
    #[serde(rename = "fieldKey")]
    field_key: &'a str,
    #[serde(rename = "dataType")]
    data_type: &'a str,
    order: i64,
    #[serde(rename = "fieldDefinition")]
    field_definition: FieldDefinitionWire<'a>,
    #[serde(rename = "baseDataType")]
    base_data_type: &'a str,
}

#[derive(Debug, Serialize)]
struct LocaleTextWire<'a> {
    locale: &'a str,
    language: &'a str,
    #[serde(rename = "consentLabel")]
    consent_label: ConsentLabelWire<'a>,
}

#[derive(Debug, Serialize)]
struct ConsentLabelWire<'a> {
    label: &'a str,
    label_text: &'a str,
}

#[derive(Debug, Serialize)]
struct FieldDefinitionWire<'a> {
    language: &'a str,
    locale: &'a str,
}

impl<'a> From<&'a RegistrationFieldComplete> for RegistrationFieldWire<'a> {
    fn from(field: &'a RegistrationFieldComplete) -> Self {
        let s = &field.settings;
        Self {
            id: field.id.as_deref().filter(|id| !id.is_empty()),
            internal: field.internal,
            read_only: s.read_only,
            claimable: s.claimable,
            required: s.required,
            scopes: &field.scopes,
            enabled: s.enabled,
            locale_text: LocaleTextWire {
                locale: &field.locale_text.locale,
                language: &field.locale_text.language,
                consent_label: ConsentLabelWire {
                    label: &field.locale_text.consent_label.label,
                    label_text: &field.locale_text.consent_label.label_text,
                },
            },
            is_group: field.is_group,
            is_list: field.is_list,
            parent_group_id: &s.parent_group_id,
            field_type: &field.field_type,
            consent_refs: &s.consent_refs,
            field_key: &s.field_key,
            data_type: &s.data_type,
            order: s.order,
            field_definition: FieldDefinitionWire {
                language: &field.field_definition.language,
                locale: &field.field_definition.locale,
            },
            base_data_type: &field.base_data_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};
    use tenantform_domain::RegistrationFieldInput;

    use super::*;
    use crate::derivation::FieldDerivationEngine;

    fn complete(id: Option<&str>) -> RegistrationFieldComplete {
        let input = RegistrationFieldInput {
            id: id.map(str::to_string),
            settings: RegistrationFieldPlan {
                field_key: "terms".into(),
                data_type: "CONSENT".into(),
                required: true,
                enabled: true,
                parent_group_id: "DEFAULT".into(),
                order: 3,
                consent_refs: vec!["https://example.com/terms".into()],
                ..RegistrationFieldPlan::default()
            },
        };
        FieldDerivationEngine::new().derive(&input).unwrap()
    }

    #[test]
    fn encodes_the_complete_record() {
        let encoded: Value =
            serde_json::from_slice(&RegistrationFieldCodec.encode(&complete(None)).unwrap())
                .unwrap();
        assert!(encoded.get("_id").is_none());
        assert_eq!(encoded["fieldKey"], "terms");
        assert_eq!(encoded["baseDataType"], "bool");
        assert_eq!(encoded["fieldType"], "CUSTOM");
        assert_eq!(encoded["fieldDefinition"], json!({"language": "de", "locale": "de-DE"}));
        assert_eq!(
            encoded["localeText"]["consentLabel"]["label"],
            "<a href=\"https://example.com/terms\">Consent</a>"
        );
        assert_eq!(encoded["scopes"], json!([]));
    }

    #[test]
    fn known_id_is_sent_on_update() {
        let encoded: Value =
            serde_json::from_slice(&RegistrationFieldCodec.encode(&complete(Some("f-1"))).unwrap())
                .unwrap();
        assert_eq!(encoded["_id"], "f-1");
    }

    #[test]
    fn decodes_flat_read_with_float_order() {
        let body = serde_json::to_vec(&json!({
            "status": 200,
            "data": {
                "_id": "f-1",
                "fieldKey": "terms",
                "dataType": "CONSENT",
                "required": true,
                "enabled": null,
                "order": 2.0,
                "consent_refs": null
            }
        }))
        .unwrap();
        let field = RegistrationFieldCodec.decode(&body).unwrap();
        assert_eq!(field.id, "f-1");
        assert_eq!(field.settings.order, 2);
        assert!(field.settings.required);
        assert!(!field.settings.enabled);
        assert!(field.settings.consent_refs.is_empty());
    }

    #[test]
    fn flat_read_prefers_id_over_legacy_key() {
        let body = br#"{"data":{"id":"f-2","_id":"old","fieldKey":"k","dataType":"TEXT"}}"#;
        assert_eq!(RegistrationFieldCodec.decode(body).unwrap().id, "f-2");

        let body = br#"{"data":{"id":"","_id":"f-3","fieldKey":"k","dataType":"TEXT"}}"#;
        assert_eq!(RegistrationFieldCodec.decode(body).unwrap().id, "f-3");
    }

    #[test]
    fn fractional_order_is_a_field_error() {
        let body = br#"{"data":{"fieldKey":"k","dataType":"TEXT","order":1.5}}"#;
        match RegistrationFieldCodec.decode(body).unwrap_err() {
            ReconcileError::Decode { field, .. } => assert_eq!(field, "order"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_key_is_reported_by_wire_name() {
        let body = br#"{"data":{"dataType":"TEXT"}}"#;
        match RegistrationFieldCodec.decode(body).unwrap_err() {
            ReconcileError::Decode { field, .. } => assert_eq!(field, "fieldKey"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn upsert_response_yields_id() {
        let id = RegistrationFieldCodec.decode_upsert_id(br#"{"data":{"id":"f-9"}}"#).unwrap();
        assert_eq!(id, "f-9");
    }
}
