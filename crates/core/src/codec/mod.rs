//! Wire codecs
//!
//! One codec per resource type and wire version. Codecs translate domain
//! entities to the platform's JSON request bodies and decode enveloped
//! responses back, normalizing server omissions on the way in:
//! absent or `null` collections become empty, empty optional strings become
//! `None`.

pub mod app;
pub mod hook;
pub mod hosted_pages;
pub mod password_policy;
pub mod registration_field;
pub mod template;
pub mod template_group;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tenantform_domain::{ReconcileError, Result};

use crate::transport_ports::HttpMethod;

pub use app::AppCodec;
pub use hook::HookCodec;
pub use hosted_pages::{HostedPagesV3Codec, LegacyHostedPagesCodec};
pub use password_policy::PasswordPolicyCodec;
pub use registration_field::RegistrationFieldCodec;
pub use template::TemplateCodec;
pub use template_group::{LegacyTemplateGroupCodec, TemplateGroupCodec};

/// Translation between a domain entity and its wire JSON.
pub trait WireCodec: Send + Sync {
    type Entity;

    /// Request body for an upsert of `entity`.
    fn encode(&self, entity: &Self::Entity) -> Result<Vec<u8>>;

    /// Decode an enveloped single-entity response.
    fn decode(&self, body: &[u8]) -> Result<Self::Entity>;
}

/// One platform call, built by a codec or reconciler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    pub fn post(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self { method: HttpMethod::Post, path: path.into(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self { method: HttpMethod::Put, path: path.into(), body: Some(body) }
    }

    pub fn with_body(method: HttpMethod, path: impl Into<String>, body: Vec<u8>) -> Self {
        Self { method, path: path.into(), body: Some(body) }
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Value,
}

/// Unwrap `{status, data}` and decode `data` as `T`.
pub fn decode_envelope<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let data = envelope_data(body)?;
    serde_json::from_value(data).map_err(|err| {
        let message = err.to_string();
        let field = field_from_message(&message).unwrap_or("data").to_string();
        ReconcileError::Decode { field, message }
    })
}

/// Unwrap `{status, data: [...]}`; an absent or `null` list is empty.
pub fn decode_envelope_list<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    match envelope_data(body) {
        Ok(_) => decode_envelope(body),
        Err(ReconcileError::Decode { field, .. }) if field == "data" => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

/// Unwrap `{status, data}` and return `data` as a JSON object.
pub fn decode_envelope_object(body: &[u8], resource: &'static str) -> Result<WireObject> {
    match envelope_data(body)? {
        Value::Object(map) => Ok(WireObject { resource, map }),
        other => Err(ReconcileError::decode(
            "data",
            format!("expected a {resource} object, got {}", json_kind(&other)),
        )),
    }
}

fn envelope_data(body: &[u8]) -> Result<Value> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|err| ReconcileError::decode("body", err.to_string()))?;
    if envelope.data.is_null() {
        return Err(ReconcileError::decode("data", "response has no data"));
    }
    Ok(envelope.data)
}

/// Serialize a request body.
pub fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|err| ReconcileError::Encode(err.to_string()))
}

/// Percent-encode one path segment or query value.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Decoded JSON object with typed, field-level accessors.
#[derive(Debug, Clone)]
pub struct WireObject {
    resource: &'static str,
    map: Map<String, Value>,
}

impl WireObject {
    /// Field that must be present and non-null.
    pub fn required<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        match self.map.get(field) {
            None | Some(Value::Null) => Err(ReconcileError::decode(
                field,
                format!("{} response is missing `{field}`", self.resource),
            )),
            Some(value) => self.convert(field, value),
        }
    }

    /// Field that may be absent or null.
    pub fn optional<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>> {
        match self.map.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => self.convert(field, value).map(Some),
        }
    }

    /// Absent or null fields decode as `T::default()`.
    pub fn or_default<T: DeserializeOwned + Default>(&self, field: &str) -> Result<T> {
        Ok(self.optional(field)?.unwrap_or_default())
    }

    fn convert<T: DeserializeOwned>(&self, field: &str, value: &Value) -> Result<T> {
        T::deserialize(value).map_err(|err| {
            ReconcileError::decode(field, format!("{} `{field}`: {err}", self.resource))
        })
    }
}

/// `""` and `null` both decode as `None`.
pub fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}

/// Drop empty strings from an optional value before encoding.
pub fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn field_from_message(message: &str) -> Option<&str> {
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn envelope_reads_only_data() {
        let body = br#"{"status":200,"data":{"name":"x"},"error":null}"#;
        let named: Named = decode_envelope(body).unwrap();
        assert_eq!(named.name, "x");
    }

    #[test]
    fn missing_data_is_a_decode_error() {
        let err = decode_envelope::<Named>(br#"{"status":200}"#).unwrap_err();
        assert_eq!(err, ReconcileError::decode("data", "response has no data"));
    }

    #[test]
    fn serde_errors_name_the_field_when_possible() {
        let err = decode_envelope::<Named>(br#"{"data":{}}"#).unwrap_err();
        match err {
            ReconcileError::Decode { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_a_body_decode_error() {
        let err = decode_envelope::<Named>(b"<html>").unwrap_err();
        assert!(matches!(err, ReconcileError::Decode { ref field, .. } if field == "body"));
    }

    #[test]
    fn wire_object_reports_field_level_errors() {
        let body = serde_json::to_vec(&json!({"data": {"order": "first", "id": "f-1"}})).unwrap();
        let object = decode_envelope_object(&body, "registration field").unwrap();

        assert_eq!(object.required::<String>("id").unwrap(), "f-1");
        assert!(object.optional::<bool>("enabled").unwrap().is_none());
        assert!(object.or_default::<Vec<String>>("scopes").unwrap().is_empty());

        match object.required::<i64>("order").unwrap_err() {
            ReconcileError::Decode { field, .. } => assert_eq!(field, "order"),
            other => panic!("expected decode error, got {other:?}"),
        }
        match object.required::<String>("fieldKey").unwrap_err() {
            ReconcileError::Decode { field, message } => {
                assert_eq!(field, "fieldKey");
                assert!(message.contains("missing"));
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn non_object_data_is_rejected() {
        let err = decode_envelope_object(br#"{"data":[1,2]}"#, "hook").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn segments_are_percent_encoded() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }
}
