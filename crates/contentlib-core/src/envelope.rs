//! The `{status, message, data}` wrapper used by every proxy response.
//!
//! A call only counts as successful when `status` is literally `true`. Any
//! other value (missing, `false`, a string, a number) deserializes to
//! `false`, whatever the HTTP status code said.
//!
//! `data` is only decoded into the payload type when `status` is `true`. A
//! rejected envelope drops whatever `data` it carried, so a failure with a
//! half-filled or empty object still surfaces its `message`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::model::null_as_default;

fn strict_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(
        Value::deserialize(deserializer)?,
        Value::Bool(true)
    ))
}

/// Response envelope. Listing responses also carry pagination fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

/// Wire shape of [`Envelope`] before `data` is typed.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default, deserialize_with = "strict_true")]
    status: bool,
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default, deserialize_with = "null_as_default")]
    message: String,
    #[serde(default)]
    message_code: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    next: Option<String>,
    #[serde(default)]
    previous: Option<String>,
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Envelope<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEnvelope::deserialize(deserializer)?;
        let data = match raw.data {
            Some(value) if raw.status => {
                Some(serde_json::from_value(value).map_err(serde::de::Error::custom)?)
            }
            _ => None,
        };
        Ok(Self {
            status: raw.status,
            status_code: raw.status_code,
            message: raw.message,
            message_code: raw.message_code,
            data,
            error: raw.error,
            count: raw.count,
            next: raw.next,
            previous: raw.previous,
        })
    }
}

impl<T> Envelope<T> {
    /// A failure envelope: `status: false`, a message, and optional error detail.
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            status: false,
            status_code: None,
            message: message.into(),
            message_code: None,
            data: None,
            error,
            count: None,
            next: None,
            previous: None,
        }
    }

    /// Whether the envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.status
    }

    /// Unwrap the payload of a successful envelope.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Rejected`] carrying the envelope's message when
    /// `status` is not `true` or `data` is missing.
    pub fn into_data(self) -> Result<T, FetchError> {
        match (self.status, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(FetchError::Rejected(self.message)),
        }
    }

    /// Turn a submission envelope into `Ok(message)` or a rejection.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Rejected`] when `status` is not `true`.
    pub fn into_ack(self) -> Result<String, FetchError> {
        if self.status {
            Ok(self.message)
        } else {
            Err(FetchError::Rejected(self.message))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ContentItem;

    fn parse(value: Value) -> Envelope<Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn only_literal_true_is_success() {
        for status in [json!(false), json!("true"), json!(1), Value::Null] {
            let env = parse(json!({"status": status, "message": "ok", "data": {"id": 1}}));
            assert!(!env.is_ok(), "status {status} must not count as success");
            assert!(env.into_data().is_err());
        }
        let env = parse(json!({"message": "no status at all", "data": []}));
        assert!(!env.is_ok());
    }

    #[test]
    fn rejected_envelope_keeps_message_despite_unusable_data() {
        let env: Envelope<ContentItem> = serde_json::from_value(json!({
            "status": false,
            "message": "Case study is not published",
            "data": {}
        }))
        .unwrap();
        assert_eq!(env.data, None);
        assert_eq!(
            env.into_data(),
            Err(FetchError::Rejected("Case study is not published".to_owned()))
        );
    }

    #[test]
    fn malformed_data_on_success_is_a_decode_error() {
        let result: Result<Envelope<ContentItem>, _> =
            serde_json::from_value(json!({"status": true, "message": "ok", "data": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn success_without_data_is_rejected() {
        let env = parse(json!({"status": true, "message": "empty"}));
        assert_eq!(
            env.into_data(),
            Err(FetchError::Rejected("empty".to_owned()))
        );
    }

    #[test]
    fn failure_serializes_without_payload_fields() {
        let env: Envelope<Value> =
            Envelope::failure("Case study not found", None);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json, json!({"status": false, "message": "Case study not found"}));
    }

    #[test]
    fn pagination_fields_round_through() {
        let env = parse(json!({
            "status": true,
            "status_code": 200,
            "message": "Case studies fetched",
            "message_code": "OK",
            "data": [],
            "count": 31,
            "next": "https://api.example.com/casestudy/case-studies/?page=3",
            "previous": null
        }));
        assert_eq!(env.count, Some(31));
        assert!(env.next.is_some());
        assert_eq!(env.previous, None);
    }
}
