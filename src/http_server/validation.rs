//! Request validation for the test record endpoints
//!
//! Validation stops at the first failing field. Everything returned from here
//! is already trimmed.

use serde_json::{Map, Value};

use crate::storage::NewTestRecord;

pub const INVALID_BODY_MESSAGE: &str = "Invalid or missing JSON body";
pub const MISSING_CLINIC_MESSAGE: &str = "clinic_id query parameter is required";

/// A rejected create payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPayload {
    pub message: String,
    /// Raw `test_id` from the payload, if it had one
    pub test_id: Option<String>,
}

impl InvalidPayload {
    fn new(message: impl Into<String>, test_id: Option<String>) -> Self {
        Self {
            message: message.into(),
            test_id,
        }
    }

    /// The body was unreadable, oversized or not a JSON object
    pub fn invalid_body() -> Self {
        Self::new(INVALID_BODY_MESSAGE, None)
    }
}

/// Check one field: present, a string, not blank after trimming.
///
/// Returns the trimmed value.
pub fn require_non_empty_string<'a>(
    data: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, String> {
    match data.get(field) {
        None => Err(format!("{} is required", field)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(format!("{} cannot be empty", field))
            } else {
                Ok(trimmed)
            }
        }
        Some(_) => Err(format!("{} must be a string", field)),
    }
}

/// Parse and validate a `POST /tests` body.
pub fn parse_create_body(body: &[u8]) -> Result<NewTestRecord, InvalidPayload> {
    let data = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => return Err(InvalidPayload::invalid_body()),
    };

    let raw_test_id = data.get("test_id").and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    let field = |name: &str| {
        require_non_empty_string(&data, name)
            .map(str::to_string)
            .map_err(|message| InvalidPayload::new(message, raw_test_id.clone()))
    };

    // Struct fields evaluate in source order, matching the required field order
    Ok(NewTestRecord {
        test_id: field("test_id")?,
        patient_id: field("patient_id")?,
        clinic_id: field("clinic_id")?,
        test_type: field("test_type")?,
        result: field("result")?,
    })
}

/// Extract the trimmed `clinic_id` query parameter.
///
/// When the parameter repeats, the first occurrence is used.
pub fn clinic_id_param(query: &[(String, String)]) -> Result<String, String> {
    let clinic_id = query
        .iter()
        .find(|(key, _)| key == "clinic_id")
        .map(|(_, value)| value.trim())
        .unwrap_or("");
    if clinic_id.is_empty() {
        Err(MISSING_CLINIC_MESSAGE.to_string())
    } else {
        Ok(clinic_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::REQUIRED_FIELDS;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "test_id": "T1",
            "patient_id": "P1",
            "clinic_id": "C1",
            "test_type": "PCR",
            "result": "negative"
        })
    }

    fn parse(value: &Value) -> Result<NewTestRecord, InvalidPayload> {
        parse_create_body(value.to_string().as_bytes())
    }

    #[test]
    fn test_valid_payload() {
        let record = parse(&valid()).unwrap();
        assert_eq!(record.test_id, "T1");
        assert_eq!(record.patient_id, "P1");
        assert_eq!(record.clinic_id, "C1");
        assert_eq!(record.test_type, "PCR");
        assert_eq!(record.result, "negative");
    }

    #[test]
    fn test_values_are_trimmed() {
        let mut body = valid();
        body["patient_id"] = json!("  abc  ");
        body["result"] = json!("\tpositive\n");
        let record = parse(&body).unwrap();
        assert_eq!(record.patient_id, "abc");
        assert_eq!(record.result, "positive");
    }

    #[test]
    fn test_malformed_body() {
        let bodies: [&[u8]; 5] = [b"", b"{not json", b"null", b"[1,2]", b"\"T1\""];
        for body in bodies {
            let err = parse_create_body(body).unwrap_err();
            assert_eq!(err.message, INVALID_BODY_MESSAGE);
            assert_eq!(err.test_id, None);
        }
    }

    #[test]
    fn test_each_field_missing_wrong_type_blank() {
        for field in REQUIRED_FIELDS {
            let mut body = valid();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(parse(&body).unwrap_err().message, format!("{} is required", field));

            let mut body = valid();
            body[field] = json!(42);
            assert_eq!(
                parse(&body).unwrap_err().message,
                format!("{} must be a string", field)
            );

            let mut body = valid();
            body[field] = json!("   ");
            assert_eq!(
                parse(&body).unwrap_err().message,
                format!("{} cannot be empty", field)
            );
        }
    }

    #[test]
    fn test_first_failing_field_wins() {
        let body = json!({ "test_id": "T1", "clinic_id": "" });
        let err = parse(&body).unwrap_err();
        assert_eq!(err.message, "patient_id is required");
        assert_eq!(err.test_id.as_deref(), Some("T1"));
    }

    #[test]
    fn test_null_is_wrong_type() {
        let mut body = valid();
        body["result"] = Value::Null;
        assert_eq!(parse(&body).unwrap_err().message, "result must be a string");
    }

    #[test]
    fn test_empty_test_id() {
        let mut body = valid();
        body["test_id"] = json!("");
        let err = parse(&body).unwrap_err();
        assert_eq!(err.message, "test_id cannot be empty");
        assert_eq!(err.test_id.as_deref(), Some(""));
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_clinic_id_param() {
        assert_eq!(clinic_id_param(&[]).unwrap_err(), MISSING_CLINIC_MESSAGE);
        assert!(clinic_id_param(&pairs(&[("clinic_id", "   ")])).is_err());
        assert!(clinic_id_param(&pairs(&[("other", "C1")])).is_err());
        assert_eq!(clinic_id_param(&pairs(&[("clinic_id", " C1 ")])).unwrap(), "C1");
    }

    #[test]
    fn test_repeated_clinic_id_uses_first() {
        let blank_first = pairs(&[("clinic_id", ""), ("clinic_id", "C1")]);
        assert_eq!(clinic_id_param(&blank_first).unwrap_err(), MISSING_CLINIC_MESSAGE);

        let both_set = pairs(&[("other", "x"), ("clinic_id", "C2"), ("clinic_id", "C1")]);
        assert_eq!(clinic_id_param(&both_set).unwrap(), "C2");
    }
}
