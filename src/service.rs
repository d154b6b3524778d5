//! Request validation at the route boundary.

use crate::error::AppError;
use crate::resource::ResourceSpec;
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Presence check only: every required field must be present, non-null
    /// and, for strings, non-empty. Runs before any storage call, so a
    /// rejected create leaves the collection untouched.
    pub fn validate(body: &Map<String, Value>, spec: &ResourceSpec) -> Result<(), AppError> {
        for field in spec.required {
            let missing = match body.get(*field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                return Err(AppError::Validation("Faltan campos obligatorios".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::{DurationStrategy, KeyScheme};
    use crate::resource::{page_visits, PRODUCTS};
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn products_have_no_required_fields() {
        assert!(RequestValidator::validate(&obj(json!({})), &PRODUCTS).is_ok());
    }

    #[test]
    fn visit_missing_device_is_rejected() {
        let spec = page_visits(KeyScheme::LetterPrefixMillis, DurationStrategy::UniformShort);
        let body = obj(json!({"path": "/", "country": "CO", "city": "Cali"}));
        let err = RequestValidator::validate(&body, &spec).unwrap_err();
        assert_eq!(err.to_string(), "Faltan campos obligatorios");
    }

    #[test]
    fn visit_empty_string_counts_as_missing() {
        let spec = page_visits(KeyScheme::LetterPrefixMillis, DurationStrategy::UniformShort);
        let body = obj(json!({
            "device": "", "path": "/", "country": "CO", "city": "Cali"
        }));
        assert!(RequestValidator::validate(&body, &spec).is_err());
    }

    #[test]
    fn visit_full_body_passes() {
        let spec = page_visits(KeyScheme::LetterPrefixMillis, DurationStrategy::UniformShort);
        let body = obj(json!({
            "device": "movil", "path": "/", "country": "CO", "city": "Cali"
        }));
        assert!(RequestValidator::validate(&body, &spec).is_ok());
    }
}
