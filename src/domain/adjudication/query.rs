//! Structured representation of a free-text claim query

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Gender as understood by the policy wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Lenient parse of model output (`"Male"`, `"m"`, `"female"`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(Self::Male),
            "female" | "f" => Some(Self::Female),
            _ => None,
        }
    }
}

/// Fixed-schema extraction of the salient fields of a query.
///
/// Every field is optional; the fully empty value is a valid, common outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredQuery {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub procedure: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub policy_duration: Option<String>,
}

impl StructuredQuery {
    pub const FIELDS: [&'static str; 5] =
        ["age", "gender", "procedure", "location", "policy_duration"];

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Build from a parsed JSON value, tolerating loosely typed fields.
    ///
    /// Returns `None` when the value is not a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        Self {
            age: object.get("age").and_then(lenient_age),
            gender: object
                .get("gender")
                .and_then(Value::as_str)
                .and_then(Gender::parse),
            procedure: object.get("procedure").and_then(lenient_text),
            location: object.get("location").and_then(lenient_text),
            policy_duration: object.get("policy_duration").and_then(lenient_text),
        }
    }
}

fn lenient_age(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}

fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_full_object() {
        let value = json!({
            "age": 46,
            "gender": "male",
            "procedure": "knee surgery",
            "location": "Pune",
            "policy_duration": "3 months"
        });

        let query = StructuredQuery::from_json(&value).unwrap();

        assert_eq!(query.age, Some(46));
        assert_eq!(query.gender, Some(Gender::Male));
        assert_eq!(query.procedure.as_deref(), Some("knee surgery"));
        assert_eq!(query.location.as_deref(), Some("Pune"));
        assert_eq!(query.policy_duration.as_deref(), Some("3 months"));
    }

    #[test]
    fn test_from_json_loose_types() {
        let value = json!({
            "age": "46 years",
            "gender": "Other",
            "procedure": "",
            "location": null,
            "policy_duration": 3
        });

        let query = StructuredQuery::from_json(&value).unwrap();

        assert_eq!(query.age, Some(46));
        assert_eq!(query.gender, None);
        assert_eq!(query.procedure, None);
        assert_eq!(query.location, None);
        assert_eq!(query.policy_duration.as_deref(), Some("3"));
    }

    #[test]
    fn test_from_json_rejects_negative_age() {
        let query = StructuredQuery::from_json(&json!({"age": -4})).unwrap();
        assert_eq!(query.age, None);
    }

    #[test]
    fn test_from_json_non_object() {
        assert!(StructuredQuery::from_json(&json!([1, 2])).is_none());
        assert!(StructuredQuery::from_json(&json!("text")).is_none());
    }

    #[test]
    fn test_empty_serializes_every_field_as_null() {
        let json = serde_json::to_value(StructuredQuery::empty()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), StructuredQuery::FIELDS.len());
        for field in StructuredQuery::FIELDS {
            assert!(object[field].is_null(), "{field} should be null");
        }
        assert!(StructuredQuery::empty().is_empty());
    }

    #[test]
    fn test_partial_query_keeps_fixed_schema() {
        let query = StructuredQuery {
            age: Some(46),
            ..StructuredQuery::default()
        };

        let json = serde_json::to_value(&query).unwrap();

        assert_eq!(
            json,
            json!({
                "age": 46,
                "gender": null,
                "procedure": null,
                "location": null,
                "policy_duration": null
            })
        );
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let query: StructuredQuery = serde_json::from_str(r#"{"age": 46}"#).unwrap();
        assert_eq!(query.age, Some(46));
        assert_eq!(query.gender, None);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse(" Female "), Some(Gender::Female));
        assert_eq!(Gender::parse("M"), Some(Gender::Male));
        assert_eq!(Gender::parse("unknown"), None);
    }
}
