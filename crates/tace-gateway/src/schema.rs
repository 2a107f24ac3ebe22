use serde::{Deserialize, Serialize};

/// Expected JSON type of an argument field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    /// Any finite JSON number.
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl FieldKind {
    fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// Typed argument schema for a registered action.
///
/// Validation policy: missing required fields and wrong types fail; fields
/// not named in the schema are allowed and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgumentSchema {
    pub fields: Vec<FieldSpec>,
}

impl ArgumentSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    pub fn field(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            kind,
            required: true,
        });
        self
    }

    /// Add an optional field.
    pub fn optional(mut self, name: &str, kind: FieldKind) -> Self {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            kind,
            required: false,
        });
        self
    }

    /// Validate an argument object. Returns the rejection reason on failure.
    pub fn validate(&self, args: &serde_json::Value) -> Result<(), String> {
        let object = args
            .as_object()
            .ok_or_else(|| "arguments must be a JSON object".to_string())?;

        for field in &self.fields {
            match object.get(&field.name) {
                Some(value) => {
                    if !field.kind.matches(value) {
                        return Err(format!(
                            "field '{}' expected {}, got {}",
                            field.name,
                            field.kind.name(),
                            json_type_name(value)
                        ));
                    }
                }
                None if field.required => {
                    return Err(format!("missing required field '{}'", field.name));
                }
                None => {}
            }
        }
        Ok(())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order_schema() -> ArgumentSchema {
        ArgumentSchema::new()
            .field("instrument_id", FieldKind::String)
            .field("quantity", FieldKind::Integer)
            .optional("note", FieldKind::String)
    }

    #[test]
    fn valid_arguments_pass() {
        let schema = order_schema();
        assert!(schema
            .validate(&json!({"instrument_id": "600519.SH", "quantity": 100}))
            .is_ok());
    }

    #[test]
    fn missing_required_field_rejected() {
        let schema = order_schema();
        let err = schema.validate(&json!({"instrument_id": "600519.SH"})).unwrap_err();
        assert!(err.contains("quantity"));
    }

    #[test]
    fn wrong_type_rejected() {
        let schema = order_schema();
        let err = schema
            .validate(&json!({"instrument_id": "600519.SH", "quantity": "100"}))
            .unwrap_err();
        assert!(err.contains("expected integer"));
    }

    #[test]
    fn extra_fields_ignored() {
        let schema = order_schema();
        assert!(schema
            .validate(&json!({
                "instrument_id": "600519.SH",
                "quantity": 100,
                "unexpected": {"nested": true}
            }))
            .is_ok());
    }

    #[test]
    fn optional_field_type_still_checked() {
        let schema = order_schema();
        let err = schema
            .validate(&json!({"instrument_id": "600519.SH", "quantity": 100, "note": 5}))
            .unwrap_err();
        assert!(err.contains("note"));
    }

    #[test]
    fn non_object_arguments_rejected() {
        let schema = order_schema();
        assert!(schema.validate(&json!([1, 2, 3])).is_err());
        assert!(schema.validate(&json!("text")).is_err());
    }

    #[test]
    fn number_accepts_integers_and_floats() {
        let schema = ArgumentSchema::new().field("score", FieldKind::Number);
        assert!(schema.validate(&json!({"score": 1})).is_ok());
        assert!(schema.validate(&json!({"score": 0.5})).is_ok());
        assert!(schema.validate(&json!({"score": "0.5"})).is_err());
    }
}
