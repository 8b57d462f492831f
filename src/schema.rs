//! Schema-driven validation for install form fields.

use storefront_core::EnvSchema;

/// Validate one field value against the schema.
///
/// Returns `None` when the value is acceptable, otherwise a user-facing
/// message naming the field by its title (or key). Purely local and
/// synchronous; no side effects.
///
/// Rules, in order:
///
/// - a required field with an empty trimmed value is an error;
/// - an empty optional field is always fine;
/// - non-empty values are checked against the declared type (`number`,
///   `boolean`, `array`, `object`; anything else gets no format check);
/// - non-empty values must be a member of the property's `enum` list when
///   one is declared.
pub fn validate_env_field(schema: &EnvSchema, key: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    let label = schema.label(key);

    if trimmed.is_empty() {
        if schema.is_required(key) {
            return Some(format!("{} is required", label));
        }
        return None;
    }

    let Some(property) = schema.properties.get(key) else {
        return None;
    };

    if let Some(kind) = property.value_type.as_deref() {
        match kind.to_ascii_lowercase().as_str() {
            "number" => {
                // f64's parser accepts "inf" and "NaN"; only finite values
                // count as numbers here.
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => {}
                    _ => return Some(format!("{} must be a number", label)),
                }
            }
            "boolean" => {
                let lowered = trimmed.to_ascii_lowercase();
                if !matches!(lowered.as_str(), "true" | "false" | "1" | "0") {
                    return Some(format!("{} must be true or false", label));
                }
            }
            "array" => match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(v) if v.is_array() => {}
                _ => return Some(format!("{} must be a JSON array", label)),
            },
            "object" => match serde_json::from_str::<serde_json::Value>(trimmed) {
                Ok(v) if v.is_object() => {}
                _ => return Some(format!("{} must be a JSON object", label)),
            },
            _ => {}
        }
    }

    if let Some(choices) = &property.choices {
        if !choices.iter().any(|c| c == trimmed) {
            return Some(format!(
                "{} must be one of: {}",
                label,
                choices.join(", ")
            ));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use storefront_core::EnvProperty;

    use super::*;

    fn schema_with(key: &str, property: EnvProperty, required: bool) -> EnvSchema {
        let mut schema = EnvSchema::default();
        schema.properties.insert(key.to_string(), property);
        if required {
            schema.required.push(key.to_string());
        }
        schema
    }

    fn typed(kind: &str) -> EnvProperty {
        EnvProperty {
            value_type: Some(kind.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn required_empty_value_is_rejected() {
        let schema = schema_with("API_KEY", EnvProperty::default(), true);
        let error = validate_env_field(&schema, "API_KEY", "").unwrap();
        assert_eq!(error, "API_KEY is required");

        // Whitespace-only counts as empty.
        assert!(validate_env_field(&schema, "API_KEY", "   ").is_some());
    }

    #[test]
    fn required_error_uses_the_title_when_present() {
        let property = EnvProperty {
            title: Some("API Key".to_string()),
            ..Default::default()
        };
        let schema = schema_with("API_KEY", property, true);
        let error = validate_env_field(&schema, "API_KEY", "").unwrap();
        assert_eq!(error, "API Key is required");
    }

    #[test]
    fn optional_empty_value_is_accepted() {
        let schema = schema_with("REGION", typed("number"), false);
        assert!(validate_env_field(&schema, "REGION", "").is_none());
    }

    #[test]
    fn number_values_must_parse() {
        let schema = schema_with("PORT", typed("number"), false);
        assert!(validate_env_field(&schema, "PORT", "abc").is_some());
        assert!(validate_env_field(&schema, "PORT", "42").is_none());
        assert!(validate_env_field(&schema, "PORT", "3.14").is_none());
        assert!(validate_env_field(&schema, "PORT", "-1e3").is_none());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let schema = schema_with("PORT", typed("number"), false);
        for bad in ["inf", "-inf", "Infinity", "NaN", "nan"] {
            assert!(validate_env_field(&schema, "PORT", bad).is_some(), "{}", bad);
        }
    }

    #[test]
    fn boolean_values_accept_truthy_literals_case_insensitively() {
        let schema = schema_with("DEBUG", typed("boolean"), false);
        for ok in ["true", "FALSE", "True", "1", "0"] {
            assert!(validate_env_field(&schema, "DEBUG", ok).is_none(), "{}", ok);
        }
        assert!(validate_env_field(&schema, "DEBUG", "yes").is_some());
        assert!(validate_env_field(&schema, "DEBUG", "2").is_some());
    }

    #[test]
    fn array_values_must_be_json_arrays() {
        let schema = schema_with("HOSTS", typed("array"), false);
        assert!(validate_env_field(&schema, "HOSTS", "[1,2]").is_none());
        assert!(validate_env_field(&schema, "HOSTS", "[1,2").is_some());
        assert!(validate_env_field(&schema, "HOSTS", "{\"a\":1}").is_some());
    }

    #[test]
    fn object_values_must_be_json_objects() {
        let schema = schema_with("HEADERS", typed("object"), false);
        assert!(validate_env_field(&schema, "HEADERS", "{\"a\":1}").is_none());
        assert!(validate_env_field(&schema, "HEADERS", "[1,2]").is_some());
        assert!(validate_env_field(&schema, "HEADERS", "{").is_some());
    }

    #[test]
    fn unknown_types_get_no_format_check() {
        let schema = schema_with("ANY", typed("duration"), false);
        assert!(validate_env_field(&schema, "ANY", "whatever").is_none());
    }

    #[test]
    fn enum_membership_is_enforced() {
        let property = EnvProperty {
            choices: Some(vec!["small".to_string(), "large".to_string()]),
            ..Default::default()
        };
        let schema = schema_with("SIZE", property, false);
        assert!(validate_env_field(&schema, "SIZE", "small").is_none());
        let error = validate_env_field(&schema, "SIZE", "medium").unwrap();
        assert_eq!(error, "SIZE must be one of: small, large");
        // Empty optional enums are fine.
        assert!(validate_env_field(&schema, "SIZE", "").is_none());
    }

    #[test]
    fn unknown_key_is_accepted() {
        let schema = EnvSchema::default();
        assert!(validate_env_field(&schema, "MYSTERY", "value").is_none());
    }
}
