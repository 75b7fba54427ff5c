//! Parsing of model responses into food item drafts

use serde_json::{Map, Value};

use super::LookupError;
use crate::models::{FieldInput, FoodItemDraft, Nutrition};

/// Parse the free-text content of a chat completion.
///
/// Tries the whole content as a JSON object first, then the span from the
/// first `{` to the last `}`.
pub fn parse_nutrition_content(content: &str) -> Result<FoodItemDraft, LookupError> {
    let value = match serde_json::from_str::<Value>(content.trim()) {
        Ok(value) if value.is_object() => value,
        _ => {
            let embedded = extract_json_object(content).ok_or_else(|| {
                LookupError::Parse("response contains no JSON object".to_string())
            })?;
            serde_json::from_str::<Value>(embedded)
                .map_err(|e| LookupError::Parse(format!("embedded JSON is invalid: {}", e)))?
        }
    };

    draft_from_value(&value)
}

/// The span from the first `{` to the last `}`, if there is one
pub fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Validate a JSON value into the strict draft shape
pub fn draft_from_value(value: &Value) -> Result<FoodItemDraft, LookupError> {
    let object = value
        .as_object()
        .ok_or_else(|| LookupError::Parse("expected a JSON object".to_string()))?;

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| LookupError::Parse("missing or empty \"name\"".to_string()))?;

    Ok(FoodItemDraft {
        name: name.to_string(),
        nutrition: Nutrition {
            calories: number_field(object, "calories")?,
            protein: number_field(object, "protein")?,
            fats: number_field(object, "fats")?,
            carbs: number_field(object, "carbs")?,
        },
    })
}

fn number_field(object: &Map<String, Value>, key: &str) -> Result<f64, LookupError> {
    let raw = object
        .get(key)
        .ok_or_else(|| LookupError::Parse(format!("missing \"{}\"", key)))?;

    let input: FieldInput = serde_json::from_value(raw.clone())
        .map_err(|_| LookupError::Parse(format!("\"{}\" is not a number", key)))?;

    match input.as_number() {
        Some(n) if n >= 0.0 => Ok(n),
        Some(_) => Err(LookupError::Parse(format!("\"{}\" is negative", key))),
        None => Err(LookupError::Parse(format!("\"{}\" is not a number", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direct_json() {
        let draft = parse_nutrition_content(
            r#"{"name": "1 medium banana (118g)", "calories": 105, "protein": 1.3, "fats": 0.4, "carbs": 27}"#,
        )
        .unwrap();
        assert_eq!(draft.name, "1 medium banana (118g)");
        assert_eq!(draft.nutrition.calories, 105.0);
        assert_eq!(draft.nutrition.protein, 1.3);
    }

    #[test]
    fn test_parse_embedded_json() {
        let content = "Here is the nutritional information:\n\n```json\n{\n  \"name\": \"1 cup oatmeal\",\n  \"calories\": \"158\",\n  \"protein\": 6,\n  \"fats\": 3,\n  \"carbs\": 27\n}\n```\nLet me know if you need anything else.";
        let draft = parse_nutrition_content(content).unwrap();
        assert_eq!(draft.name, "1 cup oatmeal");
        assert_eq!(draft.nutrition.calories, 158.0);
        assert_eq!(draft.nutrition.carbs, 27.0);
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_nutrition_content("I'm not sure about that food.").unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));

        let err = parse_nutrition_content("} backwards {").unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));

        let err = parse_nutrition_content("{not: valid json}").unwrap_err();
        assert!(matches!(err, LookupError::Parse(_)));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let missing = parse_nutrition_content(r#"{"name": "Egg", "calories": 70}"#);
        assert!(matches!(missing, Err(LookupError::Parse(_))));

        let text = parse_nutrition_content(
            r#"{"name": "Egg", "calories": "about seventy", "protein": 6, "fats": 5, "carbs": 0}"#,
        );
        assert!(matches!(text, Err(LookupError::Parse(_))));

        let unnamed = parse_nutrition_content(
            r#"{"name": " ", "calories": 70, "protein": 6, "fats": 5, "carbs": 0}"#,
        );
        assert!(matches!(unnamed, Err(LookupError::Parse(_))));

        let negative = parse_nutrition_content(
            r#"{"name": "Egg", "calories": -70, "protein": 6, "fats": 5, "carbs": 0}"#,
        );
        assert!(matches!(negative, Err(LookupError::Parse(_))));
    }

    #[test]
    fn test_extract_json_object() {
        assert_eq!(extract_json_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json_object("no braces"), None);
    }
}
