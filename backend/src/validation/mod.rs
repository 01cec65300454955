//! JSON Schema validation for documents read from disk.
//!
//! Two schemas are embedded at compile time from the `schemas/` directory:
//! - `taxonomy.json` - a theme taxonomy file
//! - `catalog.json` - a stored recording catalog
//!
//! Schema checks cover shape only. Semantic checks (duplicate themes,
//! duplicate identifiers, derived fields) are done by the loaders themselves.

use serde_json::Value;

const TAXONOMY_SCHEMA: &str = include_str!("../../schemas/taxonomy.json");
const CATALOG_SCHEMA: &str = include_str!("../../schemas/catalog.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with every violation otherwise
///
/// # Example
/// ```ignore
/// use serde_json::json;
/// use sermondex::validation::validate;
///
/// let schema = json!({
///     "type": "object",
///     "required": ["name"],
///     "properties": { "name": { "type": "string" } }
/// });
///
/// assert!(validate(&schema, &json!({ "name": "test" })).is_ok());
/// assert!(validate(&schema, &json!({ "age": 42 })).is_err());
/// ```
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn embedded(schema: &str) -> Result<Value, Vec<String>> {
    serde_json::from_str(schema).map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate a taxonomy document.
pub fn validate_taxonomy_document(data: &Value) -> Result<(), Vec<String>> {
    validate(&embedded(TAXONOMY_SCHEMA)?, data)
}

/// Validate a stored catalog document.
pub fn validate_catalog_document(data: &Value) -> Result<(), Vec<String>> {
    validate(&embedded(CATALOG_SCHEMA)?, data)
}
