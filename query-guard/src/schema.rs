//! Schema and example models consumed by the evaluation layers.
//!
//! These are the boundary types produced by out-of-scope collaborators
//! (dataset generators, inference clients): a collection schema with typed
//! field descriptors, the operator allow-lists granted to a query, and the
//! training example binding them to an intent and reference output.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The semantic role a schema field plays within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// Uniquely identifies a document (keys, codes, external ids)
    Identifier,
    /// Numeric quantity suitable for aggregation
    Measure,
    /// Point-in-time value
    Timestamp,
    /// Low-cardinality grouping value
    Category,
    /// Free-form text
    Text,
    /// Closed set of known values
    Enum,
    /// True/false flag
    Boolean,
}

/// A single field descriptor within a collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The field name as it appears in documents
    pub name: String,
    /// MongoDB type string: "string", "int", "double", "date", "bool",
    /// "objectId", "array", "object"
    #[serde(rename = "type")]
    pub field_type: String,
    /// The semantic role of the field
    pub role: FieldRole,
    /// Human-readable description of the field
    #[serde(default)]
    pub description: String,
    /// The closed value set, for enum-role fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

/// A collection schema: the set of fields a query may legally reference.
///
/// Field names are unique within one schema; the evaluation core only
/// consumes the *set* of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    /// The collection name
    pub collection: String,
    /// The field descriptors, in declaration order
    pub fields: Vec<FieldDef>,
    /// Domain tag grouping related collections (e.g. "ecommerce")
    pub domain: String,
}

impl SchemaDef {
    /// Returns the set of field names declared by this schema.
    pub fn field_names(&self) -> HashSet<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the fields that play the given role.
    pub fn fields_by_role(&self, role: FieldRole) -> Vec<&FieldDef> {
        self.fields.iter().filter(|f| f.role == role).collect()
    }
}

/// The operator allow-lists granted to a query.
///
/// Stage and expression operators are carried separately for prompt
/// construction, but the evaluation core treats their union as a flat set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowedOps {
    /// Pipeline stage operators (e.g. `$match`, `$group`)
    #[serde(default)]
    pub stage_operators: Vec<String>,
    /// Expression operators (e.g. `$sum`, `$gte`)
    #[serde(default)]
    pub expression_operators: Vec<String>,
}

impl AllowedOps {
    /// Returns the flattened union of stage and expression operators,
    /// stage operators first.
    pub fn all_operators(&self) -> Vec<&str> {
        self.stage_operators
            .iter()
            .chain(self.expression_operators.iter())
            .map(String::as_str)
            .collect()
    }
}

/// One training example: a schema, the operators a prediction may use,
/// the natural-language intent, and the reference output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    /// The collection schema the query targets
    pub schema: SchemaDef,
    /// The operator allow-lists granted to the query
    pub allowed_ops: AllowedOps,
    /// The natural-language request the query should satisfy
    pub intent: String,
    /// The reference query document
    pub output: serde_json::Value,
    /// Whether this example intentionally violates its constraints
    #[serde(default)]
    pub is_negative: bool,
}
