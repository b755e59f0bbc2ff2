//! Typed schema descriptor tree
//!
//! One node of the tree specifies the type and constraints for a single
//! document field. The node kind determines which constraints exist: dict
//! nodes carry an ordered field map, list nodes carry either one element
//! shape or a positional item sequence, string nodes an optional value
//! enumeration, numeric nodes optional inclusive bounds.
//!
//! Nodes serialize to the declarative descriptor form consumed by
//! schema-driven tooling (`type` tag plus the populated constraints) and can
//! be lowered to JSON Schema for a generic validation engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use std::hash::Hash;

/// Ordered field-name to node mapping used by dict nodes
pub type Fields = IndexMap<String, SchemaNode>;

/// A single descriptor in the validation rule tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    /// Mapping with named fields, each validated by its own child node
    Dict {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        schema: Fields,
    },
    /// Sequence, either one shape for every element (`schema`) or a fixed
    /// positional shape (`items`)
    List {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<Box<SchemaNode>>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        items: Vec<SchemaNode>,
    },
    /// Text value, optionally restricted to an allowed set
    String {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        allowed: Vec<String>,
    },
    /// Floating-point value with optional inclusive bounds
    Float {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Integer value with optional inclusive bounds
    Integer {
        #[serde(default, skip_serializing_if = "is_false")]
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl SchemaNode {
    /// Dict node over an ordered field map
    pub fn dict(schema: Fields) -> Self {
        SchemaNode::Dict {
            required: false,
            schema,
        }
    }

    /// List node applying one element shape to every member
    pub fn list(element: SchemaNode) -> Self {
        SchemaNode::List {
            required: false,
            schema: Some(Box::new(element)),
            items: Vec::new(),
        }
    }

    /// List node with a fixed positional shape
    pub fn positional<I>(items: I) -> Self
    where
        I: IntoIterator<Item = SchemaNode>,
    {
        SchemaNode::List {
            required: false,
            schema: None,
            items: items.into_iter().collect(),
        }
    }

    /// Unconstrained string node
    pub fn string() -> Self {
        SchemaNode::String {
            required: false,
            allowed: Vec::new(),
        }
    }

    /// String node restricted to a fixed set of values
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaNode::String {
            required: false,
            allowed: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Unbounded float node
    pub fn float() -> Self {
        SchemaNode::Float {
            required: false,
            min: None,
            max: None,
        }
    }

    /// Float node bounded below by zero
    pub fn non_negative_float() -> Self {
        SchemaNode::Float {
            required: false,
            min: Some(0.0),
            max: None,
        }
    }

    /// Unbounded integer node
    pub fn integer() -> Self {
        SchemaNode::Integer {
            required: false,
            min: None,
            max: None,
        }
    }

    /// Mark this node as a required field of its parent dict
    pub fn required(mut self) -> Self {
        match &mut self {
            SchemaNode::Dict { required, .. }
            | SchemaNode::List { required, .. }
            | SchemaNode::String { required, .. }
            | SchemaNode::Float { required, .. }
            | SchemaNode::Integer { required, .. } => *required = true,
        }
        self
    }

    /// Whether this node is a required field of its parent dict
    pub fn is_required(&self) -> bool {
        match self {
            SchemaNode::Dict { required, .. }
            | SchemaNode::List { required, .. }
            | SchemaNode::String { required, .. }
            | SchemaNode::Float { required, .. }
            | SchemaNode::Integer { required, .. } => *required,
        }
    }

    /// Child node for a named field of a dict node
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Dict { schema, .. } => schema.get(name),
            _ => None,
        }
    }

    /// Allowed values of a string node (empty when unrestricted)
    pub fn allowed_values(&self) -> &[String] {
        match self {
            SchemaNode::String { allowed, .. } => allowed,
            _ => &[],
        }
    }

    /// Element shape of a one-shape list node
    pub fn element(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::List { schema, .. } => schema.as_deref(),
            _ => None,
        }
    }

    /// Lower the descriptor tree to a JSON Schema document
    ///
    /// Dict nodes become closed objects with `required` collected from their
    /// children; positional lists become `prefixItems` with no extra items
    /// allowed; string enumerations become `enum`; numeric bounds become
    /// inclusive `minimum`/`maximum`.
    pub fn to_json_schema(&self) -> JsonValue {
        match self {
            SchemaNode::Dict { schema, .. } => {
                let mut properties = JsonMap::new();
                let mut required = Vec::new();
                for (name, node) in schema {
                    if node.is_required() {
                        required.push(JsonValue::from(name.as_str()));
                    }
                    properties.insert(name.clone(), node.to_json_schema());
                }
                let mut object = JsonMap::new();
                object.insert("type".into(), json!("object"));
                object.insert("properties".into(), JsonValue::Object(properties));
                object.insert("additionalProperties".into(), json!(false));
                if !required.is_empty() {
                    object.insert("required".into(), JsonValue::Array(required));
                }
                JsonValue::Object(object)
            }
            SchemaNode::List { schema, items, .. } => {
                if let Some(element) = schema {
                    json!({
                        "type": "array",
                        "items": element.to_json_schema(),
                    })
                } else if !items.is_empty() {
                    let prefix: Vec<JsonValue> =
                        items.iter().map(SchemaNode::to_json_schema).collect();
                    json!({
                        "type": "array",
                        "prefixItems": prefix,
                        "items": false,
                        "minItems": items.len(),
                    })
                } else {
                    json!({"type": "array"})
                }
            }
            SchemaNode::String { allowed, .. } => {
                if allowed.is_empty() {
                    json!({"type": "string"})
                } else {
                    json!({"type": "string", "enum": allowed})
                }
            }
            SchemaNode::Float { min, max, .. } => {
                let mut number = JsonMap::new();
                number.insert("type".into(), json!("number"));
                if let Some(min) = min {
                    number.insert("minimum".into(), json!(min));
                }
                if let Some(max) = max {
                    number.insert("maximum".into(), json!(max));
                }
                JsonValue::Object(number)
            }
            SchemaNode::Integer { min, max, .. } => {
                let mut integer = JsonMap::new();
                integer.insert("type".into(), json!("integer"));
                if let Some(min) = min {
                    integer.insert("minimum".into(), json!(min));
                }
                if let Some(max) = max {
                    integer.insert("maximum".into(), json!(max));
                }
                JsonValue::Object(integer)
            }
        }
    }
}

/// Build an ordered field map from name/node pairs
pub fn fields<const N: usize>(pairs: [(&str, SchemaNode); N]) -> Fields {
    pairs
        .into_iter()
        .map(|(name, node)| (name.to_string(), node))
        .collect()
}

/// Merge an ordered sequence of maps into one
///
/// A key appearing in multiple inputs takes the value from the last input
/// that defines it; keys keep the position of their first appearance.
pub fn merge<K, V, I>(maps: I) -> IndexMap<K, V>
where
    K: Hash + Eq,
    I: IntoIterator<Item = IndexMap<K, V>>,
{
    let mut merged = IndexMap::new();
    for map in maps {
        merged.extend(map);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    #[test]
    fn test_plain_string_serializes_to_type_only() {
        let value = serde_json::to_value(SchemaNode::string()).unwrap();
        assert_eq!(value, json!({"type": "string"}));
    }

    #[test]
    fn test_required_flag_serializes() {
        let value = serde_json::to_value(SchemaNode::string().required()).unwrap();
        assert_eq!(value, json!({"type": "string", "required": true}));
    }

    #[test]
    fn test_dict_descriptor_shape() {
        let node = SchemaNode::dict(fields([
            ("value", SchemaNode::non_negative_float().required()),
            ("units", SchemaNode::string().required()),
        ]));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "dict",
                "schema": {
                    "value": {"type": "float", "required": true, "min": 0.0},
                    "units": {"type": "string", "required": true},
                },
            })
        );
    }

    #[test]
    fn test_descriptor_roundtrip_from_yaml() {
        let yaml = "
type: list
schema:
  type: dict
  schema:
    species: {type: string, required: true}
";
        let node: SchemaNode = serde_yml::from_str(yaml).unwrap();
        let element = node.element().expect("list element shape");
        assert!(element.field("species").unwrap().is_required());
        let reserialized: SchemaNode =
            serde_yml::from_str(&serde_yml::to_string(&node).unwrap()).unwrap();
        assert_eq!(node, reserialized);
    }

    #[test]
    fn test_required_builder_and_accessor() {
        assert!(!SchemaNode::integer().is_required());
        assert!(SchemaNode::integer().required().is_required());
    }

    #[test]
    fn test_allowed_values_accessor() {
        let node = SchemaNode::enumeration(["max", "min"]);
        assert_eq!(node.allowed_values(), ["max", "min"]);
        assert!(SchemaNode::float().allowed_values().is_empty());
    }

    #[test]
    fn test_field_accessor_only_on_dicts() {
        let node = SchemaNode::dict(fields([("name", SchemaNode::string())]));
        assert!(node.field("name").is_some());
        assert!(node.field("missing").is_none());
        assert!(SchemaNode::string().field("name").is_none());
    }

    #[test]
    fn test_merge_later_wins_union_of_keys() {
        let merged = merge([
            indexmap! {"a" => 1},
            indexmap! {"a" => 2},
            indexmap! {"b" => 3},
        ]);
        assert_eq!(merged, indexmap! {"a" => 2, "b" => 3});
    }

    #[test]
    fn test_merge_preserves_first_key_position() {
        let merged = merge([indexmap! {"a" => 1, "b" => 2}, indexmap! {"a" => 9}]);
        let keys: Vec<&str> = merged.keys().copied().collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(merged["a"], 9);
    }

    #[test]
    fn test_json_schema_object_is_closed() {
        let node = SchemaNode::dict(fields([
            ("name", SchemaNode::string().required()),
            ("ORCID", SchemaNode::string()),
        ]));
        let schema = node.to_json_schema();
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["required"], json!(["name"]));
        assert_eq!(schema["properties"]["ORCID"], json!({"type": "string"}));
    }

    #[test]
    fn test_json_schema_enum_and_bounds() {
        let node = SchemaNode::enumeration(["shock tube"]);
        assert_eq!(
            node.to_json_schema(),
            json!({"type": "string", "enum": ["shock tube"]})
        );

        let year = SchemaNode::Integer {
            required: true,
            min: Some(1600),
            max: Some(2025),
        };
        assert_eq!(
            year.to_json_schema(),
            json!({"type": "integer", "minimum": 1600, "maximum": 2025})
        );
    }

    #[test]
    fn test_json_schema_positional_list() {
        let pair = SchemaNode::positional([SchemaNode::float(), SchemaNode::float()]);
        let schema = pair.to_json_schema();
        assert_eq!(schema["minItems"], json!(2));
        assert_eq!(schema["items"], json!(false));
        assert_eq!(schema["prefixItems"].as_array().unwrap().len(), 2);
    }
}
