//! Input Schema Synthesis
//!
//! Tools and prompts declare their parameters explicitly at registration time.
//! This module turns those declarations into the JSON Schema objects
//! advertised by `tools/list` and `prompts/list`.

use {
    serde_json::{json, Map, Value},
    std::collections::{BTreeMap, HashMap},
};

/// Declared type of a single tool or prompt parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    Integer,
    Number,
    Boolean,
    String,
    /// A closed set of member values
    Enum(EnumType),
    /// String-keyed mapping; `None` when the value type is not declared
    Map(Option<Box<ParamType>>),
    /// Sequence; `None` when the element type is not declared
    Array(Option<Box<ParamType>>),
    /// Anything without a dedicated mapping
    Other,
}

/// An enumerated parameter type: a name (used in error messages) and its member values
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<Value>,
}

impl EnumType {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve an incoming argument to the matching member value.
    pub fn coerce(&self, value: &Value) -> anyhow::Result<Value> {
        self.values
            .iter()
            .find(|member| *member == value)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{} is not a valid {}", render_value(value), self.name))
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

impl ParamType {
    pub fn map_of(value: ParamType) -> Self {
        Self::Map(Some(Box::new(value)))
    }

    pub fn array_of(item: ParamType) -> Self {
        Self::Array(Some(Box::new(item)))
    }

    /// JSON Schema fragment for this type
    pub fn to_schema(&self) -> Value {
        match self {
            Self::Integer => json!({"type": "integer"}),
            Self::Number => json!({"type": "number"}),
            Self::Boolean => json!({"type": "boolean"}),
            Self::String | Self::Other => json!({"type": "string"}),
            Self::Enum(e) => json!({"type": "string", "enum": e.values}),
            Self::Map(value) => json!({
                "type": "object",
                "additionalProperties": value
                    .as_deref()
                    .map_or_else(|| json!({"type": "string"}), ParamType::to_schema),
            }),
            Self::Array(item) => json!({
                "type": "array",
                "items": item
                    .as_deref()
                    .map_or_else(|| json!({"type": "string"}), ParamType::to_schema),
            }),
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Rust types that can be declared as parameters with `InputSchema::param`.
///
/// Enumerations implement this directly:
///
/// ```rust
/// use lambdamcp::schema::{EnumType, ParamType, SchemaType};
///
/// enum Priority { Low, High }
///
/// impl SchemaType for Priority {
///     fn param_type() -> ParamType {
///         ParamType::Enum(EnumType::new("Priority", ["low", "high"]))
///     }
/// }
/// ```
pub trait SchemaType {
    fn param_type() -> ParamType;
}

macro_rules! impl_schema_type {
    ($variant:ident => $($ty:ty),+) => {
        $(impl SchemaType for $ty {
            fn param_type() -> ParamType {
                ParamType::$variant
            }
        })+
    };
}

impl_schema_type!(Integer => i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);
impl_schema_type!(Number => f32, f64);
impl_schema_type!(Boolean => bool);
impl_schema_type!(String => String, &str);
impl_schema_type!(Other => Value);

impl<T: SchemaType> SchemaType for Vec<T> {
    fn param_type() -> ParamType {
        ParamType::array_of(T::param_type())
    }
}

impl<V: SchemaType> SchemaType for HashMap<String, V> {
    fn param_type() -> ParamType {
        ParamType::map_of(V::param_type())
    }
}

impl<V: SchemaType> SchemaType for BTreeMap<String, V> {
    fn param_type() -> ParamType {
        ParamType::map_of(V::param_type())
    }
}

/// Ordered parameter declarations for a tool or prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    params: Vec<(String, ParamType)>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter from its Rust type
    pub fn param<T: SchemaType>(self, name: impl Into<String>) -> Self {
        self.param_type(name, T::param_type())
    }

    /// Declare a parameter from an explicit type description
    pub fn param_type(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        let name = name.into();
        // redeclaring a name replaces its type in place
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = ty,
            None => self.params.push((name, ty)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamType> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamType)> {
        self.params.iter().map(|(n, ty)| (n.as_str(), ty))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render as `{type: "object", properties, required}`. Every declared
    /// parameter is listed as required.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::with_capacity(self.params.len());
        for (name, ty) in &self.params {
            properties.insert(name.clone(), ty.to_schema());
            required.push(Value::String(name.clone()));
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
