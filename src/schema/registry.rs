//! Declarative description of the object types the schema exposes.
//!
//! The registry is plain data: object types, their fields, field arguments
//! and declared types. It is built once at start-up and rejects name
//! collisions. [`TypeRegistry::verify`] compares it against the executable
//! schema's introspection result so the two cannot drift apart.

use std::fmt;

use derive_more::{Display, Error};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Int,
    String,
    Object(&'static str),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
}

impl FieldType {
    pub fn non_null(self) -> Self {
        FieldType::NonNull(Box::new(self))
    }

    pub fn list_of(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    /// Name of the object type this type refers to, looking through lists
    /// and non-null wrappers.
    pub fn object_name(&self) -> Option<&'static str> {
        match self {
            FieldType::Object(name) => Some(*name),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.object_name(),
            FieldType::Int | FieldType::String => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Int => f.write_str("Int"),
            FieldType::String => f.write_str("String"),
            FieldType::Object(name) => f.write_str(name),
            FieldType::List(inner) => write!(f, "[{inner}]"),
            FieldType::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: &'static str,
    pub arg_type: FieldType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub arguments: Vec<ArgumentDef>,
}

impl FieldDef {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            arguments: Vec::new(),
        }
    }

    pub fn argument(mut self, name: &'static str, arg_type: FieldType) -> Self {
        self.arguments.push(ArgumentDef { name, arg_type });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectType {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
}

impl ObjectType {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[display("object type `{name}` is declared twice")]
    DuplicateType { name: String },

    #[display("field `{type_name}.{field}` is declared twice")]
    DuplicateField { type_name: String, field: String },

    #[display("argument `{field}({argument})` on `{type_name}` is declared twice")]
    DuplicateArgument {
        type_name: String,
        field: String,
        argument: String,
    },

    #[display("`{type_name}.{field}` refers to undeclared type `{referenced}`")]
    UnknownType {
        type_name: String,
        field: String,
        referenced: String,
    },

    #[display("root type `{name}` is not declared")]
    MissingRoot { name: String },

    #[display("executable schema has no object type `{name}`")]
    MissingType { name: String },

    #[display("executable schema has no field `{type_name}.{field}`")]
    MissingField { type_name: String, field: String },

    #[display("executable schema exposes undeclared field `{type_name}.{field}`")]
    UndeclaredField { type_name: String, field: String },

    #[display("`{location}` is declared as `{declared}` but the executable schema has `{actual}`")]
    TypeMismatch {
        location: String,
        declared: String,
        actual: String,
    },

    #[display("introspection result is malformed: {reason}")]
    MalformedIntrospection { reason: String },
}

#[derive(Clone, Debug)]
pub struct TypeRegistry {
    query: &'static str,
    mutation: Option<&'static str>,
    types: Vec<ObjectType>,
}

impl TypeRegistry {
    pub fn new(query: &'static str, mutation: Option<&'static str>) -> Self {
        Self {
            query,
            mutation,
            types: Vec::new(),
        }
    }

    pub fn register(&mut self, object: ObjectType) -> Result<(), RegistryError> {
        if self.get(object.name).is_some() {
            return Err(RegistryError::DuplicateType {
                name: object.name.to_string(),
            });
        }
        for (i, field) in object.fields.iter().enumerate() {
            if object.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RegistryError::DuplicateField {
                    type_name: object.name.to_string(),
                    field: field.name.to_string(),
                });
            }
            for (j, arg) in field.arguments.iter().enumerate() {
                if field.arguments[..j].iter().any(|a| a.name == arg.name) {
                    return Err(RegistryError::DuplicateArgument {
                        type_name: object.name.to_string(),
                        field: field.name.to_string(),
                        argument: arg.name.to_string(),
                    });
                }
            }
        }
        self.types.push(object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ObjectType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn types(&self) -> impl Iterator<Item = &ObjectType> {
        self.types.iter()
    }

    /// Checks that root types exist and every object reference resolves.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for root in std::iter::once(self.query).chain(self.mutation) {
            if self.get(root).is_none() {
                return Err(RegistryError::MissingRoot {
                    name: root.to_string(),
                });
            }
        }
        for object in &self.types {
            for field in &object.fields {
                let referenced = field
                    .arguments
                    .iter()
                    .map(|a| &a.arg_type)
                    .chain(std::iter::once(&field.field_type))
                    .filter_map(FieldType::object_name);
                for name in referenced {
                    if self.get(name).is_none() {
                        return Err(RegistryError::UnknownType {
                            type_name: object.name.to_string(),
                            field: field.name.to_string(),
                            referenced: name.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Compares the registry with the `__schema` introspection result of the
    /// executable schema. Both must expose exactly the same fields, with the
    /// same arguments and types, on every declared object type.
    pub fn verify(&self, introspection: &Value) -> Result<(), RegistryError> {
        let types = introspection
            .pointer("/__schema/types")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing `__schema.types`"))?;

        for object in &self.types {
            let introspected = types
                .iter()
                .find(|t| t.get("name").and_then(Value::as_str) == Some(object.name))
                .ok_or_else(|| RegistryError::MissingType {
                    name: object.name.to_string(),
                })?;
            let fields = introspected
                .get("fields")
                .and_then(Value::as_array)
                .ok_or_else(|| malformed(format!("`{}` has no field list", object.name)))?;

            for actual in fields {
                let name = actual
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| malformed(format!("unnamed field on `{}`", object.name)))?;
                if name.starts_with("__") {
                    continue;
                }
                let Some(declared) = object.field_by_name(name) else {
                    return Err(RegistryError::UndeclaredField {
                        type_name: object.name.to_string(),
                        field: name.to_string(),
                    });
                };
                let location = format!("{}.{}", object.name, name);
                compare_type(&location, &declared.field_type, actual.get("type"))?;
                verify_arguments(&location, declared, actual)?;
            }

            for declared in &object.fields {
                let present = fields
                    .iter()
                    .any(|f| f.get("name").and_then(Value::as_str) == Some(declared.name));
                if !present {
                    return Err(RegistryError::MissingField {
                        type_name: object.name.to_string(),
                        field: declared.name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Renders the registry in GraphQL schema definition language.
    pub fn to_sdl(&self) -> String {
        let mut sdl = String::new();
        for object in &self.types {
            sdl.push_str(&format!("type {} {{\n", object.name));
            for field in &object.fields {
                sdl.push_str("  ");
                sdl.push_str(field.name);
                if !field.arguments.is_empty() {
                    let args: Vec<String> = field
                        .arguments
                        .iter()
                        .map(|a| format!("{}: {}", a.name, a.arg_type))
                        .collect();
                    sdl.push_str(&format!("({})", args.join(", ")));
                }
                sdl.push_str(&format!(": {}\n", field.field_type));
            }
            sdl.push_str("}\n\n");
        }
        sdl.push_str(&format!("schema {{\n  query: {}\n", self.query));
        if let Some(mutation) = self.mutation {
            sdl.push_str(&format!("  mutation: {mutation}\n"));
        }
        sdl.push_str("}\n");
        sdl
    }
}

fn malformed(reason: impl Into<String>) -> RegistryError {
    RegistryError::MalformedIntrospection {
        reason: reason.into(),
    }
}

fn verify_arguments(
    location: &str,
    declared: &FieldDef,
    actual: &Value,
) -> Result<(), RegistryError> {
    let args = actual
        .get("args")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let actual_names: Vec<&str> = args
        .iter()
        .filter_map(|a| a.get("name").and_then(Value::as_str))
        .collect();
    let declared_names: Vec<&str> = declared.arguments.iter().map(|a| a.name).collect();
    if actual_names != declared_names {
        return Err(RegistryError::TypeMismatch {
            location: format!("{location} arguments"),
            declared: format!("({})", declared_names.join(", ")),
            actual: format!("({})", actual_names.join(", ")),
        });
    }

    for (arg, actual) in declared.arguments.iter().zip(args) {
        compare_type(
            &format!("{location}({})", arg.name),
            &arg.arg_type,
            actual.get("type"),
        )?;
    }
    Ok(())
}

fn compare_type(
    location: &str,
    declared: &FieldType,
    actual: Option<&Value>,
) -> Result<(), RegistryError> {
    let actual = actual
        .and_then(render_type_ref)
        .ok_or_else(|| malformed(format!("unreadable type for `{location}`")))?;
    let declared = declared.to_string();
    if declared != actual {
        return Err(RegistryError::TypeMismatch {
            location: location.to_string(),
            declared,
            actual,
        });
    }
    Ok(())
}

/// Turns an introspected `__Type` reference into its SDL spelling.
fn render_type_ref(type_ref: &Value) -> Option<String> {
    match type_ref.get("kind")?.as_str()? {
        "NON_NULL" => Some(format!("{}!", render_type_ref(type_ref.get("ofType")?)?)),
        "LIST" => Some(format!("[{}]", render_type_ref(type_ref.get("ofType")?)?)),
        _ => type_ref.get("name")?.as_str().map(str::to_string),
    }
}

/// Introspection query whose result [`TypeRegistry::verify`] understands.
pub const INTROSPECTION_QUERY: &str = r#"
query RegistryIntrospection {
  __schema {
    types {
      name
      kind
      fields {
        name
        args { name type { ...TypeRef } }
        type { ...TypeRef }
      }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType { kind name }
    }
  }
}
"#;

/// Object types and root fields of the tutorial catalogue.
pub fn tutorials_registry() -> Result<TypeRegistry, RegistryError> {
    use FieldType as T;

    let mut registry = TypeRegistry::new("Query", Some("Mutation"));

    registry.register(ObjectType::new("Comment").field(FieldDef::new("body", T::String.non_null())))?;

    registry.register(
        ObjectType::new("Author")
            .field(FieldDef::new("name", T::String.non_null()))
            .field(FieldDef::new(
                "tutorials",
                T::list_of(T::Int.non_null()).non_null(),
            )),
    )?;

    registry.register(
        ObjectType::new("Tutorial")
            .field(FieldDef::new("id", T::Int.non_null()))
            .field(FieldDef::new("title", T::String.non_null()))
            .field(FieldDef::new("author", T::Object("Author").non_null()))
            .field(FieldDef::new(
                "comments",
                T::list_of(T::Object("Comment").non_null()).non_null(),
            )),
    )?;

    registry.register(
        ObjectType::new("Query")
            .field(FieldDef::new("hello", T::String.non_null()))
            .field(FieldDef::new("tutorial", T::Object("Tutorial")).argument("id", T::Int))
            .field(FieldDef::new(
                "list",
                T::list_of(T::Object("Tutorial").non_null()).non_null(),
            )),
    )?;

    registry.register(
        ObjectType::new("Mutation").field(
            FieldDef::new("create", T::Object("Tutorial").non_null())
                .argument("title", T::String.non_null()),
        ),
    )?;

    registry.validate()?;
    Ok(registry)
}
