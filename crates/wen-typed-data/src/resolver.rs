//! Dependency resolution and canonical type strings.
//!
//! `encodeType` ordering: the primary type first, then every transitively
//! referenced struct sorted by name (byte order), each rendered as
//! `Name(type1 name1,type2 name2)` with no separator between blocks.

use std::collections::BTreeSet;

use crate::errors::TypedDataError;
use crate::registry::Field;

/// Read access to record definitions, shared by the registry and by batches
/// that are still being staged for registration.
pub(crate) trait SchemaView {
    fn fields(&self, name: &str) -> Option<&[Field]>;
}

/// All struct types reachable from `primary`, in first-discovery order.
///
/// `primary` itself is the first element. Each type appears once, so
/// self-referencing and mutually recursive schemas terminate.
pub(crate) fn dependencies<S: SchemaView + ?Sized>(
    schema: &S,
    primary: &str,
) -> Result<Vec<String>, TypedDataError> {
    if schema.fields(primary).is_none() {
        return Err(TypedDataError::UnknownType {
            name: primary.to_string(),
        });
    }
    let mut found = Vec::new();
    let mut seen = BTreeSet::new();
    visit(schema, primary, &mut found, &mut seen);
    Ok(found)
}

fn visit<S: SchemaView + ?Sized>(
    schema: &S,
    name: &str,
    found: &mut Vec<String>,
    seen: &mut BTreeSet<String>,
) {
    if seen.contains(name) {
        return;
    }
    let Some(fields) = schema.fields(name) else {
        return;
    };
    seen.insert(name.to_string());
    found.push(name.to_string());
    for field in fields {
        if let Some(dep) = field.field_type.struct_name() {
            visit(schema, dep, found, seen);
        }
    }
}

/// Canonical type string for `primary`.
pub(crate) fn encode_type<S: SchemaView + ?Sized>(
    schema: &S,
    primary: &str,
) -> Result<String, TypedDataError> {
    let mut deps = dependencies(schema, primary)?;
    deps.retain(|dep| dep != primary);
    deps.sort_unstable();

    let mut out = String::new();
    for name in std::iter::once(primary).chain(deps.iter().map(String::as_str)) {
        let fields = schema
            .fields(name)
            .ok_or_else(|| TypedDataError::UnknownType {
                name: name.to_string(),
            })?;
        render_type(&mut out, name, fields);
    }
    Ok(out)
}

fn render_type(out: &mut String, name: &str, fields: &[Field]) {
    out.push_str(name);
    out.push('(');
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&field.field_type.to_string());
        out.push(' ');
        out.push_str(&field.name);
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct MapSchema(BTreeMap<String, Vec<Field>>);

    impl SchemaView for MapSchema {
        fn fields(&self, name: &str) -> Option<&[Field]> {
            self.0.get(name).map(Vec::as_slice)
        }
    }

    fn schema(entries: Vec<(&str, Vec<(&str, &str)>)>) -> MapSchema {
        MapSchema(
            entries
                .into_iter()
                .map(|(name, fields)| {
                    let fields = fields
                        .into_iter()
                        .map(|(field, ty)| Field::parse(field, ty).unwrap())
                        .collect();
                    (name.to_string(), fields)
                })
                .collect(),
        )
    }

    #[test]
    fn dependencies_follow_discovery_order() {
        let s = schema(vec![
            ("Order", vec![("fee", "FeeRate"), ("items", "Listing[]")]),
            ("Listing", vec![("tokenId", "uint256"), ("fee", "FeeRate")]),
            ("FeeRate", vec![("rate", "uint16")]),
        ]);
        assert_eq!(
            dependencies(&s, "Order").unwrap(),
            vec!["Order", "FeeRate", "Listing"]
        );
    }

    #[test]
    fn cycles_terminate_with_each_type_once() {
        let s = schema(vec![
            ("Node", vec![("children", "Node[]"), ("edge", "Edge")]),
            ("Edge", vec![("to", "Node")]),
        ]);
        assert_eq!(dependencies(&s, "Node").unwrap(), vec!["Node", "Edge"]);
        assert_eq!(
            encode_type(&s, "Edge").unwrap(),
            "Edge(Node to)Node(Node[] children,Edge edge)"
        );
    }

    #[test]
    fn unknown_primary_is_an_error() {
        let s = schema(vec![]);
        assert_eq!(
            dependencies(&s, "Order").unwrap_err(),
            TypedDataError::UnknownType {
                name: "Order".into()
            }
        );
    }

    #[test]
    fn referenced_types_are_sorted_after_primary() {
        let s = schema(vec![
            (
                "Mail",
                vec![("to", "Person"), ("file", "Blob"), ("contents", "string")],
            ),
            ("Person", vec![("name", "string")]),
            ("Blob", vec![("data", "bytes")]),
        ]);
        assert_eq!(
            encode_type(&s, "Mail").unwrap(),
            "Mail(Person to,Blob file,string contents)Blob(bytes data)Person(string name)"
        );
    }
}
