//! Documentation comment ids for declarations.
//!
//! Doc ids are the canonical string names used by allow/deny lists and
//! baselines: `T:` for types, `M:` for methods/constructors/accessors, `F:` for
//! fields, `P:` for properties and `E:` for events.

use crate::model::{MemberDefinition, MemberKind, TypeDefinition};

/// Returns the doc id of a type, e.g. ``T:System.Collections.Generic.List`1``.
#[must_use]
pub fn type_doc_id(ty: &TypeDefinition) -> String {
    format!("T:{}", type_doc_name(ty))
}

/// Returns the doc id of a member, e.g. `M:N.T.#ctor(System.Int32)`.
#[must_use]
pub fn member_doc_id(containing_type: &TypeDefinition, member: &MemberDefinition) -> String {
    let prefix = match member.kind {
        MemberKind::Field => "F",
        MemberKind::Property => "P",
        MemberKind::Event => "E",
        MemberKind::Constructor | MemberKind::Method | MemberKind::Accessor => "M",
    };

    let mut id = format!("{prefix}:{}.", type_doc_name(containing_type));
    id.push_str(&member_doc_name(&member.name));
    if !member.generic_parameters.is_empty() {
        id.push_str("``");
        id.push_str(&member.generic_parameters.len().to_string());
    }
    if !member.parameters.is_empty() {
        let params: Vec<String> = member
            .parameters
            .iter()
            .map(|p| {
                let mut name = reference_doc_name(&p.parameter_type.name);
                if p.is_by_ref {
                    name.push('@');
                }
                name
            })
            .collect();
        id.push('(');
        id.push_str(&params.join(","));
        id.push(')');
    }
    if matches!(member.name.as_str(), "op_Implicit" | "op_Explicit") {
        if let Some(ret) = &member.return_type {
            id.push('~');
            id.push_str(&reference_doc_name(&ret.name));
        }
    }
    id
}

/// Doc ids of the enclosing types of a nested type, outermost first.
#[must_use]
pub fn declaring_type_doc_ids(ty: &TypeDefinition) -> Vec<String> {
    let mut name = namespace_prefix(ty);
    ty.declaring_types
        .iter()
        .map(|outer| {
            push_segment(&mut name, &outer.name, outer.arity);
            let id = format!("T:{name}");
            name.push('.');
            id
        })
        .collect()
}

/// Dotted, arity-suffixed name of a type definition without the `T:` prefix.
fn type_doc_name(ty: &TypeDefinition) -> String {
    let mut name = namespace_prefix(ty);
    for outer in &ty.declaring_types {
        push_segment(&mut name, &outer.name, outer.arity);
        name.push('.');
    }
    push_segment(&mut name, &ty.name, ty.arity());
    name
}

fn namespace_prefix(ty: &TypeDefinition) -> String {
    if ty.namespace.is_empty() {
        String::new()
    } else {
        format!("{}.", ty.namespace)
    }
}

fn push_segment(name: &mut String, simple_name: &str, arity: usize) {
    name.push_str(simple_name);
    if arity > 0 {
        name.push('`');
        name.push_str(&arity.to_string());
    }
}

fn member_doc_name(name: &str) -> String {
    name.replace('.', "#")
}

/// Converts a referenced type name such as `List<System.Int32>` to the
/// doc-id spelling `List{System.Int32}`.
fn reference_doc_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '<' => '{',
            '>' => '}',
            other => other,
        })
        .collect()
}
