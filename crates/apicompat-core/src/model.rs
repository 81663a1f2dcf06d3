//! Metadata object model consumed by the differencing engine.
//!
//! These types describe the public surface of loaded assemblies. They are the
//! shape an external metadata loader hands to the engine; nothing in this crate
//! parses binary metadata. Every cross-declaration link (base types, interfaces,
//! parameter types, attribute types) is a by-name [`TypeRef`], so the model is a
//! plain tree and two independently loaded sets can be correlated structurally.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::docid;

/// Accessibility of a type or member, ordered from narrowest to widest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// Visible only inside the declaring type.
    Private,
    /// `private protected`.
    FamilyAndAssembly,
    /// `internal`.
    Assembly,
    /// `protected`.
    Family,
    /// `protected internal`.
    FamilyOrAssembly,
    /// `public`.
    #[default]
    Public,
}

impl Visibility {
    /// Returns true if code outside the declaring assembly can reach the element.
    #[must_use]
    pub fn is_visible_outside_assembly(self) -> bool {
        matches!(self, Self::Public | Self::Family | Self::FamilyOrAssembly)
    }

    /// Returns true for the two `protected` flavours reachable by derived types
    /// in other assemblies.
    #[must_use]
    pub fn is_family(self) -> bool {
        matches!(self, Self::Family | Self::FamilyOrAssembly)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Private => "Private",
            Self::FamilyAndAssembly => "FamilyAndAssembly",
            Self::Assembly => "Assembly",
            Self::Family => "Family",
            Self::FamilyOrAssembly => "FamilyOrAssembly",
            Self::Public => "Public",
        };
        f.write_str(name)
    }
}

/// Fundamental classification of a type definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Interface type.
    Interface,
    /// Delegate type.
    Delegate,
    /// Enumeration.
    Enum,
    /// Value type.
    Struct,
    /// Reference type.
    #[default]
    Class,
}

/// Kind of a type member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Field (including enum values).
    Field,
    /// Property.
    Property,
    /// Event.
    Event,
    /// Instance or static constructor.
    Constructor,
    /// Method.
    #[default]
    Method,
    /// Property or event accessor method.
    Accessor,
}

/// Every kind of declaration the engine distinguishes.
///
/// The order matters to callers that sort declarations: infrastructure kinds
/// (accessors) come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    /// Namespace.
    Namespace,
    /// Interface type.
    Interface,
    /// Delegate type.
    Delegate,
    /// Enumeration type.
    Enum,
    /// Value type.
    Struct,
    /// Reference type.
    Class,
    /// Field.
    Field,
    /// Property.
    Property,
    /// Event.
    Event,
    /// Constructor.
    Constructor,
    /// Method.
    Method,
    /// Accessor.
    Accessor,
}

impl From<TypeKind> for DeclarationKind {
    fn from(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Interface => Self::Interface,
            TypeKind::Delegate => Self::Delegate,
            TypeKind::Enum => Self::Enum,
            TypeKind::Struct => Self::Struct,
            TypeKind::Class => Self::Class,
        }
    }
}

impl From<MemberKind> for DeclarationKind {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Field => Self::Field,
            MemberKind::Property => Self::Property,
            MemberKind::Event => Self::Event,
            MemberKind::Constructor => Self::Constructor,
            MemberKind::Method => Self::Method,
            MemberKind::Accessor => Self::Accessor,
        }
    }
}

/// A by-name reference to a type.
///
/// Equality and hashing only consider [`TypeRef::name`], which makes references
/// from two different loads of "the same" type compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TypeRefRepr")]
pub struct TypeRef {
    /// Fully qualified name, e.g. `System.Collections.Generic.IList<T>`.
    pub name: String,
    /// Whether the referenced type can be seen outside its assembly.
    pub visible_outside_assembly: bool,
}

impl TypeRef {
    /// Creates a reference to a publicly visible type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible_outside_assembly: true,
        }
    }

    /// Creates a reference to a type that is internal to its assembly.
    #[must_use]
    pub fn internal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible_outside_assembly: false,
        }
    }

    /// Returns the fully qualified name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Serialized form of [`TypeRef`]: either a bare name or a table.
#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default = "default_true")]
        visible_outside_assembly: bool,
    },
}

impl From<TypeRefRepr> for TypeRef {
    fn from(repr: TypeRefRepr) -> Self {
        match repr {
            TypeRefRepr::Name(name) => Self::new(name),
            TypeRefRepr::Full {
                name,
                visible_outside_assembly,
            } => Self {
                name,
                visible_outside_assembly,
            },
        }
    }
}

fn default_true() -> bool {
    true
}

/// A custom attribute applied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomAttribute {
    /// The attribute type.
    #[serde(rename = "type")]
    pub attribute_type: TypeRef,
    /// Constructor and named arguments, already rendered as strings.
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl CustomAttribute {
    /// Creates an attribute application without arguments.
    #[must_use]
    pub fn new(attribute_type: impl Into<String>) -> Self {
        Self {
            attribute_type: TypeRef::new(attribute_type),
            arguments: Vec::new(),
        }
    }

    /// Adds a rendered argument.
    #[must_use]
    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Returns the doc id of the attribute type.
    #[must_use]
    pub fn doc_id(&self) -> String {
        format!("T:{}", self.attribute_type.name)
    }

    /// Returns true if this applies the named attribute type.
    #[must_use]
    pub fn is(&self, attribute_type: &str) -> bool {
        self.attribute_type.name == attribute_type
    }
}

impl fmt::Display for CustomAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", self.attribute_type)?;
        if !self.arguments.is_empty() {
            write!(f, "({})", self.arguments.join(", "))?;
        }
        f.write_str("]")
    }
}

/// Variance annotation on a generic parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variance {
    /// Invariant.
    #[default]
    NonVariant,
    /// `out T`.
    Covariant,
    /// `in T`.
    Contravariant,
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NonVariant => "NonVariant",
            Self::Covariant => "Covariant",
            Self::Contravariant => "Contravariant",
        };
        f.write_str(name)
    }
}

/// A generic parameter of a type or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericParameter {
    /// Parameter name, e.g. `T`.
    pub name: String,
    /// Declared variance.
    pub variance: Variance,
    /// `where T : struct`.
    pub must_be_value_type: bool,
    /// `where T : class`.
    pub must_be_reference_type: bool,
    /// `where T : new()`.
    pub must_have_default_constructor: bool,
    /// Explicit type constraints.
    pub constraints: Vec<TypeRef>,
}

impl GenericParameter {
    /// Creates an unconstrained, invariant parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the variance.
    #[must_use]
    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    /// Adds an explicit type constraint.
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraints.push(TypeRef::new(constraint));
        self
    }

    /// Requires a value type.
    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.must_be_value_type = true;
        self
    }

    /// Requires a reference type.
    #[must_use]
    pub fn reference_type(mut self) -> Self {
        self.must_be_reference_type = true;
        self
    }

    /// Requires a public parameterless constructor.
    #[must_use]
    pub fn default_constructor(mut self) -> Self {
        self.must_have_default_constructor = true;
        self
    }
}

/// Passing convention of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterModifier {
    /// Passed by value.
    In,
    /// Passed by reference.
    Ref,
    /// Passed by reference for output only.
    Out,
}

impl fmt::Display for ParameterModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::In => "in",
            Self::Ref => "ref",
            Self::Out => "out",
        };
        f.write_str(name)
    }
}

/// A method, delegate, or indexer parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    #[serde(rename = "type")]
    pub parameter_type: TypeRef,
    /// Passed by reference.
    #[serde(default)]
    pub is_by_ref: bool,
    /// Marked `[Out]`.
    #[serde(default)]
    pub is_out: bool,
    /// Marked `[In]`.
    #[serde(default)]
    pub is_in: bool,
    /// Required/optional custom modifiers such as `IsConst` or `IsVolatile`.
    #[serde(default)]
    pub custom_modifiers: Vec<TypeRef>,
}

impl Parameter {
    /// Creates a by-value parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type: TypeRef::new(parameter_type),
            is_by_ref: false,
            is_out: false,
            is_in: false,
            custom_modifiers: Vec::new(),
        }
    }

    /// Makes this a `ref` parameter.
    #[must_use]
    pub fn by_ref(mut self) -> Self {
        self.is_by_ref = true;
        self
    }

    /// Makes this an `out` parameter.
    #[must_use]
    pub fn out(mut self) -> Self {
        self.is_by_ref = true;
        self.is_out = true;
        self
    }

    /// Adds a custom modifier.
    #[must_use]
    pub fn with_custom_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.custom_modifiers.push(TypeRef::new(modifier));
        self
    }

    /// Classifies the passing convention.
    #[must_use]
    pub fn modifier(&self) -> ParameterModifier {
        if self.is_out && !self.is_in && self.is_by_ref {
            ParameterModifier::Out
        } else if self.is_by_ref {
            ParameterModifier::Ref
        } else {
            ParameterModifier::In
        }
    }

    /// Returns true if any custom modifier is present.
    #[must_use]
    pub fn is_modified(&self) -> bool {
        !self.custom_modifiers.is_empty()
    }
}

/// A compile-time constant attached to a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstantValue {
    /// `System.Boolean`.
    Boolean(bool),
    /// `System.Char`.
    Char(char),
    /// `System.SByte`.
    SByte(i8),
    /// `System.Byte`.
    Byte(u8),
    /// `System.Int16`.
    Int16(i16),
    /// `System.UInt16`.
    UInt16(u16),
    /// `System.Int32`.
    Int32(i32),
    /// `System.UInt32`.
    UInt32(u32),
    /// `System.Int64`.
    Int64(i64),
    /// `System.UInt64`.
    UInt64(u64),
    /// `System.Single`.
    Single(f32),
    /// `System.Double`.
    Double(f64),
    /// `System.String`.
    String(String),
    /// The null reference.
    Null,
}

impl ConstantValue {
    /// Returns the name of the constant's runtime type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "System.Boolean",
            Self::Char(_) => "System.Char",
            Self::SByte(_) => "System.SByte",
            Self::Byte(_) => "System.Byte",
            Self::Int16(_) => "System.Int16",
            Self::UInt16(_) => "System.UInt16",
            Self::Int32(_) => "System.Int32",
            Self::UInt32(_) => "System.UInt32",
            Self::Int64(_) => "System.Int64",
            Self::UInt64(_) => "System.UInt64",
            Self::Single(_) => "System.Single",
            Self::Double(_) => "System.Double",
            Self::String(_) => "System.String",
            Self::Null => "System.Object",
        }
    }

    /// Canonical string form, independent of the declared integral width.
    ///
    /// `Int32(1)` and `Int64(1)` both render as `"1"`.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Boolean(true) => "True".to_string(),
            Self::Boolean(false) => "False".to_string(),
            Self::Char(c) => c.to_string(),
            Self::SByte(v) => v.to_string(),
            Self::Byte(v) => v.to_string(),
            Self::Int16(v) => v.to_string(),
            Self::UInt16(v) => v.to_string(),
            Self::Int32(v) => v.to_string(),
            Self::UInt32(v) => v.to_string(),
            Self::Int64(v) => v.to_string(),
            Self::UInt64(v) => v.to_string(),
            Self::Single(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::String(s) => s.clone(),
            Self::Null => String::new(),
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_string())
    }
}

/// A member of a type: field, property, event, constructor, method, or accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDefinition {
    /// Simple member name (`.ctor` for constructors).
    pub name: String,
    /// Member kind.
    #[serde(default)]
    pub kind: MemberKind,
    /// Accessibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Static member.
    #[serde(default)]
    pub is_static: bool,
    /// Abstract member.
    #[serde(default)]
    pub is_abstract: bool,
    /// Virtual member (abstract members are virtual too).
    #[serde(default)]
    pub is_virtual: bool,
    /// Sealed override / final virtual.
    #[serde(default)]
    pub is_sealed: bool,
    /// Return type for methods, field type for fields, property/event type.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Parameters of methods, constructors and indexers.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Generic parameters of generic methods.
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    /// Constant value of literal fields.
    #[serde(default)]
    pub constant: Option<ConstantValue>,
    /// Applied custom attributes.
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
}

impl MemberDefinition {
    /// Creates a public member of the given kind.
    #[must_use]
    pub fn new(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            is_virtual: false,
            is_sealed: false,
            return_type: None,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            constant: None,
            attributes: Vec::new(),
        }
    }

    /// Creates a public method returning `System.Void`.
    #[must_use]
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(MemberKind::Method, name).returning("System.Void")
    }

    /// Creates a public instance constructor.
    #[must_use]
    pub fn constructor() -> Self {
        Self::new(MemberKind::Constructor, ".ctor")
    }

    /// Creates a public field of the given type.
    #[must_use]
    pub fn field(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Field, name).returning(field_type)
    }

    /// Creates a public literal field, as found on enums.
    #[must_use]
    pub fn literal(name: impl Into<String>, value: ConstantValue) -> Self {
        let mut field = Self::field(name, value.type_name());
        field.is_static = true;
        field.constant = Some(value);
        field
    }

    /// Creates a public property of the given type.
    #[must_use]
    pub fn property(name: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Property, name).returning(property_type)
    }

    /// Creates a public event of the given handler type.
    #[must_use]
    pub fn event(name: impl Into<String>, handler_type: impl Into<String>) -> Self {
        Self::new(MemberKind::Event, name).returning(handler_type)
    }

    /// Sets the return (or field/property) type.
    #[must_use]
    pub fn returning(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(TypeRef::new(return_type));
        self
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a generic parameter.
    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameter) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    /// Adds a custom attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: CustomAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the member virtual.
    #[must_use]
    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Marks the member abstract (and therefore virtual).
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self.is_virtual = true;
        self
    }

    /// Marks the member sealed.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Marks the member static.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Returns true if derived types can no longer override this member.
    #[must_use]
    pub fn is_effectively_sealed(&self) -> bool {
        !self.is_virtual || self.is_sealed
    }

    /// Returns true if the named attribute is applied.
    #[must_use]
    pub fn has_attribute(&self, attribute_type: &str) -> bool {
        self.attributes.iter().any(|a| a.is(attribute_type))
    }
}

/// One enclosing type in the nesting chain of a nested type.
///
/// Arity is part of the identity: `Outer.Inner` and `Outer<T>.Inner` are
/// distinct types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DeclaringTypeRepr")]
pub struct DeclaringType {
    /// Simple name without generic arity.
    pub name: String,
    /// Number of generic parameters.
    pub arity: usize,
    /// Accessibility of the enclosing type.
    pub visibility: Visibility,
}

impl DeclaringType {
    /// Creates a public, non-generic enclosing type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arity: 0,
            visibility: Visibility::Public,
        }
    }

    /// Sets the generic arity.
    #[must_use]
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

impl From<&str> for DeclaringType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for DeclaringType {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&TypeDefinition> for DeclaringType {
    fn from(ty: &TypeDefinition) -> Self {
        Self {
            name: ty.name.clone(),
            arity: ty.arity(),
            visibility: ty.visibility,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DeclaringTypeRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        arity: usize,
        #[serde(default)]
        visibility: Visibility,
    },
}

impl From<DeclaringTypeRepr> for DeclaringType {
    fn from(repr: DeclaringTypeRepr) -> Self {
        match repr {
            DeclaringTypeRepr::Name(name) => Self::new(name),
            DeclaringTypeRepr::Full {
                name,
                arity,
                visibility,
            } => Self {
                name,
                arity,
                visibility,
            },
        }
    }
}

/// A type definition together with its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    /// Containing namespace (empty for the global namespace).
    #[serde(default)]
    pub namespace: String,
    /// Simple name without generic arity.
    pub name: String,
    /// Enclosing types for nested types, outermost first.
    #[serde(default)]
    pub declaring_types: Vec<DeclaringType>,
    /// Classification.
    #[serde(default)]
    pub kind: TypeKind,
    /// Accessibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Abstract type (static classes are abstract and sealed).
    #[serde(default)]
    pub is_abstract: bool,
    /// Sealed type.
    #[serde(default)]
    pub is_sealed: bool,
    /// `ref struct`.
    #[serde(default)]
    pub is_ref_like: bool,
    /// `readonly struct`.
    #[serde(default)]
    pub is_read_only: bool,
    /// The type is forwarded to another assembly rather than defined here.
    #[serde(default)]
    pub is_forwarded: bool,
    /// Base type chain, nearest base first.
    #[serde(default)]
    pub base_types: Vec<TypeRef>,
    /// All implemented interfaces, including inherited ones.
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    /// Generic parameters.
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    /// Underlying integral type of enums.
    #[serde(default)]
    pub enum_underlying_type: Option<TypeRef>,
    /// Members in declaration order.
    #[serde(default)]
    pub members: Vec<MemberDefinition>,
    /// Applied custom attributes.
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
}

impl TypeDefinition {
    /// Creates a public, top-level type.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            declaring_types: Vec::new(),
            kind,
            visibility: Visibility::Public,
            is_abstract: false,
            is_sealed: false,
            is_ref_like: false,
            is_read_only: false,
            is_forwarded: false,
            base_types: Vec::new(),
            interfaces: Vec::new(),
            generic_parameters: Vec::new(),
            enum_underlying_type: None,
            members: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Creates a public class deriving from `System.Object`.
    #[must_use]
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class).with_base_type("System.Object")
    }

    /// Creates a public struct.
    #[must_use]
    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut ty = Self::new(namespace, name, TypeKind::Struct)
            .with_base_type("System.ValueType")
            .with_base_type("System.Object");
        ty.is_sealed = true;
        ty
    }

    /// Creates a public interface.
    #[must_use]
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut ty = Self::new(namespace, name, TypeKind::Interface);
        ty.is_abstract = true;
        ty
    }

    /// Creates a public enum with the given underlying type.
    #[must_use]
    pub fn enumeration(
        namespace: impl Into<String>,
        name: impl Into<String>,
        underlying_type: impl Into<String>,
    ) -> Self {
        let mut ty = Self::new(namespace, name, TypeKind::Enum)
            .with_base_type("System.Enum")
            .with_base_type("System.ValueType")
            .with_base_type("System.Object");
        ty.is_sealed = true;
        ty.enum_underlying_type = Some(TypeRef::new(underlying_type));
        ty
    }

    /// Creates a public delegate with the given `Invoke` signature.
    #[must_use]
    pub fn delegate(
        namespace: impl Into<String>,
        name: impl Into<String>,
        invoke: MemberDefinition,
    ) -> Self {
        let mut ty = Self::new(namespace, name, TypeKind::Delegate)
            .with_base_type("System.MulticastDelegate")
            .with_base_type("System.Delegate")
            .with_base_type("System.Object");
        ty.is_sealed = true;
        let mut invoke = invoke;
        invoke.name = "Invoke".to_string();
        invoke.is_virtual = true;
        ty.members.push(invoke);
        ty
    }

    /// Nests this type inside the given enclosing types, outermost first.
    #[must_use]
    pub fn nested_in<I, S>(mut self, declaring_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DeclaringType>,
    {
        self.declaring_types = declaring_types.into_iter().map(Into::into).collect();
        self
    }

    /// Nests this type directly inside `outer`, keeping the outer nesting chain.
    #[must_use]
    pub fn nested_in_type(mut self, outer: &TypeDefinition) -> Self {
        self.declaring_types = outer.declaring_types.clone();
        self.declaring_types.push(DeclaringType::from(outer));
        self
    }

    /// Sets the accessibility.
    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Appends a base type to the chain.
    #[must_use]
    pub fn with_base_type(mut self, base_type: impl Into<String>) -> Self {
        self.base_types.push(TypeRef::new(base_type));
        self
    }

    /// Replaces the base type chain.
    #[must_use]
    pub fn with_base_types<I, S>(mut self, base_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_types = base_types
            .into_iter()
            .map(|b| TypeRef::new(b))
            .collect();
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn with_interface(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Adds a generic parameter.
    #[must_use]
    pub fn with_generic_parameter(mut self, parameter: GenericParameter) -> Self {
        self.generic_parameters.push(parameter);
        self
    }

    /// Adds a member.
    #[must_use]
    pub fn with_member(mut self, member: MemberDefinition) -> Self {
        self.members.push(member);
        self
    }

    /// Adds a custom attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: CustomAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the type abstract.
    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Marks the type sealed.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Marks the type as forwarded to another assembly.
    #[must_use]
    pub fn forwarded(mut self) -> Self {
        self.is_forwarded = true;
        self
    }

    /// Number of generic parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.generic_parameters.len()
    }

    /// Fully qualified display name, e.g. `System.Collections.Generic.List<T>`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut name = String::new();
        if !self.namespace.is_empty() {
            name.push_str(&self.namespace);
            name.push('.');
        }
        for outer in &self.declaring_types {
            name.push_str(&outer.name);
            if outer.arity > 0 {
                name.push('`');
                name.push_str(&outer.arity.to_string());
            }
            name.push('.');
        }
        name.push_str(&self.name);
        if !self.generic_parameters.is_empty() {
            let params: Vec<&str> = self
                .generic_parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            name.push('<');
            name.push_str(&params.join(", "));
            name.push('>');
        }
        name
    }

    /// Canonical doc id (`T:Namespace.Outer.Name`1`).
    #[must_use]
    pub fn doc_id(&self) -> String {
        docid::type_doc_id(self)
    }

    /// Returns true if the type is an interface.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns true if the type is a delegate.
    #[must_use]
    pub fn is_delegate(&self) -> bool {
        self.kind == TypeKind::Delegate
    }

    /// Returns true if the type is an enum.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Returns true if the type can be seen outside its assembly: the type
    /// and every enclosing type must be.
    #[must_use]
    pub fn is_visible_outside_assembly(&self) -> bool {
        self.visibility.is_visible_outside_assembly()
            && self
                .declaring_types
                .iter()
                .all(|outer| outer.visibility.is_visible_outside_assembly())
    }

    /// Returns true if no type outside the assembly can derive from this one.
    ///
    /// Besides `sealed`, a class whose instance constructors are all hidden
    /// from other assemblies cannot be subclassed either.
    #[must_use]
    pub fn is_effectively_sealed(&self) -> bool {
        if self.is_sealed {
            return true;
        }
        if self.kind != TypeKind::Class {
            return false;
        }
        let mut constructors = self
            .members
            .iter()
            .filter(|m| m.kind == MemberKind::Constructor && !m.is_static)
            .peekable();
        if constructors.peek().is_none() {
            // No constructor information: treat as an open class.
            return false;
        }
        !constructors.any(|c| c.visibility.is_visible_outside_assembly())
    }

    /// The `Invoke` method of a delegate.
    #[must_use]
    pub fn invoke_method(&self) -> Option<&MemberDefinition> {
        self.members
            .iter()
            .find(|m| m.kind == MemberKind::Method && m.name == "Invoke")
    }

    /// Returns true if the named attribute is applied.
    #[must_use]
    pub fn has_attribute(&self, attribute_type: &str) -> bool {
        self.attributes.iter().any(|a| a.is(attribute_type))
    }

    /// Iterates over members together with this type as their container.
    pub fn member_refs(&self) -> impl Iterator<Item = MemberRef<'_>> {
        self.members.iter().map(move |member| MemberRef {
            member,
            containing_type: self,
        })
    }
}

/// A lightweight handle to a member and its containing type.
#[derive(Debug, Clone, Copy)]
pub struct MemberRef<'a> {
    /// The member definition.
    pub member: &'a MemberDefinition,
    /// The type that declares the member.
    pub containing_type: &'a TypeDefinition,
}

impl<'a> MemberRef<'a> {
    /// Creates a handle.
    #[must_use]
    pub fn new(containing_type: &'a TypeDefinition, member: &'a MemberDefinition) -> Self {
        Self {
            member,
            containing_type,
        }
    }

    /// Fully qualified display name, e.g. `Ns.Type.Method(System.Int32)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut name = format!("{}.{}", self.containing_type.full_name(), self.member.name);
        if !self.member.generic_parameters.is_empty() {
            let params: Vec<&str> = self
                .member
                .generic_parameters
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            name.push_str(&format!("<{}>", params.join(", ")));
        }
        if matches!(
            self.member.kind,
            MemberKind::Method | MemberKind::Constructor | MemberKind::Accessor
        ) || !self.member.parameters.is_empty()
        {
            let params: Vec<&str> = self
                .member
                .parameters
                .iter()
                .map(|p| p.parameter_type.name.as_str())
                .collect();
            name.push_str(&format!("({})", params.join(", ")));
        }
        name
    }

    /// Canonical doc id (`M:Ns.Type.Method(System.Int32)`).
    #[must_use]
    pub fn doc_id(&self) -> String {
        docid::member_doc_id(self.containing_type, self.member)
    }

    /// Declaration kind of the member.
    #[must_use]
    pub fn kind(&self) -> DeclarationKind {
        self.member.kind.into()
    }

    /// Returns true for members that only exist to support another declaration:
    /// accessors, and the synthesized members of delegates.
    ///
    /// Enum fields are infrastructure in the sense that they are rarely
    /// interesting on their own, but the enum value rule needs them, so they
    /// are not reported here.
    #[must_use]
    pub fn is_infrastructure(&self) -> bool {
        self.member.kind == MemberKind::Accessor || self.containing_type.is_delegate()
    }
}

/// A namespace and the types declared (or forwarded) in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDefinition {
    /// Dotted namespace name; empty for the global namespace.
    #[serde(default)]
    pub name: String,
    /// Types in declaration order.
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

impl NamespaceDefinition {
    /// Creates an empty namespace.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    /// Adds a type, forcing its namespace to this one.
    #[must_use]
    pub fn with_type(mut self, mut ty: TypeDefinition) -> Self {
        ty.namespace.clone_from(&self.name);
        self.types.push(ty);
        self.resolve_declaring_types();
        self
    }

    /// Copies the accessibility of enclosing types defined in this namespace
    /// onto the nesting chains that name them. Enclosing types without a
    /// definition here keep the accessibility they were declared with.
    pub fn resolve_declaring_types(&mut self) {
        let visibility: HashMap<String, Visibility> = self
            .types
            .iter()
            .map(|t| (t.doc_id(), t.visibility))
            .collect();
        for ty in &mut self.types {
            let outer_ids = docid::declaring_type_doc_ids(ty);
            for (outer, id) in ty.declaring_types.iter_mut().zip(outer_ids) {
                if let Some(declared) = visibility.get(&id) {
                    outer.visibility = *declared;
                }
            }
        }
    }

    /// Iterates over the types, optionally including forwarded ones.
    pub fn types(&self, include_forwarded: bool) -> impl Iterator<Item = &TypeDefinition> {
        self.types
            .iter()
            .filter(move |t| include_forwarded || !t.is_forwarded)
    }
}

/// A loaded assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyDefinition {
    /// Simple assembly name.
    pub name: String,
    /// Assembly version, if known.
    #[serde(default)]
    pub version: Option<String>,
    /// Namespaces in declaration order.
    #[serde(default)]
    pub namespaces: Vec<NamespaceDefinition>,
    /// Assembly-level attributes.
    #[serde(default)]
    pub attributes: Vec<CustomAttribute>,
}

impl AssemblyDefinition {
    /// Creates an empty assembly.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: NamespaceDefinition) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Adds a type, creating its namespace on first use.
    #[must_use]
    pub fn with_type(mut self, ty: TypeDefinition) -> Self {
        match self.namespaces.iter_mut().find(|n| n.name == ty.namespace) {
            Some(ns) => {
                ns.types.push(ty);
                ns.resolve_declaring_types();
            }
            None => {
                let ns = NamespaceDefinition::new(ty.namespace.clone()).with_type(ty);
                self.namespaces.push(ns);
            }
        }
        self
    }
}

/// A named collection of assemblies forming one side of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblySet {
    /// Name used in report headers, e.g. a directory or a package id.
    pub name: String,
    /// The assemblies.
    #[serde(default)]
    pub assemblies: Vec<AssemblyDefinition>,
}

impl AssemblySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assemblies: Vec::new(),
        }
    }

    /// Adds an assembly.
    #[must_use]
    pub fn with_assembly(mut self, assembly: AssemblyDefinition) -> Self {
        self.assemblies.push(assembly);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ref_equality_ignores_visibility() {
        assert_eq!(TypeRef::new("A.B"), TypeRef::internal("A.B"));
        assert_ne!(TypeRef::new("A.B"), TypeRef::new("A.C"));
    }

    #[test]
    fn type_ref_deserializes_from_string_or_table() {
        let plain: TypeRef = serde_json::from_str("\"System.Object\"").unwrap();
        assert!(plain.visible_outside_assembly);

        let table: TypeRef =
            serde_json::from_str(r#"{"name": "N.IHidden", "visible_outside_assembly": false}"#)
                .unwrap();
        assert_eq!(table.name, "N.IHidden");
        assert!(!table.visible_outside_assembly);
    }

    #[test]
    fn constant_canonical_string_ignores_width() {
        assert_eq!(
            ConstantValue::Int32(1).canonical_string(),
            ConstantValue::Int64(1).canonical_string()
        );
        assert_eq!(ConstantValue::Boolean(true).canonical_string(), "True");
    }

    #[test]
    fn parameter_modifier_classification() {
        assert_eq!(Parameter::new("x", "System.Int32").modifier(), ParameterModifier::In);
        assert_eq!(
            Parameter::new("x", "System.Int32").by_ref().modifier(),
            ParameterModifier::Ref
        );
        assert_eq!(
            Parameter::new("x", "System.Int32").out().modifier(),
            ParameterModifier::Out
        );
    }

    #[test]
    fn full_name_includes_nesting_and_generics() {
        let ty = TypeDefinition::class("N", "Inner")
            .nested_in(["Outer"])
            .with_generic_parameter(GenericParameter::new("T"));
        assert_eq!(ty.full_name(), "N.Outer.Inner<T>");
    }

    #[test]
    fn full_name_keeps_outer_arity() {
        let outer = TypeDefinition::class("N", "Outer")
            .with_generic_parameter(GenericParameter::new("T"));
        let inner = TypeDefinition::class("N", "Inner").nested_in_type(&outer);
        assert_eq!(inner.full_name(), "N.Outer`1.Inner");
    }

    #[test]
    fn nested_type_inherits_hidden_enclosing_visibility() {
        let hidden = TypeDefinition::class("N", "Hidden").with_visibility(Visibility::Assembly);
        let helper = TypeDefinition::class("N", "Helper").nested_in_type(&hidden);
        assert!(helper.visibility.is_visible_outside_assembly());
        assert!(!helper.is_visible_outside_assembly());

        let deep = TypeDefinition::class("N", "Deep").nested_in_type(&helper);
        assert!(!deep.is_visible_outside_assembly());
    }

    #[test]
    fn namespace_resolves_enclosing_visibility_from_definitions() {
        // Declared by bare name, as a surface file would spell it.
        let ns = NamespaceDefinition::new("N")
            .with_type(TypeDefinition::class("N", "Helper").nested_in(["Hidden"]))
            .with_type(TypeDefinition::class("N", "Hidden").with_visibility(Visibility::Family))
            .with_type(TypeDefinition::class("N", "Inner").nested_in(["Outer"]))
            .with_type(
                TypeDefinition::class("N", "Outer")
                    .with_generic_parameter(GenericParameter::new("T"))
                    .with_visibility(Visibility::Assembly),
            );

        assert_eq!(ns.types[0].declaring_types[0].visibility, Visibility::Family);
        assert!(ns.types[0].is_visible_outside_assembly());
        // `Outer<T>` is a different type from the `Outer` that `Inner` names.
        assert_eq!(ns.types[2].declaring_types[0].visibility, Visibility::Public);
    }

    #[test]
    fn declaring_type_deserializes_from_string_or_table() {
        let ty: TypeDefinition = serde_json::from_str(
            r#"{"name": "Inner", "namespace": "N", "declaring_types": ["A", {"name": "B", "arity": 2, "visibility": "assembly"}]}"#,
        )
        .unwrap();
        assert_eq!(ty.declaring_types[0], DeclaringType::new("A"));
        assert_eq!(
            ty.declaring_types[1],
            DeclaringType::new("B").with_arity(2).with_visibility(Visibility::Assembly)
        );
        assert!(!ty.is_visible_outside_assembly());
    }

    #[test]
    fn class_with_only_internal_constructors_is_effectively_sealed() {
        let open = TypeDefinition::class("N", "Open").with_member(MemberDefinition::constructor());
        let closed = TypeDefinition::class("N", "Closed").with_member(
            MemberDefinition::constructor().with_visibility(Visibility::Assembly),
        );
        assert!(!open.is_effectively_sealed());
        assert!(closed.is_effectively_sealed());
        assert!(!TypeDefinition::class("N", "NoCtorInfo").is_effectively_sealed());
    }

    #[test]
    fn member_full_name_renders_parameters() {
        let ty = TypeDefinition::class("N", "T").with_member(
            MemberDefinition::method("M").with_parameter(Parameter::new("x", "System.Int32")),
        );
        let member = ty.member_refs().next().unwrap();
        assert_eq!(member.full_name(), "N.T.M(System.Int32)");
    }

    #[test]
    fn assembly_with_type_groups_namespaces() {
        let asm = AssemblyDefinition::new("A")
            .with_type(TypeDefinition::class("N", "X"))
            .with_type(TypeDefinition::class("N", "Y"))
            .with_type(TypeDefinition::class("M", "Z"));
        assert_eq!(asm.namespaces.len(), 2);
        assert_eq!(asm.namespaces[0].types.len(), 2);
    }
}
