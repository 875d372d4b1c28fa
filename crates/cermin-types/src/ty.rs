//! Core type metadata definitions: ids, kinds, type arguments, ancestor
//! references and per-type descriptors

use std::fmt;

use parking_lot::Mutex;

use crate::field::FieldDescriptor;

/// Unique identifier for a type in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Position of this id in the registry arena
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Built-in value type
    Primitive,
    /// Class, instantiable and single-inheriting
    Class,
    /// Interface, implemented by classes and extended by interfaces
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Primitive => write!(f, "primitive"),
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
        }
    }
}

/// An actual type argument written at a parameterized ancestor reference
///
/// Arguments are either concrete types or type variables of the declaring
/// type, left for some descendant further down the hierarchy to bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// Fully resolved concrete type
    Concrete(TypeId),
    /// Unresolved type variable, by declared parameter name
    Var(String),
}

impl TypeArg {
    /// Shorthand for a type variable argument
    pub fn var(name: impl Into<String>) -> Self {
        TypeArg::Var(name.into())
    }

    /// Whether this argument is a concrete type
    pub fn is_concrete(&self) -> bool {
        matches!(self, TypeArg::Concrete(_))
    }

    /// The concrete type, if this argument is one
    pub fn as_concrete(&self) -> Option<TypeId> {
        match self {
            TypeArg::Concrete(ty) => Some(*ty),
            TypeArg::Var(_) => None,
        }
    }
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArg::Concrete(ty) => write!(f, "{}", ty),
            TypeArg::Var(name) => write!(f, "{}", name),
        }
    }
}

/// A direct superclass or interface reference as written at a declaration
/// site
///
/// `args` is `None` for a bare (raw) reference and `Some` for a
/// parameterized one carrying the ordered actual type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorRef {
    /// Referenced ancestor type
    pub ty: TypeId,
    /// Actual type arguments, if the reference is parameterized
    pub args: Option<Vec<TypeArg>>,
}

impl AncestorRef {
    /// A bare reference carrying no type arguments
    pub fn bare(ty: TypeId) -> Self {
        AncestorRef { ty, args: None }
    }

    /// A parameterized reference with the given actual arguments
    pub fn parameterized(ty: TypeId, args: Vec<TypeArg>) -> Self {
        AncestorRef {
            ty,
            args: Some(args),
        }
    }

    /// Whether this reference carries type arguments
    pub fn is_parameterized(&self) -> bool {
        self.args.is_some()
    }
}

/// Metadata for a registered type
///
/// Descriptors are immutable once registered, with two deliberate
/// exceptions: the accessibility override on each field and the copy lock,
/// which serializes field copies reading from instances of this type.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) name: String,
    pub(crate) kind: TypeKind,
    pub(crate) type_params: Vec<String>,
    pub(crate) superclass: Option<AncestorRef>,
    pub(crate) interfaces: Vec<AncestorRef>,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) copy_lock: Mutex<()>,
}

impl TypeDescriptor {
    /// Registry id of this type
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Declared name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind of this type
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Ordered generic parameter names, empty for non-generic types
    pub fn type_params(&self) -> &[String] {
        &self.type_params
    }

    /// Whether this type declares generic parameters
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// Direct superclass reference, if any
    pub fn superclass(&self) -> Option<&AncestorRef> {
        self.superclass.as_ref()
    }

    /// Direct interface references, in declaration order
    pub fn interfaces(&self) -> &[AncestorRef] {
        &self.interfaces
    }

    /// Fields declared directly on this type, in declaration order
    ///
    /// Inherited fields are not included; walk the superclass chain for
    /// those.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// The field declared directly on this type under `name`, if any
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Critical section scoped to this type's metadata
    ///
    /// Field copies reading from instances of this type hold it while
    /// toggling field accessibility, so concurrent copies sharing the
    /// source type cannot observe each other's overrides mid-flight.
    pub fn copy_lock(&self) -> &Mutex<()> {
        &self.copy_lock
    }
}
