//! Type registry: the descriptor arena and the declaration builders
//!
//! The registry plays the part class metadata plays in a reflective
//! runtime. Every type the resolver or the copier can see is declared into
//! it, supertypes first, so ancestor references are always ids into the
//! same arena and the declared hierarchy can never form a cycle.

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::TypeError;
use crate::field::{FieldDescriptor, Modifiers};
use crate::ty::{AncestorRef, TypeArg, TypeDescriptor, TypeId, TypeKind};

/// Registry of type metadata
///
/// Construction seeds the built-in primitives (`string`, `int`, `float`,
/// `boolean`); classes and interfaces are declared through [`class`] and
/// [`interface`] builders.
///
/// [`class`]: TypeRegistry::class
/// [`interface`]: TypeRegistry::interface
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: FxHashMap<String, TypeId>,
    string_id: TypeId,
    int_id: TypeId,
    float_id: TypeId,
    boolean_id: TypeId,
}

impl TypeRegistry {
    /// Create a registry with the built-in primitives registered
    pub fn new() -> Self {
        let mut registry = TypeRegistry {
            types: Vec::new(),
            by_name: FxHashMap::default(),
            string_id: TypeId(0),
            int_id: TypeId(0),
            float_id: TypeId(0),
            boolean_id: TypeId(0),
        };
        registry.string_id = registry.insert_primitive("string");
        registry.int_id = registry.insert_primitive("int");
        registry.float_id = registry.insert_primitive("float");
        registry.boolean_id = registry.insert_primitive("boolean");
        registry
    }

    fn insert_primitive(&mut self, name: &str) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.by_name.insert(name.to_string(), id);
        self.types.push(TypeDescriptor {
            id,
            name: name.to_string(),
            kind: TypeKind::Primitive,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            copy_lock: Mutex::new(()),
        });
        id
    }

    /// The built-in `string` type
    pub fn string_type(&self) -> TypeId {
        self.string_id
    }

    /// The built-in `int` type
    pub fn int_type(&self) -> TypeId {
        self.int_id
    }

    /// The built-in `float` type
    pub fn float_type(&self) -> TypeId {
        self.float_id
    }

    /// The built-in `boolean` type
    pub fn boolean_type(&self) -> TypeId {
        self.boolean_id
    }

    /// Start declaring a class
    ///
    /// Nothing is inserted until [`TypeBuilder::register`] succeeds.
    pub fn class(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, name.into(), TypeKind::Class)
    }

    /// Start declaring an interface
    pub fn interface(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        TypeBuilder::new(self, name.into(), TypeKind::Interface)
    }

    /// Descriptor for `id`, or [`TypeError::UnknownType`] if the id does
    /// not name a registered type
    pub fn get(&self, id: TypeId) -> Result<&TypeDescriptor, TypeError> {
        self.types.get(id.index()).ok_or(TypeError::UnknownType { id })
    }

    /// Id registered under `name`, if any
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Number of registered types, built-ins included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry holds no types
    ///
    /// Always false in practice, since construction registers the
    /// built-ins.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all registered descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for declaring a class or interface
///
/// Collects the declaration and validates it as a whole in [`register`]; a
/// failed declaration leaves the registry untouched.
///
/// [`register`]: TypeBuilder::register
pub struct TypeBuilder<'a> {
    registry: &'a mut TypeRegistry,
    name: String,
    kind: TypeKind,
    type_params: Vec<String>,
    superclass: Option<AncestorRef>,
    interfaces: Vec<AncestorRef>,
    fields: Vec<(String, TypeId, Modifiers)>,
}

impl<'a> TypeBuilder<'a> {
    fn new(registry: &'a mut TypeRegistry, name: String, kind: TypeKind) -> Self {
        TypeBuilder {
            registry,
            name,
            kind,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare the ordered generic parameter names
    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Reference a superclass without type arguments (a raw reference)
    pub fn extends(mut self, ty: TypeId) -> Self {
        self.superclass = Some(AncestorRef::bare(ty));
        self
    }

    /// Reference a superclass with actual type arguments
    ///
    /// Arguments may be concrete ([`TypeArg::Concrete`]) or variables of
    /// this type's own parameters ([`TypeArg::Var`]).
    pub fn extends_parameterized(mut self, ty: TypeId, args: Vec<TypeArg>) -> Self {
        self.superclass = Some(AncestorRef::parameterized(ty, args));
        self
    }

    /// Reference a direct interface without type arguments
    ///
    /// On a class this is an `implements` clause; on an interface it is an
    /// `extends` clause.
    pub fn implements(mut self, ty: TypeId) -> Self {
        self.interfaces.push(AncestorRef::bare(ty));
        self
    }

    /// Reference a direct interface with actual type arguments
    pub fn implements_parameterized(mut self, ty: TypeId, args: Vec<TypeArg>) -> Self {
        self.interfaces.push(AncestorRef::parameterized(ty, args));
        self
    }

    /// Declare a field directly on this type
    pub fn field(mut self, name: impl Into<String>, ty: TypeId, modifiers: Modifiers) -> Self {
        self.fields.push((name.into(), ty, modifiers));
        self
    }

    /// Validate the whole declaration and insert it, returning the new id
    pub fn register(self) -> Result<TypeId, TypeError> {
        let TypeBuilder {
            registry,
            name,
            kind,
            type_params,
            superclass,
            interfaces,
            fields,
        } = self;

        if registry.by_name.contains_key(&name) {
            return Err(TypeError::DuplicateType { name });
        }

        for (position, param) in type_params.iter().enumerate() {
            if type_params[..position].contains(param) {
                return Err(TypeError::DuplicateTypeParameter {
                    ty: name,
                    param: param.clone(),
                });
            }
        }

        if let Some(reference) = &superclass {
            let ancestor = registry.get(reference.ty)?;
            if kind == TypeKind::Interface {
                return Err(TypeError::InvalidAncestor {
                    ty: name,
                    ancestor: ancestor.name().to_string(),
                    reason: "an interface cannot declare a superclass".to_string(),
                });
            }
            if ancestor.kind() != TypeKind::Class {
                return Err(TypeError::InvalidAncestor {
                    ty: name,
                    ancestor: ancestor.name().to_string(),
                    reason: format!("a class can only extend a class, not a {}", ancestor.kind()),
                });
            }
            check_reference_args(registry, &name, &type_params, reference)?;
        }

        for reference in &interfaces {
            let ancestor = registry.get(reference.ty)?;
            if ancestor.kind() != TypeKind::Interface {
                return Err(TypeError::InvalidAncestor {
                    ty: name,
                    ancestor: ancestor.name().to_string(),
                    reason: format!("only an interface can be implemented, not a {}", ancestor.kind()),
                });
            }
            check_reference_args(registry, &name, &type_params, reference)?;
        }

        // Shadowing a superclass field would make name-based lookup and
        // copy ambiguous, so the whole chain must stay collision-free.
        let mut taken: FxHashSet<String> = FxHashSet::default();
        let mut current = superclass.as_ref().map(|reference| reference.ty);
        while let Some(id) = current {
            let ancestor = registry.get(id)?;
            for inherited in ancestor.fields() {
                taken.insert(inherited.name().to_string());
            }
            current = ancestor.superclass().map(|reference| reference.ty);
        }
        for (field_name, field_ty, _) in &fields {
            registry.get(*field_ty)?;
            if !taken.insert(field_name.clone()) {
                return Err(TypeError::DuplicateField {
                    ty: name,
                    field: field_name.clone(),
                });
            }
        }

        let id = TypeId(registry.types.len() as u32);
        let fields = fields
            .into_iter()
            .map(|(field_name, field_ty, modifiers)| {
                FieldDescriptor::new(field_name, id, field_ty, modifiers)
            })
            .collect();

        debug!(name = %name, kind = %kind, id = %id, "registered type");
        registry.by_name.insert(name.clone(), id);
        registry.types.push(TypeDescriptor {
            id,
            name,
            kind,
            type_params,
            superclass,
            interfaces,
            fields,
            copy_lock: Mutex::new(()),
        });
        Ok(id)
    }
}

fn check_reference_args(
    registry: &TypeRegistry,
    ty: &str,
    type_params: &[String],
    reference: &AncestorRef,
) -> Result<(), TypeError> {
    let ancestor = registry.get(reference.ty)?;
    let args = match &reference.args {
        Some(args) => args,
        None => return Ok(()),
    };
    if args.len() != ancestor.type_params().len() {
        return Err(TypeError::InvalidTypeArgCount {
            ty: ty.to_string(),
            ancestor: ancestor.name().to_string(),
            expected: ancestor.type_params().len(),
            actual: args.len(),
        });
    }
    for arg in args {
        match arg {
            TypeArg::Var(param) => {
                if !type_params.iter().any(|declared| declared == param) {
                    return Err(TypeError::UnknownTypeParameter {
                        ty: ty.to_string(),
                        param: param.clone(),
                    });
                }
            }
            TypeArg::Concrete(id) => {
                registry.get(*id)?;
            }
        }
    }
    Ok(())
}
