//! Generic supertype argument resolution
//!
//! Declarations erase nothing here: every `extends`/`implements` clause
//! records its actual type arguments, so the concrete type bound to a
//! generic ancestor's parameter can be recovered from any descendant by
//! walking up the declared hierarchy and substituting type variables frame
//! by frame.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::TypeError;
use crate::registry::TypeRegistry;
use crate::subtyping::is_assignable;
use crate::ty::{TypeArg, TypeId};

/// Resolution context borrowing the registry
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver over `registry`
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeResolver { registry }
    }

    /// Resolve the concrete type bound to `base`'s parameter at `index`,
    /// as seen from `target`
    ///
    /// The walk starts at `target` with each of its parameters bound to
    /// itself, ascends through the first direct ancestor assignable to
    /// `base` (superclass first, then interfaces in declaration order),
    /// and substitutes type variables with the bindings accumulated so
    /// far. Once the walk reaches `base` the argument at `index` is
    /// returned if it resolved to a concrete type.
    ///
    /// `Ok(None)` means resolution came up empty: `base` is not an
    /// ancestor of `target`, `index` is out of range, or the argument is
    /// still a type variable at the end of the walk.
    pub fn supertype_argument(
        &self,
        target: TypeId,
        base: TypeId,
        index: usize,
    ) -> Result<Option<TypeId>, TypeError> {
        self.registry.get(base)?;
        debug!(%target, %base, index, "resolving supertype argument");
        let resolved = self.resolve_from(target, base, index, None)?;
        debug!(%target, %base, index, ?resolved, "supertype argument resolved");
        Ok(resolved)
    }

    /// [`supertype_argument`] with caller-supplied actual arguments for
    /// `target`'s own parameters
    ///
    /// Useful when `target` itself is generic and the caller knows what
    /// its parameters stand for in the situation at hand.
    ///
    /// [`supertype_argument`]: TypeResolver::supertype_argument
    pub fn supertype_argument_with(
        &self,
        target: TypeId,
        base: TypeId,
        index: usize,
        args: Vec<TypeArg>,
    ) -> Result<Option<TypeId>, TypeError> {
        self.registry.get(base)?;
        debug!(%target, %base, index, "resolving supertype argument with known arguments");
        self.resolve_from(target, base, index, Some(args))
    }

    /// Read the immediate superclass parameterization literally
    ///
    /// No walk and no substitution: the argument at `index` of `target`'s
    /// own `extends` clause, if that clause is parameterized and the
    /// argument is concrete.
    pub fn direct_supertype_argument(
        &self,
        target: TypeId,
        index: usize,
    ) -> Result<Option<TypeId>, TypeError> {
        let descriptor = self.registry.get(target)?;
        Ok(descriptor
            .superclass()
            .and_then(|superclass| superclass.args.as_ref())
            .and_then(|args| args.get(index))
            .and_then(TypeArg::as_concrete))
    }

    /// The element of `target`'s superclass chain that directly
    /// specializes `base`
    ///
    /// Walks superclasses only, ignoring interfaces and type arguments.
    /// Returns `target` itself when `target == base`, the chain element
    /// whose declared superclass is `base` otherwise, and `Ok(None)` when
    /// the chain never reaches `base`.
    pub fn implementing_ancestor(
        &self,
        target: TypeId,
        base: TypeId,
    ) -> Result<Option<TypeId>, TypeError> {
        self.registry.get(base)?;
        if target == base {
            return Ok(Some(target));
        }
        let mut current = target;
        loop {
            let descriptor = self.registry.get(current)?;
            match descriptor.superclass() {
                Some(superclass) if superclass.ty == base => return Ok(Some(current)),
                Some(superclass) => current = superclass.ty,
                None => return Ok(None),
            }
        }
    }

    fn resolve_from(
        &self,
        target: TypeId,
        base: TypeId,
        index: usize,
        supplied: Option<Vec<TypeArg>>,
    ) -> Result<Option<TypeId>, TypeError> {
        let descriptor = self.registry.get(target)?;

        // A type reached without explicit arguments binds each of its
        // parameters to itself.
        let args = supplied.unwrap_or_else(|| {
            descriptor
                .type_params()
                .iter()
                .map(|param| TypeArg::Var(param.clone()))
                .collect()
        });

        if target == base {
            return Ok(args.get(index).and_then(TypeArg::as_concrete));
        }

        // Frame bindings: declared parameter name to actual argument.
        let bindings: FxHashMap<&str, &TypeArg> = descriptor
            .type_params()
            .iter()
            .map(String::as_str)
            .zip(args.iter())
            .collect();

        let ancestors = descriptor
            .superclass()
            .into_iter()
            .chain(descriptor.interfaces().iter());
        for ancestor in ancestors {
            if !is_assignable(self.registry, ancestor.ty, base)? {
                continue;
            }
            trace!(ancestor = %ancestor.ty, "following ancestor");
            // First match wins: once an ancestor on a path to `base` is
            // chosen, its siblings are not explored, even if this path
            // ends unresolved.
            return match &ancestor.args {
                None => self.resolve_from(ancestor.ty, base, index, None),
                Some(ancestor_args) => {
                    let substituted = ancestor_args
                        .iter()
                        .map(|arg| match arg {
                            TypeArg::Var(name) => bindings
                                .get(name.as_str())
                                .map(|&bound| bound.clone())
                                .unwrap_or_else(|| TypeArg::Var(name.clone())),
                            TypeArg::Concrete(ty) => TypeArg::Concrete(*ty),
                        })
                        .collect();
                    self.resolve_from(ancestor.ty, base, index, Some(substituted))
                }
            };
        }

        Ok(None)
    }
}
