//! Raw-type assignability over the declared hierarchy

use crate::error::TypeError;
use crate::registry::TypeRegistry;
use crate::ty::TypeId;

/// Check whether `sub` is assignable to `sup`
///
/// Purely nominal and raw: a type is assignable to itself, to anything its
/// superclass is assignable to, and to anything any of its direct
/// interfaces is assignable to. Type arguments play no part here.
pub fn is_assignable(registry: &TypeRegistry, sub: TypeId, sup: TypeId) -> Result<bool, TypeError> {
    registry.get(sup)?;
    walk(registry, sub, sup)
}

fn walk(registry: &TypeRegistry, sub: TypeId, sup: TypeId) -> Result<bool, TypeError> {
    if sub == sup {
        return Ok(true);
    }
    let descriptor = registry.get(sub)?;
    if let Some(superclass) = descriptor.superclass() {
        if walk(registry, superclass.ty, sup)? {
            return Ok(true);
        }
    }
    for interface in descriptor.interfaces() {
        if walk(registry, interface.ty, sup)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflexive() {
        let mut registry = TypeRegistry::new();
        let animal = registry.class("Animal").register().unwrap();
        assert!(is_assignable(&registry, animal, animal).unwrap());
        let string = registry.string_type();
        assert!(is_assignable(&registry, string, string).unwrap());
    }

    #[test]
    fn test_superclass_chain() {
        let mut registry = TypeRegistry::new();
        let animal = registry.class("Animal").register().unwrap();
        let dog = registry.class("Dog").extends(animal).register().unwrap();
        let labrador = registry.class("Labrador").extends(dog).register().unwrap();

        assert!(is_assignable(&registry, labrador, animal).unwrap());
        assert!(is_assignable(&registry, labrador, dog).unwrap());
        assert!(!is_assignable(&registry, animal, labrador).unwrap());
    }

    #[test]
    fn test_interface_paths() {
        let mut registry = TypeRegistry::new();
        let walker = registry.interface("Walker").register().unwrap();
        let runner = registry
            .interface("Runner")
            .implements(walker)
            .register()
            .unwrap();
        let animal = registry.class("Animal").register().unwrap();
        let dog = registry
            .class("Dog")
            .extends(animal)
            .implements(runner)
            .register()
            .unwrap();
        let labrador = registry.class("Labrador").extends(dog).register().unwrap();

        // Interface reached through an extended interface.
        assert!(is_assignable(&registry, dog, walker).unwrap());
        // Interface reached through the superclass chain.
        assert!(is_assignable(&registry, labrador, runner).unwrap());
        assert!(!is_assignable(&registry, animal, walker).unwrap());
    }

    #[test]
    fn test_unrelated_types() {
        let mut registry = TypeRegistry::new();
        let animal = registry.class("Animal").register().unwrap();
        let rock = registry.class("Rock").register().unwrap();
        assert!(!is_assignable(&registry, rock, animal).unwrap());
        assert!(!is_assignable(&registry, registry.string_type(), animal).unwrap());
    }
}
