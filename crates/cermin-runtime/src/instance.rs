//! Dynamic instances of registered classes
//!
//! An [`Instance`] holds one named slot per non-static field of its class
//! and every superclass. All reads and writes go through the declared
//! metadata: visibility, finality and the accessibility override are
//! enforced here, field by field.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use cermin_types::{is_assignable, FieldDescriptor, TypeId, TypeKind, TypeRegistry};

use crate::error::RuntimeError;
use crate::value::Value;

/// A dynamic instance: a class id plus one value slot per field
#[derive(Debug)]
pub struct Instance {
    class: TypeId,
    slots: FxHashMap<String, Value>,
}

impl Instance {
    /// Create an instance of `class` with every slot set to `Null`
    ///
    /// Slots cover the fields declared on `class` and inherited from its
    /// superclass chain; static fields live on the type, not on
    /// instances, and get no slot.
    pub fn new(registry: &TypeRegistry, class: TypeId) -> Result<Instance, RuntimeError> {
        let descriptor = registry.get(class)?;
        if descriptor.kind() != TypeKind::Class {
            return Err(RuntimeError::NotInstantiable {
                name: descriptor.name().to_string(),
            });
        }

        let mut slots = FxHashMap::default();
        let mut current = Some(class);
        while let Some(id) = current {
            let descriptor = registry.get(id)?;
            for field in descriptor.fields() {
                if !field.is_static() {
                    slots.insert(field.name().to_string(), Value::Null);
                }
            }
            current = descriptor.superclass().map(|superclass| superclass.ty);
        }
        Ok(Instance { class, slots })
    }

    /// Class this instance was created from
    pub fn class(&self) -> TypeId {
        self.class
    }

    /// Read the field under `name`, enforcing access rules
    pub fn get(&self, registry: &TypeRegistry, name: &str) -> Result<Value, RuntimeError> {
        let field = self.find_field(registry, name)?;
        check_readable(registry, field)?;
        Ok(self.slots.get(name).cloned().unwrap_or(Value::Null))
    }

    /// Write the field under `name`, enforcing access rules and the
    /// declared field type
    pub fn set(
        &mut self,
        registry: &TypeRegistry,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let field = self.find_field(registry, name)?;
        check_writable(registry, field)?;
        check_value(registry, field, &value)?;
        trace!(field = name, kind = value.type_name(), "field written");
        self.slots.insert(field.name().to_string(), value);
        Ok(())
    }

    /// Field descriptor for `name`, declared on the class or inherited
    fn find_field<'r>(
        &self,
        registry: &'r TypeRegistry,
        name: &str,
    ) -> Result<&'r FieldDescriptor, RuntimeError> {
        let mut current = Some(self.class);
        while let Some(id) = current {
            let descriptor = registry.get(id)?;
            if let Some(field) = descriptor.field(name) {
                return Ok(field);
            }
            current = descriptor.superclass().map(|superclass| superclass.ty);
        }
        Err(RuntimeError::FieldNotFound {
            class: registry.get(self.class)?.name().to_string(),
            field: name.to_string(),
        })
    }
}

fn owner_name(registry: &TypeRegistry, field: &FieldDescriptor) -> Result<String, RuntimeError> {
    Ok(registry.get(field.owner())?.name().to_string())
}

fn check_readable(registry: &TypeRegistry, field: &FieldDescriptor) -> Result<(), RuntimeError> {
    if field.is_static() {
        return Err(RuntimeError::StaticField {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
        });
    }
    if field.is_public() || field.is_accessible() {
        Ok(())
    } else {
        Err(RuntimeError::FieldNotAccessible {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
        })
    }
}

fn check_writable(registry: &TypeRegistry, field: &FieldDescriptor) -> Result<(), RuntimeError> {
    if field.is_static() {
        return Err(RuntimeError::StaticField {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
        });
    }
    // The override bypasses both visibility and finality.
    if field.is_accessible() {
        return Ok(());
    }
    if !field.is_public() {
        return Err(RuntimeError::FieldNotAccessible {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
        });
    }
    if field.is_final() {
        return Err(RuntimeError::FinalField {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
        });
    }
    Ok(())
}

fn check_value(
    registry: &TypeRegistry,
    field: &FieldDescriptor,
    value: &Value,
) -> Result<(), RuntimeError> {
    // Null is assignable to every declared type; fields hold references,
    // not raw machine values.
    let compatible = match value {
        Value::Null => true,
        Value::Bool(_) => field.ty() == registry.boolean_type(),
        Value::Int(_) => field.ty() == registry.int_type(),
        Value::Float(_) => field.ty() == registry.float_type(),
        Value::Str(_) => field.ty() == registry.string_type(),
        Value::Object(object) => is_assignable(registry, object.class(), field.ty())?,
    };
    if compatible {
        Ok(())
    } else {
        Err(RuntimeError::TypeMismatch {
            class: owner_name(registry, field)?,
            field: field.name().to_string(),
            expected: registry.get(field.ty())?.name().to_string(),
            actual: value.type_name(),
        })
    }
}

/// Shared, lock-protected handle to an [`Instance`]
///
/// Clones share the same underlying instance. The class id is cached on
/// the handle itself: an instance never changes class, and type checks on
/// a value must be able to read it without taking the instance lock, even
/// while that very instance is being written.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    class: TypeId,
    instance: Arc<RwLock<Instance>>,
}

impl ObjectRef {
    /// Wrap an instance into a shared handle
    pub fn new(instance: Instance) -> ObjectRef {
        ObjectRef {
            class: instance.class(),
            instance: Arc::new(RwLock::new(instance)),
        }
    }

    /// Allocate a fresh instance of `class` directly into a handle
    pub fn instantiate(registry: &TypeRegistry, class: TypeId) -> Result<ObjectRef, RuntimeError> {
        Ok(ObjectRef::new(Instance::new(registry, class)?))
    }

    /// Class of the underlying instance, read without locking
    pub fn class(&self) -> TypeId {
        self.class
    }

    /// Whether two handles refer to the same instance
    pub fn ptr_eq(a: &ObjectRef, b: &ObjectRef) -> bool {
        Arc::ptr_eq(&a.instance, &b.instance)
    }

    /// Read a field through the handle
    pub fn get(&self, registry: &TypeRegistry, name: &str) -> Result<Value, RuntimeError> {
        self.instance.read().get(registry, name)
    }

    /// Write a field through the handle
    pub fn set(
        &self,
        registry: &TypeRegistry,
        name: &str,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.instance.write().set(registry, name, value)
    }
}
