//! Reflective field-by-field copying between instances

use tracing::{debug, trace};

use cermin_types::{FieldDescriptor, TypeRegistry};

use crate::error::RuntimeError;
use crate::instance::ObjectRef;
use crate::value::Value;

/// Scope guard that forces a field accessible and restores the previous
/// override state on drop
///
/// The override lives on the shared descriptor, so restoring on every exit
/// path matters: a leaked override would leave the field open for every
/// other caller in the process.
pub struct AccessOverride<'a> {
    field: &'a FieldDescriptor,
    previous: bool,
}

impl<'a> AccessOverride<'a> {
    /// Save the current override state and force accessibility on
    pub fn lift(field: &'a FieldDescriptor) -> AccessOverride<'a> {
        let previous = field.is_accessible();
        field.set_accessible(true);
        AccessOverride { field, previous }
    }
}

impl Drop for AccessOverride<'_> {
    fn drop(&mut self) {
        self.field.set_accessible(self.previous);
    }
}

/// Field-by-field copier over a registry
#[derive(Debug, Clone, Copy)]
pub struct FieldCopier<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> FieldCopier<'a> {
    /// Create a copier over `registry`
    pub fn new(registry: &'a TypeRegistry) -> Self {
        FieldCopier { registry }
    }

    /// Copy every non-static field declared on `source`'s class onto
    /// `destination`, by name
    ///
    /// Both arguments must be object values; `Null` is rejected up front.
    /// Only fields declared directly on the source class are copied, and
    /// each must be declared directly on the destination class as well.
    /// Visibility and finality are bypassed for the duration of each field
    /// copy by lifting the accessibility override on both sides and
    /// restoring it afterwards, error or not.
    ///
    /// Each field is copied inside the source type's copy lock, so
    /// concurrent copies reading from the same source type cannot observe
    /// each other's half-toggled overrides.
    pub fn copy_fields(&self, source: &Value, destination: &Value) -> Result<(), RuntimeError> {
        let source = require_object(source, "source")?;
        let destination = require_object(destination, "destination")?;

        if ObjectRef::ptr_eq(source, destination) {
            // Copying an instance onto itself changes nothing.
            return Ok(());
        }

        let source_class = self.registry.get(source.class())?;
        let destination_class = self.registry.get(destination.class())?;
        debug!(
            source = source_class.name(),
            destination = destination_class.name(),
            "copying fields"
        );

        for field in source_class.fields() {
            if field.is_static() {
                trace!(field = field.name(), "skipping static field");
                continue;
            }

            let _sync = source_class.copy_lock().lock();

            let destination_field = destination_class.field(field.name()).ok_or_else(|| {
                RuntimeError::FieldNotFound {
                    class: destination_class.name().to_string(),
                    field: field.name().to_string(),
                }
            })?;

            let _source_access = AccessOverride::lift(field);
            let _destination_access = AccessOverride::lift(destination_field);

            trace!(field = field.name(), "copying field");
            let value = source.get(self.registry, field.name())?;
            destination.set(self.registry, field.name(), value)?;
        }
        Ok(())
    }
}

fn require_object<'v>(value: &'v Value, which: &'static str) -> Result<&'v ObjectRef, RuntimeError> {
    match value {
        Value::Null => Err(RuntimeError::NullArgument { which }),
        Value::Object(object) => Ok(object),
        other => Err(RuntimeError::NotAnObject {
            which,
            kind: other.type_name(),
        }),
    }
}
