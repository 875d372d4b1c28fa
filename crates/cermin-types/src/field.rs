//! Declared-field metadata and modifier masks

use std::sync::atomic::{AtomicBool, Ordering};

use bitflags::bitflags;

use crate::ty::TypeId;

bitflags! {
    /// Modifier mask of a declared field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        /// Readable and writable from anywhere
        const PUBLIC = 1 << 0;
        /// Visible only inside the declaring type
        const PRIVATE = 1 << 1;
        /// Visible to the declaring type and its subclasses
        const PROTECTED = 1 << 2;
        /// Owned by the type rather than its instances
        const STATIC = 1 << 3;
        /// Not writable after initialization
        const FINAL = 1 << 4;
    }
}

/// Metadata for a field declared directly on a type
///
/// The accessibility override is the one mutable piece: it is shared
/// process-wide state on the descriptor itself, toggled and restored by
/// field copies and by callers that need to bypass visibility.
#[derive(Debug)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) owner: TypeId,
    pub(crate) ty: TypeId,
    pub(crate) modifiers: Modifiers,
    pub(crate) accessible: AtomicBool,
}

impl FieldDescriptor {
    pub(crate) fn new(name: String, owner: TypeId, ty: TypeId, modifiers: Modifiers) -> Self {
        FieldDescriptor {
            name,
            owner,
            ty,
            modifiers,
            accessible: AtomicBool::new(false),
        }
    }

    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type that declares this field
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    /// Declared type of the field
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    /// Full modifier mask
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether every modifier in `set` is present
    pub fn has_all_modifiers(&self, set: Modifiers) -> bool {
        self.modifiers.contains(set)
    }

    /// Whether at least one modifier in `set` is present
    pub fn has_any_modifier(&self, set: Modifiers) -> bool {
        self.modifiers.intersects(set)
    }

    /// Flag-selected check: all-of when `match_all` is set, any-of
    /// otherwise
    pub fn has_modifiers(&self, set: Modifiers, match_all: bool) -> bool {
        if match_all {
            self.has_all_modifiers(set)
        } else {
            self.has_any_modifier(set)
        }
    }

    /// Whether the field is static
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    /// Whether the field is final
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    /// Whether the field is public
    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifiers::PUBLIC)
    }

    /// Current accessibility override
    ///
    /// When set, reads and writes bypass visibility and finality checks.
    pub fn is_accessible(&self) -> bool {
        self.accessible.load(Ordering::Acquire)
    }

    /// Set or clear the accessibility override
    ///
    /// This is shared metadata state, not per-caller state; anyone holding
    /// the descriptor observes the change.
    pub fn set_accessible(&self, accessible: bool) {
        self.accessible.store(accessible, Ordering::Release);
    }
}
