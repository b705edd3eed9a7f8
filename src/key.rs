//! Service key types for provider lookups.

use std::any::TypeId;

/// Key for service storage and lookup.
///
/// Keys identify what a provider is asked for: either a type, or a type
/// registered under an additional service name. The `&'static str` carried
/// next to the `TypeId` is the diagnostic type name and takes no part in
/// equality or hashing.
///
/// # Examples
///
/// ```rust
/// use ferrous_di_ordered::{Key, key_of_type};
/// use std::any::TypeId;
///
/// let by_type = key_of_type::<u32>();
/// assert_eq!(by_type, Key::Type(TypeId::of::<u32>(), "a different label"));
///
/// let named = Key::TypeNamed(TypeId::of::<u32>(), "u32", "port");
/// assert_ne!(by_type, named);
/// assert_eq!(named.service_name(), Some("port"));
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Key {
    /// Concrete (or `dyn Trait`) type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Named type key with TypeId, type name and service name
    TypeNamed(TypeId, &'static str, &'static str),
}

impl Key {
    /// Get the type name for display
    ///
    /// Returns the `std::any::type_name` recorded when the key was built.
    ///
    /// ```rust
    /// use ferrous_di_ordered::Key;
    /// use std::any::TypeId;
    ///
    /// let named_key = Key::TypeNamed(TypeId::of::<u32>(), "u32", "port");
    /// assert_eq!(named_key.display_name(), "u32");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::TypeNamed(_, name, _) => name,
        }
    }

    /// Get the service name for named keys, or None for plain type keys
    pub fn service_name(&self) -> Option<&'static str> {
        match self {
            Key::Type(_, _) => None,
            Key::TypeNamed(_, _, name) => Some(name),
        }
    }

    /// The `TypeId` this key resolves to.
    pub fn type_id(&self) -> TypeId {
        match self {
            Key::Type(id, _) | Key::TypeNamed(id, _, _) => *id,
        }
    }
}

// TypeId-only comparison; the display name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::TypeNamed(a, _, name_a), Key::TypeNamed(b, _, name_b)) => {
                a == b && name_a == name_b
            }
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state); // Discriminant
                id.hash(state);
            }
            Key::TypeNamed(id, _, name) => {
                1u8.hash(state);
                id.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Builds the unnamed key for `T`.
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the named key for `T`.
#[inline(always)]
pub fn key_of_named<T: ?Sized + 'static>(name: &'static str) -> Key {
    Key::TypeNamed(TypeId::of::<T>(), std::any::type_name::<T>(), name)
}
