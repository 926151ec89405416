//! Unit identity and type tags.
//!
//! Two independent notions of "which middleware is this" exist:
//!
//! - **Identity** ([`MiddlewareId`]): the address of a shared unit. Two `Arc`
//!   clones of the same unit have the same identity; two separately allocated
//!   units never do, even if they compare equal. Uniqueness in a queue and
//!   object-targeted lookups use identity.
//! - **Tag** ([`MiddlewareTag`]): the concrete type a unit was declared as.
//!   Type-targeted lookups use tags, compared according to a [`TagMatch`]
//!   mode.

use serde::{Deserialize, Serialize};
use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Pointer identity of a shared middleware unit.
///
/// Derived from the data pointer of the unit's `Arc` allocation, so an
/// `Arc<T>` and the `Arc<dyn Middleware>` it was coerced into share one id.
///
/// # Example
///
/// ```
/// use stagehand_core::MiddlewareId;
/// use std::sync::Arc;
///
/// let unit = Arc::new(42_u32);
/// let alias = Arc::clone(&unit);
/// let other = Arc::new(42_u32);
///
/// assert_eq!(MiddlewareId::of(&unit), MiddlewareId::of(&alias));
/// assert_ne!(MiddlewareId::of(&unit), MiddlewareId::of(&other));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MiddlewareId(usize);

impl MiddlewareId {
    /// Returns the identity of the unit behind `unit`.
    #[must_use]
    pub fn of<T: ?Sized>(unit: &Arc<T>) -> Self {
        Self(Arc::as_ptr(unit).cast::<()>() as usize)
    }
}

impl fmt::Display for MiddlewareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Comparable type tag of a middleware unit.
///
/// Equality and hashing use only the [`TypeId`]; the name is carried for
/// logs and error messages.
#[derive(Debug, Clone, Copy)]
pub struct MiddlewareTag {
    id: TypeId,
    name: &'static str,
}

impl MiddlewareTag {
    /// Creates the tag of type `T`, named after its type path.
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_core::MiddlewareTag;
    ///
    /// struct Auth;
    /// struct Cors;
    ///
    /// assert_eq!(MiddlewareTag::of::<Auth>(), MiddlewareTag::of::<Auth>());
    /// assert_ne!(MiddlewareTag::of::<Auth>(), MiddlewareTag::of::<Cors>());
    /// assert!(MiddlewareTag::of::<Auth>().name().ends_with("Auth"));
    /// ```
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Creates the tag of type `T` with a custom display name.
    ///
    /// Useful for closure-backed units, whose type paths are unreadable.
    #[must_use]
    pub fn named<T: ?Sized + 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    /// Returns the display name of the tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the underlying type id.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for MiddlewareTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MiddlewareTag {}

impl Hash for MiddlewareTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for MiddlewareTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// How a type-targeted lookup compares a target tag against queued units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagMatch {
    /// Only a unit whose own tag equals the target matches.
    #[default]
    Exact,
    /// A unit also matches when the target appears in its declared lineage.
    Lineage,
}

impl TagMatch {
    /// Returns true if a unit with `tag` and `lineage` matches `target`.
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_core::{MiddlewareTag, TagMatch};
    ///
    /// struct Base;
    /// struct Derived;
    ///
    /// let base = MiddlewareTag::of::<Base>();
    /// let derived = MiddlewareTag::of::<Derived>();
    ///
    /// assert!(!TagMatch::Exact.matches(base, derived, &[base]));
    /// assert!(TagMatch::Lineage.matches(base, derived, &[base]));
    /// ```
    #[must_use]
    pub fn matches(self, target: MiddlewareTag, tag: MiddlewareTag, lineage: &[MiddlewareTag]) -> bool {
        match self {
            Self::Exact => tag == target,
            Self::Lineage => tag == target || lineage.contains(&target),
        }
    }

    /// Returns the configuration name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Lineage => "lineage",
        }
    }
}

impl std::str::FromStr for TagMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "lineage" => Ok(Self::Lineage),
            other => Err(format!("unknown tag match mode `{other}`")),
        }
    }
}
