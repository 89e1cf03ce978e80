// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named markers that tag log records.
//!
//! A [`Marker`] is an opaque label passed alongside a log call. The adapter never
//! interprets it; it is attached to the resulting record by reference, so the
//! marker a sink sees is the very instance the caller passed.
//!
//! Markers may reference other markers, which lets a filter ask
//! "is this record tagged `SECURITY`, directly or through a child?":
//!
//! ```rust
//! use logshim::MarkerFactory;
//!
//! let markers = MarkerFactory::new();
//! let audit = markers.marker("AUDIT");
//! let security = markers.marker("SECURITY");
//! audit.add(security.clone());
//!
//! assert!(audit.contains("SECURITY"));
//! assert!(audit.contains_marker(&security));
//! assert!(!security.contains("AUDIT"));
//! ```

use crate::spinlock::Spinlock;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct MarkerInner {
    name: String,
    references: Spinlock<Vec<Marker>>,
}

/// A named tag for log records.
///
/// Cheap to clone. Equality and hashing are by identity: two markers created
/// separately with the same name are different markers.
#[derive(Clone)]
pub struct Marker {
    inner: Arc<MarkerInner>,
}

impl Marker {
    /// Creates a detached marker that no factory knows about.
    pub fn new(name: impl Into<String>) -> Marker {
        Marker {
            inner: Arc::new(MarkerInner {
                name: name.into(),
                references: Spinlock::new(Vec::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Adds a child reference. Adding a marker to itself, or a reference already
    /// present, does nothing.
    pub fn add(&self, reference: Marker) {
        if reference == *self {
            return;
        }
        self.inner.references.with_mut(|refs| {
            if !refs.contains(&reference) {
                refs.push(reference);
            }
        });
    }

    /// Removes a child reference, returning whether it was present.
    pub fn remove(&self, reference: &Marker) -> bool {
        self.inner.references.with_mut(|refs| {
            let before = refs.len();
            refs.retain(|r| r != reference);
            refs.len() != before
        })
    }

    pub fn has_references(&self) -> bool {
        self.inner.references.with(|refs| !refs.is_empty())
    }

    pub fn references(&self) -> Vec<Marker> {
        self.inner.references.with(|refs| refs.clone())
    }

    /// Whether this marker, or any marker it references, is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.any(&mut |m: &Marker| m.name() == name, &mut Vec::new())
    }

    /// Whether this marker is `other`, or references it transitively.
    pub fn contains_marker(&self, other: &Marker) -> bool {
        self.any(&mut |m: &Marker| m == other, &mut Vec::new())
    }

    /// Whether both handles refer to the same marker instance.
    pub fn ptr_eq(&self, other: &Marker) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // `seen` guards against reference cycles (a -> b -> a).
    fn any(&self, pred: &mut dyn FnMut(&Marker) -> bool, seen: &mut Vec<Marker>) -> bool {
        if seen.contains(self) {
            return false;
        }
        if pred(self) {
            return true;
        }
        seen.push(self.clone());
        for reference in self.references() {
            if reference.any(pred, seen) {
                return true;
            }
        }
        false
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Marker {}

impl Hash for Marker {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Debug for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .references()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        f.debug_struct("Marker")
            .field("name", &self.name())
            .field("references", &names)
            .finish()
    }
}

/// `NAME` or `NAME [ CHILD, OTHER ]`.
impl Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())?;
        let references = self.references();
        if !references.is_empty() {
            f.write_str(" [ ")?;
            for (i, r) in references.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(r.name())?;
            }
            f.write_str(" ]")?;
        }
        Ok(())
    }
}

/// Hands out one shared [`Marker`] per name.
#[derive(Debug, Default)]
pub struct MarkerFactory {
    markers: Spinlock<HashMap<String, Marker>>,
}

impl MarkerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the marker named `name`, creating it on first use.
    pub fn marker(&self, name: &str) -> Marker {
        if let Some(marker) = self.markers.with(|m| m.get(name).cloned()) {
            return marker;
        }
        self.markers.with_mut(|m| {
            m.entry(name.to_string())
                .or_insert_with(|| Marker::new(name))
                .clone()
        })
    }

    pub fn exists(&self, name: &str) -> bool {
        self.markers.with(|m| m.contains_key(name))
    }

    /// Forgets the cached marker. Existing handles stay valid.
    pub fn detach(&self, name: &str) -> bool {
        self.markers.with_mut(|m| m.remove(name).is_some())
    }

    /// A fresh marker that is not cached.
    pub fn detached_marker(&self, name: &str) -> Marker {
        Marker::new(name)
    }
}
