//! Overlay instance registry.
//!
//! Each overlay kind owns one registry mapping an instance key to its live
//! resources: the visual roots, the kind-specific state (callbacks, animator)
//! and any child views. An instance is registered when its roots are created
//! and removed when they are released, so a key present in the registry always
//! resolves to exactly one set of live roots.
//!
//! Disposal is refused while the instance reports a transition in progress.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::OverlayError;
use crate::host::{NodeId, Templates};

/// Overlay kinds managed by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    Alert,
    Menu,
    Toast,
}

impl Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OverlayKind::Alert => "alert",
            OverlayKind::Menu => "menu",
            OverlayKind::Toast => "toast",
        };
        f.write_str(name)
    }
}

/// Key type of a registry.
pub trait InstanceKey: Clone + Eq + Hash + Display {
    /// Produce a key for a new instance.
    ///
    /// Multi-instance kinds return a fresh key; singleton kinds always return
    /// the same slot.
    fn allocate() -> Self;
}

/// Key of single-slot kinds (menu, toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Singleton;

impl InstanceKey for Singleton {
    fn allocate() -> Self {
        Singleton
    }
}

impl Display for Singleton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("singleton")
    }
}

/// Kind-specific state stored with an instance.
pub trait InstanceState {
    /// True while an animation owned by the instance is in flight.
    fn is_transitioning(&self) -> bool;

    /// Release child views and clear callback references.
    ///
    /// Called once, right before the instance's roots are destroyed.
    fn release<T: Templates + ?Sized>(&mut self, templates: &mut T);
}

/// Template names used to create an instance.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRefs<'a> {
    pub backdrop: Option<&'a str>,
    pub content: &'a str,
}

/// The visual roots exclusively owned by an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRoots {
    pub backdrop: Option<NodeId>,
    pub content: NodeId,
}

impl OverlayRoots {
    /// Activate or deactivate both roots.
    pub fn set_active<T: Templates + ?Sized>(&self, templates: &mut T, active: bool) {
        if let Some(backdrop) = self.backdrop {
            templates.set_active(backdrop, active);
        }
        templates.set_active(self.content, active);
    }
}

/// One live overlay.
#[derive(Debug)]
pub struct OverlayInstance<K, S> {
    pub id: K,
    pub roots: OverlayRoots,
    pub state: S,
}

/// Live-instance store for one overlay kind.
#[derive(Debug)]
pub struct OverlayRegistry<K, S> {
    kind: OverlayKind,
    instances: HashMap<K, OverlayInstance<K, S>>,
}

impl<K: InstanceKey, S: InstanceState> OverlayRegistry<K, S> {
    pub fn new(kind: OverlayKind) -> Self {
        Self {
            kind,
            instances: HashMap::new(),
        }
    }

    pub fn kind(&self) -> OverlayKind {
        self.kind
    }

    /// Instantiate roots from `templates` and register a new instance.
    ///
    /// The roots are returned inactive. For singleton kinds an existing
    /// instance is reused and `init` is not called.
    pub fn create<T, F>(
        &mut self,
        templates: TemplateRefs<'_>,
        host: &mut T,
        init: F,
    ) -> &mut OverlayInstance<K, S>
    where
        T: Templates + ?Sized,
        F: FnOnce(&K, OverlayRoots) -> S,
    {
        let mut id = K::allocate();
        if self.instances.contains_key(&id) {
            // Singleton kinds reuse the slot; fresh kinds draw again.
            let first = id.clone();
            loop {
                id = K::allocate();
                if id == first || !self.instances.contains_key(&id) {
                    break;
                }
            }
        }

        let kind = self.kind;
        self.instances.entry(id.clone()).or_insert_with(|| {
            let backdrop = templates.backdrop.map(|t| host.instantiate(t, None));
            let content = host.instantiate(templates.content, None);
            let roots = OverlayRoots { backdrop, content };
            roots.set_active(&mut *host, false);
            log::debug!("{} {}: created (content {})", kind, id, content);
            OverlayInstance {
                state: init(&id, roots),
                id: id.clone(),
                roots,
            }
        })
    }

    /// Look up a live instance. `None` means "already closed".
    pub fn lookup(&self, id: &K) -> Option<&OverlayInstance<K, S>> {
        self.instances.get(id)
    }

    pub fn lookup_mut(&mut self, id: &K) -> Option<&mut OverlayInstance<K, S>> {
        self.instances.get_mut(id)
    }

    pub fn contains(&self, id: &K) -> bool {
        self.instances.contains_key(id)
    }

    /// Remove an instance and release its roots and callbacks.
    ///
    /// Fails with [`OverlayError::InTransition`] while the instance is animating
    /// and with [`OverlayError::NotFound`] for unknown keys; both leave the
    /// registry untouched.
    pub fn dispose<T: Templates + ?Sized>(
        &mut self,
        id: &K,
        host: &mut T,
    ) -> Result<(), OverlayError> {
        let instance = self.instances.get(id).ok_or_else(|| OverlayError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        })?;
        if instance.state.is_transitioning() {
            return Err(OverlayError::InTransition { kind: self.kind });
        }
        if let Some(instance) = self.instances.remove(id) {
            Self::release(self.kind, instance, host);
        }
        Ok(())
    }

    /// Release every instance regardless of animation state.
    ///
    /// Only for teardown, when the animators themselves are going away.
    pub fn dispose_all<T: Templates + ?Sized>(&mut self, host: &mut T) -> usize {
        let count = self.instances.len();
        for (_, instance) in self.instances.drain() {
            Self::release(self.kind, instance, host);
        }
        count
    }

    fn release<T: Templates + ?Sized>(
        kind: OverlayKind,
        mut instance: OverlayInstance<K, S>,
        host: &mut T,
    ) {
        instance.state.release(host);
        if let Some(backdrop) = instance.roots.backdrop {
            host.destroy(backdrop);
        }
        host.destroy(instance.roots.content);
        log::debug!("{} {}: disposed", kind, instance.id);
    }

    pub fn ids(&self) -> Vec<K> {
        self.instances.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OverlayInstance<K, S>> {
        self.instances.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut OverlayInstance<K, S>> {
        self.instances.values_mut()
    }
}
