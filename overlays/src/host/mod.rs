//! Collaborator seams consumed by the overlay managers.
//!
//! Template instantiation, measurement, pointer delivery and property
//! rendering live outside this crate. Managers reach them only through the
//! traits below, which a host application implements once and hands to the
//! [`DialogCoordinator`](crate::DialogCoordinator) at construction.
//!
//! - [`Templates`]: instantiate and destroy visual roots, fill their parts
//! - [`Layout`]: measure preferred sizes, set explicit sizes, signal layout passes
//! - [`Pointer`]: deliver clicks tagged with a [`ClickTarget`] payload
//! - [`Surface`]: property sinks driven by tweens (offset, mask, opacity)
//! - [`InputGate`]: block input on background surfaces
//!
//! [`HeadlessHost`] is an in-memory implementation used by tests and the demo.

pub mod headless;

pub use headless::{HeadlessHost, NodeRecord};

use tokio::sync::oneshot;

use crate::geometry::{SizeF, Vec2};
use crate::layers::alert::AlertId;

/// Opaque handle to an instantiated visual root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Addressable sub-element of an instantiated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    /// The root itself.
    Root,
    Title,
    Body,
    OkButton,
    OkLabel,
    CancelButton,
    CancelLabel,
    ItemLabel,
    ItemIcon,
    ItemDivider,
    Message,
    Background,
}

/// Payload attached to a click listener.
///
/// Carries the instance identifier explicitly so a click can be routed to the
/// owning manager without capturing any manager state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClickTarget {
    AlertOk(AlertId),
    AlertCancel(AlertId),
    AlertBackdrop(AlertId),
    /// Item `index` of the menu content built in rebuild `generation`.
    MenuItem { generation: usize, index: usize },
    MenuBackdrop,
}

/// Template instantiation service.
pub trait Templates {
    /// Instantiate a template, optionally under a parent root.
    fn instantiate(&mut self, template: &str, parent: Option<NodeId>) -> NodeId;

    /// Destroy a root and everything under it. Unknown nodes are ignored.
    fn destroy(&mut self, node: NodeId);

    fn set_active(&mut self, node: NodeId, active: bool);

    fn set_text(&mut self, node: NodeId, part: Part, text: &str);

    fn set_image(&mut self, node: NodeId, part: Part, image: &str);

    fn set_part_visible(&mut self, node: NodeId, part: Part, visible: bool);
}

/// Layout and measurement service.
pub trait Layout {
    /// Preferred size of the text currently held by `part`.
    fn preferred_size(&self, node: NodeId, part: Part) -> SizeF;

    fn set_size(&mut self, node: NodeId, part: Part, size: SizeF);

    /// Ask for a layout pass over `node`.
    ///
    /// Hosts with a real layout-complete signal return a receiver resolved
    /// after the pass. `None` means the caller has to wait a few frames instead.
    fn request_layout(&mut self, node: NodeId) -> Option<oneshot::Receiver<()>>;
}

/// Pointer input service.
pub trait Pointer {
    /// Register `target` as the payload for clicks on `part` of `node`.
    ///
    /// Listeners are released together with the node.
    fn listen(&mut self, node: NodeId, part: Part, target: ClickTarget);
}

/// Property sinks written by the animation engine.
pub trait Surface {
    fn offset(&self, node: NodeId) -> Vec2;

    fn set_offset(&mut self, node: NodeId, offset: Vec2);

    /// Set the top padding of the node's rect mask.
    fn set_mask(&mut self, node: NodeId, padding: f32);

    fn set_opacity(&mut self, node: NodeId, part: Part, opacity: f32);
}

/// Input blocking on background surfaces.
pub trait InputGate {
    fn set_input_blocked(&mut self, surface: &str, blocked: bool);
}

/// Everything an overlay manager needs from the host application.
pub trait Host: Templates + Layout + Pointer + Surface + InputGate {}

impl<T: Templates + Layout + Pointer + Surface + InputGate + ?Sized> Host for T {}
