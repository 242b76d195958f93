//! In-memory host that records every call made by the overlay managers.
//!
//! Nothing is drawn. Text is measured with a fixed glyph cell using
//! `unicode-width`, layout passes complete when [`HeadlessHost::complete_layout_pass`]
//! is called, and clicks are looked up from the registered listeners.

use std::collections::{HashMap, HashSet};

use tokio::sync::oneshot;
use unicode_width::UnicodeWidthStr;

use super::{ClickTarget, InputGate, Layout, NodeId, Part, Pointer, Surface, Templates};
use crate::geometry::{SizeF, Vec2};

/// Default glyph cell used for text measurement.
pub const DEFAULT_GLYPH: SizeF = SizeF::new(16.0, 32.0);

/// Recorded state of one live node.
#[derive(Debug, Clone, Default)]
pub struct NodeRecord {
    pub template: String,
    pub parent: Option<NodeId>,
    pub active: bool,
    pub texts: HashMap<Part, String>,
    pub images: HashMap<Part, String>,
    pub hidden_parts: HashSet<Part>,
    pub sizes: HashMap<Part, SizeF>,
    pub offset: Vec2,
    pub mask: f32,
    pub opacity: HashMap<Part, f32>,
}

/// Headless [`Host`](super::Host) implementation.
#[derive(Debug)]
pub struct HeadlessHost {
    next_id: u64,
    nodes: HashMap<NodeId, NodeRecord>,
    listeners: HashMap<(NodeId, Part), ClickTarget>,
    blocked: HashSet<String>,
    instantiated: HashMap<String, usize>,
    destroyed: usize,
    pending_layouts: Vec<(NodeId, oneshot::Sender<()>)>,
    layout_signal: bool,
    glyph: SizeF,
}

impl HeadlessHost {
    /// Create a host that signals completed layout passes.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            nodes: HashMap::new(),
            listeners: HashMap::new(),
            blocked: HashSet::new(),
            instantiated: HashMap::new(),
            destroyed: 0,
            pending_layouts: Vec::new(),
            layout_signal: true,
            glyph: DEFAULT_GLYPH,
        }
    }

    /// Create a host without a layout-complete signal.
    ///
    /// Managers fall back to waiting settle frames on such hosts.
    pub fn without_layout_signal() -> Self {
        Self {
            layout_signal: false,
            ..Self::new()
        }
    }

    /// Set the glyph cell used for text measurement.
    pub fn with_glyph(mut self, glyph: SizeF) -> Self {
        self.glyph = glyph;
        self
    }

    /// Complete every requested layout pass.
    ///
    /// Returns the number of passes that were waiting.
    pub fn complete_layout_pass(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending_layouts);
        let count = pending.len();
        for (_, tx) in pending {
            let _ = tx.send(());
        }
        count
    }

    /// Number of layout passes still waiting for completion.
    pub fn pending_layout_passes(&self) -> usize {
        self.pending_layouts.len()
    }

    pub fn node(&self, node: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&node)
    }

    pub fn is_live(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.active)
    }

    pub fn text(&self, node: NodeId, part: Part) -> Option<&str> {
        self.nodes
            .get(&node)
            .and_then(|n| n.texts.get(&part))
            .map(String::as_str)
    }

    pub fn size(&self, node: NodeId, part: Part) -> Option<SizeF> {
        self.nodes.get(&node).and_then(|n| n.sizes.get(&part)).copied()
    }

    pub fn opacity(&self, node: NodeId, part: Part) -> Option<f32> {
        self.nodes
            .get(&node)
            .and_then(|n| n.opacity.get(&part))
            .copied()
    }

    pub fn mask(&self, node: NodeId) -> Option<f32> {
        self.nodes.get(&node).map(|n| n.mask)
    }

    pub fn is_part_visible(&self, node: NodeId, part: Part) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|n| !n.hidden_parts.contains(&part))
    }

    /// Payload that a click on `part` of `node` would deliver.
    pub fn click_target(&self, node: NodeId, part: Part) -> Option<ClickTarget> {
        self.listeners.get(&(node, part)).cloned()
    }

    pub fn is_blocked(&self, surface: &str) -> bool {
        self.blocked.contains(surface)
    }

    /// Total number of times `template` was instantiated.
    pub fn instantiated(&self, template: &str) -> usize {
        self.instantiated.get(template).copied().unwrap_or(0)
    }

    /// Live nodes instantiated from `template`.
    pub fn live_nodes(&self, template: &str) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.template == template)
            .map(|(id, _)| *id)
            .collect();
        nodes.sort();
        nodes
    }

    /// Live children of `parent`, in creation order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect();
        nodes.sort();
        nodes
    }

    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn destroyed_count(&self) -> usize {
        self.destroyed
    }

    fn record_mut(&mut self, node: NodeId) -> Option<&mut NodeRecord> {
        let record = self.nodes.get_mut(&node);
        if record.is_none() {
            log::debug!("HeadlessHost: write to unknown node {}", node);
        }
        record
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Templates for HeadlessHost {
    fn instantiate(&mut self, template: &str, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeRecord {
                template: template.to_string(),
                parent,
                ..Default::default()
            },
        );
        *self.instantiated.entry(template.to_string()).or_insert(0) += 1;
        id
    }

    fn destroy(&mut self, node: NodeId) {
        if self.nodes.remove(&node).is_none() {
            return;
        }
        self.destroyed += 1;
        self.listeners.retain(|(owner, _), _| *owner != node);
        // Dropping the sender closes the receiver.
        self.pending_layouts.retain(|(owner, _)| *owner != node);

        let children: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(node))
            .map(|(id, _)| *id)
            .collect();
        for child in children {
            self.destroy(child);
        }
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(record) = self.record_mut(node) {
            record.active = active;
        }
    }

    fn set_text(&mut self, node: NodeId, part: Part, text: &str) {
        if let Some(record) = self.record_mut(node) {
            record.texts.insert(part, text.to_string());
        }
    }

    fn set_image(&mut self, node: NodeId, part: Part, image: &str) {
        if let Some(record) = self.record_mut(node) {
            record.images.insert(part, image.to_string());
        }
    }

    fn set_part_visible(&mut self, node: NodeId, part: Part, visible: bool) {
        if let Some(record) = self.record_mut(node) {
            if visible {
                record.hidden_parts.remove(&part);
            } else {
                record.hidden_parts.insert(part);
            }
        }
    }
}

impl Layout for HeadlessHost {
    fn preferred_size(&self, node: NodeId, part: Part) -> SizeF {
        let Some(text) = self.text(node, part) else {
            return SizeF::ZERO;
        };
        let lines: Vec<&str> = text.lines().collect();
        let columns = lines.iter().map(|l| l.width()).max().unwrap_or(0);
        SizeF::new(
            columns as f32 * self.glyph.width,
            lines.len() as f32 * self.glyph.height,
        )
    }

    fn set_size(&mut self, node: NodeId, part: Part, size: SizeF) {
        if let Some(record) = self.record_mut(node) {
            record.sizes.insert(part, size);
        }
    }

    fn request_layout(&mut self, node: NodeId) -> Option<oneshot::Receiver<()>> {
        if !self.layout_signal || !self.nodes.contains_key(&node) {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        self.pending_layouts.push((node, tx));
        Some(rx)
    }
}

impl Pointer for HeadlessHost {
    fn listen(&mut self, node: NodeId, part: Part, target: ClickTarget) {
        if self.nodes.contains_key(&node) {
            self.listeners.insert((node, part), target);
        }
    }
}

impl Surface for HeadlessHost {
    fn offset(&self, node: NodeId) -> Vec2 {
        self.nodes.get(&node).map(|n| n.offset).unwrap_or_default()
    }

    fn set_offset(&mut self, node: NodeId, offset: Vec2) {
        if let Some(record) = self.record_mut(node) {
            record.offset = offset;
        }
    }

    fn set_mask(&mut self, node: NodeId, padding: f32) {
        if let Some(record) = self.record_mut(node) {
            record.mask = padding;
        }
    }

    fn set_opacity(&mut self, node: NodeId, part: Part, opacity: f32) {
        if let Some(record) = self.record_mut(node) {
            record.opacity.insert(part, opacity);
        }
    }
}

impl InputGate for HeadlessHost {
    fn set_input_blocked(&mut self, surface: &str, blocked: bool) {
        if blocked {
            self.blocked.insert(surface.to_string());
        } else {
            self.blocked.remove(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_size_uses_widest_line() {
        let mut host = HeadlessHost::new().with_glyph(SizeF::new(10.0, 20.0));
        let node = host.instantiate("alert", None);
        host.set_text(node, Part::Body, "abc\nabcdef");
        assert_eq!(host.preferred_size(node, Part::Body), SizeF::new(60.0, 40.0));
    }

    #[test]
    fn test_destroy_releases_children_and_listeners() {
        let mut host = HeadlessHost::new();
        let parent = host.instantiate("menu", None);
        let child = host.instantiate("item", Some(parent));
        host.listen(child, Part::Root, ClickTarget::MenuItem {
                generation: 1,
                index: 0,
            });

        host.destroy(parent);

        assert!(!host.is_live(child));
        assert_eq!(host.click_target(child, Part::Root), None);
        assert_eq!(host.destroyed_count(), 2);
    }

    #[test]
    fn test_layout_pass_receiver_closes_on_destroy() {
        let mut host = HeadlessHost::new();
        let node = host.instantiate("toast", None);
        let mut rx = host.request_layout(node).expect("layout signal");
        host.destroy(node);
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }
}
