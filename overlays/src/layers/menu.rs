//! Dropdown menu.
//!
//! There is a single menu surface, reused for every menu type in the catalog.
//! Opening a different type swaps the item views before the reveal; opening
//! the type already shown only re-asserts it. While the menu is up a modal
//! backdrop catches outside clicks and closes it.

use std::fmt;
use std::time::Duration;

use crate::config::{MenuConfig, MenuContent, duration_or};
use crate::error::OverlayError;
use crate::geometry::SizeF;
use crate::host::{ClickTarget, Host, NodeId, Part, Templates};
use crate::registry::{
    InstanceState, OverlayKind, OverlayRegistry, OverlayRoots, Singleton, TemplateRefs,
};
use crate::runtime::{AnimationState, AnimatorEvent, Curves, FlyIn, Motion, OverlayAnimator};

/// Callback invoked with the index of the clicked item.
pub type MenuCallback = Box<dyn FnMut(usize)>;

/// Which menu to show and what to do when an item is picked.
#[derive(Default)]
pub struct MenuParameter {
    /// Catalog key of the menu content.
    pub menu_type: String,
    pub duration: Option<Duration>,
    pub on_item_click: Option<MenuCallback>,
}

impl MenuParameter {
    pub fn new(menu_type: impl Into<String>) -> Self {
        Self {
            menu_type: menu_type.into(),
            ..Default::default()
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn on_item_click<F: FnMut(usize) + 'static>(mut self, f: F) -> Self {
        self.on_item_click = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for MenuParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuParameter")
            .field("menu_type", &self.menu_type)
            .field("duration", &self.duration)
            .field("on_item_click", &self.on_item_click.is_some())
            .finish()
    }
}

/// Menu size for `item_count` items: fixed width, arrow plus items plus padding high.
pub fn compute_menu_size(config: &MenuConfig, item_count: usize) -> SizeF {
    let height = config.arrow_height
        + item_count as f32 * config.item_height
        + config.padding_top
        + config.padding_bottom;
    SizeF::new(config.width, height)
}

/// State of the menu surface.
pub struct MenuSurface {
    animator: OverlayAnimator,
    items: Vec<NodeId>,
    /// Rebuild that produced `items`; stamped into their click payloads.
    generation: usize,
    menu_type: Option<String>,
    on_item_click: Option<MenuCallback>,
    duration: Duration,
    size: SizeF,
}

impl fmt::Debug for MenuSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuSurface")
            .field("animator", &self.animator)
            .field("items", &self.items)
            .field("generation", &self.generation)
            .field("menu_type", &self.menu_type)
            .field("duration", &self.duration)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl MenuSurface {
    fn remove_items<T: Templates + ?Sized>(&mut self, templates: &mut T) {
        for node in self.items.drain(..) {
            templates.destroy(node);
        }
    }
}

impl InstanceState for MenuSurface {
    fn is_transitioning(&self) -> bool {
        self.animator.is_transitioning()
    }

    fn release<T: Templates + ?Sized>(&mut self, templates: &mut T) {
        self.remove_items(templates);
        self.menu_type = None;
        self.on_item_click = None;
    }
}

fn build_items<H: Host + ?Sized>(
    config: &MenuConfig,
    content: &MenuContent,
    parent: NodeId,
    generation: usize,
    host: &mut H,
) -> Vec<NodeId> {
    let count = content.items.len();
    content
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let node = host.instantiate(&content.item_template, Some(parent));
            host.set_size(node, Part::Root, SizeF::new(config.width, config.item_height));
            host.set_text(node, Part::ItemLabel, &item.text);
            match &item.icon {
                Some(icon) => host.set_image(node, Part::ItemIcon, icon),
                None => host.set_part_visible(node, Part::ItemIcon, false),
            }
            if index + 1 == count && !config.show_divider_on_last {
                host.set_part_visible(node, Part::ItemDivider, false);
            }
            host.listen(node, Part::Root, ClickTarget::MenuItem { generation, index });
            node
        })
        .collect()
}

/// Runs the reveal of a hidden menu: activate, size, then play the mask.
fn show<H: Host + ?Sized>(
    config: &MenuConfig,
    roots: OverlayRoots,
    surface: &mut MenuSurface,
    host: &mut H,
) {
    roots.set_active(&mut *host, true);
    let size = compute_menu_size(config, surface.items.len());
    host.set_size(roots.content, Part::Root, size);
    surface.size = size;
    surface.animator.set_extent(size.height);
    surface.animator.play(FlyIn::None, surface.duration, host);
}

/// Manages the singleton menu surface.
#[derive(Debug)]
pub struct MenuManager {
    config: MenuConfig,
    registry: OverlayRegistry<Singleton, MenuSurface>,
    rebuilds: usize,
}

impl MenuManager {
    pub fn new(config: MenuConfig) -> Self {
        Self {
            config,
            registry: OverlayRegistry::new(OverlayKind::Menu),
            rebuilds: 0,
        }
    }

    /// Show the menu of `param.menu_type`.
    ///
    /// - unknown or empty types fail without touching the surface
    /// - the type already shown is only re-asserted
    /// - a different type rebuilds the items and replays the reveal
    /// - requests while the menu is animating are dropped
    pub fn try_open<H: Host + ?Sized>(
        &mut self,
        param: MenuParameter,
        host: &mut H,
    ) -> Result<(), OverlayError> {
        let MenuParameter {
            menu_type,
            duration,
            on_item_click,
        } = param;

        let content = self
            .config
            .catalog
            .get(&menu_type)
            .ok_or_else(|| OverlayError::UnknownMenu(menu_type.clone()))?;
        if content.items.is_empty() {
            return Err(OverlayError::EmptyMenu(menu_type));
        }
        if self.state().is_transitioning() {
            return Err(OverlayError::InTransition {
                kind: OverlayKind::Menu,
            });
        }

        let fresh = !self.registry.contains(&Singleton);
        let templates = TemplateRefs {
            backdrop: Some(&self.config.backdrop_template),
            content: &self.config.template,
        };
        let instance = self.registry.create(templates, &mut *host, |_, roots| MenuSurface {
            animator: OverlayAnimator::new(
                roots.content,
                Motion::Mask { extent: 0.0 },
                Curves::default(),
            ),
            items: Vec::new(),
            generation: 0,
            menu_type: None,
            on_item_click: None,
            duration: Duration::ZERO,
            size: SizeF::ZERO,
        });
        let roots = instance.roots;
        if let Some(backdrop) = roots.backdrop.filter(|_| fresh) {
            host.listen(backdrop, Part::Root, ClickTarget::MenuBackdrop);
        }

        let surface = &mut instance.state;
        surface.on_item_click = on_item_click;
        surface.duration = duration_or(duration, self.config.default_duration());

        if surface.menu_type.as_deref() == Some(menu_type.as_str()) {
            if surface.animator.state() == AnimationState::Displayed {
                log::debug!("menu '{}': already displayed", menu_type);
                return Ok(());
            }
        } else {
            surface.remove_items(&mut *host);
            self.rebuilds += 1;
            surface.generation = self.rebuilds;
            surface.items =
                build_items(&self.config, content, roots.content, self.rebuilds, &mut *host);
            log::debug!(
                "menu: rebuilt {} items for '{}' (was {:?})",
                surface.items.len(),
                menu_type,
                surface.menu_type
            );
            surface.menu_type = Some(menu_type);
            surface.animator.snap_hidden(&mut *host);
        }

        show(&self.config, roots, surface, host);
        log::debug!("menu: displaying {}", surface.size);
        Ok(())
    }

    /// Show a menu, logging instead of failing.
    pub fn open<H: Host + ?Sized>(&mut self, param: MenuParameter, host: &mut H) {
        if let Err(e) = self.try_open(param, host) {
            e.report();
        }
    }

    /// Start hiding the menu.
    pub fn try_close<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), OverlayError> {
        let instance = self
            .registry
            .lookup_mut(&Singleton)
            .filter(|i| i.state.animator.state() != AnimationState::Hidden)
            .ok_or_else(|| OverlayError::NotFound {
                kind: OverlayKind::Menu,
                id: Singleton.to_string(),
            })?;
        if !instance.state.animator.reverse(host) {
            return Err(OverlayError::InTransition {
                kind: OverlayKind::Menu,
            });
        }
        log::debug!("menu: hiding");
        Ok(())
    }

    /// Hide the menu, logging instead of failing.
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Err(e) = self.try_close(host) {
            e.report();
        }
    }

    /// Hide when displayed, show the last content when hidden, otherwise nothing.
    pub fn toggle<H: Host + ?Sized>(&mut self, host: &mut H) {
        match self.state() {
            AnimationState::Displayed => self.close(host),
            AnimationState::Hidden => {
                let Some(instance) = self.registry.lookup_mut(&Singleton) else {
                    log::debug!("menu: toggle before any content was opened");
                    return;
                };
                if instance.state.items.is_empty() {
                    log::debug!("menu: toggle without content");
                    return;
                }
                let roots = instance.roots;
                show(&self.config, roots, &mut instance.state, host);
            }
            AnimationState::Displaying | AnimationState::Hiding => {
                log::debug!("menu: toggle dropped mid-transition");
            }
        }
    }

    /// Handle a click routed to the menu. Returns true if it was consumed.
    ///
    /// An item click closes the menu first and then reports the index. Clicks
    /// for items of an earlier rebuild, or past the current items, are dropped.
    pub fn on_click<H: Host + ?Sized>(&mut self, target: &ClickTarget, host: &mut H) -> bool {
        match *target {
            ClickTarget::MenuBackdrop => {
                self.close(host);
                true
            }
            ClickTarget::MenuItem { generation, index } => {
                if self.state() != AnimationState::Displayed {
                    log::debug!("menu: item {} click ignored in state {:?}", index, self.state());
                    return true;
                }
                if self.item_target(index) != Some(ClickTarget::MenuItem { generation, index }) {
                    log::debug!("menu: stale item click {} of rebuild {}", index, generation);
                    return true;
                }
                self.close(host);
                if let Some(callback) = self
                    .registry
                    .lookup_mut(&Singleton)
                    .and_then(|i| i.state.on_item_click.as_mut())
                {
                    callback(index);
                }
                true
            }
            _ => false,
        }
    }

    /// Click payload of item `index` in the current content.
    pub fn item_target(&self, index: usize) -> Option<ClickTarget> {
        let surface = &self.registry.lookup(&Singleton)?.state;
        (index < surface.items.len()).then_some(ClickTarget::MenuItem {
            generation: surface.generation,
            index,
        })
    }

    /// Advance the menu animation by one frame.
    pub fn advance<H: Host + ?Sized>(&mut self, dt: Duration, host: &mut H) {
        let Some(instance) = self.registry.lookup_mut(&Singleton) else {
            return;
        };
        match instance.state.animator.advance(dt, &mut *host) {
            Some(AnimatorEvent::Shown) => log::debug!("menu: displayed"),
            Some(AnimatorEvent::Hidden) => {
                instance.roots.set_active(host, false);
                log::debug!("menu: hidden");
            }
            None => {}
        }
    }

    pub fn state(&self) -> AnimationState {
        self.registry
            .lookup(&Singleton)
            .map(|i| i.state.animator.state())
            .unwrap_or_default()
    }

    /// Catalog key of the content currently built into the surface.
    pub fn current_type(&self) -> Option<&str> {
        self.registry
            .lookup(&Singleton)
            .and_then(|i| i.state.menu_type.as_deref())
    }

    /// Number of times item views were rebuilt.
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    /// Item views currently under the menu root.
    pub fn items(&self) -> &[NodeId] {
        self.registry
            .lookup(&Singleton)
            .map(|i| i.state.items.as_slice())
            .unwrap_or_default()
    }

    /// Size applied at the last reveal.
    pub fn size(&self) -> Option<SizeF> {
        self.registry.lookup(&Singleton).map(|i| i.state.size)
    }

    pub fn roots(&self) -> Option<OverlayRoots> {
        self.registry.lookup(&Singleton).map(|i| i.roots)
    }

    pub fn pause(&mut self) {
        if let Some(instance) = self.registry.lookup_mut(&Singleton) {
            instance.state.animator.pause();
        }
    }

    pub fn resume(&mut self) {
        if let Some(instance) = self.registry.lookup_mut(&Singleton) {
            instance.state.animator.resume();
        }
    }

    /// Release the surface, its items and the backdrop.
    pub fn shutdown<T: Templates + ?Sized>(&mut self, host: &mut T) -> usize {
        if let Some(instance) = self.registry.lookup_mut(&Singleton) {
            instance.state.animator.stop();
        }
        self.registry.dispose_all(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_size_counts_arrow_items_and_padding() {
        let config = MenuConfig::default();
        assert_eq!(compute_menu_size(&config, 3), SizeF::new(360.0, 24.0 + 3.0 * 96.0 + 32.0));
        assert_eq!(compute_menu_size(&config, 0), SizeF::new(360.0, 56.0));
    }
}
