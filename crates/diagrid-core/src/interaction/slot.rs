use super::{Interaction, InteractionId};
use crate::command::InteractionHost;
use crate::viewer::Viewer;
use std::fmt;

/// Payload of the "active interaction changed" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionChanged {
    pub name: &'static str,
    pub id: InteractionId,
    pub is_default: bool,
}

/// Handle returned by [`InteractionSlot::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&InteractionChanged)>;

pub(crate) struct ActiveEntry {
    pub(crate) interaction: Box<dyn Interaction>,
    pub(crate) id: InteractionId,
    pub(crate) is_default: bool,
}

/// Holds the single active interaction.
///
/// The slot starts empty and installs the viewer's default interaction the
/// first time it is needed. Each installation gets a fresh [`InteractionId`],
/// so two activations of the same kind of interaction are distinguishable.
#[derive(Default)]
pub struct InteractionSlot {
    active: Option<ActiveEntry>,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for InteractionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionSlot")
            .field("active", &self.active.as_ref().map(|e| (e.interaction.name(), e.id)))
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl InteractionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for active-interaction changes.
    pub fn subscribe(&mut self, observer: impl FnMut(&InteractionChanged) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Whether an interaction has been installed yet.
    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    pub fn id(&self) -> Option<InteractionId> {
        self.active.as_ref().map(|entry| entry.id)
    }

    pub fn name(&self) -> Option<&'static str> {
        self.active.as_ref().map(|entry| entry.interaction.name())
    }

    /// Whether the active interaction is the view-mode default.
    pub fn is_default(&self) -> bool {
        self.active.as_ref().is_some_and(|entry| entry.is_default)
    }

    /// Install `next` as the active interaction.
    pub fn set_active(&mut self, next: Box<dyn Interaction>, viewer: &mut dyn Viewer) -> InteractionId {
        self.install(next, false, viewer).id
    }

    /// Install the viewer's default interaction for its current view mode.
    pub fn activate_default(&mut self, viewer: &mut dyn Viewer) -> InteractionId {
        let next = viewer.default_interaction();
        self.install(next, true, viewer).id
    }

    /// The active interaction, installing the default on first use.
    pub(crate) fn ensure(&mut self, viewer: &mut dyn Viewer) -> &mut ActiveEntry {
        let entry = match self.active.take() {
            Some(entry) => entry,
            None => {
                let next = viewer.default_interaction();
                self.build(next, true, viewer)
            }
        };
        self.active.insert(entry)
    }

    fn install(&mut self, next: Box<dyn Interaction>, is_default: bool, viewer: &mut dyn Viewer) -> &mut ActiveEntry {
        if let Some(mut previous) = self.active.take() {
            log::debug!("Deactivating interaction '{}' {}", previous.interaction.name(), previous.id);
            previous.interaction.deactivate(viewer);
        }
        let entry = self.build(next, is_default, viewer);
        self.active.insert(entry)
    }

    fn build(&mut self, mut interaction: Box<dyn Interaction>, is_default: bool, viewer: &mut dyn Viewer) -> ActiveEntry {
        self.next_id += 1;
        let id = InteractionId::from_raw(self.next_id);
        interaction.activate(viewer);
        log::debug!("Activated interaction '{}' {}", interaction.name(), id);

        let change = InteractionChanged {
            name: interaction.name(),
            id,
            is_default,
        };
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
        ActiveEntry {
            interaction,
            id,
            is_default,
        }
    }
}

impl InteractionHost for InteractionSlot {
    fn active_interaction_id(&mut self, viewer: &mut dyn Viewer) -> InteractionId {
        self.ensure(viewer).id
    }

    fn restore_default(&mut self, viewer: &mut dyn Viewer) {
        if self.is_default() {
            log::trace!("Default interaction already active");
            return;
        }
        self.activate_default(viewer);
    }
}
