//! Text bindings
//!
//! A binding remembers which row (and, for dynamic bindings, which argument
//! values) an external text target shows, so that fresh text can be pushed
//! into it after a language change or table reload. Targets are held weakly;
//! dropping a target ends its binding.

use crate::placeholder::ArgValue;
use std::sync::{Arc, Weak};

/// Something that displays localized text.
///
/// `font` is the font selector of the active language, if one is configured.
/// Implemented for closures taking `(&str, Option<&str>)`.
pub trait TextTarget: Send + Sync {
    fn set_text(&self, text: &str, font: Option<&str>);
}

impl<F> TextTarget for F
where
    F: Fn(&str, Option<&str>) + Send + Sync,
{
    fn set_text(&self, text: &str, font: Option<&str>) {
        self(text, font)
    }
}

/// What a binding displays.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingKind {
    /// The raw cell of a row
    Static,
    /// A row with placeholders replaced by these values
    Dynamic(Vec<ArgValue>),
}

/// Identity of a target: the address of its allocation.
///
/// Stable while the registry holds a `Weak` to it, since the allocation
/// outlives the value until every weak reference is gone.
pub(crate) fn target_id<T: ?Sized>(target: &Arc<T>) -> usize {
    Arc::as_ptr(target) as *const () as usize
}

struct Binding {
    id: usize,
    target: Weak<dyn TextTarget>,
    row: usize,
    kind: BindingKind,
    last_text: String,
}

/// A live binding ready to receive text.
pub(crate) struct LiveBinding {
    pub id: usize,
    pub target: Arc<dyn TextTarget>,
    pub row: usize,
    pub kind: BindingKind,
}

/// Registered targets, at most one binding each.
#[derive(Default)]
pub(crate) struct BindingRegistry {
    entries: Vec<Binding>,
}

impl BindingRegistry {
    /// Register `target` or update its existing binding in place.
    ///
    /// Returns `true` when the target was not bound before.
    pub fn upsert(
        &mut self,
        id: usize,
        target: Weak<dyn TextTarget>,
        row: usize,
        kind: BindingKind,
        text: String,
    ) -> bool {
        self.prune();

        if let Some(existing) = self.entries.iter_mut().find(|b| b.id == id) {
            existing.row = row;
            existing.kind = kind;
            existing.last_text = text;
            return false;
        }

        self.entries.push(Binding {
            id,
            target,
            row,
            kind,
            last_text: text,
        });
        true
    }

    pub fn remove(&mut self, id: usize) -> bool {
        let before = self.entries.len();
        self.entries.retain(|b| b.id != id);
        self.entries.len() != before
    }

    /// Forget bindings whose target was dropped; returns how many.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|b| b.target.strong_count() > 0);
        before - self.entries.len()
    }

    /// Upgrade every binding, pruning dead ones.
    pub fn live(&mut self) -> Vec<LiveBinding> {
        self.prune();
        self.entries
            .iter()
            .filter_map(|b| {
                Some(LiveBinding {
                    id: b.id,
                    target: b.target.upgrade()?,
                    row: b.row,
                    kind: b.kind.clone(),
                })
            })
            .collect()
    }

    pub fn record_text(&mut self, id: usize, text: &str) {
        if let Some(binding) = self.entries.iter_mut().find(|b| b.id == id) {
            binding.last_text = text.to_string();
        }
    }

    pub fn last_text(&self, id: usize) -> Option<&str> {
        self.entries
            .iter()
            .find(|b| b.id == id && b.target.strong_count() > 0)
            .map(|b| b.last_text.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Label {
        text: Mutex<String>,
    }

    impl TextTarget for Label {
        fn set_text(&self, text: &str, _font: Option<&str>) {
            *self.text.lock() = text.to_string();
        }
    }

    fn weak(label: &Arc<Label>) -> Weak<dyn TextTarget> {
        let weak: Weak<Label> = Arc::downgrade(label);
        weak
    }

    #[test]
    fn test_rebinding_updates_in_place() {
        let label = Arc::new(Label::default());
        let id = target_id(&label);
        let mut registry = BindingRegistry::default();

        assert!(registry.upsert(id, weak(&label), 1, BindingKind::Static, "Hello".into()));
        assert!(!registry.upsert(
            id,
            weak(&label),
            2,
            BindingKind::Dynamic(args![5]),
            "5 coins".into()
        ));

        assert_eq!(registry.len(), 1);
        let live = registry.live();
        assert_eq!(live[0].row, 2);
        assert_eq!(live[0].kind, BindingKind::Dynamic(args![5]));
        assert_eq!(registry.last_text(id), Some("5 coins"));
    }

    #[test]
    fn test_dropped_targets_are_pruned() {
        let kept = Arc::new(Label::default());
        let dropped = Arc::new(Label::default());
        let mut registry = BindingRegistry::default();
        registry.upsert(target_id(&kept), weak(&kept), 1, BindingKind::Static, String::new());
        registry.upsert(target_id(&dropped), weak(&dropped), 2, BindingKind::Static, String::new());

        drop(dropped);
        let live = registry.live();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].row, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove() {
        let label = Arc::new(Label::default());
        let mut registry = BindingRegistry::default();
        registry.upsert(target_id(&label), weak(&label), 1, BindingKind::Static, String::new());

        assert!(registry.remove(target_id(&label)));
        assert!(!registry.remove(target_id(&label)));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_closure_targets() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let target = move |text: &str, font: Option<&str>| {
            sink.lock().push((text.to_string(), font.map(str::to_string)));
        };

        target.set_text("Hello", Some("NotoSans"));
        assert_eq!(
            seen.lock().as_slice(),
            &[("Hello".to_string(), Some("NotoSans".to_string()))]
        );
    }
}
