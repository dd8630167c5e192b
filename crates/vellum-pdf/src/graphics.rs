//! Extended graphics state management.
//!
//! [PDF 32000-1:2008 § 8.4.5 Graphics state parameter dictionaries]
//!
//! Alpha values cannot be set inline in a content stream; each distinct
//! fill alpha needs an ExtGState resource entry selected with the `gs`
//! operator. The manager deduplicates entries by the alpha value rounded
//! to four decimals, so float noise does not spawn new states.

use std::collections::BTreeMap;

use crate::object::Object;

/// Allocates stable ExtGState names per fill alpha.
#[derive(Debug, Default)]
pub struct GraphicsStateManager {
    /// Rounded alpha key (α × 10000) → resource name.
    states: BTreeMap<u32, String>,
}

impl GraphicsStateManager {
    /// A manager with no states yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the resource name for the given fill alpha, creating a new
    /// ExtGState entry on first use. Names are stable for the lifetime of
    /// the page (`GS0`, `GS1`, ...).
    pub fn ensure_fill_alpha(&mut self, alpha: f32) -> String {
        let key = (alpha.clamp(0.0, 1.0) * 10_000.0).round() as u32;
        if let Some(name) = self.states.get(&key) {
            return name.clone();
        }
        let name = format!("GS{}", self.states.len());
        let _ = self.states.insert(key, name.clone());
        name
    }

    /// True when no state was ever requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Materialize the `/ExtGState` resource entries: name → dictionary
    /// setting both stroking (`CA`) and non-stroking (`ca`) alpha.
    #[must_use]
    pub fn resource_entries(&self) -> BTreeMap<String, Object> {
        self.states
            .iter()
            .map(|(key, name)| {
                let alpha = *key as f32 / 10_000.0;
                (
                    name.clone(),
                    Object::dict([("CA", Object::Real(alpha)), ("ca", Object::Real(alpha))]),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_alphas_share_a_state() {
        let mut gs = GraphicsStateManager::new();
        let a = gs.ensure_fill_alpha(0.5);
        let b = gs.ensure_fill_alpha(0.500_01);
        assert_eq!(a, b);
        assert_eq!(gs.resource_entries().len(), 1);
    }

    #[test]
    fn distinct_alphas_get_distinct_names() {
        let mut gs = GraphicsStateManager::new();
        let a = gs.ensure_fill_alpha(0.25);
        let b = gs.ensure_fill_alpha(0.75);
        assert_ne!(a, b);
    }
}
