//! Input Bindings Module
//!
//! Maps physical keys to studio actions so the app loop only deals with
//! logical actions.

use std::collections::HashMap;

use crate::studio::session::{DecalSize, Side};

/// Physical keys the studio listens to, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Tab,
    S,
    M,
    L,
    P,
    G,
    R,
    Delete,
    Backspace,
    Escape,
}

/// Logical studio actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudioAction {
    /// Pick the swatch at this index.
    SelectSwatch(usize),
    /// Switch the active tab between front and back.
    ToggleTab,
    /// Set the decal size of the active tab.
    SetSize(DecalSize),
    /// Remove the artwork of the active tab.
    RemoveArtwork,
    /// Export the current view as a PNG.
    ExportSnapshot,
    /// Ask the generation service for a design.
    GenerateDesign,
    ResetCamera,
    Quit,
}

/// Maps physical keys to logical actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, StudioAction>,
}

impl Default for KeyBindings {
    /// Default bindings:
    /// - 1..8 = swatches
    /// - Tab = front/back
    /// - S/M/L = decal size
    /// - Delete/Backspace = remove artwork
    /// - P = export snapshot, G = generate, R = reset camera, Esc = quit
    fn default() -> Self {
        let digits = [
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
        ];
        let mut key_to_action: HashMap<KeyCode, StudioAction> = digits
            .into_iter()
            .enumerate()
            .map(|(i, key)| (key, StudioAction::SelectSwatch(i)))
            .collect();
        key_to_action.extend([
            (KeyCode::Tab, StudioAction::ToggleTab),
            (KeyCode::S, StudioAction::SetSize(DecalSize::Small)),
            (KeyCode::M, StudioAction::SetSize(DecalSize::Medium)),
            (KeyCode::L, StudioAction::SetSize(DecalSize::Large)),
            (KeyCode::Delete, StudioAction::RemoveArtwork),
            (KeyCode::Backspace, StudioAction::RemoveArtwork),
            (KeyCode::P, StudioAction::ExportSnapshot),
            (KeyCode::G, StudioAction::GenerateDesign),
            (KeyCode::R, StudioAction::ResetCamera),
            (KeyCode::Escape, StudioAction::Quit),
        ]);
        Self { key_to_action }
    }
}

impl KeyBindings {
    pub fn action(&self, key: KeyCode) -> Option<StudioAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Rebind a key, replacing whatever it did before.
    pub fn bind(&mut self, key: KeyCode, action: StudioAction) {
        self.key_to_action.insert(key, action);
    }
}

/// Slot a file drop should land in: the active tab, unless the drop happened
/// clearly over one half of the viewport (left = front, right = back).
pub fn drop_target(active_tab: Side, horizontal_fraction: Option<f32>) -> Side {
    match horizontal_fraction {
        Some(f) if f < 0.25 => Side::Front,
        Some(f) if f > 0.75 => Side::Back,
        _ => active_tab,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_swatches() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action(KeyCode::Digit1), Some(StudioAction::SelectSwatch(0)));
        assert_eq!(bindings.action(KeyCode::Digit8), Some(StudioAction::SelectSwatch(7)));
    }

    #[test]
    fn size_keys() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.action(KeyCode::S),
            Some(StudioAction::SetSize(DecalSize::Small))
        );
        assert_eq!(
            bindings.action(KeyCode::L),
            Some(StudioAction::SetSize(DecalSize::Large))
        );
    }

    #[test]
    fn rebinding_replaces() {
        let mut bindings = KeyBindings::default();
        bindings.bind(KeyCode::P, StudioAction::ResetCamera);
        assert_eq!(bindings.action(KeyCode::P), Some(StudioAction::ResetCamera));
    }

    #[test]
    fn drop_target_prefers_viewport_edges() {
        assert_eq!(drop_target(Side::Back, Some(0.1)), Side::Front);
        assert_eq!(drop_target(Side::Front, Some(0.9)), Side::Back);
        assert_eq!(drop_target(Side::Back, Some(0.5)), Side::Back);
        assert_eq!(drop_target(Side::Front, None), Side::Front);
    }
}
