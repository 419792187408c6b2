//! Studio Session
//!
//! The one piece of shared UI state: selected colour, the two artwork slots,
//! their size selections and the active tab. The scene observes it through
//! revision counters instead of ambient globals.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::GarmentColor;
use super::config::IntakeConfig;
use super::error::StudioResult;
use super::intake::{self, CandidateFile, UploadedArtwork};
use super::preview::PreviewRegistry;

/// Which face of the garment an artwork slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Front, Side::Back];

    pub fn index(self) -> usize {
        match self {
            Side::Front => 0,
            Side::Back => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Front => "Front",
            Side::Back => "Back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete decal size classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DecalSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl DecalSize {
    pub fn label(self) -> &'static str {
        match self {
            DecalSize::Small => "small",
            DecalSize::Medium => "medium",
            DecalSize::Large => "large",
        }
    }
}

/// One artwork slot with its size selection.
#[derive(Debug, Clone, Default)]
pub struct ArtworkSlot {
    artwork: Option<UploadedArtwork>,
    size: DecalSize,
}

impl ArtworkSlot {
    pub fn artwork(&self) -> Option<&UploadedArtwork> {
        self.artwork.as_ref()
    }

    pub fn size(&self) -> DecalSize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.artwork.is_none()
    }
}

/// Explicit session state handed to the scene each frame.
#[derive(Debug)]
pub struct StudioSession {
    color: GarmentColor,
    slots: [ArtworkSlot; 2],
    active_tab: Side,
    color_revision: u64,
    decal_revision: u64,
}

impl StudioSession {
    pub fn new(default_color: GarmentColor) -> Self {
        Self {
            color: default_color,
            slots: Default::default(),
            active_tab: Side::Front,
            color_revision: 0,
            decal_revision: 0,
        }
    }

    pub fn color(&self) -> GarmentColor {
        self.color
    }

    pub fn slot(&self, side: Side) -> &ArtworkSlot {
        &self.slots[side.index()]
    }

    pub fn artwork(&self, side: Side) -> Option<&UploadedArtwork> {
        self.slot(side).artwork()
    }

    pub fn size(&self, side: Side) -> DecalSize {
        self.slot(side).size()
    }

    pub fn active_tab(&self) -> Side {
        self.active_tab
    }

    /// Bumped whenever the colour changes.
    pub fn color_revision(&self) -> u64 {
        self.color_revision
    }

    /// Bumped whenever artwork or a size selection changes.
    pub fn decal_revision(&self) -> u64 {
        self.decal_revision
    }

    /// Select a colour. Re-selecting the current colour is a no-op.
    pub fn set_color(&mut self, color: GarmentColor) {
        if self.color != color {
            tracing::debug!(from = %self.color, to = %color, "garment colour changed");
            self.color = color;
            self.color_revision += 1;
        }
    }

    pub fn set_active_tab(&mut self, side: Side) {
        self.active_tab = side;
    }

    pub fn set_size(&mut self, side: Side, size: DecalSize) {
        let slot = &mut self.slots[side.index()];
        if slot.size != size {
            slot.size = size;
            self.decal_revision += 1;
        }
    }

    /// Validate, decode and install an upload. On error the slot is untouched.
    /// A successful upload releases the handle of the artwork it supersedes.
    pub fn upload(
        &mut self,
        side: Side,
        file: CandidateFile,
        config: &IntakeConfig,
        registry: &mut PreviewRegistry,
    ) -> StudioResult<&UploadedArtwork> {
        let artwork = intake::accept(file, config, registry)?;
        self.decal_revision += 1;
        let slot = &mut self.slots[side.index()];
        if let Some(old) = slot.artwork.take() {
            tracing::debug!(%side, name = old.name(), "superseding artwork");
            registry.release(old.handle());
        }
        Ok(slot.artwork.insert(artwork))
    }

    /// Clear a slot. Returns whether anything was removed.
    pub fn remove(&mut self, side: Side, registry: &mut PreviewRegistry) -> bool {
        match self.slots[side.index()].artwork.take() {
            Some(old) => {
                tracing::debug!(%side, name = old.name(), "artwork removed");
                registry.release(old.handle());
                self.decal_revision += 1;
                true
            }
            None => false,
        }
    }

    /// Release every handle this session still owns.
    pub fn clear(&mut self, registry: &mut PreviewRegistry) {
        for side in Side::ALL {
            self.remove(side, registry);
        }
    }

    /// Line shown under the preview for a slot.
    pub fn status_line(&self, side: Side) -> String {
        match self.artwork(side) {
            Some(artwork) => format!("Using design: {}", artwork.name()),
            None => "No design uploaded yet.".to_string(),
        }
    }
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new(GarmentColor::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::intake::tests::png_bytes;

    fn png(name: &str) -> CandidateFile {
        CandidateFile::new(name, "image/png", png_bytes(2, 2))
    }

    #[test]
    fn colour_revision_only_moves_on_change() {
        let mut session = StudioSession::default();
        session.set_color(GarmentColor::DEFAULT);
        assert_eq!(session.color_revision(), 0);
        session.set_color(GarmentColor::from_rgb(1, 2, 3));
        assert_eq!(session.color_revision(), 1);
    }

    #[test]
    fn supersede_releases_old_handle_once() {
        let mut session = StudioSession::default();
        let mut registry = PreviewRegistry::new();
        let config = IntakeConfig::default();

        let first = session
            .upload(Side::Front, png("a.png"), &config, &mut registry)
            .unwrap()
            .handle();
        let second = session
            .upload(Side::Front, png("b.png"), &config, &mut registry)
            .unwrap()
            .handle();

        assert!(!registry.is_live(first));
        assert!(registry.is_live(second));
        assert_eq!(registry.released_count(), 1);
        assert_eq!(session.artwork(Side::Front).unwrap().name(), "b.png");
    }

    #[test]
    fn rejected_upload_keeps_previous_artwork() {
        let mut session = StudioSession::default();
        let mut registry = PreviewRegistry::new();
        let config = IntakeConfig::default();
        session
            .upload(Side::Back, png("keep.png"), &config, &mut registry)
            .unwrap();
        let revision = session.decal_revision();

        let bad = CandidateFile::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(session.upload(Side::Back, bad, &config, &mut registry).is_err());

        assert_eq!(session.artwork(Side::Back).unwrap().name(), "keep.png");
        assert_eq!(session.decal_revision(), revision);
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn status_lines() {
        let mut session = StudioSession::default();
        let mut registry = PreviewRegistry::new();
        assert_eq!(session.status_line(Side::Front), "No design uploaded yet.");
        session
            .upload(Side::Front, png("logo.png"), &IntakeConfig::default(), &mut registry)
            .unwrap();
        assert_eq!(session.status_line(Side::Front), "Using design: logo.png");
        assert_eq!(session.status_line(Side::Back), "No design uploaded yet.");
    }

    #[test]
    fn clear_releases_everything() {
        let mut session = StudioSession::default();
        let mut registry = PreviewRegistry::new();
        let config = IntakeConfig::default();
        session.upload(Side::Front, png("f.png"), &config, &mut registry).unwrap();
        session.upload(Side::Back, png("b.png"), &config, &mut registry).unwrap();
        session.clear(&mut registry);
        assert_eq!(registry.live_count(), 0);
        assert!(session.slot(Side::Front).is_empty());
        assert!(session.slot(Side::Back).is_empty());
    }

    #[test]
    fn size_change_bumps_decal_revision() {
        let mut session = StudioSession::default();
        assert_eq!(session.size(Side::Front), DecalSize::Medium);
        session.set_size(Side::Front, DecalSize::Small);
        assert_eq!(session.decal_revision(), 1);
        session.set_size(Side::Front, DecalSize::Small);
        assert_eq!(session.decal_revision(), 1);
        assert_eq!(session.size(Side::Back), DecalSize::Medium);
    }
}
