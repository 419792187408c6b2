//! Studio Module
//!
//! Everything the garment customizer knows outside of the GPU: configuration,
//! colour handling, upload intake, the session state, notices, the generation
//! seam and snapshot export.

pub mod color;
pub mod config;
pub mod error;
pub mod generation;
pub mod intake;
pub mod notice;
pub mod preview;
pub mod session;
pub mod snapshot;

pub use color::{GarmentColor, SWATCHES, Swatch};
pub use config::StudioConfig;
pub use error::{ErrorKind, StudioError, StudioResult};
pub use generation::{DesignGenerator, UnavailableGenerator};
pub use intake::{CandidateFile, UploadedArtwork};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use session::{ArtworkSlot, DecalSize, Side, StudioSession};
pub use snapshot::{ExportedSnapshot, FrameSource, SnapshotExporter};
