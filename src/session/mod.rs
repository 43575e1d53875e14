//! IGV session generation
//!
//! Turns a tab-separated `filepath<TAB>colour` list into a single IGV
//! session XML document: every listed file is declared as a resource, and
//! tracks are placed into up to three constant-height panels with autoscale
//! grouping by sample identity.

pub mod tracks;
pub mod xml;

pub use tracks::{
    read_track_list, sample_groups, RenderKind, TrackCategory, TrackEntry, DEFAULT_COLOUR,
};
pub use xml::render_session;
