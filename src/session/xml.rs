//! IGV session document rendering
//!
//! Emits the session XML with quick-xml events. Attribute sets and panel
//! geometry follow what IGV snapshots of this pipeline have always used;
//! the `name` attribute is the file basename, the `id` the full path as
//! listed (plus any prefix).

use crate::core::SessionError;
use crate::session::tracks::{sample_groups, RenderKind, TrackCategory, TrackEntry};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::path::Path;

const PANEL_WIDTH: &str = "1901";
const DATA_PANEL_HEIGHT: &str = "3537";
const SIDE_PANEL_HEIGHT: &str = "351";

const ALT_COLOUR: &str = "0,0,178";
const ANNOTATION_COLOUR: &str = "0,48,73";

const FEATURE_TRACK_CLASS: &str = "org.broad.igv.track.FeatureTrack";
const DATA_TRACK_CLASS: &str = "org.broad.igv.track.DataSourceTrack";

type XmlWriter = Writer<Vec<u8>>;

fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Render the complete session document for a track list.
///
/// Every entry becomes a `<Resource>`; panel membership and autoscale
/// grouping follow the entry classification rules in [`super::tracks`].
pub fn render_session(
    entries: &[TrackEntry],
    genome: &str,
    annotation: &str,
) -> Result<String, SessionError> {
    let groups = sample_groups(entries);
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

    let mut session = BytesStart::new("Session");
    session.push_attribute(("genome", genome));
    session.push_attribute(("hasGeneTrack", "true"));
    session.push_attribute(("hasSequenceTrack", "true"));
    session.push_attribute(("locus", "All"));
    session.push_attribute(("version", "8"));
    writer.write_event(Event::Start(session))?;

    // Every input file is declared, rendered or not
    writer.write_event(Event::Start(BytesStart::new("Resources")))?;
    for entry in entries {
        let mut resource = BytesStart::new("Resource");
        resource.push_attribute(("path", entry.path.as_str()));
        writer.write_event(Event::Empty(resource))?;
    }
    let mut resource = BytesStart::new("Resource");
    let annotation_resource = format!("./{annotation}");
    resource.push_attribute(("path", annotation_resource.as_str()));
    writer.write_event(Event::Empty(resource))?;
    writer.write_event(Event::End(BytesEnd::new("Resources")))?;

    let signal: Vec<&TrackEntry> = entries
        .iter()
        .filter(|e| e.category() == TrackCategory::Signal)
        .collect();
    let log2ratio: Vec<&TrackEntry> = entries
        .iter()
        .filter(|e| e.category() == TrackCategory::Log2Ratio)
        .collect();
    let subtract: Vec<&TrackEntry> = entries
        .iter()
        .filter(|e| e.category() == TrackCategory::Subtract)
        .collect();

    // Primary panel: annotation first, then gene models, intervals, signal
    write_panel_start(&mut writer, "DataPanel", DATA_PANEL_HEIGHT)?;
    write_feature_track(
        &mut writer,
        annotation,
        basename(annotation),
        ANNOTATION_COLOUR,
        "COLLAPSED",
        None,
    )?;
    for entry in &signal {
        if entry.render_kind() == RenderKind::GeneModel {
            write_feature_track(
                &mut writer,
                &entry.path,
                entry.basename(),
                &entry.colour,
                "COLLAPSED",
                None,
            )?;
        }
    }
    for entry in &signal {
        if entry.render_kind() == RenderKind::Intervals {
            write_feature_track(
                &mut writer,
                &entry.path,
                entry.basename(),
                &entry.colour,
                "SQUISHED",
                Some("20"),
            )?;
        }
    }
    for entry in &signal {
        if entry.render_kind() == RenderKind::ContinuousSignal {
            let group = groups[entry.sample_key()] + TrackCategory::Signal.group_offset();
            write_data_track(&mut writer, entry, true, group)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new("Panel")))?;

    if !log2ratio.is_empty() {
        write_panel_start(&mut writer, "Log2RatioPanel", SIDE_PANEL_HEIGHT)?;
        for entry in &log2ratio {
            if is_bigwig(entry) {
                let group = groups[entry.sample_key()] + TrackCategory::Log2Ratio.group_offset();
                write_data_track(&mut writer, entry, true, group)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("Panel")))?;
    }

    if !subtract.is_empty() {
        write_panel_start(&mut writer, "SubtractPanel", SIDE_PANEL_HEIGHT)?;
        for entry in &subtract {
            if is_bigwig(entry) {
                let group = groups[entry.sample_key()] + TrackCategory::Subtract.group_offset();
                // Subtraction tracks keep a fixed axis
                write_data_track(&mut writer, entry, false, group)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new("Panel")))?;
    }

    // Divider only when more than one panel is present
    let panel_count = 1 + usize::from(!log2ratio.is_empty()) + usize::from(!subtract.is_empty());
    let divider_fractions = match panel_count {
        2 => Some("0.9"),
        3 => Some("0.8,0.9"),
        _ => None,
    };
    if let Some(fractions) = divider_fractions {
        let mut layout = BytesStart::new("PanelLayout");
        layout.push_attribute(("dividerFractions", fractions));
        writer.write_event(Event::Empty(layout))?;
    }

    writer.write_event(Event::Start(BytesStart::new("HiddenAttributes")))?;
    for name in ["DATA FILE", "DATA TYPE", "NAME"] {
        let mut attribute = BytesStart::new("Attribute");
        attribute.push_attribute(("name", name));
        writer.write_event(Event::Empty(attribute))?;
    }
    writer.write_event(Event::End(BytesEnd::new("HiddenAttributes")))?;

    writer.write_event(Event::End(BytesEnd::new("Session")))?;

    String::from_utf8(writer.into_inner()).map_err(|_| SessionError::InvalidUtf8)
}

/// The secondary panels only render bigWig signal
fn is_bigwig(entry: &TrackEntry) -> bool {
    let extension = Path::new(&entry.path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    matches!(extension.as_str(), "bw" | "bigwig")
}

fn write_panel_start(writer: &mut XmlWriter, name: &str, height: &str) -> Result<(), SessionError> {
    let mut panel = BytesStart::new("Panel");
    panel.push_attribute(("height", height));
    panel.push_attribute(("name", name));
    panel.push_attribute(("width", PANEL_WIDTH));
    writer.write_event(Event::Start(panel))?;
    Ok(())
}

fn write_feature_track(
    writer: &mut XmlWriter,
    id: &str,
    name: &str,
    colour: &str,
    display_mode: &str,
    height: Option<&str>,
) -> Result<(), SessionError> {
    let mut track = BytesStart::new("Track");
    track.push_attribute(("altColor", ALT_COLOUR));
    track.push_attribute(("autoScale", "false"));
    track.push_attribute(("clazz", FEATURE_TRACK_CLASS));
    track.push_attribute(("color", colour));
    track.push_attribute(("displayMode", display_mode));
    track.push_attribute(("featureVisibilityWindow", "-1"));
    track.push_attribute(("fontSize", "12"));
    if let Some(height) = height {
        track.push_attribute(("height", height));
    }
    track.push_attribute(("id", id));
    track.push_attribute(("name", name));
    track.push_attribute(("renderer", "BASIC_FEATURE"));
    track.push_attribute(("sortable", "false"));
    track.push_attribute(("visible", "true"));
    track.push_attribute(("windowFunction", "count"));
    writer.write_event(Event::Empty(track))?;
    Ok(())
}

fn write_data_track(
    writer: &mut XmlWriter,
    entry: &TrackEntry,
    autoscale: bool,
    group: u32,
) -> Result<(), SessionError> {
    let group = group.to_string();
    let mut track = BytesStart::new("Track");
    track.push_attribute(("altColor", ALT_COLOUR));
    track.push_attribute(("autoScale", if autoscale { "true" } else { "false" }));
    track.push_attribute(("autoscaleGroup", group.as_str()));
    track.push_attribute(("clazz", DATA_TRACK_CLASS));
    track.push_attribute(("color", entry.colour.as_str()));
    track.push_attribute(("fontSize", "12"));
    track.push_attribute(("height", "100"));
    track.push_attribute(("id", entry.path.as_str()));
    track.push_attribute(("name", entry.basename()));
    track.push_attribute(("renderer", "BAR_CHART"));
    track.push_attribute(("visible", "true"));
    track.push_attribute(("windowFunction", "mean"));
    writer.write_event(Event::Start(track))?;

    let mut range = BytesStart::new("DataRange");
    range.push_attribute(("baseline", "0.0"));
    range.push_attribute(("drawBaseline", "true"));
    range.push_attribute(("flipAxis", "false"));
    range.push_attribute(("maximum", "10"));
    range.push_attribute(("minimum", "0.0"));
    range.push_attribute(("type", "LINEAR"));
    writer.write_event(Event::Empty(range))?;

    writer.write_event(Event::End(BytesEnd::new("Track")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tracks::DEFAULT_COLOUR;

    fn entry(path: &str, colour: &str) -> TrackEntry {
        TrackEntry {
            path: path.to_string(),
            colour: colour.to_string(),
        }
    }

    #[test]
    fn test_two_panel_session() {
        let entries = vec![
            entry("a_R1.bw", "255,0,0"),
            entry("a_R2.log2ratio.bw", "0,255,0"),
        ];
        let xml = render_session(&entries, "hg38", "genes.bed").unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(xml.contains("genome=\"hg38\""));
        // Shared sample group, category offset on the log2ratio panel
        assert!(xml.contains("autoscaleGroup=\"1\""));
        assert!(xml.contains("autoscaleGroup=\"1001\""));
        assert!(xml.contains("name=\"Log2RatioPanel\""));
        assert!(xml.contains("dividerFractions=\"0.9\""));
        assert!(!xml.contains("SubtractPanel"));
    }

    #[test]
    fn test_three_panel_divider() {
        let entries = vec![
            entry("a_R1.bw", DEFAULT_COLOUR),
            entry("a_R1.log2ratio.bw", DEFAULT_COLOUR),
            entry("a_R1.subtract.bw", DEFAULT_COLOUR),
        ];
        let xml = render_session(&entries, "hg38", "genes.bed").unwrap();
        assert!(xml.contains("dividerFractions=\"0.8,0.9\""));
        // Subtraction tracks have a fixed axis
        assert!(xml.contains("autoScale=\"false\" autoscaleGroup=\"2001\""));
    }

    #[test]
    fn test_single_panel_has_no_divider() {
        let entries = vec![entry("a_R1.bw", DEFAULT_COLOUR)];
        let xml = render_session(&entries, "hg38", "genes.bed").unwrap();
        assert!(!xml.contains("PanelLayout"));
    }

    #[test]
    fn test_every_entry_is_a_resource_bam_never_a_track() {
        let entries = vec![
            entry("reads.bam", DEFAULT_COLOUR),
            entry("peaks.narrowPeak", DEFAULT_COLOUR),
            entry("notes.txt", DEFAULT_COLOUR),
        ];
        let xml = render_session(&entries, "mm10", "genes.bed").unwrap();
        assert_eq!(xml.matches("<Resource ").count(), 4);
        assert!(!xml.contains("id=\"reads.bam\""));
        assert!(!xml.contains("id=\"notes.txt\""));
        assert!(xml.contains("id=\"peaks.narrowPeak\""));
        assert!(xml.contains("displayMode=\"SQUISHED\""));
    }

    #[test]
    fn test_annotation_track_leads_data_panel() {
        let entries = vec![entry("a_R1.bw", DEFAULT_COLOUR)];
        let xml = render_session(&entries, "hg38", "ref/genes.bed").unwrap();
        assert!(xml.contains("<Resource path=\"./ref/genes.bed\"/>"));
        let annotation_pos = xml.find("id=\"ref/genes.bed\"").unwrap();
        let signal_pos = xml.find("id=\"a_R1.bw\"").unwrap();
        assert!(annotation_pos < signal_pos);
        assert!(xml.contains("color=\"0,48,73\""));
        assert!(xml.contains("name=\"genes.bed\""));
    }
}
