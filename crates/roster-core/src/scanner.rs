//! Marker block scanner.
//!
//! Finds every `<!-- readme: <spec> -start -->` ... `<!-- readme: <spec> -end -->`
//! pair in a document. A start marker is paired with the nearest following end
//! marker carrying the same spec text; pairs never overlap.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*readme:\s*(?P<spec>[^<>\n]*?)\s*-start\s*-->")
        .expect("invalid start marker regex")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*readme:\s*(?P<spec>[^<>\n]*?)\s*-end\s*-->")
        .expect("invalid end marker regex")
});

/// One marker pair located in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<'a> {
    /// Spec text shared by both markers.
    pub spec: &'a str,
    /// Byte range of the start marker comment.
    pub start_marker: Range<usize>,
    /// Byte range strictly between the two markers.
    pub inner: Range<usize>,
    /// Byte range of the end marker comment.
    pub end_marker: Range<usize>,
}

impl Region<'_> {
    /// Content between the markers.
    #[must_use]
    pub fn content<'d>(&self, document: &'d str) -> &'d str {
        &document[self.inner.clone()]
    }
}

/// Locate all marker pairs in document order.
///
/// Start markers without a matching end marker are skipped.
pub fn scan(document: &str) -> Vec<Region<'_>> {
    let ends: Vec<_> = END_MARKER
        .captures_iter(document)
        .filter_map(|caps| Some((caps.get(0)?.range(), caps.name("spec")?.as_str())))
        .collect();

    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(start) = START_MARKER.captures_at(document, pos) {
        let (Some(start_match), Some(spec)) = (start.get(0), start.name("spec")) else {
            break;
        };
        let spec = spec.as_str();

        let first_candidate = ends.partition_point(|(range, _)| range.start < start_match.end());
        let end = ends[first_candidate..]
            .iter()
            .find(|(_, end_spec)| *end_spec == spec);

        match end {
            Some((end_marker, _)) => {
                pos = end_marker.end;
                regions.push(Region {
                    spec,
                    start_marker: start_match.range(),
                    inner: start_match.end()..end_marker.start,
                    end_marker: end_marker.clone(),
                });
            }
            None => {
                tracing::debug!(spec, "Start marker without matching end marker");
                pos = start_match.end();
            }
        }
    }

    regions
}
