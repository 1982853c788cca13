//! Crossing points of the track network.
//!
//! The crossing list is supplied once at startup by the track geometry
//! provider and never changes afterwards. Crossings are addressed by their
//! position in the list, and each location appears at most once.

mod error;

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

pub use error::TrackError;

use crate::domain::{CrossingId, OrientedPoint};

/// Ordered, immutable list of crossing points.
#[derive(Debug, Clone, Default)]
pub struct CrossingList {
    crossings: Vec<OrientedPoint>,
}

/// On-disk layout: either a bare array or `{"crossings": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CrossingFile {
    Bare(Vec<OrientedPoint>),
    Wrapped { crossings: Vec<OrientedPoint> },
}

impl CrossingList {
    /// Build the list, keeping only the first entry for each location.
    ///
    /// Trains contend for a location, so a repeated point would otherwise
    /// be arbitrated as two independent crossings.
    pub fn new(points: Vec<OrientedPoint>) -> Self {
        let mut crossings: Vec<OrientedPoint> = Vec::with_capacity(points.len());
        for point in points {
            if crossings.iter().any(|c| c.same_position(&point)) {
                warn!(%point, "duplicate crossing ignored");
                continue;
            }
            crossings.push(point);
        }
        Self { crossings }
    }

    /// Load crossings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TrackError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json).map_err(|e| match e {
            TrackError::Json { message, .. } => TrackError::Json {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        })
    }

    /// Parse crossings from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, TrackError> {
        let file: CrossingFile = serde_json::from_str(json).map_err(|e| TrackError::Json {
            path: None,
            message: e.to_string(),
        })?;

        let crossings = match file {
            CrossingFile::Bare(crossings) => crossings,
            CrossingFile::Wrapped { crossings } => crossings,
        };
        Ok(Self::new(crossings))
    }

    pub fn get(&self, id: CrossingId) -> Option<&OrientedPoint> {
        self.crossings.get(id.0)
    }

    /// Iterate over crossings in list order.
    pub fn iter(&self) -> impl Iterator<Item = (CrossingId, &OrientedPoint)> {
        self.crossings
            .iter()
            .enumerate()
            .map(|(i, c)| (CrossingId(i), c))
    }

    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Heading;
    use tempfile::tempdir;

    #[test]
    fn parse_bare_array() {
        let list = CrossingList::from_json(
            r#"[{"x":100,"y":100,"heading":0},{"x":300,"y":100,"heading":90}]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(
            list.get(CrossingId(1)),
            Some(&OrientedPoint::new(300.0, 100.0, Heading::East))
        );
        assert!(list.get(CrossingId(2)).is_none());
    }

    #[test]
    fn parse_wrapped() {
        let list =
            CrossingList::from_json(r#"{"crossings":[{"x":1,"y":2,"heading":180}]}"#).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn iter_in_order() {
        let list = CrossingList::new(vec![
            OrientedPoint::new(1.0, 1.0, Heading::North),
            OrientedPoint::new(2.0, 2.0, Heading::North),
        ]);
        let ids: Vec<CrossingId> = list.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![CrossingId(0), CrossingId(1)]);
    }

    #[test]
    fn repeated_location_is_one_crossing() {
        let list = CrossingList::from_json(concat!(
            r#"[{"x":100,"y":100,"heading":0},"#,
            r#"{"x":400,"y":100,"heading":90},"#,
            r#"{"x":100,"y":100,"heading":90}]"#
        ))
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(
            list.get(CrossingId(0)),
            Some(&OrientedPoint::new(100.0, 100.0, Heading::North))
        );
        assert_eq!(
            list.get(CrossingId(1)),
            Some(&OrientedPoint::new(400.0, 100.0, Heading::East))
        );
    }

    #[test]
    fn reject_bad_heading() {
        let err = CrossingList::from_json(r#"[{"x":1,"y":2,"heading":45}]"#).unwrap_err();
        assert!(matches!(err, TrackError::Json { path: None, .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crossings.json");
        std::fs::write(&path, r#"[{"x":100,"y":100,"heading":0}]"#).unwrap();

        let list = CrossingList::load(&path).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = CrossingList::load(&path).unwrap_err();
        match err {
            TrackError::Json { path: Some(p), .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_sample_data() {
        let list = CrossingList::load("data/crossings.json").unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(
            list.get(CrossingId(0)),
            Some(&OrientedPoint::new(100.0, 100.0, Heading::North))
        );
    }

    #[test]
    fn missing_file() {
        let err = CrossingList::load("/nonexistent/crossings.json").unwrap_err();
        assert!(matches!(err, TrackError::Io { .. }));
    }
}
