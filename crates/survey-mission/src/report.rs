use serde::{Deserialize, Serialize};

/// How an area's item was established.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionSource {
    /// The detector produced at least one surviving box.
    Detected,
    /// Perception came up empty; the configured default was reported.
    DefaultAssumed,
}

/// One surveyed area's outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    pub area_id: u32,
    pub item_name: String,
    pub item_count: usize,
    pub source: RecognitionSource,
    /// Actions that spent their whole retry budget while working this area.
    pub exhausted_actions: Vec<String>,
}

/// Accumulated mission outcome; read-only once the run completes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionReport {
    pub areas: Vec<AreaRecord>,
    /// Item recognized at the clue pose, when that phase ran.
    pub clue_item: Option<String>,
    /// Area revisited for the closing snapshot.
    pub revisited_area: Option<u32>,
    /// Actions that spent their whole retry budget during the closing
    /// phase, mirroring the per-area `exhausted_actions`.
    pub clue_exhausted_actions: Vec<String>,
}

impl MissionReport {
    /// First area reporting `item`, in survey order.
    pub fn area_with_item(&self, item: &str) -> Option<u32> {
        self.areas
            .iter()
            .find(|r| r.item_name == item)
            .map(|r| r.area_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_area_wins() {
        let report = MissionReport {
            areas: vec![
                AreaRecord {
                    area_id: 1,
                    item_name: "goggle".into(),
                    item_count: 1,
                    source: RecognitionSource::Detected,
                    exhausted_actions: Vec::new(),
                },
                AreaRecord {
                    area_id: 2,
                    item_name: "beaker".into(),
                    item_count: 2,
                    source: RecognitionSource::Detected,
                    exhausted_actions: Vec::new(),
                },
                AreaRecord {
                    area_id: 3,
                    item_name: "beaker".into(),
                    item_count: 1,
                    source: RecognitionSource::DefaultAssumed,
                    exhausted_actions: Vec::new(),
                },
            ],
            ..MissionReport::default()
        };
        assert_eq!(report.area_with_item("beaker"), Some(2));
        assert_eq!(report.area_with_item("top_hat"), None);
    }
}
