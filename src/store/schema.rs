use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Storage key of the SRS level table.
pub const SRS_DATA_KEY: &str = "srsData";

/// Sentence id to SRS level. Serialized as a bare JSON object
/// (`{"12": 3, ...}`) so existing `srsData` entries load unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SrsData {
    pub levels: BTreeMap<usize, u32>,
}

impl SrsData {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srs_data_is_flat_object() {
        let mut data = SrsData::default();
        data.levels.insert(12, 3);
        data.levels.insert(4, 0);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"4":0,"12":3}"#);
    }

    #[test]
    fn test_srs_data_reads_string_keys() {
        let data: SrsData = serde_json::from_str(r#"{"7": 2}"#).unwrap();
        assert_eq!(data.levels.get(&7), Some(&2));
        assert_eq!(data.len(), 1);
    }
}
