//! Reader configuration

use serde::{Deserialize, Serialize};

use crate::Result;

/// How the reader treats input it has no typed record for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Fail `read` on an unknown info type instead of skipping the
    /// configuration and keys for that event
    pub strict_info_type: bool,
    /// Keep the summary of a handler with an unknown id in the generic
    /// handler slot instead of dropping it
    pub retain_unknown_handlers: bool,
    /// Data-transfer id stamped on every run record; the source header's
    /// run id when unset
    pub data_transfer_id: Option<u32>,
}

impl ReaderConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        let config = ReaderConfig::default();
        assert!(!config.strict_info_type);
        assert!(!config.retain_unknown_handlers);
        assert_eq!(config.data_transfer_id, None);
    }

    #[test]
    fn test_from_json_partial() {
        let config = ReaderConfig::from_json_str(r#"{"data_transfer_id": 4021}"#).unwrap();
        assert_eq!(config.data_transfer_id, Some(4021));
        assert!(!config.strict_info_type);

        let config = ReaderConfig::from_json_str(r#"{"strict_info_type": true}"#).unwrap();
        assert!(config.strict_info_type);
        assert_eq!(config.data_transfer_id, None);
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        assert!(ReaderConfig::from_json_str(r#"{"strict_info_type": "yes"}"#).is_err());
    }
}
