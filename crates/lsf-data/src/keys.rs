//! Configuration-file keys
//!
//! Keys point into the configuration databases for the files that set up
//! the instrument for a run. Both shapes carry the LATC master/ignore pair.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::enums::KeysType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LatcKeys {
    pub master: u32,
    pub ignore: u32,
}

impl LatcKeys {
    pub fn new(master: u32, ignore: u32) -> Self {
        Self { master, ignore }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LpaKeys {
    pub latc: LatcKeys,
    /// Secondary boot script
    pub sbs: u32,
    /// LPA database
    pub lpa_db: u32,
}

impl LpaKeys {
    pub fn new(latc: LatcKeys, sbs: u32, lpa_db: u32) -> Self {
        Self { latc, sbs, lpa_db }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LciKeys {
    pub latc: LatcKeys,
    pub lci_script: u32,
}

impl LciKeys {
    pub fn new(latc: LatcKeys, lci_script: u32) -> Self {
        Self { latc, lci_script }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LsfKeys {
    Lpa(LpaKeys),
    Lci(LciKeys),
}

impl LsfKeys {
    pub fn keys_type(&self) -> KeysType {
        match self {
            Self::Lpa(_) => KeysType::Lpa,
            Self::Lci(_) => KeysType::Lci,
        }
    }

    pub fn cast_to_lpa_keys(&self) -> Option<&LpaKeys> {
        match self {
            Self::Lpa(keys) => Some(keys),
            Self::Lci(_) => None,
        }
    }

    pub fn cast_to_lci_keys(&self) -> Option<&LciKeys> {
        match self {
            Self::Lci(keys) => Some(keys),
            Self::Lpa(_) => None,
        }
    }

    pub fn latc(&self) -> &LatcKeys {
        match self {
            Self::Lpa(keys) => &keys.latc,
            Self::Lci(keys) => &keys.latc,
        }
    }

    pub fn describe(&self, prefix: &str) -> String {
        let mut out = String::new();
        let latc = self.latc();
        let _ = writeln!(
            out,
            "{prefix} LATC_master = 0x{:08x}, LATC_ignore = 0x{:08x}",
            latc.master, latc.ignore
        );
        match self {
            Self::Lpa(keys) => {
                let _ = writeln!(
                    out,
                    "{prefix} SBS = 0x{:08x}, LPA_DB = 0x{:08x}",
                    keys.sbs, keys.lpa_db
                );
            }
            Self::Lci(keys) => {
                let _ = writeln!(out, "{prefix} LCI_script = 0x{:08x}", keys.lci_script);
            }
        }
        out
    }
}

impl From<LpaKeys> for LsfKeys {
    fn from(keys: LpaKeys) -> Self {
        Self::Lpa(keys)
    }
}

impl From<LciKeys> for LsfKeys {
    fn from(keys: LciKeys) -> Self {
        Self::Lci(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_casts_follow_variant() {
        let lpa = LsfKeys::from(LpaKeys::new(LatcKeys::new(1, 2), 3, 4));
        assert_eq!(lpa.keys_type(), KeysType::Lpa);
        assert_eq!(lpa.cast_to_lpa_keys().map(|k| k.sbs), Some(3));
        assert!(lpa.cast_to_lci_keys().is_none());

        let lci = LsfKeys::from(LciKeys::new(LatcKeys::new(5, 6), 7));
        assert_eq!(lci.keys_type(), KeysType::Lci);
        assert!(lci.cast_to_lpa_keys().is_none());
        assert_eq!(lci.latc().ignore, 6);
    }

    #[test]
    fn test_describe_lci() {
        let keys = LsfKeys::from(LciKeys::new(LatcKeys::new(0x10, 0), 0xbeef));
        let text = keys.describe("");
        assert!(text.contains("LATC_master = 0x00000010"));
        assert!(text.contains("LCI_script = 0x0000beef"));
        assert!(!text.contains("SBS"));
    }

    proptest! {
        #[test]
        fn test_lpa_keys_clone_fidelity(master in any::<u32>(), ignore in any::<u32>(), sbs in any::<u32>(), db in any::<u32>()) {
            let original = LsfKeys::Lpa(LpaKeys::new(LatcKeys::new(master, ignore), sbs, db));
            let mut copy = original;
            prop_assert_eq!(copy.keys_type(), original.keys_type());
            prop_assert_eq!(copy.cast_to_lpa_keys(), original.cast_to_lpa_keys());

            if let LsfKeys::Lpa(keys) = &mut copy {
                keys.lpa_db = db.wrapping_add(1);
            }
            prop_assert_eq!(original.cast_to_lpa_keys().map(|k| k.lpa_db), Some(db));
        }
    }
}
