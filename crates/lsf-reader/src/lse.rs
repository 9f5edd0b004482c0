//! Raw LSE records as the decoder hands them over
//!
//! These mirror the decoder's own structures field for field: enumerated
//! values are still bare integers and flags are still separate booleans.
//! Nothing here is validated; that happens when the reader transfers an
//! event into [`lsf_data`] records.

use serde::{Deserialize, Serialize};

/// Info type codes used by the decoder
pub const INFO_TYPE_LPA: u32 = 0;
pub const INFO_TYPE_LCI_ACD: u32 = 1;
pub const INFO_TYPE_LCI_CAL: u32 = 2;
pub const INFO_TYPE_LCI_TKR: u32 = 3;

/// The decoder side of the reader
pub trait LseSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Next event, or `Ok(None)` once the source is exhausted
    fn read_event(&mut self) -> Result<Option<LseEvent>, Self::Error>;

    fn header(&self) -> &LseHeader;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LseCcsds {
    pub scid: i32,
    pub apid: i32,
    pub utc: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseOpen {
    pub action: u32,
    pub reason: u32,
    pub crate_id: u32,
    pub mode: u32,
    pub datagrams: u32,
    pub mode_changes: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseClose {
    pub action: u32,
    pub reason: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseRun {
    pub platform: u32,
    pub origin: u32,
    pub ground_id: u32,
    pub started_at: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseScalers {
    pub elapsed: u64,
    pub livetime: u64,
    pub prescaled: u64,
    pub discarded: u64,
    pub sequence: u64,
    pub deadzone: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseTimeHack {
    pub hacks: u32,
    pub tics: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseTimeTone {
    pub incomplete: u32,
    pub time_secs: u32,
    pub flywheeling: u32,
    pub missing_gps: bool,
    pub missing_cpu_pps: bool,
    pub missing_lat_pps: bool,
    pub missing_time_tone: bool,
    pub early_event: bool,
    pub source_gps: bool,
    pub time_hack: LseTimeHack,
}

/// Per-event context common to every info type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LseContext {
    pub ccsds: LseCcsds,
    pub open: LseOpen,
    pub close: LseClose,
    pub run: LseRun,
    pub scalers: LseScalers,
    pub current: LseTimeTone,
    pub previous: LseTimeTone,
}

/// Event capture time carried by every info record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LseTiming {
    pub time_hack: LseTimeHack,
    pub time_tics: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LseRsd {
    Dgn {
        status: u32,
    },
    Gamma {
        status: u32,
        stage: u32,
        energy_valid: u32,
        energy_in_leus: i32,
    },
    Hip {
        status: u32,
    },
    Mip {
        status: u32,
    },
    Passthru {
        status: u32,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpaHandlerRecord {
    pub master_key: u32,
    pub cfg_key: u32,
    pub cfg_id: u32,
    pub state: u32,
    pub prescaler: i32,
    pub prescale_factor: u32,
    pub version: u32,
    pub id: u32,
    pub has: bool,
    pub rsd: Option<LseRsd>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpaInfo {
    pub timing: LseTiming,
    pub hardware_key: u32,
    pub software_key: u32,
    pub handlers: Vec<LpaHandlerRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciInfo {
    pub timing: LseTiming,
    pub software_key: u32,
    pub write_cfg: u32,
    pub read_cfg: u32,
    pub periodic_prescale: u32,
    pub auto_range: bool,
    pub zero_suppression: bool,
    pub strobe: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciChannel {
    pub single: u16,
    pub all: bool,
    pub latc: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciAcdTrigger {
    pub veto: u16,
    pub veto_vernier: u16,
    pub hld: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciAcdInfo {
    pub lci: LciInfo,
    pub injected: u16,
    pub threshold: u16,
    pub bias_dac: u16,
    pub hold_delay: u16,
    pub hitmap_delay: u16,
    pub range: u16,
    pub trigger: LciAcdTrigger,
    pub channel: LciChannel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciCalTrigger {
    pub le: u16,
    pub low_trg_ena: u16,
    pub he: u16,
    pub high_trg_ena: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciCalInfo {
    pub lci: LciInfo,
    pub uld: u16,
    pub injected: u16,
    pub delay: u16,
    pub first_range: u16,
    pub threshold: u16,
    pub calib_gain: u16,
    pub high_cal_ena: u16,
    pub high_rng_ena: u16,
    pub high_gain: u16,
    pub low_cal_ena: u16,
    pub low_rng_ena: u16,
    pub low_gain: u16,
    pub trigger: LciCalTrigger,
    pub channel: LciChannel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciTkrInfo {
    pub lci: LciInfo,
    pub injected: u16,
    pub delay: u16,
    pub threshold: u16,
    pub split_low: u16,
    pub split_high: u16,
    pub channel: LciChannel,
}

/// Type-specific part of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LseInfo {
    Lpa(LpaInfo),
    LciAcd(LciAcdInfo),
    LciCal(LciCalInfo),
    LciTkr(LciTkrInfo),
    /// Info type code the decoder did not know how to unpack
    Unrecognized(u32),
}

impl LseInfo {
    pub fn info_type(&self) -> u32 {
        match self {
            Self::Lpa(_) => INFO_TYPE_LPA,
            Self::LciAcd(_) => INFO_TYPE_LCI_ACD,
            Self::LciCal(_) => INFO_TYPE_LCI_CAL,
            Self::LciTkr(_) => INFO_TYPE_LCI_TKR,
            Self::Unrecognized(code) => *code,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpaRawKeys {
    pub latc_master: u32,
    pub latc_ignore: u32,
    pub sbs: u32,
    pub lpa_db: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LciRawKeys {
    pub latc_master: u32,
    pub latc_ignore: u32,
    pub lci_script: u32,
}

/// One decoded event. Both key records are always present; the info type
/// decides which one applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LseEvent {
    pub context: LseContext,
    pub info: LseInfo,
    pub lpa_keys: LpaRawKeys,
    pub lci_keys: LciRawKeys,
    pub ebf: Vec<u8>,
}

/// Error count for one APID
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApidErrors {
    pub apid: u32,
    pub count: u32,
}

/// Summary of the whole source, available before the first event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LseHeader {
    pub event_count: u64,
    pub run_id: u32,
    /// First and last spacecraft clock seconds in the source
    pub beg_sec: f64,
    pub end_sec: f64,
    /// First and last GEM sequence counters in the source
    pub beg_gem: u64,
    pub end_gem: u64,
    pub seq_errors: Vec<ApidErrors>,
    pub dfi_errors: Vec<ApidErrors>,
}

impl LseHeader {
    /// Sequence-counter errors, unused (APID 0) slots skipped
    pub fn seq_errors(&self) -> impl Iterator<Item = &ApidErrors> {
        self.seq_errors.iter().filter(|e| e.apid != 0)
    }

    /// Datagram-format errors, unused (APID 0) slots skipped
    pub fn dfi_errors(&self) -> impl Iterator<Item = &ApidErrors> {
        self.dfi_errors.iter().filter(|e| e.apid != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_skips_unused_apids() {
        let header = LseHeader {
            seq_errors: vec![
                ApidErrors { apid: 0, count: 5 },
                ApidErrors { apid: 0x3b5, count: 2 },
            ],
            dfi_errors: vec![ApidErrors { apid: 0, count: 1 }],
            ..LseHeader::default()
        };
        let seq: Vec<_> = header.seq_errors().collect();
        assert_eq!(seq, vec![&ApidErrors { apid: 0x3b5, count: 2 }]);
        assert_eq!(header.dfi_errors().count(), 0);
    }

    #[test]
    fn test_info_type_codes() {
        assert_eq!(LseInfo::Lpa(LpaInfo::default()).info_type(), INFO_TYPE_LPA);
        assert_eq!(LseInfo::LciTkr(LciTkrInfo::default()).info_type(), INFO_TYPE_LCI_TKR);
        assert_eq!(LseInfo::Unrecognized(9).info_type(), 9);
    }
}
