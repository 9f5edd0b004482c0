//! Run configuration
//!
//! Exactly one configuration shape is live per event: particle-data (LPA)
//! running, or one of the three charge-injection (LCI) calibrations. The LCI
//! shapes share the [`LciConfiguration`] record and add subsystem settings.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::enums::RunType;

/// Single-channel index meaning "no single channel selected"
pub const CHANNEL_UNDEFINED: u16 = 0xFFFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Configuration {
    Lpa(LpaConfiguration),
    LciAcd(LciAcdConfiguration),
    LciCal(LciCalConfiguration),
    LciTkr(LciTkrConfiguration),
}

impl Configuration {
    pub fn run_type(&self) -> RunType {
        match self {
            Self::Lpa(_) => RunType::Lpa,
            Self::LciAcd(_) => RunType::AcdLci,
            Self::LciCal(_) => RunType::CalLci,
            Self::LciTkr(_) => RunType::TkrLci,
        }
    }

    /// Reset the live variant to its default values; the variant itself is kept
    pub fn clear(&mut self) {
        match self {
            Self::Lpa(cfg) => *cfg = LpaConfiguration::default(),
            Self::LciAcd(cfg) => *cfg = LciAcdConfiguration::default(),
            Self::LciCal(cfg) => *cfg = LciCalConfiguration::default(),
            Self::LciTkr(cfg) => *cfg = LciTkrConfiguration::default(),
        }
    }

    pub fn cast_to_lpa_config(&self) -> Option<&LpaConfiguration> {
        match self {
            Self::Lpa(cfg) => Some(cfg),
            _ => None,
        }
    }

    /// Shared LCI settings of any of the three LCI shapes
    pub fn cast_to_lci_config(&self) -> Option<&LciConfiguration> {
        match self {
            Self::LciAcd(cfg) => Some(&cfg.lci),
            Self::LciCal(cfg) => Some(&cfg.lci),
            Self::LciTkr(cfg) => Some(&cfg.lci),
            Self::Lpa(_) => None,
        }
    }

    pub fn cast_to_lci_acd_config(&self) -> Option<&LciAcdConfiguration> {
        match self {
            Self::LciAcd(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn cast_to_lci_cal_config(&self) -> Option<&LciCalConfiguration> {
        match self {
            Self::LciCal(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn cast_to_lci_tkr_config(&self) -> Option<&LciTkrConfiguration> {
        match self {
            Self::LciTkr(cfg) => Some(cfg),
            _ => None,
        }
    }

    pub fn cast_to_lci_config_mut(&mut self) -> Option<&mut LciConfiguration> {
        match self {
            Self::LciAcd(cfg) => Some(&mut cfg.lci),
            Self::LciCal(cfg) => Some(&mut cfg.lci),
            Self::LciTkr(cfg) => Some(&mut cfg.lci),
            Self::Lpa(_) => None,
        }
    }

    /// Diagnostic dump, one `prefix`ed line per field
    pub fn describe(&self, prefix: &str) -> String {
        let mut out = String::new();
        match self {
            Self::Lpa(cfg) => {
                let _ = writeln!(out, "{prefix} softwareKey = 0x{:08x}", cfg.software_key);
                let _ = writeln!(out, "{prefix} hardwareKey = 0x{:08x}", cfg.hardware_key);
            }
            Self::LciAcd(cfg) => {
                cfg.lci.describe_into(&mut out, prefix);
                let _ = writeln!(
                    out,
                    "{prefix} injected = {}, threshold = {}, biasDac = {}",
                    cfg.injected, cfg.threshold, cfg.bias_dac
                );
                let _ = writeln!(
                    out,
                    "{prefix} holdDelay = {}, hitmapDelay = {}, range = {}",
                    cfg.hold_delay, cfg.hitmap_delay, cfg.range
                );
                let _ = writeln!(
                    out,
                    "{prefix} trigger: veto = {}, vetoVernier = {}, hld = {}",
                    cfg.trigger.veto, cfg.trigger.veto_vernier, cfg.trigger.high_discrim
                );
                cfg.channel.describe_into(&mut out, prefix);
            }
            Self::LciCal(cfg) => {
                cfg.lci.describe_into(&mut out, prefix);
                let _ = writeln!(
                    out,
                    "{prefix} uld = {}, injected = {}, delay = {}, firstRange = {}",
                    cfg.uld, cfg.injected, cfg.delay, cfg.first_range
                );
                let _ = writeln!(
                    out,
                    "{prefix} threshold = {}, calibGain = {}",
                    cfg.threshold, cfg.calib_gain
                );
                let _ = writeln!(
                    out,
                    "{prefix} high: calEna = {}, rngEna = {}, gain = {}",
                    cfg.high_cal_ena, cfg.high_rng_ena, cfg.high_gain
                );
                let _ = writeln!(
                    out,
                    "{prefix} low:  calEna = {}, rngEna = {}, gain = {}",
                    cfg.low_cal_ena, cfg.low_rng_ena, cfg.low_gain
                );
                let _ = writeln!(
                    out,
                    "{prefix} trigger: le = {}, lowTrgEna = {}, he = {}, highTrgEna = {}",
                    cfg.trigger.le, cfg.trigger.low_trg_ena, cfg.trigger.he, cfg.trigger.high_trg_ena
                );
                cfg.channel.describe_into(&mut out, prefix);
            }
            Self::LciTkr(cfg) => {
                cfg.lci.describe_into(&mut out, prefix);
                let _ = writeln!(
                    out,
                    "{prefix} injected = {}, delay = {}, threshold = {}",
                    cfg.injected, cfg.delay, cfg.threshold
                );
                let _ = writeln!(
                    out,
                    "{prefix} splitLow = {}, splitHigh = {}",
                    cfg.split_low, cfg.split_high
                );
                cfg.channel.describe_into(&mut out, prefix);
            }
        }
        out
    }
}

impl From<LpaConfiguration> for Configuration {
    fn from(cfg: LpaConfiguration) -> Self {
        Self::Lpa(cfg)
    }
}

impl From<LciAcdConfiguration> for Configuration {
    fn from(cfg: LciAcdConfiguration) -> Self {
        Self::LciAcd(cfg)
    }
}

impl From<LciCalConfiguration> for Configuration {
    fn from(cfg: LciCalConfiguration) -> Self {
        Self::LciCal(cfg)
    }
}

impl From<LciTkrConfiguration> for Configuration {
    fn from(cfg: LciTkrConfiguration) -> Self {
        Self::LciTkr(cfg)
    }
}

/// Particle-data running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LpaConfiguration {
    /// LATC configuration master key
    pub hardware_key: u32,
    /// Key of the FSW boot file
    pub software_key: u32,
}

impl LpaConfiguration {
    pub fn new(hardware_key: u32, software_key: u32) -> Self {
        Self {
            hardware_key,
            software_key,
        }
    }
}

/// Settings shared by every charge-injection calibration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LciConfiguration {
    pub software_key: u32,
    pub write_cfg: u32,
    pub read_cfg: u32,
    /// Charge-injection period in 50 ns ticks
    pub period: u32,
    flags: u8,
}

impl LciConfiguration {
    pub const AUTORANGE: u8 = 0x1;
    pub const ZERO_SUPPRESSION: u8 = 0x2;
    pub const STROBE: u8 = 0x4;

    pub fn new(software_key: u32, write_cfg: u32, read_cfg: u32, period: u32, flags: u8) -> Self {
        Self {
            software_key,
            write_cfg,
            read_cfg,
            period,
            flags,
        }
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn set_flags(&mut self, flags: u8) {
        self.flags = flags;
    }

    pub fn auto_range(&self) -> bool {
        self.flags & Self::AUTORANGE != 0
    }

    pub fn zero_suppression(&self) -> bool {
        self.flags & Self::ZERO_SUPPRESSION != 0
    }

    pub fn strobe(&self) -> bool {
        self.flags & Self::STROBE != 0
    }

    pub fn set_auto_range(&mut self, value: bool) {
        self.set_flag(Self::AUTORANGE, value);
    }

    pub fn set_zero_suppression(&mut self, value: bool) {
        self.set_flag(Self::ZERO_SUPPRESSION, value);
    }

    pub fn set_strobe(&mut self, value: bool) {
        self.set_flag(Self::STROBE, value);
    }

    fn set_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }

    fn describe_into(&self, out: &mut String, prefix: &str) {
        let _ = writeln!(
            out,
            "{prefix} softwareKey = 0x{:08x}, writeCfg = 0x{:08x}, readCfg = 0x{:08x}",
            self.software_key, self.write_cfg, self.read_cfg
        );
        let _ = writeln!(
            out,
            "{prefix} period = {}, autoRange = {}, zeroSupp = {}, strobe = {}",
            self.period,
            self.auto_range(),
            self.zero_suppression(),
            self.strobe()
        );
    }
}

/// Channel selection for a charge-injection scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    /// Single injected channel, [`CHANNEL_UNDEFINED`] if none
    pub single: u16,
    /// All channels injected
    pub all: bool,
    /// Channel selection taken from the LATC database
    pub latc: bool,
}

impl Default for Channel {
    fn default() -> Self {
        Self {
            single: CHANNEL_UNDEFINED,
            all: false,
            latc: false,
        }
    }
}

impl Channel {
    pub fn new(single: u16, all: bool, latc: bool) -> Self {
        Self { single, all, latc }
    }

    pub fn single_channel(&self) -> Option<u16> {
        (self.single != CHANNEL_UNDEFINED).then_some(self.single)
    }

    fn describe_into(&self, out: &mut String, prefix: &str) {
        let _ = writeln!(
            out,
            "{prefix} channel: single = {}, all = {}, latc = {}",
            self.single, self.all, self.latc
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcdTrigger {
    pub veto: u16,
    pub veto_vernier: u16,
    pub high_discrim: u16,
}

impl AcdTrigger {
    pub fn new(veto: u16, veto_vernier: u16, high_discrim: u16) -> Self {
        Self {
            veto,
            veto_vernier,
            high_discrim,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LciAcdConfiguration {
    pub lci: LciConfiguration,
    pub injected: u16,
    pub threshold: u16,
    pub bias_dac: u16,
    pub hold_delay: u16,
    pub hitmap_delay: u16,
    pub range: u16,
    pub trigger: AcdTrigger,
    pub channel: Channel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalTrigger {
    /// Low-energy trigger discriminator
    pub le: u16,
    pub low_trg_ena: u16,
    /// High-energy trigger discriminator
    pub he: u16,
    pub high_trg_ena: u16,
}

impl CalTrigger {
    pub fn new(le: u16, low_trg_ena: u16, he: u16, high_trg_ena: u16) -> Self {
        Self {
            le,
            low_trg_ena,
            he,
            high_trg_ena,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LciCalConfiguration {
    pub lci: LciConfiguration,
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
    pub trigger: CalTrigger,
    pub channel: Channel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LciTkrConfiguration {
    pub lci: LciConfiguration,
    pub injected: u16,
    pub delay: u16,
    pub threshold: u16,
    pub split_low: u16,
    pub split_high: u16,
    pub channel: Channel,
}
