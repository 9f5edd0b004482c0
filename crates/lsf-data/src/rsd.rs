//! Filter result summary data (RSD) detail records
//!
//! Each record keeps the packed words exactly as the filter wrote them.
//! Accessors decode through fixed `(shift, mask)` field tables; the bit
//! positions are part of the downlink format.

use serde::{Deserialize, Serialize};

/// A right-aligned bit field inside a packed word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub shift: u32,
    pub mask: u32,
}

impl BitField {
    pub const fn new(shift: u32, mask: u32) -> Self {
        Self { shift, mask }
    }

    pub const fn bit(position: u32) -> Self {
        Self {
            shift: position,
            mask: 0x1,
        }
    }

    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.mask
    }

    pub const fn is_set(self, word: u32) -> bool {
        self.extract(word) != 0
    }
}

const STAGE: BitField = BitField::new(0, 0x7FFF);
const UPPER_FIELD: BitField = BitField::new(15, 0xFFFF);
const VETOED: BitField = BitField::bit(31);

/// Diagnostic filter, version 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DgnRsdV0 {
    status: u32,
}

impl DgnRsdV0 {
    pub const GEM_STAGE: u32 = 1 << 0;
    pub const GEM_CLASSES: BitField = UPPER_FIELD;

    pub fn new(status: u32) -> Self {
        Self { status }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn stage(&self) -> u32 {
        STAGE.extract(self.status)
    }

    pub fn gem_stage(&self) -> bool {
        self.stage() & Self::GEM_STAGE != 0
    }

    /// GEM trigger classes that satisfied the diagnostic filter
    pub fn gem_classes(&self) -> u32 {
        Self::GEM_CLASSES.extract(self.status)
    }

    pub fn vetoed(&self) -> bool {
        VETOED.is_set(self.status)
    }
}

/// Heavy-ion filter, version 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HipRsdV0 {
    status: u32,
}

impl HipRsdV0 {
    pub const GEM_STAGE: u32 = 1 << 0;
    pub const CAL_STAGE: u32 = 1 << 1;
    pub const VETOES: BitField = UPPER_FIELD;

    pub fn new(status: u32) -> Self {
        Self { status }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn stage(&self) -> u32 {
        STAGE.extract(self.status)
    }

    pub fn gem_stage(&self) -> bool {
        self.stage() & Self::GEM_STAGE != 0
    }

    pub fn cal_stage(&self) -> bool {
        self.stage() & Self::CAL_STAGE != 0
    }

    pub fn vetoes(&self) -> u32 {
        Self::VETOES.extract(self.status)
    }

    pub fn vetoed(&self) -> bool {
        VETOED.is_set(self.status)
    }
}

/// Minimum-ionizing filter, version 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MipRsdV0 {
    status: u32,
}

impl MipRsdV0 {
    pub const GEM_STAGE: u32 = 1 << 0;
    pub const ACD_STAGE: u32 = 1 << 1;
    pub const CAL_STAGE: u32 = 1 << 2;
    pub const TKR_STAGE: u32 = 1 << 3;
    pub const VETOES: BitField = UPPER_FIELD;

    pub fn new(status: u32) -> Self {
        Self { status }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn stage(&self) -> u32 {
        STAGE.extract(self.status)
    }

    pub fn gem_stage(&self) -> bool {
        self.stage() & Self::GEM_STAGE != 0
    }

    pub fn acd_stage(&self) -> bool {
        self.stage() & Self::ACD_STAGE != 0
    }

    pub fn cal_stage(&self) -> bool {
        self.stage() & Self::CAL_STAGE != 0
    }

    pub fn tkr_stage(&self) -> bool {
        self.stage() & Self::TKR_STAGE != 0
    }

    pub fn vetoes(&self) -> u32 {
        Self::VETOES.extract(self.status)
    }

    pub fn vetoed(&self) -> bool {
        VETOED.is_set(self.status)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassthruRsdV0 {
    status: u32,
}

impl PassthruRsdV0 {
    pub const GEM_STAGE: u32 = 1 << 0;

    pub fn new(status: u32) -> Self {
        Self { status }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn stage(&self) -> u32 {
        STAGE.extract(self.status)
    }

    pub fn gem_stage(&self) -> bool {
        self.stage() & Self::GEM_STAGE != 0
    }

    pub fn vetoed(&self) -> bool {
        VETOED.is_set(self.status)
    }
}

/// Packed words shared by every gamma filter encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GammaRsdRecord {
    pub status: u32,
    /// Stages the event reached, see the `GammaRsd::*_STAGE` bits
    pub stage: u32,
    pub energy_valid: u32,
    /// Energy in LEUs (1/4 MeV)
    pub energy_in_leus: i32,
}

impl GammaRsdRecord {
    pub fn new(status: u32, stage: u32, energy_valid: u32, energy_in_leus: i32) -> Self {
        Self {
            status,
            stage,
            energy_valid,
            energy_in_leus,
        }
    }
}

/// Gamma filter result, one variant per encoding version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GammaRsd {
    V0(GammaRsdRecord),
    V1(GammaRsdRecord),
    V2(GammaRsdRecord),
    V3(GammaRsdRecord),
}

impl GammaRsd {
    pub const GEM_STAGE: u32 = 1 << 0;
    pub const ACD_STAGE: u32 = 1 << 1;
    pub const DIR_STAGE: u32 = 1 << 2;
    pub const ATF_STAGE: u32 = 1 << 3;
    pub const CAL_STAGE: u32 = 1 << 4;
    pub const TKR_STAGE: u32 = 1 << 5;

    const NARROW_VETOES: BitField = BitField::new(0, 0x7FFF);
    const WIDE_VETOES: BitField = BitField::new(0, 0x00FF_FFFF);
    const LEAKED: BitField = BitField::bit(30);

    /// Wrap `record` in the variant for encoding `version`; `None` if unknown
    pub fn from_version(version: u32, record: GammaRsdRecord) -> Option<Self> {
        match version {
            0 => Some(Self::V0(record)),
            1 => Some(Self::V1(record)),
            2 => Some(Self::V2(record)),
            3 => Some(Self::V3(record)),
            _ => None,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::V0(_) => 0,
            Self::V1(_) => 1,
            Self::V2(_) => 2,
            Self::V3(_) => 3,
        }
    }

    pub fn record(&self) -> &GammaRsdRecord {
        match self {
            Self::V0(rec) | Self::V1(rec) | Self::V2(rec) | Self::V3(rec) => rec,
        }
    }

    pub(crate) fn record_mut(&mut self) -> &mut GammaRsdRecord {
        match self {
            Self::V0(rec) | Self::V1(rec) | Self::V2(rec) | Self::V3(rec) => rec,
        }
    }

    pub fn cast_to_v0(&self) -> Option<&GammaRsdRecord> {
        match self {
            Self::V0(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn cast_to_v1(&self) -> Option<&GammaRsdRecord> {
        match self {
            Self::V1(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn cast_to_v2(&self) -> Option<&GammaRsdRecord> {
        match self {
            Self::V2(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn cast_to_v3(&self) -> Option<&GammaRsdRecord> {
        match self {
            Self::V3(rec) => Some(rec),
            _ => None,
        }
    }

    pub fn status(&self) -> u32 {
        self.record().status
    }

    pub fn stage(&self) -> u32 {
        self.record().stage
    }

    pub fn has_stage(&self, stage_bit: u32) -> bool {
        self.stage() & stage_bit != 0
    }

    /// Veto bits; the field widened to 24 bits in version 2
    pub fn vetoes(&self) -> u32 {
        match self {
            Self::V0(rec) | Self::V1(rec) => Self::NARROW_VETOES.extract(rec.status),
            Self::V2(rec) | Self::V3(rec) => Self::WIDE_VETOES.extract(rec.status),
        }
    }

    pub fn vetoed(&self) -> bool {
        VETOED.is_set(self.status())
    }

    /// Only version 3 reports leaks; always false before that
    pub fn leaked(&self) -> bool {
        match self {
            Self::V3(rec) => Self::LEAKED.is_set(rec.status),
            _ => false,
        }
    }

    pub fn energy_valid(&self) -> bool {
        match self {
            Self::V0(_) => false,
            _ => self.record().energy_valid != 0,
        }
    }

    pub fn energy_in_leus(&self) -> i32 {
        self.record().energy_in_leus
    }

    pub fn energy_in_mev(&self) -> Option<f64> {
        self.energy_valid()
            .then(|| f64::from(self.record().energy_in_leus) / 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dgn_fields() {
        let rsd = DgnRsdV0::new(0x8000_0000 | (0x00AB << 15) | 0x1);
        assert!(rsd.gem_stage());
        assert_eq!(rsd.gem_classes(), 0xAB);
        assert!(rsd.vetoed());
    }

    #[test]
    fn test_mip_stage_bits() {
        let rsd = MipRsdV0::new(MipRsdV0::ACD_STAGE | MipRsdV0::TKR_STAGE | (0x3 << 15));
        assert!(!rsd.gem_stage());
        assert!(rsd.acd_stage());
        assert!(!rsd.cal_stage());
        assert!(rsd.tkr_stage());
        assert_eq!(rsd.vetoes(), 0x3);
        assert!(!rsd.vetoed());
    }

    #[test]
    fn test_hip_and_passthru() {
        let hip = HipRsdV0::new(HipRsdV0::CAL_STAGE | (1 << 31));
        assert!(hip.cal_stage());
        assert!(!hip.gem_stage());
        assert!(hip.vetoed());

        let pass = PassthruRsdV0::new(0x1);
        assert!(pass.gem_stage());
        assert!(!pass.vetoed());
    }

    #[test]
    fn test_gamma_veto_width_by_version() {
        let record = GammaRsdRecord::new(0x00AB_CDEF, 0, 0, 0);
        let narrow = GammaRsd::from_version(1, record).unwrap();
        let wide = GammaRsd::from_version(2, record).unwrap();
        assert_eq!(narrow.vetoes(), 0x4DEF);
        assert_eq!(wide.vetoes(), 0x00AB_CDEF);
        assert!(GammaRsd::from_version(4, record).is_none());
    }

    #[test]
    fn test_gamma_leak_and_energy() {
        let record = GammaRsdRecord::new((1 << 31) | (1 << 30), GammaRsd::CAL_STAGE, 1, 400);
        let v3 = GammaRsd::V3(record);
        assert!(v3.vetoed());
        assert!(v3.leaked());
        assert!(v3.has_stage(GammaRsd::CAL_STAGE));
        assert!(!v3.has_stage(GammaRsd::TKR_STAGE));
        assert_eq!(v3.energy_in_mev(), Some(100.0));

        let v2 = GammaRsd::V2(record);
        assert!(!v2.leaked());

        let v0 = GammaRsd::V0(record);
        assert!(!v0.energy_valid());
        assert_eq!(v0.energy_in_mev(), None);
        assert_eq!(v0.cast_to_v0(), Some(&record));
        assert!(v0.cast_to_v3().is_none());
    }
}
