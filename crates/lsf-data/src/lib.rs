//! LSF Event-Context Data Library
//!
//! Typed records for the LAT event context that travels alongside every
//! downlinked event: CCSDS identity, run and datagram bookkeeping, GEM
//! scalers, time tones, the run configuration, the configuration-file keys
//! and the per-handler onboard filter results.
//!
//! The records are plain values. The only owned "polymorphic" members live
//! on [`MetaEvent`], where each is held by value inside an `Option` so copying
//! a `MetaEvent` is always a deep copy.
//!
//! # Record map
//!
//! | Record | Source in the event context |
//! |--------|-----------------------------|
//! | [`LsfCcsds`] | CCSDS packet identity (spacecraft id, APID, UTC) |
//! | [`RunInfo`] | Run platform, origin, ground id, start time |
//! | [`DatagramInfo`] | Datagram open/close bookkeeping |
//! | [`GemScalers`] | GEM livetime/deadtime counters |
//! | [`Time`] | Current and previous time tones, event time hack |
//! | [`Configuration`] | LPA or LCI (ACD/CAL/TKR) run configuration |
//! | [`LsfKeys`] | LATC and FSW configuration-file keys |
//! | handlers | Gamma, Hip, Mip, Dgn, Passthru filter summaries |

use thiserror::Error;

pub mod ccsds;
pub mod configuration;
pub mod context;
pub mod ebf;
pub mod enums;
pub mod handler;
pub mod keys;
pub mod meta_event;
pub mod rsd;
pub mod time;

pub use ccsds::LsfCcsds;
pub use configuration::{
    AcdTrigger, CalTrigger, Channel, Configuration, LciAcdConfiguration, LciCalConfiguration,
    LciConfiguration, LciTkrConfiguration, LpaConfiguration,
};
pub use context::{DatagramInfo, GemScalers, RunInfo};
pub use ebf::Ebf;
pub use enums::{
    CloseAction, CloseReason, DataOrigin, HandlerId, KeysType, LatCrate, LeakedPrescaler, Mode,
    OpenAction, OpenReason, Platform, RsdState, RunType,
};
pub use handler::{DgnHandler, GammaHandler, HipHandler, LpaHandler, MipHandler, PassthruHandler};
pub use keys::{LatcKeys, LciKeys, LpaKeys, LsfKeys};
pub use meta_event::MetaEvent;
pub use rsd::{DgnRsdV0, GammaRsd, GammaRsdRecord, HipRsdV0, MipRsdV0, PassthruRsdV0};
pub use time::{mission_epoch, GemTime, Time, TimeTone};

/// Sentinel for an unsigned field that was never filled in.
pub const LSF_INVALID_UINT: u32 = 0xFFFF_FFFF;

/// Sentinel for signed bookkeeping fields (compression level/size) that were never filled in.
pub const LSF_UNDEFINED: i32 = -1;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LsfDataError {
    #[error("Unrecognized {kind} tag: {raw}")]
    UnrecognizedTag { kind: &'static str, raw: i64 },
}

pub type Result<T> = std::result::Result<T, LsfDataError>;
