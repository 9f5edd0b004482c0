//! Run, datagram and GEM scaler records from the event context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::enums::{CloseAction, CloseReason, DataOrigin, LatCrate, Mode, OpenAction, OpenReason, Platform};
use crate::time::met_to_utc;
use crate::LSF_INVALID_UINT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunInfo {
    pub platform: Platform,
    pub data_origin: DataOrigin,
    /// Ground-assigned run id. Can be reset if the LAT DAQ reboots on orbit.
    pub id: u32,
    /// Mission elapsed seconds when the run started
    pub start_time: u32,
    /// Id of the downlink the event was decoded from
    pub data_transfer_id: u32,
}

impl Default for RunInfo {
    fn default() -> Self {
        Self {
            platform: Platform::None,
            data_origin: DataOrigin::None,
            id: 0,
            start_time: 0,
            data_transfer_id: LSF_INVALID_UINT,
        }
    }
}

impl RunInfo {
    pub fn new(
        platform: Platform,
        data_origin: DataOrigin,
        id: u32,
        start_time: u32,
        data_transfer_id: u32,
    ) -> Self {
        Self {
            platform,
            data_origin,
            id,
            start_time,
            data_transfer_id,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn has_data_transfer_id(&self) -> bool {
        self.data_transfer_id != LSF_INVALID_UINT
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        met_to_utc(self.start_time)
    }
}

impl fmt::Display for RunInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " run:      groundid = 0x{:08X}, started = 0x{:08X} ({})",
            self.id, self.start_time, self.start_time
        )?;
        writeln!(f, " run:      platform = ({:?})", self.platform)?;
        writeln!(f, " run:      origin = ({:?})", self.data_origin)?;
        writeln!(f, " dataTransferId: {}", self.data_transfer_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatagramInfo {
    pub open_action: OpenAction,
    pub open_reason: OpenReason,
    pub lat_crate: LatCrate,
    pub mode: Mode,
    pub close_action: CloseAction,
    pub close_reason: CloseReason,
    /// Datagrams sent since the start of the run (the datagram sequence number)
    pub datagrams: u32,
    /// Mode changes since the start of the run
    pub mode_changes: u32,
}

impl DatagramInfo {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for DatagramInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " open:     nmodes = {}, ndgms = {}",
            self.mode_changes, self.datagrams
        )?;
        writeln!(f, " open:     action = ({:?})", self.open_action)?;
        writeln!(f, " open:     reason = ({:?})", self.open_reason)?;
        writeln!(f, " open:     crate = ({:?})", self.lat_crate)?;
        writeln!(f, " open:     mode = ({:?})", self.mode)?;
        writeln!(f, " close:    action = ({:?})", self.close_action)?;
        writeln!(f, " close:    reason = ({:?})", self.close_reason)
    }
}

/// GEM counters, all in 50 ns ticks or event counts since the start of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemScalers {
    pub elapsed: u64,
    pub livetime: u64,
    /// Events prescaled away in hardware
    pub prescaled: u64,
    /// Events discarded because they arrived in deadtime
    pub discarded: u64,
    /// Sequence number of this event within the run
    pub sequence: u64,
    /// Events lost in the dead zone
    pub deadzone: u64,
}

impl GemScalers {
    pub fn new(
        elapsed: u64,
        livetime: u64,
        prescaled: u64,
        discarded: u64,
        sequence: u64,
        deadzone: u64,
    ) -> Self {
        Self {
            elapsed,
            livetime,
            prescaled,
            discarded,
            sequence,
            deadzone,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Livetime over elapsed time, `None` before the first tick
    pub fn live_fraction(&self) -> Option<f64> {
        if self.elapsed == 0 {
            None
        } else {
            Some(self.livetime as f64 / self.elapsed as f64)
        }
    }
}

impl fmt::Display for GemScalers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("elapsed  ", self.elapsed),
            ("livetime ", self.livetime),
            ("prescaled", self.prescaled),
            ("discarded", self.discarded),
            ("sequence ", self.sequence),
            ("deadzone ", self.deadzone),
        ];
        for (name, value) in rows {
            writeln!(f, " scalers:  {} = 0x{:08x} = {}", name, value, value)?;
        }
        Ok(())
    }
}
