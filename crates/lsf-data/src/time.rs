//! GEM time hacks, spacecraft time tones and the per-event time record
//!
//! The GEM counts 1-PPS "hacks" and 50 ns "ticks" of its 20 MHz clock. A
//! time tone pairs one of those samples with the spacecraft's seconds since
//! the mission epoch, plus flags for whichever pieces of the tone were missing.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mission elapsed time is counted from 2001-01-01T00:00:00Z
pub const MISSION_EPOCH_UNIX_SECS: i64 = 978_307_200;

/// GEM clock tick length in nanoseconds
pub const TICK_NANOS: u64 = 50;

pub fn mission_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(MISSION_EPOCH_UNIX_SECS, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Mission elapsed seconds to UTC (leap seconds not applied)
pub fn met_to_utc(met_secs: u32) -> DateTime<Utc> {
    mission_epoch() + Duration::seconds(i64::from(met_secs))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GemTime {
    /// Number of 1-PPS time hacks
    pub hacks: u32,
    /// Number of 50 ns ticks of the 20 MHz clock
    pub ticks: u32,
}

impl GemTime {
    pub fn new(hacks: u32, ticks: u32) -> Self {
        Self { hacks, ticks }
    }

    pub fn set(&mut self, hacks: u32, ticks: u32) {
        self.hacks = hacks;
        self.ticks = ticks;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for GemTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tics  = 0x{:08X} ({})", self.ticks, self.ticks)?;
        writeln!(f, "hacks = 0x{:08X} ({})", self.hacks, self.hacks)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeTone {
    /// Non-zero if some part of the tone is missing; check the flags
    pub incomplete: u32,
    /// Seconds since the mission epoch at the time hack
    pub time_secs: u32,
    /// Number of tones since the last complete one
    pub flywheeling: u32,
    /// Missing-signal and source flags, see the `*_MASK` constants
    pub flags: u8,
    pub time_hack: GemTime,
}

impl TimeTone {
    pub const MISSING_GPS_MASK: u8 = 0x01;
    pub const MISSING_CPU_MASK: u8 = 0x02;
    pub const MISSING_LAT_MASK: u8 = 0x04;
    pub const MISSING_TIMETONE_MASK: u8 = 0x08;
    pub const EARLY_EVENT_MASK: u8 = 0x10;
    pub const SOURCE_GPS_MASK: u8 = 0x20;

    pub fn new(
        incomplete: u32,
        time_secs: u32,
        flywheeling: u32,
        flags: u8,
        time_hack: GemTime,
    ) -> Self {
        Self {
            incomplete,
            time_secs,
            flywheeling,
            flags,
            time_hack,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// No GPS lock; the message is relative to the LAT clock
    pub fn missing_gps(&self) -> bool {
        self.flags & Self::MISSING_GPS_MASK != 0
    }

    /// No 1-PPS signal at the CPU
    pub fn missing_cpu_pps(&self) -> bool {
        self.flags & Self::MISSING_CPU_MASK != 0
    }

    /// No 1-PPS signal at the LAT
    pub fn missing_lat_pps(&self) -> bool {
        self.flags & Self::MISSING_LAT_MASK != 0
    }

    /// No time tone from the spacecraft
    pub fn missing_time_tone(&self) -> bool {
        self.flags & Self::MISSING_TIMETONE_MASK != 0
    }

    /// Event was captured before the tone it should be referenced to
    pub fn early_event(&self) -> bool {
        self.flags & Self::EARLY_EVENT_MASK != 0
    }

    /// Tone was sourced from GPS rather than the spacecraft clock
    pub fn source_gps(&self) -> bool {
        self.flags & Self::SOURCE_GPS_MASK != 0
    }

    pub fn set_missing_gps(&mut self, value: bool) {
        self.set_flag(Self::MISSING_GPS_MASK, value);
    }

    pub fn set_missing_cpu_pps(&mut self, value: bool) {
        self.set_flag(Self::MISSING_CPU_MASK, value);
    }

    pub fn set_missing_lat_pps(&mut self, value: bool) {
        self.set_flag(Self::MISSING_LAT_MASK, value);
    }

    pub fn set_missing_time_tone(&mut self, value: bool) {
        self.set_flag(Self::MISSING_TIMETONE_MASK, value);
    }

    pub fn set_early_event(&mut self, value: bool) {
        self.set_flag(Self::EARLY_EVENT_MASK, value);
    }

    pub fn set_source_gps(&mut self, value: bool) {
        self.set_flag(Self::SOURCE_GPS_MASK, value);
    }

    fn set_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.flags |= mask;
        } else {
            self.flags &= !mask;
        }
    }

    /// Wall-clock time of the tone
    pub fn utc(&self) -> DateTime<Utc> {
        met_to_utc(self.time_secs)
    }
}

impl fmt::Display for TimeTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " secs = {}, incomplete = {}, flywheeling = {}, flags = 0x{:02X}",
            self.time_secs, self.incomplete, self.flywheeling, self.flags
        )?;
        write!(f, "   {}", self.time_hack)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Time {
    /// Tone right before the "active" one at event capture
    pub current: TimeTone,
    /// Tone that was "active" at event capture
    pub previous: TimeTone,
    /// GEM time at event capture
    pub time_hack: GemTime,
    /// 50 ns ticks since the last time hack
    pub time_ticks: u32,
}

impl Time {
    pub fn new(current: TimeTone, previous: TimeTone, time_hack: GemTime, time_ticks: u32) -> Self {
        Self {
            current,
            previous,
            time_hack,
            time_ticks,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Ticks elapsed between the current tone's hack and event capture.
    /// The GEM tick counter is 25 bits wide and wraps.
    pub fn ticks_since_current_tone(&self) -> u32 {
        const TICK_COUNTER_MASK: u32 = 0x01FF_FFFF;
        self.time_hack
            .ticks
            .wrapping_sub(self.current.time_hack.ticks)
            & TICK_COUNTER_MASK
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " current: {}", self.current)?;
        write!(f, " previous: {}", self.previous)?;
        writeln!(
            f,
            " timeTics = 0x{:08X} ({})",
            self.time_ticks, self.time_ticks
        )?;
        write!(f, " {}", self.time_hack)
    }
}
