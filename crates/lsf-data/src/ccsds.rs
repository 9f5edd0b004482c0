//! CCSDS packet identity of the datagram an event arrived in

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LsfCcsds {
    /// Spacecraft id
    pub scid: i32,
    /// Application process id
    pub apid: i32,
    /// Packet UTC, seconds
    pub utc: f64,
}

impl LsfCcsds {
    pub fn new(scid: i32, apid: i32, utc: f64) -> Self {
        Self { scid, apid, utc }
    }

    pub fn initialize(&mut self, scid: i32, apid: i32, utc: f64) {
        self.scid = scid;
        self.apid = apid;
        self.utc = utc;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for LsfCcsds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " ccsds:    scid = {}, apid = 0x{:03X}", self.scid, self.apid)?;
        writeln!(f, " ccsds:    utc  = {:.6}", self.utc)
    }
}
