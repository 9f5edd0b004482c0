//! The per-event context aggregate

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::configuration::Configuration;
use crate::context::{DatagramInfo, GemScalers, RunInfo};
use crate::enums::{KeysType, RunType};
use crate::handler::{DgnHandler, GammaHandler, HipHandler, LpaHandler, MipHandler, PassthruHandler};
use crate::keys::LsfKeys;
use crate::time::Time;
use crate::{LSF_INVALID_UINT, LSF_UNDEFINED};

/// Everything known about one event apart from its raw bytes.
///
/// Optional members are owned outright, so cloning a `MetaEvent` never
/// shares a configuration, key set or handler with the original.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaEvent {
    run: RunInfo,
    datagram: DatagramInfo,
    scalers: GemScalers,
    time: Time,
    configuration: Option<Configuration>,
    keys: Option<LsfKeys>,
    gamma: Option<GammaHandler>,
    passthru: Option<PassthruHandler>,
    mip: Option<MipHandler>,
    hip: Option<HipHandler>,
    dgn: Option<DgnHandler>,
    lpa_handler: Option<LpaHandler>,
    moot_key: u32,
    moot_alias: String,
    compression_level: i32,
    compressed_size: i32,
}

impl Default for MetaEvent {
    fn default() -> Self {
        Self {
            run: RunInfo::default(),
            datagram: DatagramInfo::default(),
            scalers: GemScalers::default(),
            time: Time::default(),
            configuration: None,
            keys: None,
            gamma: None,
            passthru: None,
            mip: None,
            hip: None,
            dgn: None,
            lpa_handler: None,
            moot_key: LSF_INVALID_UINT,
            moot_alias: String::new(),
            compression_level: LSF_UNDEFINED,
            compressed_size: LSF_UNDEFINED,
        }
    }
}

impl MetaEvent {
    pub fn new(
        run: RunInfo,
        datagram: DatagramInfo,
        scalers: GemScalers,
        time: Time,
        configuration: Configuration,
    ) -> Self {
        Self {
            run,
            datagram,
            scalers,
            time,
            configuration: Some(configuration),
            ..Self::default()
        }
    }

    /// Replace the context records and the configuration in one go
    pub fn set(
        &mut self,
        run: RunInfo,
        datagram: DatagramInfo,
        scalers: GemScalers,
        time: Time,
        configuration: Configuration,
    ) {
        self.run = run;
        self.datagram = datagram;
        self.scalers = scalers;
        self.time = time;
        self.configuration = Some(configuration);
    }

    /// Release every owned member and reset all scalars to their sentinels
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Drop every handler result, leaving the rest of the event untouched
    pub fn clear_handlers(&mut self) {
        self.gamma = None;
        self.passthru = None;
        self.mip = None;
        self.hip = None;
        self.dgn = None;
        self.lpa_handler = None;
    }

    pub fn run(&self) -> &RunInfo {
        &self.run
    }

    pub fn datagram(&self) -> &DatagramInfo {
        &self.datagram
    }

    pub fn scalers(&self) -> &GemScalers {
        &self.scalers
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn configuration(&self) -> Option<&Configuration> {
        self.configuration.as_ref()
    }

    pub fn keys(&self) -> Option<&LsfKeys> {
        self.keys.as_ref()
    }

    pub fn gamma_filter(&self) -> Option<&GammaHandler> {
        self.gamma.as_ref()
    }

    pub fn passthru_filter(&self) -> Option<&PassthruHandler> {
        self.passthru.as_ref()
    }

    pub fn mip_filter(&self) -> Option<&MipHandler> {
        self.mip.as_ref()
    }

    pub fn hip_filter(&self) -> Option<&HipHandler> {
        self.hip.as_ref()
    }

    pub fn dgn_filter(&self) -> Option<&DgnHandler> {
        self.dgn.as_ref()
    }

    /// Summary of a handler with no dedicated slot
    pub fn lpa_handler(&self) -> Option<&LpaHandler> {
        self.lpa_handler.as_ref()
    }

    pub fn moot_key(&self) -> u32 {
        self.moot_key
    }

    pub fn moot_alias(&self) -> &str {
        &self.moot_alias
    }

    pub fn compression_level(&self) -> i32 {
        self.compression_level
    }

    pub fn compressed_size(&self) -> i32 {
        self.compressed_size
    }

    pub fn run_type(&self) -> RunType {
        self.configuration
            .as_ref()
            .map_or(RunType::None, Configuration::run_type)
    }

    pub fn keys_type(&self) -> KeysType {
        self.keys.as_ref().map_or(KeysType::None, LsfKeys::keys_type)
    }

    pub fn set_run(&mut self, run: RunInfo) {
        self.run = run;
    }

    pub fn set_datagram(&mut self, datagram: DatagramInfo) {
        self.datagram = datagram;
    }

    pub fn set_scalers(&mut self, scalers: GemScalers) {
        self.scalers = scalers;
    }

    pub fn set_time(&mut self, time: Time) {
        self.time = time;
    }

    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = Some(configuration);
    }

    pub fn set_keys(&mut self, keys: LsfKeys) {
        self.keys = Some(keys);
    }

    pub fn set_gamma_filter(&mut self, handler: GammaHandler) {
        self.gamma = Some(handler);
    }

    pub fn set_passthru_filter(&mut self, handler: PassthruHandler) {
        self.passthru = Some(handler);
    }

    pub fn set_mip_filter(&mut self, handler: MipHandler) {
        self.mip = Some(handler);
    }

    pub fn set_hip_filter(&mut self, handler: HipHandler) {
        self.hip = Some(handler);
    }

    pub fn set_dgn_filter(&mut self, handler: DgnHandler) {
        self.dgn = Some(handler);
    }

    pub fn set_lpa_handler(&mut self, handler: LpaHandler) {
        self.lpa_handler = Some(handler);
    }

    pub fn set_moot_key(&mut self, key: u32) {
        self.moot_key = key;
    }

    pub fn set_moot_alias(&mut self, alias: impl Into<String>) {
        self.moot_alias = alias.into();
    }

    pub fn set_compression_level(&mut self, level: i32) {
        self.compression_level = level;
    }

    pub fn set_compressed_size(&mut self, size: i32) {
        self.compressed_size = size;
    }
}

impl fmt::Display for MetaEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.run)?;
        write!(f, "{}", self.datagram)?;
        write!(f, "{}", self.scalers)?;
        write!(f, "{}", self.time)?;
        if let Some(configuration) = &self.configuration {
            write!(f, "{}", configuration.describe(" config:  "))?;
        }
        if let Some(keys) = &self.keys {
            write!(f, "{}", keys.describe(" keys:    "))?;
        }
        let handlers = [
            self.gamma.as_ref().map(GammaHandler::summary),
            self.passthru.as_ref().map(PassthruHandler::summary),
            self.mip.as_ref().map(MipHandler::summary),
            self.hip.as_ref().map(HipHandler::summary),
            self.dgn.as_ref().map(DgnHandler::summary),
            self.lpa_handler.as_ref(),
        ];
        for summary in handlers.into_iter().flatten() {
            write!(f, "{}", summary)?;
        }
        writeln!(
            f,
            " moot:     key = {}, alias = {:?}",
            self.moot_key, self.moot_alias
        )
    }
}
