//! Transfer of raw LSE events into lsf-data records

use tracing::{debug, info, warn};

use lsf_data::{
    AcdTrigger, CalTrigger, Channel, CloseAction, CloseReason, DataOrigin, DatagramInfo,
    DgnHandler, Ebf, GammaHandler, GemScalers, GemTime, HandlerId, HipHandler, LatCrate, LatcKeys,
    LciAcdConfiguration, LciCalConfiguration, LciConfiguration, LciKeys, LciTkrConfiguration,
    LeakedPrescaler, LpaConfiguration, LpaHandler, LpaKeys, LsfCcsds, MetaEvent, MipHandler, Mode,
    OpenAction, OpenReason, PassthruHandler, Platform, RsdState, RunInfo, Time, TimeTone,
};

use crate::config::ReaderConfig;
use crate::lse::{
    LciAcdInfo, LciCalInfo, LciChannel, LciInfo, LciRawKeys, LciTkrInfo, LpaHandlerRecord,
    LpaInfo, LpaRawKeys, LseContext, LseEvent, LseHeader, LseInfo, LseRsd, LseSource, LseTimeTone,
    LseTiming,
};
use crate::{ReaderError, Result};

/// One fully transferred event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LsfRecord {
    pub ccsds: LsfCcsds,
    pub meta: MetaEvent,
    pub ebf: Ebf,
}

pub struct LsfReader<S: LseSource> {
    source: S,
    config: ReaderConfig,
    events_read: u64,
}

impl<S: LseSource> LsfReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ReaderConfig::default())
    }

    pub fn with_config(source: S, config: ReaderConfig) -> Self {
        let header = source.header();
        info!(
            event_count = header.event_count,
            run_id = header.run_id,
            strict = config.strict_info_type,
            "Opened LSE event source"
        );
        Self {
            source,
            config,
            events_read: 0,
        }
    }

    pub fn header(&self) -> &LseHeader {
        self.source.header()
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Events successfully transferred so far
    pub fn events_read(&self) -> u64 {
        self.events_read
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Read the next event into the given records.
    ///
    /// Returns `Ok(false)` without touching the records once the source is
    /// exhausted. Handler slots are cleared before every transfer, so the
    /// handlers on `meta` always belong to the event just read.
    pub fn read(&mut self, ccsds: &mut LsfCcsds, meta: &mut MetaEvent, ebf: &mut Ebf) -> Result<bool> {
        let event = match self
            .source
            .read_event()
            .map_err(|e| ReaderError::Source(Box::new(e)))?
        {
            Some(event) => event,
            None => return Ok(false),
        };

        if let LseInfo::Unrecognized(code) = event.info {
            if self.config.strict_info_type {
                return Err(ReaderError::UnrecognizedInfoType(code));
            }
        }

        self.transfer_event(&event, ccsds, meta, ebf);
        self.events_read += 1;

        let handlers = match &event.info {
            LseInfo::Lpa(info) => info.handlers.len(),
            _ => 0,
        };
        debug!(
            sequence = event.context.scalers.sequence,
            info_type = event.info.info_type(),
            handlers,
            "Transferred event"
        );
        Ok(true)
    }

    /// Read the next event into fresh records; `None` at end of data
    pub fn next_record(&mut self) -> Result<Option<LsfRecord>> {
        let mut record = LsfRecord::default();
        if self.read(&mut record.ccsds, &mut record.meta, &mut record.ebf)? {
            Ok(Some(record))
        } else {
            Ok(None)
        }
    }

    fn transfer_event(&self, event: &LseEvent, ccsds: &mut LsfCcsds, meta: &mut MetaEvent, ebf: &mut Ebf) {
        meta.clear_handlers();

        transfer_ccsds(&event.context, ccsds);
        self.transfer_context(&event.context, meta);

        ebf.set(&event.ebf);
        ebf.set_gem_sequence(event.context.scalers.sequence as u32);

        match &event.info {
            LseInfo::Lpa(info) => {
                self.transfer_lpa_info(&event.context, info, meta);
                transfer_lpa_keys(&event.lpa_keys, meta);
            }
            LseInfo::LciAcd(info) => {
                transfer_lci_acd_info(&event.context, info, meta);
                transfer_lci_keys(&event.lci_keys, meta);
            }
            LseInfo::LciCal(info) => {
                transfer_lci_cal_info(&event.context, info, meta);
                transfer_lci_keys(&event.lci_keys, meta);
            }
            LseInfo::LciTkr(info) => {
                transfer_lci_tkr_info(&event.context, info, meta);
                transfer_lci_keys(&event.lci_keys, meta);
            }
            LseInfo::Unrecognized(code) => {
                warn!(
                    info_type = code,
                    "Unrecognized info type, configuration and keys left unchanged"
                );
            }
        }
    }

    fn transfer_context(&self, ctx: &LseContext, meta: &mut MetaEvent) {
        let open = &ctx.open;
        let close = &ctx.close;
        let datagram = DatagramInfo {
            open_action: checked("open action", open.action, OpenAction::from_raw, OpenAction::is_recognized),
            open_reason: checked("open reason", open.reason, OpenReason::from_raw, OpenReason::is_recognized),
            lat_crate: checked("crate", open.crate_id, LatCrate::from_raw, LatCrate::is_recognized),
            mode: checked("mode", open.mode, Mode::from_raw, Mode::is_recognized),
            close_action: checked("close action", close.action, CloseAction::from_raw, CloseAction::is_recognized),
            close_reason: checked("close reason", close.reason, CloseReason::from_raw, CloseReason::is_recognized),
            datagrams: open.datagrams,
            mode_changes: open.mode_changes,
        };
        meta.set_datagram(datagram);

        let data_transfer_id = self
            .config
            .data_transfer_id
            .unwrap_or(self.source.header().run_id);
        let run = RunInfo::new(
            checked("platform", ctx.run.platform, Platform::from_raw, Platform::is_recognized),
            checked("data origin", ctx.run.origin, DataOrigin::from_raw, DataOrigin::is_recognized),
            ctx.run.ground_id,
            ctx.run.started_at,
            data_transfer_id,
        );
        meta.set_run(run);

        let s = &ctx.scalers;
        meta.set_scalers(GemScalers::new(
            s.elapsed,
            s.livetime,
            s.prescaled,
            s.discarded,
            s.sequence,
            s.deadzone,
        ));
    }

    fn transfer_lpa_info(&self, ctx: &LseContext, info: &LpaInfo, meta: &mut MetaEvent) {
        transfer_time(ctx, &info.timing, meta);
        meta.set_configuration(LpaConfiguration::new(info.hardware_key, info.software_key).into());

        for record in &info.handlers {
            self.transfer_handler(record, meta);
        }
    }

    fn transfer_handler(&self, record: &LpaHandlerRecord, meta: &mut MetaEvent) {
        let summary = LpaHandler {
            master_key: record.master_key,
            cfg_key: record.cfg_key,
            cfg_id: record.cfg_id,
            state: checked("rsd state", record.state, RsdState::from_raw, RsdState::is_recognized),
            prescaler: LeakedPrescaler::from_raw(record.prescaler),
            version: record.version,
            id: HandlerId::from_raw(record.id),
            has: record.has,
            prescale_factor: record.prescale_factor,
        };
        if !summary.prescaler.is_recognized() {
            warn!(raw = record.prescaler, "Unrecognized leaked prescaler code");
        }

        match (summary.id, record.rsd) {
            (HandlerId::Dgn, rsd) => {
                let mut handler = DgnHandler::new(summary);
                if let Some(LseRsd::Dgn { status }) = rsd {
                    handler.set_status(status);
                }
                meta.set_dgn_filter(handler);
            }
            (HandlerId::Gamma, rsd) => {
                let mut handler = GammaHandler::new(summary);
                if let Some(LseRsd::Gamma {
                    status,
                    stage,
                    energy_valid,
                    energy_in_leus,
                }) = rsd
                {
                    handler.set_status(status, stage, energy_valid, energy_in_leus);
                }
                meta.set_gamma_filter(handler);
            }
            (HandlerId::Hip, rsd) => {
                let mut handler = HipHandler::new(summary);
                if let Some(LseRsd::Hip { status }) = rsd {
                    handler.set_status(status);
                }
                meta.set_hip_filter(handler);
            }
            (HandlerId::Mip, rsd) => {
                let mut handler = MipHandler::new(summary);
                if let Some(LseRsd::Mip { status }) = rsd {
                    handler.set_status(status);
                }
                meta.set_mip_filter(handler);
            }
            (HandlerId::Passthru, rsd) => {
                let mut handler = PassthruHandler::new(summary);
                if let Some(LseRsd::Passthru { status }) = rsd {
                    handler.set_status(status);
                }
                meta.set_passthru_filter(handler);
            }
            (HandlerId::None | HandlerId::Unrecognized(_), _) => {
                if self.config.retain_unknown_handlers {
                    meta.set_lpa_handler(summary);
                } else {
                    warn!(handler_id = record.id, "Dropping result of unknown handler");
                }
            }
        }
    }
}

/// Map a raw tag and log it if it falls outside the declared set
fn checked<T: Copy>(kind: &str, raw: u32, from_raw: fn(u32) -> T, is_recognized: fn(T) -> bool) -> T {
    let value = from_raw(raw);
    if !is_recognized(value) {
        warn!(kind, raw, "Unrecognized raw tag kept verbatim");
    }
    value
}

fn transfer_ccsds(ctx: &LseContext, ccsds: &mut LsfCcsds) {
    ccsds.initialize(ctx.ccsds.scid, ctx.ccsds.apid, ctx.ccsds.utc);
}

fn transfer_tone(raw: &LseTimeTone) -> TimeTone {
    let mut tone = TimeTone::new(
        raw.incomplete,
        raw.time_secs,
        raw.flywheeling,
        0,
        GemTime::new(raw.time_hack.hacks, raw.time_hack.tics),
    );
    tone.set_missing_gps(raw.missing_gps);
    tone.set_missing_cpu_pps(raw.missing_cpu_pps);
    tone.set_missing_lat_pps(raw.missing_lat_pps);
    tone.set_missing_time_tone(raw.missing_time_tone);
    tone.set_early_event(raw.early_event);
    tone.set_source_gps(raw.source_gps);
    tone
}

fn transfer_time(ctx: &LseContext, timing: &LseTiming, meta: &mut MetaEvent) {
    meta.set_time(Time::new(
        transfer_tone(&ctx.current),
        transfer_tone(&ctx.previous),
        GemTime::new(timing.time_hack.hacks, timing.time_hack.tics),
        timing.time_tics,
    ));
}

fn transfer_lci(info: &LciInfo) -> LciConfiguration {
    let mut lci = LciConfiguration::new(
        info.software_key,
        info.write_cfg,
        info.read_cfg,
        info.periodic_prescale,
        0,
    );
    lci.set_auto_range(info.auto_range);
    lci.set_zero_suppression(info.zero_suppression);
    lci.set_strobe(info.strobe);
    lci
}

fn transfer_channel(raw: &LciChannel) -> Channel {
    Channel::new(raw.single, raw.all, raw.latc)
}

fn transfer_lci_acd_info(ctx: &LseContext, info: &LciAcdInfo, meta: &mut MetaEvent) {
    transfer_time(ctx, &info.lci.timing, meta);
    let cfg = LciAcdConfiguration {
        lci: transfer_lci(&info.lci),
        injected: info.injected,
        threshold: info.threshold,
        bias_dac: info.bias_dac,
        hold_delay: info.hold_delay,
        hitmap_delay: info.hitmap_delay,
        range: info.range,
        trigger: AcdTrigger::new(info.trigger.veto, info.trigger.veto_vernier, info.trigger.hld),
        channel: transfer_channel(&info.channel),
    };
    meta.set_configuration(cfg.into());
}

fn transfer_lci_cal_info(ctx: &LseContext, info: &LciCalInfo, meta: &mut MetaEvent) {
    transfer_time(ctx, &info.lci.timing, meta);
    let cfg = LciCalConfiguration {
        lci: transfer_lci(&info.lci),
        uld: info.uld,
        injected: info.injected,
        delay: info.delay,
        first_range: info.first_range,
        threshold: info.threshold,
        calib_gain: info.calib_gain,
        high_cal_ena: info.high_cal_ena,
        high_rng_ena: info.high_rng_ena,
        high_gain: info.high_gain,
        low_cal_ena: info.low_cal_ena,
        low_rng_ena: info.low_rng_ena,
        low_gain: info.low_gain,
        trigger: CalTrigger::new(
            info.trigger.le,
            info.trigger.low_trg_ena,
            info.trigger.he,
            info.trigger.high_trg_ena,
        ),
        channel: transfer_channel(&info.channel),
    };
    meta.set_configuration(cfg.into());
}

fn transfer_lci_tkr_info(ctx: &LseContext, info: &LciTkrInfo, meta: &mut MetaEvent) {
    transfer_time(ctx, &info.lci.timing, meta);
    let cfg = LciTkrConfiguration {
        lci: transfer_lci(&info.lci),
        injected: info.injected,
        delay: info.delay,
        threshold: info.threshold,
        split_low: info.split_low,
        split_high: info.split_high,
        channel: transfer_channel(&info.channel),
    };
    meta.set_configuration(cfg.into());
}

fn transfer_lpa_keys(raw: &LpaRawKeys, meta: &mut MetaEvent) {
    let keys = LpaKeys::new(LatcKeys::new(raw.latc_master, raw.latc_ignore), raw.sbs, raw.lpa_db);
    meta.set_keys(keys.into());
}

fn transfer_lci_keys(raw: &LciRawKeys, meta: &mut MetaEvent) {
    let keys = LciKeys::new(LatcKeys::new(raw.latc_master, raw.latc_ignore), raw.lci_script);
    meta.set_keys(keys.into());
}
