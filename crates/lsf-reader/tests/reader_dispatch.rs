//! End-to-end transfers through a replayed event source

use lsf_data::{
    Configuration, DataOrigin, GammaHandler, HandlerId, KeysType, LatCrate, LeakedPrescaler,
    LsfKeys, Mode, Platform, RsdState, RunType, LSF_INVALID_UINT,
};
use lsf_reader::lse::{
    LciAcdInfo, LciCalInfo, LciChannel, LciInfo, LciRawKeys, LciTkrInfo, LpaHandlerRecord,
    LpaInfo, LpaRawKeys, LseContext, LseEvent, LseInfo, LseOpen, LseRsd, LseRun, LseScalers,
    LseTimeHack, LseTimeTone, LseTiming,
};
use lsf_reader::{LsfReader, ReaderConfig, ReaderError, ReplaySource};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn context(sequence: u64) -> LseContext {
    LseContext {
        open: LseOpen {
            action: 0,
            reason: 1,
            crate_id: 2,
            mode: 0,
            datagrams: 40,
            mode_changes: 1,
        },
        run: LseRun {
            platform: 0,
            origin: 0,
            ground_id: 0x0ff1,
            started_at: 250_000_000,
        },
        scalers: LseScalers {
            elapsed: 1_000,
            livetime: 900,
            prescaled: 3,
            discarded: 2,
            sequence,
            deadzone: 1,
        },
        current: LseTimeTone {
            time_secs: 250_000_010,
            source_gps: true,
            time_hack: LseTimeHack { hacks: 10, tics: 100 },
            ..LseTimeTone::default()
        },
        previous: LseTimeTone {
            time_secs: 250_000_009,
            missing_time_tone: true,
            time_hack: LseTimeHack { hacks: 9, tics: 90 },
            ..LseTimeTone::default()
        },
        ..LseContext::default()
    }
}

fn handler(id: u32, rsd: Option<LseRsd>) -> LpaHandlerRecord {
    LpaHandlerRecord {
        master_key: 0x11,
        cfg_key: 0x22,
        cfg_id: 0x33,
        state: 2,
        prescaler: -3,
        prescale_factor: 50,
        version: 0,
        id,
        has: true,
        rsd,
    }
}

fn lpa_event(sequence: u64, handlers: Vec<LpaHandlerRecord>) -> LseEvent {
    LseEvent {
        context: context(sequence),
        info: LseInfo::Lpa(LpaInfo {
            timing: LseTiming {
                time_hack: LseTimeHack { hacks: 10, tics: 150 },
                time_tics: 50,
            },
            hardware_key: 0xabc,
            software_key: 0xdef,
            handlers,
        }),
        lpa_keys: LpaRawKeys {
            latc_master: 1,
            latc_ignore: 2,
            sbs: 3,
            lpa_db: 4,
        },
        lci_keys: LciRawKeys::default(),
        ebf: vec![0xde, 0xad, 0xbe, 0xef],
    }
}

fn lci_event(info: LseInfo) -> LseEvent {
    LseEvent {
        context: context(9),
        info,
        lpa_keys: LpaRawKeys::default(),
        lci_keys: LciRawKeys {
            latc_master: 5,
            latc_ignore: 6,
            lci_script: 7,
        },
        ebf: Vec::new(),
    }
}

fn gamma_rsd() -> LseRsd {
    LseRsd::Gamma {
        status: 0x1,
        stage: 0x3,
        energy_valid: 0,
        energy_in_leus: 0,
    }
}

#[test]
fn test_lpa_event_with_gamma_handler() {
    init_tracing();
    let source = ReplaySource::from_events(77, [lpa_event(7, vec![handler(1, Some(gamma_rsd()))])]);
    let mut reader = LsfReader::new(source);
    let record = reader.next_record().unwrap().unwrap();
    let meta = &record.meta;

    assert!(meta
        .configuration()
        .and_then(Configuration::cast_to_lpa_config)
        .is_some());
    assert!(meta.keys().and_then(LsfKeys::cast_to_lpa_keys).is_some());
    assert!(meta.gamma_filter().is_some());
    assert!(meta.passthru_filter().is_none());
    assert!(meta.mip_filter().is_none());
    assert!(meta.hip_filter().is_none());
    assert!(meta.dgn_filter().is_none());
    assert!(meta.lpa_handler().is_none());

    let gamma = meta.gamma_filter().unwrap();
    assert_eq!(gamma.summary().id, HandlerId::Gamma);
    assert_eq!(gamma.summary().state, RsdState::Passed);
    assert_eq!(gamma.summary().prescaler, LeakedPrescaler::Unsupported);
    assert_eq!(gamma.summary().prescale_factor, 50);
    assert_eq!(gamma.summary().prescale_index(), -1);
    assert_eq!(gamma.rsd().map(|r| r.version()), Some(0));
    assert_eq!(gamma.status(), Some(0x1));
}

#[test]
fn test_context_and_time_transfer() {
    let source = ReplaySource::from_events(77, [lpa_event(7, Vec::new())]);
    let mut reader = LsfReader::new(source);
    let record = reader.next_record().unwrap().unwrap();
    let meta = &record.meta;

    assert_eq!(meta.run().platform, Platform::Lat);
    assert_eq!(meta.run().data_origin, DataOrigin::Orbit);
    assert_eq!(meta.run().id, 0x0ff1);
    assert_eq!(meta.run().data_transfer_id, 77);
    assert_eq!(meta.datagram().lat_crate, LatCrate::Epu2);
    assert_eq!(meta.datagram().mode, Mode::Normal);
    assert_eq!(meta.datagram().datagrams, 40);
    assert_eq!(meta.scalers().sequence, 7);
    assert_eq!(meta.scalers().livetime, 900);

    let time = meta.time();
    assert!(time.current.source_gps());
    assert!(!time.current.missing_time_tone());
    assert!(time.previous.missing_time_tone());
    assert_eq!(time.current.time_hack.ticks, 100);
    assert_eq!(time.time_hack.ticks, 150);
    assert_eq!(time.time_ticks, 50);
    assert_eq!(time.ticks_since_current_tone(), 50);

    assert_eq!(record.ebf.data(), &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(record.ebf.gem_sequence(), 7);
    assert_eq!(meta.keys().map(|k| k.latc().master), Some(1));
}

#[test]
fn test_end_of_data_leaves_records_untouched() {
    let source = ReplaySource::from_events(1, [lpa_event(1, Vec::new())]);
    let mut reader = LsfReader::new(source);

    let mut ccsds = Default::default();
    let mut meta = Default::default();
    let mut ebf = Default::default();
    assert!(reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    let snapshot = (ccsds, meta.clone(), ebf.clone());

    assert!(!reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    assert_eq!((ccsds, meta, ebf), snapshot);
    assert_eq!(reader.events_read(), 1);
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn test_source_failure_is_passed_through() {
    let mut source = ReplaySource::from_events(1, [lpa_event(1, Vec::new())]);
    source.push_failure("truncated datagram");
    source.push(lpa_event(2, Vec::new()));
    let mut reader = LsfReader::new(source);

    assert!(reader.next_record().unwrap().is_some());
    match reader.next_record() {
        Err(ReaderError::Source(err)) => assert!(err.to_string().contains("truncated datagram")),
        other => panic!("expected source error, got {:?}", other),
    }
    let record = reader.next_record().unwrap().unwrap();
    assert_eq!(record.meta.scalers().sequence, 2);
}

#[test]
fn test_handlers_do_not_leak_between_events() {
    init_tracing();
    let source = ReplaySource::from_events(
        1,
        [
            lpa_event(1, vec![handler(1, Some(gamma_rsd())), handler(3, Some(LseRsd::Mip { status: 0x4 }))]),
            lpa_event(2, vec![handler(4, Some(LseRsd::Dgn { status: 0x1 }))]),
        ],
    );
    let mut reader = LsfReader::new(source);

    let mut ccsds = Default::default();
    let mut meta = lsf_data::MetaEvent::default();
    let mut ebf = Default::default();
    assert!(reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    assert!(meta.gamma_filter().is_some());
    assert_eq!(meta.mip_filter().and_then(|m| m.status()), Some(0x4));

    assert!(reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    assert!(meta.gamma_filter().is_none());
    assert!(meta.mip_filter().is_none());
    assert!(meta.dgn_filter().and_then(|d| d.rsd()).map_or(false, |r| r.gem_stage()));
}

#[test]
fn test_all_handler_kinds() {
    let source = ReplaySource::from_events(
        1,
        [lpa_event(
            1,
            vec![
                handler(0, Some(LseRsd::Passthru { status: 0x1 })),
                handler(1, None),
                handler(2, Some(LseRsd::Hip { status: 0x2 })),
                handler(3, Some(LseRsd::Mip { status: 0x8 })),
                handler(4, Some(LseRsd::Dgn { status: 0x1 })),
            ],
        )],
    );
    let mut reader = LsfReader::new(source);
    let meta = reader.next_record().unwrap().unwrap().meta;

    assert_eq!(meta.passthru_filter().and_then(|h| h.status()), Some(0x1));
    assert_eq!(meta.hip_filter().and_then(|h| h.rsd()).map(|r| r.cal_stage()), Some(true));
    assert_eq!(meta.mip_filter().and_then(|h| h.rsd()).map(|r| r.tkr_stage()), Some(true));
    assert!(meta.dgn_filter().is_some());
    // a gamma record without RSD still gets a summary, but no detail
    assert!(meta.gamma_filter().and_then(GammaHandler::rsd).is_none());
}

#[test]
fn test_unknown_handler_dropped_or_retained() {
    let event = lpa_event(1, vec![handler(9, None)]);

    let mut reader = LsfReader::new(ReplaySource::from_events(1, [event.clone()]));
    let meta = reader.next_record().unwrap().unwrap().meta;
    assert!(meta.lpa_handler().is_none());

    let config = ReaderConfig {
        retain_unknown_handlers: true,
        ..ReaderConfig::default()
    };
    let mut reader = LsfReader::with_config(ReplaySource::from_events(1, [event]), config);
    let meta = reader.next_record().unwrap().unwrap().meta;
    let summary = meta.lpa_handler().unwrap();
    assert_eq!(summary.id, HandlerId::Unrecognized(9));
    assert_eq!(summary.cfg_key, 0x22);
    assert!(meta.gamma_filter().is_none());
}

#[test]
fn test_unrecognized_info_type() {
    init_tracing();
    let mut first = lpa_event(1, Vec::new());
    let mut unknown = lci_event(LseInfo::Unrecognized(12));
    unknown.context.scalers.sequence = 2;

    let source = ReplaySource::from_events(1, [first.clone(), unknown.clone()]);
    let mut reader = LsfReader::new(source);
    let mut ccsds = Default::default();
    let mut meta = lsf_data::MetaEvent::default();
    let mut ebf = Default::default();
    assert!(reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    assert!(reader.read(&mut ccsds, &mut meta, &mut ebf).unwrap());
    // context is transferred, configuration and keys keep the last values
    assert_eq!(meta.scalers().sequence, 2);
    assert_eq!(meta.run_type(), RunType::Lpa);
    assert_eq!(meta.keys_type(), KeysType::Lpa);

    first.context.scalers.sequence = 3;
    let config = ReaderConfig::from_json_str(r#"{"strict_info_type": true}"#).unwrap();
    let mut reader = LsfReader::with_config(ReplaySource::from_events(1, [unknown, first]), config);
    match reader.next_record() {
        Err(ReaderError::UnrecognizedInfoType(code)) => assert_eq!(code, 12),
        other => panic!("expected info type error, got {:?}", other),
    }
    let record = reader.next_record().unwrap().unwrap();
    assert_eq!(record.meta.scalers().sequence, 3);
}

#[test]
fn test_lci_variants_install_lci_keys() {
    let lci = LciInfo {
        timing: LseTiming {
            time_hack: LseTimeHack { hacks: 1, tics: 2 },
            time_tics: 3,
        },
        software_key: 0x50,
        periodic_prescale: 2000,
        zero_suppression: true,
        ..LciInfo::default()
    };
    let channel = LciChannel {
        single: 12,
        all: false,
        latc: true,
    };
    let events = [
        lci_event(LseInfo::LciAcd(LciAcdInfo {
            lci,
            bias_dac: 33,
            channel,
            ..LciAcdInfo::default()
        })),
        lci_event(LseInfo::LciCal(LciCalInfo {
            lci,
            high_gain: 7,
            low_gain: 2,
            channel,
            ..LciCalInfo::default()
        })),
        lci_event(LseInfo::LciTkr(LciTkrInfo {
            lci,
            split_high: 640,
            channel,
            ..LciTkrInfo::default()
        })),
    ];
    let mut reader = LsfReader::new(ReplaySource::from_events(1, events));

    let acd = reader.next_record().unwrap().unwrap().meta;
    assert_eq!(acd.run_type(), RunType::AcdLci);
    let cfg = acd.configuration().unwrap();
    assert_eq!(cfg.cast_to_lci_acd_config().map(|c| c.bias_dac), Some(33));
    assert_eq!(cfg.cast_to_lci_acd_config().and_then(|c| c.channel.single_channel()), Some(12));
    let shared = cfg.cast_to_lci_config().unwrap();
    assert!(shared.zero_suppression());
    assert!(!shared.auto_range());
    assert_eq!(shared.period, 2000);
    assert_eq!(acd.keys().and_then(LsfKeys::cast_to_lci_keys).map(|k| k.lci_script), Some(7));
    assert_eq!(acd.time().time_ticks, 3);
    assert!(acd.gamma_filter().is_none());

    let cal = reader.next_record().unwrap().unwrap().meta;
    let cal_cfg = cal.configuration().and_then(Configuration::cast_to_lci_cal_config).unwrap();
    assert_eq!((cal_cfg.high_gain, cal_cfg.low_gain), (7, 2));
    assert_eq!(cal.keys_type(), KeysType::Lci);

    let tkr = reader.next_record().unwrap().unwrap().meta;
    assert_eq!(tkr.run_type(), RunType::TkrLci);
    assert_eq!(
        tkr.configuration().and_then(Configuration::cast_to_lci_tkr_config).map(|c| c.split_high),
        Some(640)
    );
    assert!(reader.next_record().unwrap().is_none());
}

#[test]
fn test_out_of_range_tags_are_kept() {
    let mut event = lpa_event(1, vec![handler(1, None)]);
    event.context.open.mode = 99;
    event.context.run.platform = 17;
    if let LseInfo::Lpa(info) = &mut event.info {
        info.handlers[0].state = 42;
        info.handlers[0].prescaler = -8;
    }
    let mut reader = LsfReader::new(ReplaySource::from_events(1, [event]));
    let meta = reader.next_record().unwrap().unwrap().meta;

    assert_eq!(meta.datagram().mode, Mode::Unrecognized(99));
    assert_eq!(meta.run().platform, Platform::Unrecognized(17));
    let summary = meta.gamma_filter().unwrap().summary();
    assert_eq!(summary.state, RsdState::Unrecognized(42));
    assert_eq!(summary.prescaler, LeakedPrescaler::Unrecognized(-8));
    assert_eq!(summary.prescale_index(), -8);
}

#[test]
fn test_data_transfer_id_override_and_header() {
    let mut source = ReplaySource::from_events(77, [lpa_event(1, Vec::new())]);
    source.push(lpa_event(2, Vec::new()));
    let config = ReaderConfig {
        data_transfer_id: Some(4021),
        ..ReaderConfig::default()
    };
    let mut reader = LsfReader::with_config(source, config);
    assert_eq!(reader.header().run_id, 77);
    assert_eq!(reader.header().event_count, 1);

    let meta = reader.next_record().unwrap().unwrap().meta;
    assert_eq!(meta.run().data_transfer_id, 4021);
    assert_ne!(meta.run().data_transfer_id, LSF_INVALID_UINT);
    assert!(reader.next_record().unwrap().is_some());
    assert_eq!(reader.into_source().remaining(), 0);
}
