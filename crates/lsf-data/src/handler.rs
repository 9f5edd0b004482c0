//! Onboard filter handler results
//!
//! Every handler result carries the same [`LpaHandler`] summary. The
//! filter-specific detail record is only created once a status word is
//! written, using the summary's encoding version to pick the layout.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::enums::{HandlerId, LeakedPrescaler, RsdState};
use crate::rsd::{DgnRsdV0, GammaRsd, GammaRsdRecord, HipRsdV0, MipRsdV0, PassthruRsdV0};
use crate::LSF_INVALID_UINT;

/// Prescale index given to events the filter passed without any prescaler firing
pub const PRESCALE_INDEX_PASSED: i32 = -1;
/// Prescale index of the output prescaler
pub const PRESCALE_INDEX_OUTPUT: i32 = 32;
/// Prescale index of the input prescaler, shared with ignored events
pub const PRESCALE_INDEX_INPUT: i32 = 33;
/// Prescale index for results that carry no usable information
pub const PRESCALE_INDEX_INVALID: i32 = 100;

/// Summary common to every handler result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LpaHandler {
    /// Key of the handler's master configuration (fixed for a run)
    pub master_key: u32,
    /// Key of the handler's current configuration (may vary by mode)
    pub cfg_key: u32,
    /// Identifier of the handler configuration (may vary by mode)
    pub cfg_id: u32,
    /// Overall filter result for the event
    pub state: RsdState,
    /// How a suppressed event was leaked; unsupported in version 0 encodings
    pub prescaler: LeakedPrescaler,
    /// Encoding version of the detail record
    pub version: u32,
    pub id: HandlerId,
    /// Whether the handler produced summary data
    pub has: bool,
    pub prescale_factor: u32,
}

impl Default for LpaHandler {
    fn default() -> Self {
        Self {
            master_key: LSF_INVALID_UINT,
            cfg_key: LSF_INVALID_UINT,
            cfg_id: LSF_INVALID_UINT,
            state: RsdState::Invalid,
            prescaler: LeakedPrescaler::Unsupported,
            version: 0,
            id: HandlerId::None,
            has: false,
            prescale_factor: LSF_INVALID_UINT,
        }
    }
}

impl LpaHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        master_key: u32,
        cfg_key: u32,
        cfg_id: u32,
        state: RsdState,
        prescaler: LeakedPrescaler,
        version: u32,
        id: HandlerId,
        has: bool,
    ) -> Self {
        Self {
            master_key,
            cfg_key,
            cfg_id,
            state,
            prescaler,
            version,
            id,
            has,
            ..Self::default()
        }
    }

    /// Single sortable index saying why the event was passed or suppressed.
    ///
    /// Prescaler information wins over the state: input expiry sorts after
    /// every line prescaler (33), output expiry just before it (32), and a
    /// line prescaler sorts by its own index. Without prescaler information
    /// an invalid result sorts last (100), an ignored one joins the input
    /// bucket and a pass sorts first (-1). Anything else falls back to the
    /// raw prescaler code.
    pub fn prescale_index(&self) -> i32 {
        match self.prescaler {
            LeakedPrescaler::Input => PRESCALE_INDEX_INPUT,
            LeakedPrescaler::Output => PRESCALE_INDEX_OUTPUT,
            LeakedPrescaler::Line(_) | LeakedPrescaler::Unrecognized(_) => self.prescaler.to_raw(),
            LeakedPrescaler::Unsupported => match self.state {
                RsdState::Invalid => PRESCALE_INDEX_INVALID,
                RsdState::Ignored => PRESCALE_INDEX_INPUT,
                RsdState::Passed => PRESCALE_INDEX_PASSED,
                _ => self.prescaler.to_raw(),
            },
        }
    }
}

impl fmt::Display for LpaHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            " handler:  id = {:?}, version = {}, has = {}",
            self.id, self.version, self.has
        )?;
        writeln!(
            f,
            " handler:  masterKey = 0x{:08x}, cfgKey = 0x{:08x}, cfgId = 0x{:08x}",
            self.master_key, self.cfg_key, self.cfg_id
        )?;
        writeln!(
            f,
            " handler:  state = {:?}, prescaler = {:?}, prescaleFactor = {}",
            self.state, self.prescaler, self.prescale_factor
        )
    }
}

/// Handler wrapper around a single-status-word version 0 detail record
macro_rules! status_word_handler {
    ($(#[$meta:meta])* $name:ident, $rsd:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            summary: LpaHandler,
            rsd: Option<$rsd>,
        }

        impl $name {
            pub fn new(summary: LpaHandler) -> Self {
                Self { summary, rsd: None }
            }

            pub fn summary(&self) -> &LpaHandler {
                &self.summary
            }

            pub fn summary_mut(&mut self) -> &mut LpaHandler {
                &mut self.summary
            }

            pub fn set_summary(&mut self, summary: LpaHandler) {
                self.summary = summary;
            }

            pub fn version(&self) -> u32 {
                self.summary.version
            }

            pub fn set_status(&mut self, status: u32) {
                self.rsd = Some($rsd::new(status));
            }

            pub fn rsd(&self) -> Option<&$rsd> {
                self.rsd.as_ref()
            }

            pub fn status(&self) -> Option<u32> {
                self.rsd.map(|rsd| rsd.status())
            }
        }
    };
}

status_word_handler!(
    /// Diagnostic filter result
    DgnHandler,
    DgnRsdV0
);
status_word_handler!(
    /// Heavy-ion filter result
    HipHandler,
    HipRsdV0
);
status_word_handler!(
    /// Minimum-ionizing filter result
    MipHandler,
    MipRsdV0
);
status_word_handler!(PassthruHandler, PassthruRsdV0);

/// Gamma filter result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GammaHandler {
    summary: LpaHandler,
    rsd: Option<GammaRsd>,
}

impl GammaHandler {
    pub fn new(summary: LpaHandler) -> Self {
        Self { summary, rsd: None }
    }

    pub fn summary(&self) -> &LpaHandler {
        &self.summary
    }

    pub fn summary_mut(&mut self) -> &mut LpaHandler {
        &mut self.summary
    }

    pub fn set_summary(&mut self, summary: LpaHandler) {
        self.summary = summary;
    }

    pub fn version(&self) -> u32 {
        self.summary.version
    }

    /// Write the gamma words. The first call creates the detail record in
    /// the layout of the summary's version; an unknown version leaves
    /// `rsd()` empty.
    pub fn set_status(&mut self, status: u32, stage: u32, energy_valid: u32, energy_in_leus: i32) {
        let record = GammaRsdRecord::new(status, stage, energy_valid, energy_in_leus);
        match self.rsd.as_mut() {
            Some(rsd) => *rsd.record_mut() = record,
            None => {
                self.rsd = GammaRsd::from_version(self.summary.version, record);
                if self.rsd.is_none() {
                    warn!(
                        version = self.summary.version,
                        "Unsupported gamma filter RSD version, detail record dropped"
                    );
                }
            }
        }
    }

    pub fn rsd(&self) -> Option<&GammaRsd> {
        self.rsd.as_ref()
    }

    pub fn status(&self) -> Option<u32> {
        self.rsd.map(|rsd| rsd.status())
    }
}
