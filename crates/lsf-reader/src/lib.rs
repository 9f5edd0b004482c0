//! LSF Reader
//!
//! Copies raw LSE event contexts, as handed over by an external decoder,
//! into the typed records of [`lsf_data`].
//!
//! The decoder sits behind the [`LseSource`] trait. Each call to
//! [`LsfReader::read`] pulls one event, fills the CCSDS identity, the
//! [`MetaEvent`](lsf_data::MetaEvent) and the raw [`Ebf`](lsf_data::Ebf)
//! bytes, and picks the configuration and key shapes from the event's info
//! type:
//!
//! | Info type | Configuration | Keys | Handlers |
//! |-----------|---------------|------|----------|
//! | LPA | `Configuration::Lpa` | `LsfKeys::Lpa` | from the handler list |
//! | LCI ACD | `Configuration::LciAcd` | `LsfKeys::Lci` | none |
//! | LCI CAL | `Configuration::LciCal` | `LsfKeys::Lci` | none |
//! | LCI TKR | `Configuration::LciTkr` | `LsfKeys::Lci` | none |

use thiserror::Error;

pub mod config;
pub mod lse;
pub mod reader;
pub mod replay;

pub use config::ReaderConfig;
pub use lse::{LseEvent, LseHeader, LseInfo, LseSource};
pub use reader::{LsfReader, LsfRecord};
pub use replay::{ReplayError, ReplaySource};

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Event source error: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("Unrecognized info type: {0}")]
    UnrecognizedInfoType(u32),
    #[error("Reader configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReaderError>;
