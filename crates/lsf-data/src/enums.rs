//! Discriminants carried by the event context
//!
//! Most of these arrive from the decoder as bare integers. `from_raw` maps the
//! declared codes onto named variants and keeps anything else as
//! `Unrecognized(raw)`, so an out-of-range tag is representable and can be
//! written back out unchanged with `to_raw`.

use serde::{Deserialize, Serialize};

use crate::{LsfDataError, Result};

macro_rules! raw_tag_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal, sentinel = $unset:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Not filled in
            $unset,
            /// Raw code outside the declared set, kept verbatim
            Unrecognized(u32),
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$unset
            }
        }

        raw_tag_enum!(@impl $name, $kind, [$($variant = $code),+]);
    };
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $kind:literal, default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Raw code outside the declared set, kept verbatim
            Unrecognized(u32),
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        raw_tag_enum!(@impl $name, $kind, [$($variant = $code),+]);
    };
    (@impl $name:ident, $kind:literal, [$($variant:ident = $code:literal),+]) => {
        impl $name {
            /// Map a raw decoder code onto the enum
            pub fn from_raw(raw: u32) -> Self {
                match raw {
                    $( $code => Self::$variant, )+
                    other => Self::Unrecognized(other),
                }
            }

            /// Like `from_raw`, but rejects codes outside the declared set
            pub fn try_from_raw(raw: u32) -> Result<Self> {
                match Self::from_raw(raw) {
                    Self::Unrecognized(raw) => Err(LsfDataError::UnrecognizedTag {
                        kind: $kind,
                        raw: i64::from(raw),
                    }),
                    known => Ok(known),
                }
            }

            /// Raw code for this value; `None` only for the "not filled in" sentinel
            #[allow(unreachable_patterns)]
            pub fn to_raw(self) -> Option<u32> {
                match self {
                    $( Self::$variant => Some($code), )+
                    Self::Unrecognized(raw) => Some(raw),
                    _ => None,
                }
            }

            pub fn is_recognized(self) -> bool {
                !matches!(self, Self::Unrecognized(_))
            }
        }
    };
}

raw_tag_enum! {
    /// Hardware the run was taken on
    pub enum Platform: "platform", sentinel = None {
        Lat = 0,
        Testbed = 1,
        Host = 2,
    }
}

raw_tag_enum! {
    /// Orbit, Monte Carlo or ground-test data
    pub enum DataOrigin: "data origin", sentinel = None {
        Orbit = 0,
        MonteCarlo = 1,
        Ground = 2,
    }
}

raw_tag_enum! {
    /// Event-processing crate a datagram came from
    pub enum LatCrate: "crate", sentinel = None {
        Epu0 = 0,
        Epu1 = 1,
        Epu2 = 2,
        Epu3 = 3,
        Siu0 = 4,
        Siu1 = 5,
    }
}

raw_tag_enum! {
    /// LAT operating mode while the datagram was filled
    pub enum Mode: "mode", sentinel = None {
        Normal = 0,
        Too = 1,
        Grb0 = 2,
        Grb1 = 3,
        Grb2 = 4,
        Grb3 = 5,
        Calibration = 6,
        Diagnostic = 7,
    }
}

raw_tag_enum! {
    pub enum OpenAction: "open action", default = Unspecified {
        Start = 0,
        Resume = 1,
        Continue = 2,
        Unspecified = 3,
    }
}

raw_tag_enum! {
    pub enum OpenReason: "open reason", default = Unknown {
        Operator = 0,
        ModeChange = 1,
        Unknown = 2,
    }
}

raw_tag_enum! {
    pub enum CloseAction: "close action", default = Unspecified {
        Stop = 0,
        Abort = 1,
        Pause = 2,
        Continue = 3,
        Unspecified = 4,
    }
}

raw_tag_enum! {
    pub enum CloseReason: "close reason", default = Unknown {
        Operator = 0,
        ModeChange = 1,
        TimeLimit = 2,
        CountLimit = 3,
        Full = 4,
        Unknown = 5,
    }
}

raw_tag_enum! {
    /// Overall filter result for an event
    pub enum RsdState: "rsd state", default = Invalid {
        Invalid = 0,
        Ignored = 1,
        Passed = 2,
        Suppressed = 3,
        Vetoed = 4,
        Leaked = 5,
    }
}

raw_tag_enum! {
    /// Onboard filter handler identifier
    pub enum HandlerId: "handler id", sentinel = None {
        Passthru = 0,
        Gamma = 1,
        Hip = 2,
        Mip = 3,
        Dgn = 4,
    }
}

/// Kind of run, fixed by the live configuration variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RunType {
    #[default]
    None,
    Lpa,
    AcdLci,
    CalLci,
    TkrLci,
}

/// Kind of configuration-file keys, fixed by the live keys variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeysType {
    #[default]
    None,
    Lpa,
    Lci,
}

/// Which prescaler (if any) let a suppressed event through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LeakedPrescaler {
    /// RSD encoding predates prescaler reporting
    #[default]
    Unsupported,
    /// Input prescaler expired; the filter never examined the event
    Input,
    /// Output prescaler expired
    Output,
    /// Index of the per-line prescaler that fired
    Line(u32),
    /// Negative raw code other than the three reserved ones
    Unrecognized(i32),
}

impl LeakedPrescaler {
    pub const RAW_UNSUPPORTED: i32 = -3;
    pub const RAW_INPUT: i32 = -2;
    pub const RAW_OUTPUT: i32 = -1;

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_UNSUPPORTED => Self::Unsupported,
            Self::RAW_INPUT => Self::Input,
            Self::RAW_OUTPUT => Self::Output,
            line if line >= 0 => Self::Line(line.unsigned_abs()),
            other => Self::Unrecognized(other),
        }
    }

    pub fn try_from_raw(raw: i32) -> Result<Self> {
        match Self::from_raw(raw) {
            Self::Unrecognized(raw) => Err(LsfDataError::UnrecognizedTag {
                kind: "leaked prescaler",
                raw: i64::from(raw),
            }),
            known => Ok(known),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Unsupported => Self::RAW_UNSUPPORTED,
            Self::Input => Self::RAW_INPUT,
            Self::Output => Self::RAW_OUTPUT,
            Self::Line(line) => i32::try_from(line).unwrap_or(i32::MAX),
            Self::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}
