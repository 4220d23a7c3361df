//! ID prefix constants.
//!
//! Every generated ID is `{prefix}-{8 hex chars}`, e.g. `spc-a3f8b2c1`.
//! User IDs are supplied by the authentication layer and carry no prefix.

pub const PREFIX_SPECIES: &str = "spc";
pub const PREFIX_CHANGE: &str = "chg";
pub const PREFIX_ACTIVITY: &str = "act";
pub const PREFIX_PHOTO: &str = "pho";

/// All generated-ID prefixes.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SPECIES,
    PREFIX_CHANGE,
    PREFIX_ACTIVITY,
    PREFIX_PHOTO,
];
