//! CLI command implementations.

pub(crate) mod inspect;
pub(crate) mod update;

pub(crate) use inspect::InspectArgs;
pub(crate) use update::UpdateArgs;
