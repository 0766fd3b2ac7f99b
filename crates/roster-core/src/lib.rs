//! Marker-block resolution and rendering engine for README rosters.
//!
//! A README contains blocks delimited by marker comments:
//!
//! ```text
//! <!-- readme: contributors,bots,alice/- -start -->
//! ...previously rendered table...
//! <!-- readme: contributors,bots,alice/- -end -->
//! ```
//!
//! For each block the engine:
//!
//! 1. Reads the entities of the previous render back out ([`parse_entities`]).
//! 2. Resolves the marker's tokens against the fresh [`PoolSet`] ([`resolve`]).
//! 3. Renders the resolved sequence with the block's [`Template`] ([`render`]).
//! 4. Splices the result between the markers ([`Merger`]).
//!
//! Fetching pools and writing the document back are left to the caller.

mod entity;
mod error;
mod merge;
mod parser;
mod resolver;
mod scanner;
mod spec;
mod template;

pub use entity::{Entity, EntityKind, Pool, PoolSet, PriorEntity};
pub use error::{BlockError, MergeError, SpecError};
pub use merge::{BlockOutcome, Merged, Merger, merge};
pub use parser::{PriorEntities, parse_entities, parse_entity_list};
pub use resolver::{EntityList, resolve};
pub use scanner::{Region, scan};
pub use spec::{Category, Operator, Token, parse_spec};
pub use template::{
    DEFAULT_COLUMNS_PER_ROW, DEFAULT_IMAGE_SIZE, Template, Templates, placeholder_avatar_url,
    render,
};
