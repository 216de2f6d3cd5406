//! Static game data: the playbook.

pub mod play_catalog;

pub use play_catalog::{
    PlayCatalog, PlayDefinition, RejectedPlay, RiskLevel, Route, MAX_ROUTE_DEPTH_YDS,
};
