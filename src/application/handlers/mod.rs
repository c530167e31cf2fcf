//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod patron;

pub use patron::{
    CreatePatronCommand, CreatePatronHandler, DeletePatronCommand, DeletePatronHandler,
    GetPatronHandler, GetPatronQuery, ListPatronsHandler, ListPatronsQuery, PatronDto,
    PatronListDto, RenewPatronCommand, RenewPatronHandler, UpdatePatronCommand,
    UpdatePatronHandler,
};
