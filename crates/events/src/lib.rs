//! Folio in-process event infrastructure.
//!
//! The editor surfaces react to portfolio changes through a
//! publish/subscribe bus rather than polling: a layout save publishes
//! `portfolio.updated`, an identity save additionally publishes
//! `portfolio.identity_updated`, and so on.

pub mod bus;

pub use bus::{EventBus, PortfolioEvent};
