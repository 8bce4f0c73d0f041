//! Auction sniper
//!
//! Watches the price updates of auctions and bids on our behalf, up
//! to an optional stop price, keeping track of whether we are winning,
//! losing, or done.
pub mod auction;
pub mod config;
pub mod event;
pub mod queue;
pub mod service;
