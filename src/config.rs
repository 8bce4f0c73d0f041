use crate::auction::Item;
use clap::Parser;
use std::{net::SocketAddr, time::Duration};

/// Bids in auctions on your behalf
#[derive(Parser, Debug, Clone)]
#[command(name = "sniper", version)]
pub struct Opts {
    /// Our identity in the auction chats
    #[arg(long, env = "SNIPER_ID", default_value = "sniper")]
    pub sniper_id: String,

    /// Serve the sniper status over http on this address
    #[arg(long, env = "SNIPER_STATUS_ADDR")]
    pub status_addr: Option<SocketAddr>,

    /// How long a service waits for a message before checking whether it should stop
    #[arg(long, env = "SNIPER_POLL_TIMEOUT_MS", default_value_t = 1000)]
    pub poll_timeout_ms: u64,

    /// Capacity of every message queue
    #[arg(long, env = "SNIPER_QUEUE_CAPACITY", default_value_t = 1024)]
    pub queue_capacity: usize,

    /// Items to snipe for, as `ITEM` or `ITEM:STOP_PRICE`
    #[arg(required = true)]
    pub items: Vec<Item>,
}

impl Opts {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
