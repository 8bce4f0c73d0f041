//! Console auction feed
//!
//! Stand-in for a connection to a real auction server: every line
//! read from stdin, formatted as `<item-id> <message body>`, is
//! delivered to the sniper as a message from that item's auction.
//! Commands the snipers send back are logged.
use crate::{
    auction::ItemId,
    queue::{BlockingQueue, SharedBlockingQueue},
    service::{AuctionServerEnd, LoopService, ServiceId},
};
use anyhow::Result;
use std::{
    collections::BTreeMap,
    io::{self, BufRead},
    thread,
    time::Duration,
};
use tracing::{info, warn};

pub struct ConsoleAuctionFeed {
    lines: SharedBlockingQueue<String>,
    auctions: BTreeMap<ItemId, AuctionServerEnd>,
    poll_timeout: Duration,
}

impl ConsoleAuctionFeed {
    /// Create a feed for the given auctions, reading stdin
    pub fn new(auctions: Vec<AuctionServerEnd>, capacity: usize, poll_timeout: Duration) -> Self {
        let lines = BlockingQueue::new_shared(capacity);

        // blocks on stdin, so detached; ends with the process
        thread::spawn({
            let lines = lines.clone();
            move || {
                for line in io::stdin().lock().lines() {
                    match line {
                        Ok(line) => {
                            if let Err(e) = lines.add(line) {
                                warn!(error = %e, line = %e.element, "dropping console line");
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "can't read stdin anymore");
                            break;
                        }
                    }
                }
            }
        });

        Self::with_lines(auctions, lines, poll_timeout)
    }

    /// Create a feed for the given auctions, reading lines from a queue
    pub fn with_lines(
        auctions: Vec<AuctionServerEnd>,
        lines: SharedBlockingQueue<String>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            lines,
            auctions: auctions
                .into_iter()
                .map(|auction| (auction.item_id().to_owned(), auction))
                .collect(),
            poll_timeout,
        }
    }

    fn deliver(&self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let (item_id, body) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let body = body.trim();

        match self.auctions.get(item_id) {
            Some(_) if body.is_empty() => {
                warn!(item_id, "no message for the auction, ignoring line")
            }
            Some(auction) => {
                if let Err(e) = auction.send(body) {
                    warn!(item_id, error = %e, "auction chat full, dropping message");
                }
            }
            None => warn!(item_id, "not sniping for this item"),
        }
    }

    fn log_commands(&self) {
        for (item_id, auction) in &self.auctions {
            while let Some(command) = auction.poll_command(None) {
                info!(%item_id, from = %command.from, body = %command.body, "command sent to auction");
            }
        }
    }
}

impl LoopService for ConsoleAuctionFeed {
    fn service_id(&self) -> ServiceId {
        "console-auction-feed".to_owned()
    }

    fn run_iteration(&mut self) -> Result<()> {
        self.log_commands();

        if let Some(line) = self.lines.poll_timeout(self.poll_timeout) {
            self.deliver(&line);
        }

        Ok(())
    }
}
