//! Auction House
//!
//! Everything between the auction chats and the bidding engine:
//! delivering messages, translating them into auction events and
//! sending our commands back.
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crate::{
    auction::{Amount, ItemId, ItemIdRef},
    service::bidding_engine::{
        AuctionEventListener, AuctionEventListeners, Defect, OwnedAuctionEventListener,
    },
};
use anyhow::{Context, Result};
use tracing::debug;

use super::*;

mod chat;
mod failure_reporter;
mod translator;

pub use self::{chat::*, failure_reporter::*, translator::*};

/// Feeds the messages of one auction chat to its translator
pub struct AuctionReceiver {
    item_id: ItemId,
    inbound: SharedMessageQueue,
    translator: AuctionMessageTranslator,
    disconnected: Arc<AtomicBool>,
    poll_timeout: Duration,
}

impl LoopService for AuctionReceiver {
    fn service_id(&self) -> ServiceId {
        format!("auction-receiver-{}", self.item_id)
    }

    fn run_iteration(&mut self) -> Result<()> {
        if let Some(message) = self.inbound.poll_timeout(self.poll_timeout) {
            if self.disconnected.load(Ordering::SeqCst) {
                debug!(item_id = %self.item_id, body = %message.body, "chat disconnected, dropping message");
                return Ok(());
            }

            self.translator
                .process_message(&message)
                .with_context(|| format!("failed to handle message from {}", message.from))?;
        }

        Ok(())
    }
}
