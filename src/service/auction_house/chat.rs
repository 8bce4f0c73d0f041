//! In-memory chat transport
//!
//! Each item gets one chat: a queue of messages for the sniper and a
//! queue of commands for the auction. There is no network; whatever
//! plays the auction (a test, the console feed) uses the
//! [`AuctionServerEnd`] of the chat.
use super::*;
use crate::{
    auction::{Auction, AuctionHouse, Item, SharedAuction},
    event::{self, AuctionEvent, PriceReport},
    queue::{BlockingQueue, QueueFull, SharedBlockingQueue},
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub from: String,
    pub body: String,
}

impl Message {
    pub fn new(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
        }
    }
}

pub type SharedMessageQueue = SharedBlockingQueue<Message>;

pub fn auction_id(item_id: ItemIdRef) -> String {
    format!("auction-{item_id}")
}

#[derive(Clone)]
struct Chat {
    to_sniper: SharedMessageQueue,
    to_auction: SharedMessageQueue,
}

impl Chat {
    fn new(capacity: usize) -> Self {
        Self {
            to_sniper: BlockingQueue::new_shared(capacity),
            to_auction: BlockingQueue::new_shared(capacity),
        }
    }
}

/// Sends our commands to the auction over its chat
pub struct ChatAuction {
    sniper_id: String,
    item_id: ItemId,
    to_auction: SharedMessageQueue,
}

impl ChatAuction {
    fn send(&self, body: String) {
        debug!(item_id = %self.item_id, %body, "sending command");
        if let Err(e) = self.to_auction.add(Message::new(self.sniper_id.clone(), body)) {
            warn!(item_id = %self.item_id, error = %e, body = %e.element.body, "dropping command");
        }
    }
}

impl Auction for ChatAuction {
    fn join(&self) {
        self.send(event::join_command());
    }

    fn bid(&self, amount: Amount) {
        self.send(event::bid_command(amount));
    }
}

pub struct ChatAuctionHouse {
    sniper_id: String,
    capacity: usize,
    poll_timeout: Duration,
    failure_reporter: SharedFailureReporter,
    chats: Mutex<BTreeMap<ItemId, Chat>>,
}

impl ChatAuctionHouse {
    pub fn new(
        sniper_id: impl Into<String>,
        capacity: usize,
        poll_timeout: Duration,
        failure_reporter: SharedFailureReporter,
    ) -> Self {
        Self {
            sniper_id: sniper_id.into(),
            capacity,
            poll_timeout,
            failure_reporter,
            chats: Mutex::new(BTreeMap::new()),
        }
    }

    fn chat_for(&self, item_id: ItemIdRef) -> Chat {
        self.chats
            .lock()
            .entry(item_id.to_owned())
            .or_insert_with(|| Chat::new(self.capacity))
            .clone()
    }

    /// The auction's side of the chat for `item_id`
    pub fn server_end(&self, item_id: ItemIdRef) -> AuctionServerEnd {
        AuctionServerEnd {
            item_id: item_id.to_owned(),
            chat: self.chat_for(item_id),
        }
    }

    /// A service delivering the chat messages for `item` to `listener`
    ///
    /// Messages go through a translator; once the auction closed or
    /// failed, the chat is disconnected and further messages are dropped.
    pub fn receiver_for(&self, item: &Item, listener: OwnedAuctionEventListener) -> AuctionReceiver {
        let disconnected = Arc::new(AtomicBool::new(false));
        let mut listeners = AuctionEventListeners::new();
        listeners.add(listener);
        listeners.add(Box::new(ChatDisconnected(disconnected.clone())));

        AuctionReceiver {
            item_id: item.id.clone(),
            inbound: self.chat_for(&item.id).to_sniper,
            translator: AuctionMessageTranslator::new(
                self.sniper_id.clone(),
                Box::new(listeners),
                self.failure_reporter.clone(),
            ),
            disconnected,
            poll_timeout: self.poll_timeout,
        }
    }
}

impl AuctionHouse for ChatAuctionHouse {
    fn auction_for(&self, item: &Item) -> SharedAuction {
        Arc::new(ChatAuction {
            sniper_id: self.sniper_id.clone(),
            item_id: item.id.clone(),
            to_auction: self.chat_for(&item.id).to_auction,
        })
    }
}

/// Stops listening to an auction once it closed or sent something we
/// don't understand
pub struct ChatDisconnected(Arc<AtomicBool>);

impl AuctionEventListener for ChatDisconnected {
    fn auction_closed(&mut self) -> Result<(), Defect> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn auction_failed(&mut self) -> Result<(), Defect> {
        self.0.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// The auction's side of a chat
#[derive(Clone)]
pub struct AuctionServerEnd {
    item_id: ItemId,
    chat: Chat,
}

impl AuctionServerEnd {
    pub fn item_id(&self) -> ItemIdRef {
        &self.item_id
    }

    pub fn send(&self, body: impl Into<String>) -> Result<(), QueueFull<Message>> {
        self.chat
            .to_sniper
            .add(Message::new(auction_id(&self.item_id), body))
    }

    pub fn report_price(
        &self,
        current_price: Amount,
        increment: Amount,
        bidder: &str,
    ) -> Result<(), QueueFull<Message>> {
        self.send(
            AuctionEvent::Price(PriceReport {
                current_price,
                increment,
                bidder: bidder.to_owned(),
            })
            .to_string(),
        )
    }

    pub fn announce_closed(&self) -> Result<(), QueueFull<Message>> {
        self.send(AuctionEvent::Closed.to_string())
    }

    /// Next command sent by the sniper, waiting up to `timeout` if given
    pub fn poll_command(&self, timeout: Option<Duration>) -> Option<Message> {
        match timeout {
            Some(timeout) => self.chat.to_auction.poll_timeout(timeout),
            None => self.chat.to_auction.poll(),
        }
    }
}
