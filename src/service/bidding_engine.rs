//! Bidding Engine
//!
//! The logic that based on events from the Auction House
//! determines if new bids should be placed and of what amount,
//! and keeps track of how the sniper is doing in the auction.
use crate::auction::{Amount, Item, ItemId, PriceSource, SharedAuction};
use thiserror::Error;
use tracing::{debug, info};

mod snapshot;

pub use self::snapshot::*;

/// A programming error: the surrounding code broke the contract of
/// the bidding engine
///
/// Not something an auction can cause by sending garbage, so never
/// handled like a protocol error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    #[error("auction for {item_id} is already closed (sniper {state})")]
    AuctionAlreadyClosed { item_id: ItemId, state: SniperState },
}

/// Events of one auction, as understood by the sniper
///
/// Calls are serialized: never more than one at a time per auction.
pub trait AuctionEventListener {
    fn auction_closed(&mut self) -> Result<(), Defect> {
        Ok(())
    }

    fn current_price(
        &mut self,
        _price: Amount,
        _increment: Amount,
        _source: PriceSource,
    ) -> Result<(), Defect> {
        Ok(())
    }

    fn auction_failed(&mut self) -> Result<(), Defect> {
        Ok(())
    }
}

pub type OwnedAuctionEventListener = Box<dyn AuctionEventListener + Send>;

/// Notifies every registered listener, in registration order
#[derive(Default)]
pub struct AuctionEventListeners(Vec<OwnedAuctionEventListener>);

impl AuctionEventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: OwnedAuctionEventListener) {
        self.0.push(listener);
    }

    pub fn with(mut self, listener: impl AuctionEventListener + Send + 'static) -> Self {
        self.add(Box::new(listener));
        self
    }
}

impl AuctionEventListener for AuctionEventListeners {
    fn auction_closed(&mut self) -> Result<(), Defect> {
        self.0.iter_mut().try_for_each(|l| l.auction_closed())
    }

    fn current_price(
        &mut self,
        price: Amount,
        increment: Amount,
        source: PriceSource,
    ) -> Result<(), Defect> {
        self.0
            .iter_mut()
            .try_for_each(|l| l.current_price(price, increment, source))
    }

    fn auction_failed(&mut self) -> Result<(), Defect> {
        self.0.iter_mut().try_for_each(|l| l.auction_failed())
    }
}

pub trait SniperListener {
    fn sniper_state_changed(&mut self, snapshot: &SniperSnapshot);
}

pub type OwnedSniperListener = Box<dyn SniperListener + Send>;

/// Bids for a single item on our behalf
pub struct AuctionSniper {
    item: Item,
    auction: SharedAuction,
    listener: OwnedSniperListener,
    snapshot: SniperSnapshot,
}

impl AuctionSniper {
    pub fn new(item: Item, auction: SharedAuction, listener: OwnedSniperListener) -> Self {
        let snapshot = SniperSnapshot::joining(&item.id);
        Self {
            item,
            auction,
            listener,
            snapshot,
        }
    }

    /// Ask the auction to let us in
    pub fn join(&self) {
        debug!(item_id = %self.item.id, "joining auction");
        self.auction.join();
    }

    pub fn snapshot(&self) -> &SniperSnapshot {
        &self.snapshot
    }

    fn is_failed(&self) -> bool {
        self.snapshot.state == SniperState::Failed
    }

    fn ensure_not_finished(&self) -> Result<(), Defect> {
        if self.snapshot.state.is_finished() {
            return Err(Defect::AuctionAlreadyClosed {
                item_id: self.item.id.clone(),
                state: self.snapshot.state,
            });
        }
        Ok(())
    }

    /// The bid to answer another bidder with, if we can afford it
    fn next_bid(&self, price: Amount, increment: Amount) -> Option<Amount> {
        price
            .checked_add(increment)
            .filter(|bid| self.item.allows_bid(*bid))
    }

    fn notify_change(&mut self) {
        self.listener.sniper_state_changed(&self.snapshot);
    }
}

impl AuctionEventListener for AuctionSniper {
    fn auction_closed(&mut self) -> Result<(), Defect> {
        if self.is_failed() {
            debug!(item_id = %self.item.id, "ignoring close of a failed auction");
            return Ok(());
        }

        self.snapshot = self.snapshot.closed()?;
        info!(item_id = %self.item.id, state = %self.snapshot.state, "auction closed");
        self.notify_change();
        Ok(())
    }

    fn current_price(
        &mut self,
        price: Amount,
        increment: Amount,
        source: PriceSource,
    ) -> Result<(), Defect> {
        if self.is_failed() {
            debug!(item_id = %self.item.id, price, "ignoring price of a failed auction");
            return Ok(());
        }
        self.ensure_not_finished()?;

        self.snapshot = match source {
            PriceSource::FromSniper => self.snapshot.winning(price),
            PriceSource::FromOtherBidder => match self.next_bid(price, increment) {
                Some(bid) => {
                    debug!(item_id = %self.item.id, price, bid, "outbidding");
                    self.auction.bid(bid);
                    self.snapshot.bidding(price, bid)
                }
                None => {
                    debug!(
                        item_id = %self.item.id,
                        price,
                        increment,
                        stop_price = ?self.item.stop_price,
                        "price above stop price"
                    );
                    self.snapshot.losing(price)
                }
            },
        };
        self.notify_change();
        Ok(())
    }

    fn auction_failed(&mut self) -> Result<(), Defect> {
        if self.is_failed() {
            return Ok(());
        }

        self.snapshot = self.snapshot.failed();
        info!(item_id = %self.item.id, "auction failed, not bidding anymore");
        self.notify_change();
        Ok(())
    }
}
