use crate::{
    auction::{Amount, Auction, Item, PriceSource},
    event::ParseError,
    service::{
        bidding_engine::{AuctionEventListener, AuctionSniper, Defect, SniperListener, SniperSnapshot},
        FailureReporter,
    },
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Everything the sniper did to its collaborators, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Join,
    Bid(Amount),
    StateChanged(SniperSnapshot),
}

/// Fake auction and sniper listener sharing one call log
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    pub fn bids(&self) -> Vec<Amount> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Bid(amount) => Some(amount),
                _ => None,
            })
            .collect()
    }

    pub fn snapshots(&self) -> Vec<SniperSnapshot> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::StateChanged(snapshot) => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    pub fn last_snapshot(&self) -> Option<SniperSnapshot> {
        self.snapshots().pop()
    }
}

impl Auction for CallLog {
    fn join(&self) {
        self.0.lock().push(Call::Join);
    }

    fn bid(&self, amount: Amount) {
        self.0.lock().push(Call::Bid(amount));
    }
}

impl SniperListener for CallLog {
    fn sniper_state_changed(&mut self, snapshot: &SniperSnapshot) {
        self.0.lock().push(Call::StateChanged(snapshot.clone()));
    }
}

pub fn sniper_for(item: Item) -> (AuctionSniper, CallLog) {
    let log = CallLog::default();
    (
        AuctionSniper::new(item, Arc::new(log.clone()), Box::new(log.clone())),
        log,
    )
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    Closed,
    Price(Amount, Amount, PriceSource),
    Failed,
}

#[derive(Clone, Default)]
pub struct RecordingAuctionEventListener(Arc<Mutex<Vec<Notification>>>);

impl RecordingAuctionEventListener {
    pub fn notifications(&self) -> Vec<Notification> {
        self.0.lock().clone()
    }
}

impl AuctionEventListener for RecordingAuctionEventListener {
    fn auction_closed(&mut self) -> Result<(), Defect> {
        self.0.lock().push(Notification::Closed);
        Ok(())
    }

    fn current_price(
        &mut self,
        price: Amount,
        increment: Amount,
        source: PriceSource,
    ) -> Result<(), Defect> {
        self.0
            .lock()
            .push(Notification::Price(price, increment, source));
        Ok(())
    }

    fn auction_failed(&mut self) -> Result<(), Defect> {
        self.0.lock().push(Notification::Failed);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub auction_id: String,
    pub failed_message: String,
    pub error: ParseError,
}

#[derive(Clone, Default)]
pub struct RecordingFailureReporter(Arc<Mutex<Vec<Report>>>);

impl RecordingFailureReporter {
    pub fn reports(&self) -> Vec<Report> {
        self.0.lock().clone()
    }
}

impl FailureReporter for RecordingFailureReporter {
    fn cannot_translate_message(&self, auction_id: &str, failed_message: &str, error: &ParseError) {
        self.0.lock().push(Report {
            auction_id: auction_id.to_owned(),
            failed_message: failed_message.to_owned(),
            error: error.clone(),
        });
    }
}

pub struct PanickingFailureReporter;

impl FailureReporter for PanickingFailureReporter {
    fn cannot_translate_message(&self, _auction_id: &str, _failed_message: &str, _error: &ParseError) {
        panic!("reporter broke");
    }
}
