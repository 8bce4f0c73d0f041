use super::{Message, SharedFailureReporter};
use crate::event::{AuctionEvent, Fields, ParseError};
use crate::service::bidding_engine::{Defect, OwnedAuctionEventListener};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, trace};

/// Turns raw auction chat messages into auction events
///
/// Exactly one of closed/price/failed is signaled per message. A message
/// that does not parse is reported and signaled as a failed auction.
pub struct AuctionMessageTranslator {
    sniper_id: String,
    listener: OwnedAuctionEventListener,
    failure_reporter: SharedFailureReporter,
}

impl AuctionMessageTranslator {
    pub fn new(
        sniper_id: impl Into<String>,
        listener: OwnedAuctionEventListener,
        failure_reporter: SharedFailureReporter,
    ) -> Self {
        Self {
            sniper_id: sniper_id.into(),
            listener,
            failure_reporter,
        }
    }

    pub fn process_message(&mut self, message: &Message) -> Result<(), Defect> {
        debug!(from = %message.from, body = %message.body, "auction message");

        match Self::translate(&message.body) {
            Ok(AuctionEvent::Closed) => self.listener.auction_closed(),
            Ok(AuctionEvent::Price(report)) => self.listener.current_price(
                report.current_price,
                report.increment,
                report.source(&self.sniper_id),
            ),
            Err(e) => {
                self.report_failure(&message.body, &e);
                self.listener.auction_failed()
            }
        }
    }

    fn translate(body: &str) -> Result<AuctionEvent, ParseError> {
        let fields = Fields::parse(body)?;
        for (key, value) in fields.unknown() {
            trace!(key, value, "ignoring field");
        }
        fields.event()
    }

    fn report_failure(&self, failed_message: &str, e: &ParseError) {
        let reporter = &self.failure_reporter;
        let sniper_id = self.sniper_id.as_str();

        if panic::catch_unwind(AssertUnwindSafe(|| {
            reporter.cannot_translate_message(sniper_id, failed_message, e)
        }))
        .is_err()
        {
            error!(sniper_id, error = %e, "failure reporter panicked");
        }
    }
}
