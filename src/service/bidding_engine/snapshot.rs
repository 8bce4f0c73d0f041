use super::Defect;
use crate::auction::{Amount, ItemId, ItemIdRef};
use serde::Serialize;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SniperState {
    Joining,
    Bidding,
    Winning,
    Losing,
    Lost,
    Won,
    Failed,
}

impl SniperState {
    /// The auction closed and we know the outcome
    pub fn is_finished(self) -> bool {
        matches!(self, SniperState::Won | SniperState::Lost)
    }

    fn when_auction_closed(self) -> Option<SniperState> {
        use SniperState::*;
        match self {
            Joining | Bidding | Losing => Some(Lost),
            Winning => Some(Won),
            Failed => Some(Failed),
            Won | Lost => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        use SniperState::*;
        match self {
            Joining => "joining",
            Bidding => "bidding",
            Winning => "winning",
            Losing => "losing",
            Lost => "lost",
            Won => "won",
            Failed => "failed",
        }
    }
}

impl fmt::Display for SniperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sniper is doing at some point in time
///
/// Never changed in place: every transition produces a new snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SniperSnapshot {
    pub item_id: ItemId,
    pub last_price: Amount,
    pub last_bid: Amount,
    pub state: SniperState,
}

impl SniperSnapshot {
    pub fn new(
        item_id: impl Into<ItemId>,
        last_price: Amount,
        last_bid: Amount,
        state: SniperState,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            last_price,
            last_bid,
            state,
        }
    }

    pub fn joining(item_id: ItemIdRef) -> Self {
        Self::new(item_id, 0, 0, SniperState::Joining)
    }

    pub fn bidding(&self, last_price: Amount, last_bid: Amount) -> Self {
        Self::new(
            self.item_id.clone(),
            last_price,
            last_bid,
            SniperState::Bidding,
        )
    }

    pub fn winning(&self, last_price: Amount) -> Self {
        Self::new(
            self.item_id.clone(),
            last_price,
            self.last_bid,
            SniperState::Winning,
        )
    }

    pub fn losing(&self, last_price: Amount) -> Self {
        Self::new(
            self.item_id.clone(),
            last_price,
            self.last_bid,
            SniperState::Losing,
        )
    }

    pub fn closed(&self) -> Result<Self, Defect> {
        let state = self
            .state
            .when_auction_closed()
            .ok_or_else(|| Defect::AuctionAlreadyClosed {
                item_id: self.item_id.clone(),
                state: self.state,
            })?;

        Ok(Self::new(
            self.item_id.clone(),
            self.last_price,
            self.last_bid,
            state,
        ))
    }

    pub fn failed(&self) -> Self {
        Self::new(self.item_id.clone(), 0, 0, SniperState::Failed)
    }

    pub fn is_for_same_item_as(&self, other: &SniperSnapshot) -> bool {
        self.item_id == other.item_id
    }
}

/// The status line shown for a sniper
impl fmt::Display for SniperSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} - {} - {}",
            self.item_id, self.last_price, self.last_bid, self.state
        )
    }
}
