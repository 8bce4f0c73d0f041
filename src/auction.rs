use anyhow::{format_err, Context, Result};
use std::str::FromStr;
use std::sync::Arc;

pub type ItemId = String;
pub type ItemIdRef<'s> = &'s str;
pub type Amount = u64;

/// An item we are sniping for
///
/// `stop_price` is the most we are ever willing to bid for it. No stop
/// price means there's no limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub stop_price: Option<Amount>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            stop_price: None,
        }
    }

    pub fn with_stop_price(id: impl Into<ItemId>, stop_price: Amount) -> Self {
        Self {
            id: id.into(),
            stop_price: Some(stop_price),
        }
    }

    pub fn allows_bid(&self, bid: Amount) -> bool {
        self.stop_price.map(|stop| bid <= stop).unwrap_or(true)
    }
}

/// `ITEM` or `ITEM:STOP_PRICE`
impl FromStr for Item {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (id, stop_price) = match s.split_once(':') {
            Some((id, stop_price)) => (
                id.trim(),
                Some(
                    stop_price
                        .trim()
                        .parse::<Amount>()
                        .with_context(|| format!("invalid stop price in `{s}`"))?,
                ),
            ),
            None => (s, None),
        };

        if id.is_empty() {
            return Err(format_err!("missing item id in `{s}`"));
        }

        Ok(Self {
            id: id.to_owned(),
            stop_price,
        })
    }
}

/// Who raised the price last
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PriceSource {
    FromSniper,
    FromOtherBidder,
}

/// Our handle to a single auction
///
/// Commands are fire-and-forget: delivery problems are the
/// implementation's business, never the sniper's.
pub trait Auction {
    fn join(&self);
    fn bid(&self, amount: Amount);
}

pub type SharedAuction = Arc<dyn Auction + Send + Sync>;

pub trait AuctionHouse {
    fn auction_for(&self, item: &Item) -> SharedAuction;
}
