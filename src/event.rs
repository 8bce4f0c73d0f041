//! Auction chat protocol
//!
//! Every message is a list of `Key: Value` fields separated by `;`,
//! for example:
//!
//! ```text
//! SOL Version: 1.1; Event: PRICE; CurrentPrice: 192; Increment: 7; Bidder: Someone else;
//! ```
use crate::auction::{Amount, PriceSource};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const PROTOCOL_VERSION: &str = "1.1";

const VERSION: &str = "SOL Version";
const EVENT: &str = "Event";
const CURRENT_PRICE: &str = "CurrentPrice";
const INCREMENT: &str = "Increment";
const BIDDER: &str = "Bidder";

const KNOWN_FIELDS: [&str; 4] = [EVENT, CURRENT_PRICE, INCREMENT, BIDDER];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("can't find value for key \"{key}\"")]
    MissingValue { key: String },
    #[error("value is missing for field \"{0}\"")]
    MissingField(&'static str),
    #[error("malformed value \"{value}\" for field \"{field}\"")]
    MalformedValue { field: &'static str, value: String },
    #[error("unrecognized event \"{0}\"")]
    UnrecognizedEvent(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceReport {
    pub current_price: Amount,
    pub increment: Amount,
    pub bidder: String,
}

impl PriceReport {
    pub fn source(&self, sniper_id: &str) -> PriceSource {
        if self.bidder == sniper_id {
            PriceSource::FromSniper
        } else {
            PriceSource::FromOtherBidder
        }
    }
}

/// Something that happened in an auction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuctionEvent {
    Closed,
    Price(PriceReport),
}

impl AuctionEvent {
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        Fields::parse(body)?.event()
    }
}

impl FromStr for AuctionEvent {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats the event the way an auction announces it
impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuctionEvent::Closed => write!(f, "{VERSION}: {PROTOCOL_VERSION}; {EVENT}: CLOSE;"),
            AuctionEvent::Price(PriceReport {
                current_price,
                increment,
                bidder,
            }) => write!(
                f,
                "{VERSION}: {PROTOCOL_VERSION}; {EVENT}: PRICE; \
                 {CURRENT_PRICE}: {current_price}; {INCREMENT}: {increment}; {BIDDER}: {bidder};"
            ),
        }
    }
}

pub fn join_command() -> String {
    format!("{VERSION}: {PROTOCOL_VERSION}; {EVENT}: JOIN;")
}

pub fn bid_command(amount: Amount) -> String {
    format!("{VERSION}: {PROTOCOL_VERSION}; {EVENT}: BID; Price: {amount};")
}

/// The raw fields of a message, before making any sense of them
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        let mut fields = BTreeMap::new();

        for field in body.split(';').map(str::trim).filter(|f| !f.is_empty()) {
            let (key, value) = field
                .split_once(':')
                .map(|(key, value)| (key.trim(), value.trim()))
                .unwrap_or((field, ""));

            if value.is_empty() {
                return Err(ParseError::MissingValue {
                    key: key.to_owned(),
                });
            }

            fields.insert(key.to_owned(), value.to_owned());
        }

        Ok(Self(fields))
    }

    pub fn get(&self, name: &'static str) -> Result<&str, ParseError> {
        self.0
            .get(name)
            .map(String::as_str)
            .ok_or(ParseError::MissingField(name))
    }

    fn get_amount(&self, name: &'static str) -> Result<Amount, ParseError> {
        let value = self.get(name)?;
        value.parse().map_err(|_| ParseError::MalformedValue {
            field: name,
            value: value.to_owned(),
        })
    }

    /// Fields we don't act upon, like the protocol version
    pub fn unknown(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn event(&self) -> Result<AuctionEvent, ParseError> {
        match self.get(EVENT)? {
            "CLOSE" => Ok(AuctionEvent::Closed),
            "PRICE" => Ok(AuctionEvent::Price(PriceReport {
                current_price: self.get_amount(CURRENT_PRICE)?,
                increment: self.get_amount(INCREMENT)?,
                bidder: self.get(BIDDER)?.to_owned(),
            })),
            other => Err(ParseError::UnrecognizedEvent(other.to_owned())),
        }
    }
}
