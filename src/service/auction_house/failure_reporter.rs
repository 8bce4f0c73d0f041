use crate::event::ParseError;
use std::sync::Arc;
use tracing::error;

/// Somewhere to record auction messages we could not make sense of
pub trait FailureReporter {
    fn cannot_translate_message(&self, auction_id: &str, failed_message: &str, error: &ParseError);
}

pub type SharedFailureReporter = Arc<dyn FailureReporter + Send + Sync + 'static>;

pub fn describe_failure(auction_id: &str, failed_message: &str, error: &ParseError) -> String {
    format!("<{auction_id}> Could not translate message \"{failed_message}\" because \"{error}\"")
}

#[derive(Clone, Debug, Default)]
pub struct LoggingFailureReporter;

impl LoggingFailureReporter {
    pub fn new_shared() -> SharedFailureReporter {
        Arc::new(Self)
    }
}

impl FailureReporter for LoggingFailureReporter {
    fn cannot_translate_message(&self, auction_id: &str, failed_message: &str, error: &ParseError) {
        error!(
            auction_id,
            ?error,
            "{}",
            describe_failure(auction_id, failed_message, error)
        );
    }
}
