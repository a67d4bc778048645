//! What the controller tells the presentation layer

use std::fmt::{Display, Error, Formatter};

use crate::item::UserId;
use crate::traits::Presenter;

/// A change the presentation layer should render
#[derive(Clone, Debug, PartialEq)]
pub enum ListSignal {
    /// The whole list may have changed
    FullReload,
    /// A row has been added at this index
    RowInserted(usize),
    /// The row at this index has new contents
    RowUpdated(usize),
    /// The row that was at this index is gone
    RowRemoved(usize),
    /// Someone signed in (`Some`) or out (`None`)
    SessionChanged(Option<UserId>),
    /// Something failed. The list has not been changed.
    Error(String),
}

impl Display for ListSignal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            ListSignal::FullReload => write!(f, "List reloaded"),
            ListSignal::RowInserted(index) => write!(f, "Row {} inserted", index),
            ListSignal::RowUpdated(index) => write!(f, "Row {} updated", index),
            ListSignal::RowRemoved(index) => write!(f, "Row {} removed", index),
            ListSignal::SessionChanged(Some(user)) => write!(f, "Signed in as {}", user),
            ListSignal::SessionChanged(None) => write!(f, "Signed out"),
            ListSignal::Error(message) => write!(f, "Error: {}", message),
        }
    }
}


/// See [`signal_channel`]
pub type SignalSender = tokio::sync::mpsc::UnboundedSender<ListSignal>;
/// See [`signal_channel`]
pub type SignalReceiver = tokio::sync::mpsc::UnboundedReceiver<ListSignal>;

/// Create a channel that can be used as a [`Presenter`]: every signal ends up in the receiver, in order
pub fn signal_channel() -> (SignalSender, SignalReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

impl Presenter for SignalSender {
    fn present(&self, signal: ListSignal) {
        if self.send(signal).is_err() {
            log::debug!("Nobody is listening to list signals anymore");
        }
    }
}

/// A presenter that only logs the signals
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn present(&self, signal: ListSignal) {
        match signal {
            ListSignal::Error(_) => log::warn!("{}", signal),
            _ => log::info!("{}", signal),
        }
    }
}
