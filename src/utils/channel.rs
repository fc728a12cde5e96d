use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::eventlogger::event::EventRequest;

/// Queue between event producers and the event logger worker.
pub fn run(capacity: usize) -> (Sender<EventRequest>, Receiver<EventRequest>) {
    mpsc::channel(capacity.max(1))
}
