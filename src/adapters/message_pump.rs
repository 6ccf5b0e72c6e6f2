//! Message pump: the asynchronous delivery path for a message port
//!
//! Owns a thread that receives messages from a crossbeam channel and hands
//! each one to a handler, the way a host runtime's dispatcher invokes a
//! block's message callback from its own thread. The pump exits when every
//! sender is dropped or `stop` is called.

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::domain::{OqpskError, OqpskResult};
use crate::pdu::Pmt;

pub struct MessagePump {
    shutdown: Sender<()>,
    delivered: Arc<AtomicUsize>,
    thread: JoinHandle<()>,
}

impl MessagePump {
    /// Start delivering messages from `inbox` to `handler`
    pub fn spawn<F>(inbox: Receiver<Pmt>, handler: F) -> OqpskResult<Self>
    where
        F: Fn(Pmt) + Send + 'static,
    {
        let (shutdown, shutdown_rx) = unbounded::<()>();
        let delivered = Arc::new(AtomicUsize::new(0));
        let count = delivered.clone();

        let thread = thread::Builder::new()
            .name("message-pump".into())
            .spawn(move || run_pump(inbox, shutdown_rx, handler, count))?;

        Ok(Self {
            shutdown,
            delivered,
            thread,
        })
    }

    /// Messages handed to the handler so far
    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Wait for the inbox to close, then return the delivered count
    pub fn join(self) -> OqpskResult<usize> {
        let Self {
            shutdown,
            delivered,
            thread,
        } = self;
        // Keep the shutdown channel open so only inbox disconnection ends the loop
        let result = thread.join();
        drop(shutdown);
        if result.is_err() {
            log::error!("Message pump thread panicked");
            return Err(OqpskError::Message("message pump thread panicked".into()));
        }
        Ok(delivered.load(Ordering::SeqCst))
    }

    /// Stop delivering, leaving undelivered messages in the channel
    pub fn stop(self) -> OqpskResult<usize> {
        let _ = self.shutdown.send(());
        self.join()
    }
}

fn run_pump<F>(inbox: Receiver<Pmt>, shutdown: Receiver<()>, handler: F, count: Arc<AtomicUsize>)
where
    F: Fn(Pmt),
{
    log::debug!("Message pump started");
    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(inbox) -> msg => match msg {
                Ok(msg) => {
                    handler(msg);
                    count.fetch_add(1, Ordering::SeqCst);
                }
                Err(_) => break,
            },
        }
    }
    log::debug!("Message pump stopped after {} messages", count.load(Ordering::SeqCst));
}
