//! Command dispatch loop.
//!
//! The single consumer that turns transcript values into actions: wait for
//! a slot change, debounce by case-normalized equality, classify against
//! the ordered rule table, run the handler, clear the slot, repeat.

pub mod classifier;
pub mod executor;
pub mod handlers;
pub mod session;

pub use classifier::{classify, Command};
pub use executor::ActionExecutor;
pub use handlers::HandlerContext;
pub use session::{FollowUp, TerminalToken};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::transcript::normalize_utterance;
use std::sync::atomic::Ordering;

pub struct DispatchLoop {
    ctx: HandlerContext,
    shutdown_rx: watch::Receiver<bool>,
}

impl DispatchLoop {
    pub fn new(ctx: HandlerContext, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self { ctx, shutdown_rx }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(target: "dispatch", "Dispatch loop starting");
        let mut reader = self.ctx.slot.subscribe();

        loop {
            tokio::select! {
                _ = self.shutdown_rx.changed() => {
                    break;
                }
                value = reader.next_distinct() => {
                    let Some(raw) = value else { break };
                    let text = normalize_utterance(&raw);
                    if text.is_empty() {
                        continue;
                    }
                    debug!(target: "dispatch", utterance = %text, "classifying");

                    match classifier::classify(&text) {
                        Some(command) => {
                            self.ctx.metrics.mark_command();
                            // Handler errors are logged and the loop
                            // resumes; the utterance is not retried.
                            if let Err(e) = handlers::handle(&self.ctx, command).await {
                                self.ctx.metrics.handler_errors.fetch_add(1, Ordering::Relaxed);
                                warn!(target: "dispatch", "handler failed: {}", e);
                            }
                        }
                        None => {
                            self.ctx.metrics.commands_unmatched.fetch_add(1, Ordering::Relaxed);
                            handlers::run_fallbacks(&self.ctx, &text).await;
                        }
                    }

                    // A command (and any session it opened) is done; reset
                    // the slot before resuming the poll.
                    self.ctx.slot.clear();
                }
            }
        }

        info!(target: "dispatch", "Dispatch loop stopped");
    }
}
