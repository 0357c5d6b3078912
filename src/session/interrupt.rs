//! SIGINT handling
//!
//! While a menu section is active Ctrl-C only raises a flag. Running flows
//! poll it and `Prompter` turns it into `UserAbort` once the pending read
//! returns, so control goes back to the main menu. At the main menu prompt
//! it ends the process with status 130.

use colored::Colorize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const INTERRUPT_EXIT_CODE: i32 = 130;

#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    in_action: Arc<AtomicBool>,
    reading: Arc<AtomicBool>,
    pending: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the process-wide handler. Fails if one is already installed.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let in_action = Arc::clone(&self.in_action);
        let reading = Arc::clone(&self.reading);
        let pending = Arc::clone(&self.pending);
        ctrlc::set_handler(move || {
            if in_action.load(Ordering::SeqCst) {
                pending.store(true, Ordering::SeqCst);
                // A blocked line read only returns on Enter
                if reading.load(Ordering::SeqCst) {
                    println!(
                        "\n{}",
                        "Interrupted by user. Press Enter to return to the main menu...".yellow()
                    );
                }
            } else {
                println!("\n{}", "Interrupted by user.".yellow());
                log::info!("Interrupted at menu");
                log::logger().flush();
                std::process::exit(INTERRUPT_EXIT_CODE);
            }
        })
    }

    /// A menu section starts; stale interrupts are dropped
    pub fn enter_action(&self) {
        self.pending.store(false, Ordering::SeqCst);
        self.in_action.store(true, Ordering::SeqCst);
    }

    /// Back at the main menu prompt
    pub fn leave_action(&self) {
        self.in_action.store(false, Ordering::SeqCst);
        self.pending.store(false, Ordering::SeqCst);
    }

    /// Consume a pending interrupt
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn begin_read(&self) {
        self.reading.store(true, Ordering::SeqCst);
    }

    pub fn end_read(&self) {
        self.reading.store(false, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub fn trigger(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }
}
