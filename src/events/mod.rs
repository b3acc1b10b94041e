//! # Events Module
//!
//! Progress reporting for the triage pipeline.
//!
//! ## Design
//! The core library emits events through channels, so the CLI can drive
//! progress bars without the engine knowing anything about terminals.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Analyze(AnalyzeEvent::Progress(p)) = event {
//!             println!("Analyzed {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
