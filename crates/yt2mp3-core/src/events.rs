//! Download event reporting
//!
//! yt-dlp chatter goes through a small capability interface so the caller
//! decides how loud a download is: the single-URL path talks to the console,
//! pool workers stay silent and let their spinner speak.

use tracing::{debug, error, info, warn};

pub trait EventLog: Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warning(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Swallows everything.
#[derive(Debug, Default)]
pub struct SilentEvents;

impl EventLog for SilentEvents {
    fn debug(&self, _msg: &str) {}
    fn info(&self, _msg: &str) {}
    fn warning(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Forwards events to the tracing subscriber.
#[derive(Debug, Default)]
pub struct ConsoleEvents;

impl EventLog for ConsoleEvents {
    fn debug(&self, msg: &str) {
        debug!("{}", msg);
    }

    fn info(&self, msg: &str) {
        info!("{}", msg);
    }

    fn warning(&self, msg: &str) {
        warn!("{}", msg);
    }

    fn error(&self, msg: &str) {
        error!("{}", msg);
    }
}
