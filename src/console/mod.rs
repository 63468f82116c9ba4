//! Admin console core: list state, selection, import, export and the
//! controllers that keep the working set in sync with the clients API.

pub mod edit;
pub mod export;
pub mod http;
pub mod import;
pub mod list;
pub mod push;
pub mod selection;
pub mod session;
pub mod store;
#[cfg(test)]
pub(crate) mod stub;
pub mod sync;

/// Sink for short-lived user notifications.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Writes notifications to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("{message}");
    }
}

/// Answers every prompt with a fixed value.
#[derive(Clone, Copy, Debug)]
pub struct FixedConfirm(pub bool);

impl Confirm for FixedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        log::debug!("{prompt} -> {}", self.0);
        self.0
    }
}
