use log::debug;
use picontrol_logic::{Alert, Notifier};
use tokio::sync::mpsc;

/// Prints alerts to stdout and tells the session loop when state changed
#[derive(Clone)]
pub struct CliNotifier {
    updates: mpsc::Sender<()>,
}

impl CliNotifier {
    pub fn new(updates: mpsc::Sender<()>) -> Self {
        Self { updates }
    }
}

impl Notifier for CliNotifier {
    fn alert(&self, alert: Alert) {
        println!("[!] {alert}");
    }

    fn send_update(&self) {
        // A full queue already means "re-render", no need to stack more
        if self.updates.try_send(()).is_err() {
            debug!("Update already pending");
        }
    }
}
