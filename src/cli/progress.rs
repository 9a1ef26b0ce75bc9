//! CLI-specific progress handling for hospital-route
//!
//! Shows a spinner on stderr while a route lookup is in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a spinner for CLI display
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .expect("Failed to create spinner style"),
    );
    pb
}

/// Spinner shown for the duration of one lookup
pub struct ProgressManager {
    pub pb: ProgressBar,
}

impl ProgressManager {
    /// Start a ticking spinner with `message`
    pub fn new(message: &str) -> Self {
        let pb = create_spinner();
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Remove the spinner from the terminal
    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_spinner_template() {
        let pb = create_spinner();
        assert_eq!(pb.length(), None);
        pb.set_message("routing");
        pb.finish();
    }

    #[test]
    fn test_progress_manager_message() {
        let manager = ProgressManager::new("🌐 Routing A → B");
        assert_eq!(manager.pb.message(), "🌐 Routing A → B");
        manager.finish();
    }
}
