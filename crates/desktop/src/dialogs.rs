//! Blocking message dialogs shown on the UI thread.

use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

pub fn info(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .show();
}

pub fn warning(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .show();
}

pub fn error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .show();
}

/// Blocking yes/no confirmation; used for the model-download rendezvous.
pub fn confirm(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}
