use log::{debug, info};
use std::path::PathBuf;

use crate::file_system::home_directory;

/// Shows the native folder picker. `None` when the user cancels.
pub async fn select_directory() -> Option<PathBuf> {
    debug!("Opening native directory picker");
    let mut dialog = rfd::AsyncFileDialog::new().set_title("Select Directory");
    if let Some(home) = home_directory() {
        dialog = dialog.set_directory(home);
    }

    let picked = dialog.pick_folder().await.map(|handle| handle.path().to_path_buf());
    match &picked {
        Some(path) => info!("Directory selected: {}", path.display()),
        None => info!("Directory selection cancelled"),
    }
    picked
}
