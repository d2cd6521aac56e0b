use dialoguer::Input;

use crate::error::Result;
use crate::settings::{
    categories_path, load_settings, save_settings, settings_file_exists, shellexpand_path,
    DATA_DIR_ENV,
};
use crate::store::CategoryStore;

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();

    let env_override = std::env::var_os(DATA_DIR_ENV).is_some_and(|d| !d.is_empty());

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    } else if !env_override && !settings_file_exists() {
        let chosen: String = Input::new()
            .with_prompt("Data directory")
            .default(settings.data_dir.clone())
            .interact_text()
            .unwrap_or_else(|_| settings.data_dir.clone());
        settings.data_dir = shellexpand_path(chosen.trim());
    }
    save_settings(&settings)?;

    // Resolved like every other command, so FINSORT_DATA_DIR still wins.
    let path = categories_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let store = CategoryStore::load(&path)?;
    if !store.path().exists() {
        store.save()?;
        tracing::info!("Created {}", path.display());
    }

    let shown = path.parent().unwrap_or(&path);
    println!("Initialized finsort at {}", shown.display());
    Ok(())
}
