use crate::config::{self, CONFIG_FILE_NAME};
use anyhow::Result;
use std::path::Path;

pub fn init_config(force: bool) -> Result<()> {
    config::init_config(Path::new("."), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}
