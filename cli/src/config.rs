use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub struct Config {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "tastytabs").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let images_dir = data_dir.join("images");
        std::fs::create_dir_all(&images_dir).with_context(|| {
            format!("Failed to create images directory: {}", images_dir.display())
        })?;

        let db_path = data_dir.join("tastytabs.db");

        Ok(Config {
            db_path,
            data_dir,
            images_dir,
        })
    }
}
