//! Demo service - manage demo mode
//!
//! Demo mode swaps the remote API for the seeded in-process shop. A token
//! issued by one backend means nothing to the other, so switching modes
//! also logs the user out.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::adapters::FileSessionStore;
use crate::config::Config;
use crate::ports::{SessionStore, REFRESH_TOKEN_KEY, TOKEN_KEY, USER_KEY};

pub struct DemoService {
    app_dir: PathBuf,
}

impl DemoService {
    pub fn new(app_dir: &Path) -> Self {
        Self {
            app_dir: app_dir.to_path_buf(),
        }
    }

    /// Check if demo mode is currently enabled (env override included)
    pub fn is_enabled(&self) -> Result<bool> {
        Ok(Config::load(&self.app_dir)?.demo_mode)
    }

    pub fn enable(&self) -> Result<()> {
        self.set_mode(true)
    }

    pub fn disable(&self) -> Result<()> {
        self.set_mode(false)
    }

    fn set_mode(&self, enabled: bool) -> Result<()> {
        let mut config = Config::load(&self.app_dir).unwrap_or_default();
        if enabled {
            config.enable_demo_mode();
        } else {
            config.disable_demo_mode();
        }
        config.save(&self.app_dir)?;

        FileSessionStore::new(&self.app_dir).write_batch(vec![
            (TOKEN_KEY, None),
            (REFRESH_TOKEN_KEY, None),
            (USER_KEY, None),
        ])?;
        Ok(())
    }
}
