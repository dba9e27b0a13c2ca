use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Client state that survives restarts: the auth token, the last selected
/// group and the device-registration flags. Plain key-value data, not a
/// structured store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub token: Option<String>,
    /// Canonical key of the group last selected by the user.
    pub current_group_key: Option<String>,
    pub device_registered: bool,
    pub push_prompt_shown: bool,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}
