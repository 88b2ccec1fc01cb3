//! Session settings store
//!
//! Catalog modules keep short-lived session state (tokens, device ids,
//! selected quality tiers) in one shared JSON file. The layout is
//! `modules -> <module> -> sessions -> <selected session> -> key -> value`,
//! with a `selected` field naming the active session. Global mode addresses
//! the module object itself instead of a session, for modules that keep a
//! single shared state.
//!
//! The store is schemaless on purpose: each module decides its own keys, so
//! values are plain [`serde_json::Value`]s rather than typed structs.

use std::path::PathBuf;

use serde_json::{Map, Value, json};

use crate::error::{Result, SettingsError};

/// Handle to one settings file
///
/// Cheap to construct; every read and write goes back to disk, so separate
/// handles on the same path always observe each other's writes.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a handle for the settings file at `path`
    ///
    /// The file does not need to exist yet; a missing file reads as an empty
    /// store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying settings file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the entire settings document
    ///
    /// A missing file yields the empty skeleton `{"modules": {}}`.
    pub async fn load_raw(&self) -> Result<Value> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(json!({ "modules": {} })),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the entire settings document, creating parent directories as
    /// needed
    pub async fn save_raw(&self, root: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let rendered = serde_json::to_string_pretty(root)?;
        tokio::fs::write(&self.path, rendered).await?;
        Ok(())
    }

    /// Read a value for `module`
    ///
    /// With `root_setting` alone the whole value under that key is returned;
    /// adding `setting` descends one more level. Either lookup yields `None`
    /// when the key is absent. Without `root_setting` the module's entire
    /// session object is returned (or `None` for an unregistered module).
    ///
    /// Asking for a `root_setting` on a module with no entry in the store is
    /// an [`SettingsError::UnknownModule`] error, matching the distinction
    /// between "module keeps no session state" and "key not set yet".
    pub async fn read(
        &self,
        module: &str,
        root_setting: Option<&str>,
        setting: Option<&str>,
        global_mode: bool,
    ) -> Result<Option<Value>> {
        let root = self.load_raw().await?;
        let session = session_view(&root, module, global_mode)?;

        match (session, root_setting) {
            (Some(session), Some(root_key)) => {
                let found = match setting {
                    Some(key) => session.get(root_key).and_then(|v| v.get(key)),
                    None => session.get(root_key),
                };
                Ok(found.cloned())
            }
            (None, Some(_)) => Err(SettingsError::UnknownModule {
                module: module.to_string(),
            }
            .into()),
            (session, None) => Ok(session.cloned()),
        }
    }

    /// Write a value for `module` and persist the file
    ///
    /// With `setting` the value lands under `root_setting -> setting`,
    /// creating the intermediate object when absent; without it the value
    /// replaces `root_setting` wholesale. Writing to a module with no entry
    /// in the store is an [`SettingsError::UnknownModule`] error.
    pub async fn write(
        &self,
        module: &str,
        root_setting: &str,
        setting: Option<&str>,
        value: Value,
        global_mode: bool,
    ) -> Result<()> {
        let mut root = self.load_raw().await?;

        {
            let session =
                session_view_mut(&mut root, module, global_mode)?.ok_or_else(|| {
                    SettingsError::UnknownModule {
                        module: module.to_string(),
                    }
                })?;
            let session_map =
                session
                    .as_object_mut()
                    .ok_or_else(|| SettingsError::Malformed {
                        reason: format!("session state for module '{module}' is not an object"),
                    })?;

            match setting {
                Some(key) => {
                    let slot = session_map
                        .entry(root_setting.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    let slot_map =
                        slot.as_object_mut()
                            .ok_or_else(|| SettingsError::Malformed {
                                reason: format!(
                                    "setting '{root_setting}' of module '{module}' is not an object"
                                ),
                            })?;
                    slot_map.insert(key.to_string(), value);
                }
                None => {
                    session_map.insert(root_setting.to_string(), value);
                }
            }
        }

        self.save_raw(&root).await
    }
}

/// Resolve the session object a module read or write addresses
///
/// Global mode addresses the module object itself; otherwise the `selected`
/// entry under `sessions` is the target. Returns `None` for a module with no
/// entry at all.
fn session_view<'a>(root: &'a Value, module: &str, global_mode: bool) -> Result<Option<&'a Value>> {
    let Some(module_settings) = root.get("modules").and_then(|m| m.get(module)) else {
        return Ok(None);
    };
    if global_mode {
        return Ok(Some(module_settings));
    }

    let selected = module_settings
        .get("selected")
        .and_then(Value::as_str)
        .ok_or_else(|| SettingsError::Malformed {
            reason: format!("module '{module}' has no selected session"),
        })?;
    let session = module_settings
        .get("sessions")
        .and_then(|s| s.get(selected))
        .ok_or_else(|| SettingsError::Malformed {
            reason: format!("module '{module}' selected session '{selected}' does not exist"),
        })?;
    Ok(Some(session))
}

fn session_view_mut<'a>(
    root: &'a mut Value,
    module: &str,
    global_mode: bool,
) -> Result<Option<&'a mut Value>> {
    let Some(module_settings) = root.get_mut("modules").and_then(|m| m.get_mut(module)) else {
        return Ok(None);
    };
    if global_mode {
        return Ok(Some(module_settings));
    }

    let selected = module_settings
        .get("selected")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| SettingsError::Malformed {
            reason: format!("module '{module}' has no selected session"),
        })?;
    let session = module_settings
        .get_mut("sessions")
        .and_then(|s| s.get_mut(&selected))
        .ok_or_else(|| SettingsError::Malformed {
            reason: format!("module '{module}' selected session '{selected}' does not exist"),
        })?;
    Ok(Some(session))
}
