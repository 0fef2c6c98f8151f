use crate::settings::{CfgDefaultKeymaps, Settings};
use eyre::Result;
use serde_json::Value;
use std::{fs, path::PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    keymap_user_dict: CfgDefaultKeymaps,
    filepath: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("configuration.json");

        if filepath.exists() {
            return Self::load_from(filepath);
        }

        // Save initial config if it doesn't exist
        let settings = Settings::default();
        let keymap_user_dict = CfgDefaultKeymaps::default();
        let initial_config = serde_json::json!({
            "Setting": settings,
            "Keymap": keymap_user_dict,
        });
        fs::create_dir_all(&prefix)?;
        fs::write(&filepath, serde_json::to_string_pretty(&initial_config)?)?;

        Ok(Self {
            settings,
            keymap_user_dict,
            filepath,
        })
    }

    /// Load configuration from a custom path. Missing or malformed sections
    /// fall back to defaults field by field.
    pub fn load_from(filepath: PathBuf) -> Result<Self> {
        let mut settings = Settings::default();
        let mut keymap_user_dict = CfgDefaultKeymaps::default();

        if filepath.exists() {
            let config_str = fs::read_to_string(&filepath)?;
            if let Ok(user_config) = serde_json::from_str::<Value>(&config_str) {
                if let Some(user_settings) = user_config.get("Setting").and_then(Value::as_object) {
                    if let Some(val) = user_settings.get("text_width").and_then(Value::as_u64) {
                        settings.text_width = val as usize;
                    }
                    if let Some(val) = user_settings.get("lines_per_page").and_then(Value::as_u64) {
                        settings.lines_per_page = val as usize;
                    }
                    if let Some(val) = user_settings
                        .get("media_block_lines")
                        .and_then(Value::as_u64)
                    {
                        settings.media_block_lines = val as usize;
                    }
                    if let Some(val) = user_settings
                        .get("show_progress_indicator")
                        .and_then(Value::as_bool)
                    {
                        settings.show_progress_indicator = val;
                    }
                    if let Some(val) = user_settings
                        .get("show_page_numbers")
                        .and_then(Value::as_bool)
                    {
                        settings.show_page_numbers = val;
                    }
                }

                if let Some(user_keymap) = user_config.get("Keymap").and_then(Value::as_object) {
                    let mut load_key = |name: &str, target: &mut String| {
                        if let Some(val) = user_keymap.get(name).and_then(Value::as_str) {
                            *target = val.to_string();
                        }
                    };
                    load_key("next_page", &mut keymap_user_dict.next_page);
                    load_key("prev_page", &mut keymap_user_dict.prev_page);
                    load_key("first_page", &mut keymap_user_dict.first_page);
                    load_key("last_page", &mut keymap_user_dict.last_page);
                    load_key("zoom_in", &mut keymap_user_dict.zoom_in);
                    load_key("zoom_out", &mut keymap_user_dict.zoom_out);
                    load_key("toggle_bookmark", &mut keymap_user_dict.toggle_bookmark);
                    load_key("show_bookmarks", &mut keymap_user_dict.show_bookmarks);
                    load_key("table_of_contents", &mut keymap_user_dict.table_of_contents);
                    load_key("help", &mut keymap_user_dict.help);
                    load_key("quit", &mut keymap_user_dict.quit);
                }
            }
        }

        Ok(Self {
            settings,
            keymap_user_dict,
            filepath,
        })
    }

    /// Get the configuration file path
    pub fn filepath(&self) -> &PathBuf {
        &self.filepath
    }

    /// Get the user-configured keymap dictionary (used for the help window)
    pub fn keymap_user_dict(&self) -> &CfgDefaultKeymaps {
        &self.keymap_user_dict
    }

    /// Create a config with custom settings for testing
    pub fn with_settings(settings: Settings, keymap_user_dict: CfgDefaultKeymaps) -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("test_configuration.json");

        Ok(Self {
            settings,
            keymap_user_dict,
            filepath,
        })
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_json = serde_json::json!({
            "Setting": self.settings,
            "Keymap": self.keymap_user_dict,
        });

        if let Some(parent) = self.filepath.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.filepath, serde_json::to_string_pretty(&config_json)?)?;
        Ok(())
    }
}

pub fn get_app_data_prefix() -> Result<PathBuf> {
    if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(config_home).join("keepsake");
        return Ok(path);
    } else if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home.clone()).join(".config").join("keepsake");
        if path.exists() {
            return Ok(path);
        } else {
            return Ok(PathBuf::from(home).join(".keepsake"));
        }
    } else if let Some(user_profile) = std::env::var_os("USERPROFILE") {
        return Ok(PathBuf::from(user_profile).join(".keepsake"));
    }

    Err(eyre::eyre!(
        "Could not determine application data directory"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .expect("lock env mutex")
    }

    fn set_test_environment(dir: &tempfile::TempDir) {
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
            env::remove_var("HOME");
            env::remove_var("USERPROFILE");
        }
    }

    fn restore_test_environment(
        original_home: Option<std::ffi::OsString>,
        original_xdg_config_home: Option<std::ffi::OsString>,
        original_userprofile: Option<std::ffi::OsString>,
    ) {
        unsafe {
            if let Some(home) = original_home {
                env::set_var("HOME", home);
            } else {
                env::remove_var("HOME");
            }
            if let Some(xdg) = original_xdg_config_home {
                env::set_var("XDG_CONFIG_HOME", xdg);
            } else {
                env::remove_var("XDG_CONFIG_HOME");
            }
            if let Some(profile) = original_userprofile {
                env::set_var("USERPROFILE", profile);
            } else {
                env::remove_var("USERPROFILE");
            }
        }
    }

    #[test]
    fn test_config_new_no_existing_file() -> Result<()> {
        let _env_lock = lock_env();
        let original_home = env::var_os("HOME");
        let original_xdg_config_home = env::var_os("XDG_CONFIG_HOME");
        let original_userprofile = env::var_os("USERPROFILE");

        let dir = tempdir()?;
        set_test_environment(&dir);

        let config = Config::new()?;
        let expected_filepath = dir.path().join("keepsake").join("configuration.json");

        assert_eq!(config.filepath, expected_filepath);
        assert!(expected_filepath.exists());

        let config_str = fs::read_to_string(&expected_filepath)?;
        let json_value: Value = serde_json::from_str(&config_str)?;

        let loaded_settings: Settings = serde_json::from_value(json_value["Setting"].clone())?;
        assert_eq!(loaded_settings, Settings::default());

        let loaded_keymaps: CfgDefaultKeymaps =
            serde_json::from_value(json_value["Keymap"].clone())?;
        assert_eq!(loaded_keymaps, CfgDefaultKeymaps::default());

        restore_test_environment(
            original_home,
            original_xdg_config_home,
            original_userprofile,
        );
        Ok(())
    }

    #[test]
    fn test_config_partial_settings() -> Result<()> {
        let _env_lock = lock_env();
        let original_home = env::var_os("HOME");
        let original_xdg_config_home = env::var_os("XDG_CONFIG_HOME");
        let original_userprofile = env::var_os("USERPROFILE");

        let dir = tempdir()?;
        set_test_environment(&dir);

        let config_path = dir.path().join("keepsake").join("partial_config.json");
        std::fs::create_dir_all(config_path.parent().unwrap())?;

        let partial_config = serde_json::json!({
            "Setting": {
                "text_width": 44,
                "show_page_numbers": false
            },
            "Keymap": {
                "quit": "Q",
                "table_of_contents": "T"
            }
        });
        std::fs::write(&config_path, serde_json::to_string(&partial_config)?)?;

        let config = Config::load_from(config_path.clone())?;

        assert_eq!(config.settings.text_width, 44);
        assert!(!config.settings.show_page_numbers);
        assert_eq!(config.keymap_user_dict().quit, "Q");
        assert_eq!(config.keymap_user_dict().table_of_contents, "T");

        // Defaults remain for unspecified values
        assert_eq!(config.settings.lines_per_page, 24);
        assert_eq!(config.keymap_user_dict().next_page, "l");

        restore_test_environment(
            original_home,
            original_xdg_config_home,
            original_userprofile,
        );
        Ok(())
    }

    #[test]
    fn test_config_invalid_json_falls_back() -> Result<()> {
        let _env_lock = lock_env();
        let original_home = env::var_os("HOME");
        let original_xdg_config_home = env::var_os("XDG_CONFIG_HOME");
        let original_userprofile = env::var_os("USERPROFILE");

        let dir = tempdir()?;
        set_test_environment(&dir);

        let config_path = dir.path().join("keepsake").join("invalid_config.json");
        std::fs::create_dir_all(config_path.parent().unwrap())?;
        std::fs::write(&config_path, "{ invalid json }")?;

        let config = Config::load_from(config_path)?;
        assert_eq!(config.settings, Settings::default());

        restore_test_environment(
            original_home,
            original_xdg_config_home,
            original_userprofile,
        );
        Ok(())
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let _env_lock = lock_env();
        let original_home = env::var_os("HOME");
        let original_xdg_config_home = env::var_os("XDG_CONFIG_HOME");
        let original_userprofile = env::var_os("USERPROFILE");

        let dir = tempdir()?;
        set_test_environment(&dir);

        let mut custom_settings = Settings::default();
        custom_settings.lines_per_page = 30;
        custom_settings.show_progress_indicator = false;

        let mut custom_keymaps = CfgDefaultKeymaps::default();
        custom_keymaps.help = "H".to_string();

        let config = Config::with_settings(custom_settings, custom_keymaps)?;
        config.save()?;

        let loaded = Config::load_from(config.filepath().clone())?;
        assert_eq!(loaded.settings.lines_per_page, 30);
        assert!(!loaded.settings.show_progress_indicator);
        assert_eq!(loaded.keymap_user_dict().help, "H");

        restore_test_environment(
            original_home,
            original_xdg_config_home,
            original_userprofile,
        );
        Ok(())
    }

    #[test]
    fn test_get_app_data_prefix() {
        let _env_lock = lock_env();
        let original_home = env::var_os("HOME");
        let original_xdg_config_home = env::var_os("XDG_CONFIG_HOME");
        let original_userprofile = env::var_os("USERPROFILE");

        unsafe {
            let xdg_dir = tempdir().unwrap();
            env::set_var("XDG_CONFIG_HOME", xdg_dir.path());
            env::remove_var("HOME");
            env::remove_var("USERPROFILE");
            assert_eq!(
                get_app_data_prefix().unwrap(),
                xdg_dir.path().join("keepsake")
            );

            let home_dir = tempdir().unwrap();
            let config_dir = home_dir.path().join(".config").join("keepsake");
            std::fs::create_dir_all(&config_dir).unwrap();
            env::set_var("HOME", home_dir.path());
            env::remove_var("XDG_CONFIG_HOME");
            assert_eq!(get_app_data_prefix().unwrap(), config_dir);

            env::remove_var("HOME");
            env::remove_var("XDG_CONFIG_HOME");
            env::remove_var("USERPROFILE");
            assert!(get_app_data_prefix().is_err());

            restore_test_environment(
                original_home,
                original_xdg_config_home,
                original_userprofile,
            );
        }
    }
}
