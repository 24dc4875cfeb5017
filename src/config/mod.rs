use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted between the CLI flag and the config file.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// The [gemini] block from config.toml.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_key_command: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

/// Top-level tubeinsight config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone)]
pub struct TubeConfig {
    pub gemini: Option<GeminiConfig>,
}

impl TubeConfig {
    /// Load config from ~/.tubeinsight/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        if !path.exists() {
            return Ok(TubeConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: TubeConfig =
            toml::from_str(&content).with_context(|| "Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn gemini(&self) -> Option<&GeminiConfig> {
        self.gemini.as_ref()
    }

    /// Display config with secrets redacted.
    pub fn display_redacted(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref g) = self.gemini {
            lines.push("[gemini]".to_string());
            if let Some(ref key) = g.api_key {
                lines.push(format!("  api_key = \"{}\"", redact(key)));
            }
            if let Some(ref cmd) = g.api_key_command {
                lines.push(format!("  api_key_command = \"{}\"", cmd));
            }
            if let Some(ref model) = g.model {
                lines.push(format!("  model = \"{}\"", model));
            }
            if let Some(ref url) = g.base_url {
                lines.push(format!("  base_url = \"{}\"", url));
            }
        }
        if lines.is_empty() {
            lines.push("(nothing configured)".to_string());
        }
        lines.join("\n")
    }
}

fn redact(key: &str) -> String {
    if key.len() > 8 {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "****".to_string()
    }
}

/// Resolve the API key through the chain: CLI flag > env var > config key > config command.
pub fn resolve_credential(
    cli_flag: Option<&str>,
    env_var_name: &str,
    config: Option<&GeminiConfig>,
) -> Result<String> {
    // 1. CLI flag
    if let Some(key) = cli_flag {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }

    // 2. Environment variable
    if let Ok(val) = std::env::var(env_var_name) {
        if !val.is_empty() {
            return Ok(val);
        }
    }

    if let Some(gc) = config {
        // 3. Config file api_key
        if let Some(ref key) = gc.api_key {
            if !key.is_empty() {
                return Ok(key.clone());
            }
        }

        // 4. External command
        if let Some(ref cmd) = gc.api_key_command {
            if !cmd.is_empty() {
                let output = std::process::Command::new("sh")
                    .arg("-c")
                    .arg(cmd)
                    .output()
                    .with_context(|| format!("Failed to run api_key_command: {cmd}"))?;

                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    bail!(
                        "api_key_command failed (exit {}): {}",
                        output.status.code().unwrap_or(-1),
                        stderr.trim()
                    );
                }

                let secret = String::from_utf8(output.stdout)
                    .context("api_key_command output is not valid UTF-8")?
                    .trim()
                    .to_string();

                if !secret.is_empty() {
                    return Ok(secret);
                }
            }
        }
    }

    bail!(
        "No API key found. Provide via --api-key, {} env var, or ~/.tubeinsight/config.toml",
        env_var_name
    );
}

/// Path to the config file: ~/.tubeinsight/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".tubeinsight").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.tubeinsight/config.toml
# Credential resolution order: CLI flag > GEMINI_API_KEY env var > api_key > api_key_command

[gemini]
# api_key = "your-gemini-api-key"
# api_key_command = "your-secrets-manager-command-here"
# model = "gemini-3-flash-preview"
# base_url = "https://generativelanguage.googleapis.com"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    let path = config_path()?;
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, default_config_template())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>, command: Option<&str>) -> GeminiConfig {
        GeminiConfig {
            api_key: key.map(String::from),
            api_key_command: command.map(String::from),
            model: None,
            base_url: None,
        }
    }

    // Each test uses its own env var name; tests run in parallel and must
    // not observe each other's process environment.

    #[test]
    fn cli_flag_wins_over_everything() {
        std::env::set_var("TUBEINSIGHT_TEST_KEY_A", "env-secret");
        let config = config_with_key(Some("config-secret"), None);

        let key =
            resolve_credential(Some("flag-secret"), "TUBEINSIGHT_TEST_KEY_A", Some(&config))
                .unwrap();
        assert_eq!(key, "flag-secret");
    }

    #[test]
    fn env_var_wins_over_config() {
        std::env::set_var("TUBEINSIGHT_TEST_KEY_B", "env-secret");
        let config = config_with_key(Some("config-secret"), None);

        let key = resolve_credential(None, "TUBEINSIGHT_TEST_KEY_B", Some(&config)).unwrap();
        assert_eq!(key, "env-secret");
    }

    #[test]
    fn config_key_wins_over_command() {
        let config = config_with_key(Some("config-secret"), Some("echo command-secret"));

        let key = resolve_credential(None, "TUBEINSIGHT_TEST_KEY_C", Some(&config)).unwrap();
        assert_eq!(key, "config-secret");
    }

    #[test]
    fn command_output_is_trimmed_and_used_last() {
        let config = config_with_key(None, Some("echo command-secret"));

        let key = resolve_credential(None, "TUBEINSIGHT_TEST_KEY_D", Some(&config)).unwrap();
        assert_eq!(key, "command-secret");
    }

    #[test]
    fn empty_values_fall_through_the_chain() {
        std::env::set_var("TUBEINSIGHT_TEST_KEY_E", "");
        let config = config_with_key(Some("config-secret"), None);

        let key = resolve_credential(Some(""), "TUBEINSIGHT_TEST_KEY_E", Some(&config)).unwrap();
        assert_eq!(key, "config-secret");
    }

    #[test]
    fn missing_everywhere_is_an_error_naming_the_env_var() {
        let err = resolve_credential(None, "TUBEINSIGHT_TEST_KEY_F", None).unwrap_err();
        assert!(err.to_string().contains("TUBEINSIGHT_TEST_KEY_F"));
    }

    #[test]
    fn redacted_display_hides_the_key_body() {
        let config = TubeConfig {
            gemini: Some(GeminiConfig {
                api_key: Some("AIzaSyExampleExampleKey0".to_string()),
                api_key_command: None,
                model: Some("gemini-3-flash-preview".to_string()),
                base_url: None,
            }),
        };

        let shown = config.display_redacted();
        assert!(shown.contains("[gemini]"));
        assert!(shown.contains("AIza...Key0"));
        assert!(!shown.contains("ExampleExample"));
        assert!(shown.contains("gemini-3-flash-preview"));
    }

    #[test]
    fn short_keys_redact_completely() {
        assert_eq!(redact("tiny"), "****");
    }

    #[test]
    fn template_parses_as_valid_config() {
        let config: TubeConfig = toml::from_str(default_config_template()).unwrap();
        // the section header is live but every key is commented out
        let gemini = config.gemini.unwrap();
        assert!(gemini.api_key.is_none());
        assert!(gemini.api_key_command.is_none());
        assert!(gemini.model.is_none());
        assert!(gemini.base_url.is_none());
    }
}
