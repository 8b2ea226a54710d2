use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::env::Env;
use super::schema::{ConfigFile, OutputFormat, OutputSettings, Profile, Settings};
use crate::api::DEFAULT_ENDPOINT;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub quota_project: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub cli: CliOverrides,
    pub cwd: PathBuf,
    pub home_dir: Option<PathBuf>,
    pub xdg_config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config_path: Option<PathBuf>,
    pub profile_name: String,
    pub service: ServiceSettings,
    pub settings: SettingsResolved,
}

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub endpoint: String,
    pub access_token: Option<String>,
    pub quota_project: Option<String>,
    pub timeout_ms: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            quota_project: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SettingsResolved {
    pub output: OutputSettingsResolved,
}

#[derive(Debug, Clone)]
pub struct OutputSettingsResolved {
    pub default_format: OutputFormat,
    pub json_pretty: bool,
}

impl Default for SettingsResolved {
    fn default() -> Self {
        Self {
            output: OutputSettingsResolved {
                default_format: OutputFormat::Pretty,
                json_pretty: true,
            },
        }
    }
}

pub fn load_config(options: &LoadOptions, env: &Env) -> Result<ResolvedConfig> {
    let config_path = resolve_config_path(options, env)?;
    let config_file = match &config_path {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    let profile_name = resolve_profile_name(options, env, config_file.default_profile.as_deref());

    let mut service = ServiceSettings::default();
    let mut settings = SettingsResolved::default();

    if let Some(settings_cfg) = &config_file.settings {
        apply_settings(&mut settings, settings_cfg);
    }

    if let Some(profile) = config_file.profiles.get(&profile_name) {
        apply_profile(&mut service, &mut settings, profile, env);
    } else if options.cli.profile.is_some() && profile_name != "default" {
        return Err(anyhow!("Profile not found: {}", profile_name));
    }

    apply_env_overrides(&mut service, env);
    apply_cli_overrides(&mut service, &options.cli);

    tracing::info!(profile = %profile_name, endpoint = %service.endpoint, "resolved config");

    Ok(ResolvedConfig {
        config_path,
        profile_name,
        service,
        settings,
    })
}

fn resolve_profile_name(options: &LoadOptions, env: &Env, default_profile: Option<&str>) -> String {
    if let Some(profile) = options.cli.profile.as_deref() {
        return profile.to_string();
    }
    if let Some(profile) = env.get("BIGLAKE_PROFILE") {
        return profile;
    }
    if let Some(profile) = default_profile {
        return profile.to_string();
    }
    "default".to_string()
}

fn resolve_config_path(options: &LoadOptions, env: &Env) -> Result<Option<PathBuf>> {
    if let Some(path) = &options.cli.config_path {
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path.clone()));
    }

    if let Some(path) = env.get("BIGLAKE_CONFIG") {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(anyhow!("Config file not found: {}", path.display()));
        }
        return Ok(Some(path));
    }

    if let Some(path) = find_local_config(&options.cwd, options.home_dir.as_deref()) {
        return Ok(Some(path));
    }

    Ok(find_global_config(options.xdg_config_dir.as_deref()))
}

fn find_local_config(start: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let candidates = [
        ".biglake/config.yaml",
        ".biglake/config.yml",
        ".biglake/config.json",
    ];

    for dir in start.ancestors() {
        for candidate in &candidates {
            let path = dir.join(candidate);
            if path.is_file() {
                return Some(path);
            }
        }

        if home.is_some_and(|home_dir| dir == home_dir) {
            break;
        }
    }

    None
}

fn find_global_config(xdg_config: Option<&Path>) -> Option<PathBuf> {
    let base = xdg_config?;
    [
        "biglake/config.yaml",
        "biglake/config.yml",
        "biglake/config.json",
    ]
    .iter()
    .map(|candidate| base.join(candidate))
    .find(|path| path.is_file())
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")
        }
        Some("json") => serde_json::from_str(&content).context("Failed to parse JSON config"),
        _ => Err(anyhow!("Unsupported config file extension")),
    }
}

fn apply_profile(
    service: &mut ServiceSettings,
    settings: &mut SettingsResolved,
    profile: &Profile,
    env: &Env,
) {
    if let Some(endpoint) = &profile.endpoint {
        service.endpoint = endpoint.clone();
    }
    if let Some(token) = &profile.access_token {
        service.access_token = Some(token.clone());
    } else if let Some(env_key) = &profile.access_token_env {
        if let Some(value) = env.get(env_key) {
            service.access_token = Some(value);
        }
    }
    if let Some(project) = &profile.quota_project {
        service.quota_project = Some(project.clone());
    }
    if let Some(timeout) = profile.timeout {
        service.timeout_ms = timeout;
    }

    if let Some(settings_profile) = &profile.settings {
        apply_settings(settings, settings_profile);
    }
}

fn apply_settings(settings: &mut SettingsResolved, overrides: &Settings) {
    if let Some(output) = &overrides.output {
        apply_output_settings(&mut settings.output, output);
    }
}

fn apply_output_settings(settings: &mut OutputSettingsResolved, overrides: &OutputSettings) {
    if let Some(default_format) = overrides.default_format {
        settings.default_format = default_format;
    }
    if let Some(pretty) = overrides.json.as_ref().and_then(|json| json.pretty) {
        settings.json_pretty = pretty;
    }
}

fn apply_env_overrides(service: &mut ServiceSettings, env: &Env) {
    if let Some(endpoint) = env.get("BIGLAKE_ENDPOINT") {
        service.endpoint = endpoint;
    }
    if let Some(token) = env.get_any(&["BIGLAKE_ACCESS_TOKEN", "GOOGLE_OAUTH_ACCESS_TOKEN"]) {
        service.access_token = Some(token);
    }
    if let Some(project) = env.get_any(&["BIGLAKE_QUOTA_PROJECT", "GOOGLE_CLOUD_QUOTA_PROJECT"]) {
        service.quota_project = Some(project);
    }
    if let Some(timeout) = env.get("BIGLAKE_TIMEOUT") {
        match timeout.parse::<u64>() {
            Ok(timeout) => service.timeout_ms = timeout,
            Err(_) => tracing::warn!("ignoring invalid BIGLAKE_TIMEOUT: {}", timeout),
        }
    }
}

fn apply_cli_overrides(service: &mut ServiceSettings, cli: &CliOverrides) {
    if let Some(endpoint) = &cli.endpoint {
        service.endpoint = endpoint.clone();
    }
    if let Some(token) = &cli.access_token {
        service.access_token = Some(token.clone());
    }
    if let Some(project) = &cli.quota_project {
        service.quota_project = Some(project.clone());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        service.timeout_ms = timeout_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let mut dir = env::temp_dir();
        dir.push(format!("blmcli-test-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn options_for(config_path: PathBuf, dir: PathBuf) -> LoadOptions {
        LoadOptions {
            cli: CliOverrides {
                config_path: Some(config_path),
                ..CliOverrides::default()
            },
            cwd: dir,
            home_dir: None,
            xdg_config_dir: None,
        }
    }

    #[test]
    fn loads_config_from_cli_path() {
        let dir = temp_dir("config");
        let config_path = dir.join("config.yaml");
        fs::write(
            &config_path,
            concat!(
                "defaultProfile: test\n",
                "profiles:\n",
                "  test:\n",
                "    endpoint: http://localhost:9000/v1\n",
                "    timeout: 500\n",
            ),
        )
        .expect("write config");

        let resolved =
            load_config(&options_for(config_path, dir), &Env::from_pairs(&[])).expect("load");
        assert_eq!(resolved.profile_name, "test");
        assert_eq!(resolved.service.endpoint, "http://localhost:9000/v1");
        assert_eq!(resolved.service.timeout_ms, 500);
    }

    #[test]
    fn env_overrides_config_profile() {
        let dir = temp_dir("env-override");
        let config_path = dir.join("config.yml");
        fs::write(
            &config_path,
            "defaultProfile: test\nprofiles:\n  test:\n    endpoint: http://config-host/v1\n",
        )
        .expect("write config");

        let env = Env::from_pairs(&[("BIGLAKE_ENDPOINT", "http://env-host/v1")]);
        let resolved = load_config(&options_for(config_path, dir), &env).expect("load");
        assert_eq!(resolved.service.endpoint, "http://env-host/v1");
    }

    #[test]
    fn cli_overrides_env() {
        let options = LoadOptions {
            cli: CliOverrides {
                access_token: Some("cli-token".to_string()),
                timeout_ms: Some(1_000),
                ..CliOverrides::default()
            },
            cwd: temp_dir("cli-override"),
            home_dir: None,
            xdg_config_dir: None,
        };
        let env = Env::from_pairs(&[
            ("BIGLAKE_ACCESS_TOKEN", "env-token"),
            ("BIGLAKE_TIMEOUT", "5000"),
        ]);
        let resolved = load_config(&options, &env).expect("load");
        assert_eq!(resolved.service.access_token.as_deref(), Some("cli-token"));
        assert_eq!(resolved.service.timeout_ms, 1_000);
    }

    #[test]
    fn profile_access_token_env_is_used() {
        let dir = temp_dir("token-env");
        let config_path = dir.join("config.json");
        fs::write(
            &config_path,
            concat!(
                r#"{"defaultProfile":"test","profiles":{"test":"#,
                r#"{"accessTokenEnv":"MY_TOKEN","quotaProject":"billing"}}}"#
            ),
        )
        .expect("write config");

        let env = Env::from_pairs(&[("MY_TOKEN", "secret")]);
        let resolved = load_config(&options_for(config_path, dir), &env).expect("load");
        assert_eq!(resolved.service.access_token.as_deref(), Some("secret"));
        assert_eq!(resolved.service.quota_project.as_deref(), Some("billing"));
    }

    #[test]
    fn output_settings_merge_file_then_profile() {
        let dir = temp_dir("settings");
        let config_path = dir.join("config.yaml");
        fs::write(
            &config_path,
            concat!(
                "settings:\n",
                "  output:\n",
                "    defaultFormat: markdown\n",
                "profiles:\n",
                "  default:\n",
                "    settings:\n",
                "      output:\n",
                "        json:\n",
                "          pretty: false\n",
            ),
        )
        .expect("write config");

        let resolved =
            load_config(&options_for(config_path, dir), &Env::from_pairs(&[])).expect("load");
        assert_eq!(resolved.settings.output.default_format, OutputFormat::Markdown);
        assert!(!resolved.settings.output.json_pretty);
    }

    #[test]
    fn finds_local_config_in_ancestor() {
        let dir = temp_dir("ancestor");
        fs::create_dir_all(dir.join(".biglake")).expect("mkdir");
        fs::write(
            dir.join(".biglake/config.yaml"),
            "profiles:\n  default:\n    quotaProject: from-file\n",
        )
        .expect("write config");
        let nested = dir.join("a/b");
        fs::create_dir_all(&nested).expect("mkdir nested");

        let options = LoadOptions {
            cli: CliOverrides::default(),
            cwd: nested,
            home_dir: Some(dir.clone()),
            xdg_config_dir: None,
        };
        let resolved = load_config(&options, &Env::from_pairs(&[])).expect("load");
        assert_eq!(resolved.service.quota_project.as_deref(), Some("from-file"));
    }

    #[test]
    fn unknown_cli_profile_is_an_error() {
        let options = LoadOptions {
            cli: CliOverrides {
                profile: Some("missing".to_string()),
                ..CliOverrides::default()
            },
            cwd: temp_dir("missing-profile"),
            home_dir: None,
            xdg_config_dir: None,
        };
        let err = load_config(&options, &Env::from_pairs(&[])).expect_err("missing profile");
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn defaults_apply_without_config() {
        let options = LoadOptions {
            cli: CliOverrides::default(),
            cwd: temp_dir("defaults"),
            home_dir: None,
            xdg_config_dir: None,
        };
        let resolved = load_config(&options, &Env::from_pairs(&[])).expect("load");
        assert_eq!(resolved.profile_name, "default");
        assert_eq!(resolved.service.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.service.timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
