mod common;

use std::fs;

use common::blmcli;
use tempfile::tempdir;

#[test]
fn config_command_emits_json_from_env() {
    let dir = tempdir().expect("temp dir");
    let output = blmcli(dir.path())
        .args(["config", "--json"])
        .env("BIGLAKE_ENDPOINT", "http://env-host/v1")
        .env("BIGLAKE_ACCESS_TOKEN", "ya29.secret-token")
        .env("BIGLAKE_QUOTA_PROJECT", "billing")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");

    assert_eq!(value["profileName"], "default");
    assert_eq!(value["service"]["endpoint"], "http://env-host/v1");
    assert_eq!(value["service"]["accessToken"], "ya29****");
    assert_eq!(value["service"]["tokenSource"], "configured");
    assert_eq!(value["service"]["quotaProject"], "billing");
}

#[test]
fn config_command_reads_local_config_file() {
    let dir = tempdir().expect("temp dir");
    fs::create_dir_all(dir.path().join(".biglake")).expect("mkdir");
    fs::write(
        dir.path().join(".biglake/config.yaml"),
        concat!(
            "defaultProfile: staging\n",
            "profiles:\n",
            "  staging:\n",
            "    endpoint: http://staging/v1\n",
            "    timeout: 1500\n",
        ),
    )
    .expect("write config");

    let output = blmcli(dir.path())
        .args(["config", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");

    assert_eq!(value["profileName"], "staging");
    assert_eq!(value["service"]["endpoint"], "http://staging/v1");
    assert_eq!(value["service"]["timeoutMs"], 1500);
}

#[test]
fn cli_flags_override_env() {
    let dir = tempdir().expect("temp dir");
    let output = blmcli(dir.path())
        .args(["config", "--json", "--endpoint", "http://cli-host/v1"])
        .env("BIGLAKE_ENDPOINT", "http://env-host/v1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["service"]["endpoint"], "http://cli-host/v1");
}

#[test]
fn missing_config_file_is_reported_as_json_error() {
    let dir = tempdir().expect("temp dir");
    let output = blmcli(dir.path())
        .args(["config", "--json", "--config", "does-not-exist.yaml"])
        .assert()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json");
    assert_eq!(value["error"]["kind"], "Config");
}
