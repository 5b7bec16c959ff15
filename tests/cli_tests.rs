//! Integration tests for CLI functionality

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get path to compiled binary
fn kwctl_bin() -> &'static Path {
    assert_cmd::cargo::cargo_bin!("kwctl")
}

/// Settings file keeping every path inside `dir`
fn write_settings(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let content = format!(
        "source_file_path = \"{root}/source\"\n\
         {extra}\n\
         [kubeconfig]\n\
         root = \"{root}/kube\"\n\
         \n\
         [history]\n\
         path = \"{root}/history\"\n",
        root = dir.display(),
        extra = extra
    );
    fs::write(&path, content).unwrap();
    path
}

/// Command isolated from the caller's settings and active selection
fn kwctl(settings: &Path) -> Command {
    let mut cmd = Command::new(kwctl_bin());
    cmd.arg("--config")
        .arg(settings)
        .env_remove("KUBECONFIG_NAME")
        .env_remove("KUBECONFIG_NAMESPACE")
        .env_remove("KWCTL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Test that help flag works
#[test]
fn test_help_flag() {
    Command::new(kwctl_bin())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Switch kubeconfigs and namespaces"))
        .stdout(predicate::str::contains("login"));
}

/// Test that version flag works
#[test]
fn test_version_flag() {
    Command::new(kwctl_bin())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kwctl"));
}

#[test]
fn test_unknown_subcommand() {
    Command::new(kwctl_bin())
        .arg("rollback")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_show_without_active_kubeconfig() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .arg("show")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: no current selected kubeconfig"));
}

#[test]
fn test_show_active_with_namespace() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    fs::create_dir_all(dir.path().join("kube")).unwrap();
    fs::write(dir.path().join("kube/prod"), "apiVersion: v1\n").unwrap();

    kwctl(&settings)
        .arg("show")
        .env("KUBECONFIG_NAME", "prod")
        .env("KUBECONFIG_NAMESPACE", "web")
        .assert()
        .success()
        .stdout("prod -> web\n");
}

#[test]
fn test_stale_active_kubeconfig() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .args(["config", "-l"])
        .env("KUBECONFIG_NAME", "gone")
        .assert()
        .failure()
        .stderr(predicate::str::contains("please unuse it"));
}

#[test]
fn test_source_empty_prints_nothing() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings).arg("source").assert().success().stdout("");
}

#[test]
fn test_switch_then_source() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    fs::create_dir_all(dir.path().join("kube/clusters")).unwrap();
    fs::write(dir.path().join("kube/clusters/prod"), "apiVersion: v1\n").unwrap();

    kwctl(&settings)
        .args(["config", "clusters/prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("==> Switch to kubeconfig \"clusters/prod\""));

    kwctl(&settings)
        .arg("source")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "export KUBECONFIG_NAME=\"clusters/prod\"",
        ));

    // Consumed by the first read
    kwctl(&settings).arg("source").assert().success().stdout("");

    let history = fs::read_to_string(dir.path().join("history")).unwrap();
    assert_eq!(history.lines().count(), 1);
    assert!(history.trim_end().ends_with(" clusters/prod"));
}

#[test]
fn test_config_list_marks_active() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    fs::create_dir_all(dir.path().join("kube")).unwrap();
    fs::write(dir.path().join("kube/a"), "").unwrap();
    fs::write(dir.path().join("kube/b"), "").unwrap();

    kwctl(&settings)
        .args(["config", "-l"])
        .env("KUBECONFIG_NAME", "b")
        .assert()
        .success()
        .stdout("a\n* b\n");
}

#[test]
fn test_back_reference_without_history() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .args(["config", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no last kubeconfig selected"));
}

#[test]
fn test_ns_requires_active_kubeconfig() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .args(["ns", "default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no kubeconfig selected"));
}

#[test]
fn test_init_bash_uses_configured_name() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "cmd = \"k8\"");
    kwctl(&settings)
        .args(["init", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("k8() {"));
}

#[test]
fn test_invalid_history_max() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    fs::write(
        &settings,
        format!(
            "{}max = 1000\n",
            fs::read_to_string(&settings).unwrap()
        ),
    )
    .unwrap();

    kwctl(&settings)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("`history.max` is too large"));
}

#[test]
fn test_print_config_is_json() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .arg("--print-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"cmd\": \"kw\""))
        .stdout(predicate::str::contains("\"max\": 100"));
}

#[test]
fn test_cp_needs_a_remote_side() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    kwctl(&settings)
        .args(["cp", "a", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("require at least one remote copy path"));
}

#[test]
fn test_scale_runs_kubectl_in_active_namespace() {
    let dir = TempDir::new().unwrap();
    let settings = write_settings(dir.path(), "");
    let mut content = fs::read_to_string(&settings).unwrap();
    content.push_str("\n[kubectl]\nname = \"kwctl-test-missing-kubectl\"\n");
    fs::write(&settings, content).unwrap();

    kwctl(&settings)
        .args(["scale", "deploy/web", "2"])
        .env("KUBECONFIG_NAMESPACE", "shop")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "kwctl-test-missing-kubectl scale -n shop deploy/web --replicas=2",
        ));
}

#[test]
fn test_set_image_rejects_empty_image() {
    Command::new(kwctl_bin())
        .args(["set-image", "deploy/web", ""])
        .assert()
        .failure();
}
