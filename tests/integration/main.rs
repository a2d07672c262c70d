//! Integration tests for tfvc-cache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Command with its config isolated in `temp`
    fn tfvc_cache(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("tfvc-cache");
        cmd.env("TFVC_CACHE_CONFIG", temp.path().join("config.toml"));
        cmd
    }

    fn write(temp: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn workspace_toml(name: &str, comment: &str, mappings: &[(&str, &str)]) -> String {
        let mut toml = format!("name = \"{}\"\ncomment = \"{}\"\n", name, comment);
        for (server, local) in mappings {
            toml.push_str(&format!(
                "\n[[mappings]]\nserver_path = \"{}\"\nlocal_path = \"{}\"\n",
                server, local
            ));
        }
        toml
    }

    fn arg(path: &Path) -> &str {
        path.to_str().unwrap()
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("local state caches for a TFVC client"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("tfvc-cache"));
    }

    #[test]
    fn config_path_honours_env() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                temp.path().join("config.toml").to_str().unwrap(),
            ));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[general]"))
            .stdout(predicate::str::contains("max_entries = 512"));
    }

    #[test]
    fn config_init_then_set() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(temp.path().join("config.toml").exists());

        tfvc_cache(&temp)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));

        tfvc_cache(&temp)
            .args(["config", "set", "content.max_entries", "9"])
            .assert()
            .success();
        tfvc_cache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("max_entries = 9"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["config", "set", "content.colour", "red"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn invalid_config_suggests_init() {
        let temp = TempDir::new().unwrap();
        write(&temp, "config.toml", "[content]\nmax_entries = \"many\"\n");

        tfvc_cache(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("config init --force"));

        tfvc_cache(&temp)
            .args(["config", "init", "--force"])
            .assert()
            .success();
        tfvc_cache(&temp).args(["config", "show"]).assert().success();
    }

    #[test]
    fn classify_against_workspace() {
        let temp = TempDir::new().unwrap();
        let ws = write(
            &temp,
            "ws.toml",
            &workspace_toml("ws1", "", &[("$/proj", "/ws/proj")]),
        );

        tfvc_cache(&temp)
            .args(["classify", "--format", "plain", "-w", arg(&ws)])
            .args(["/ws/proj", "/ws/proj/src", "/ws", "/other"])
            .assert()
            .success()
            .stdout(predicate::str::contains("is-mapping-root\t/ws/proj\n"))
            .stdout(predicate::str::contains("under-mapping-root\t/ws/proj/src\n"))
            .stdout(predicate::str::contains("no-root\t/ws\n"))
            .stdout(predicate::str::contains("unknown\t/other\n"));
    }

    #[test]
    fn classify_no_root_facts() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["classify", "--format", "json", "--no-root", "/tmp/x"])
            .args(["/tmp/x", "/tmp/x/y"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"status\": \"no-root\""))
            .stdout(predicate::str::contains("\"unknown\""));
    }

    #[test]
    fn classify_rejects_service_directory() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["classify", "--no-root", "/ws/$tf/1", "/ws"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid path"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn classify_missing_workspace_file() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["classify", "-w", "does-not-exist.toml", "/ws"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("reading workspace file"));
    }

    #[test]
    fn reconcile_plans_removals_and_changes() {
        let temp = TempDir::new().unwrap();
        let current = write(
            &temp,
            "current.toml",
            &workspace_toml("ws1", "old", &[("$/a", "/ws/a"), ("$/b", "/ws/b")]),
        );
        let desired = write(
            &temp,
            "desired.toml",
            &workspace_toml("ws2", "new", &[("$/a", "/ws/a2")]),
        );

        tfvc_cache(&temp)
            .args(["reconcile", "--format", "plain", arg(&current), arg(&desired)])
            .assert()
            .success()
            .stdout(predicate::str::contains("remove\t$/b\n"))
            .stdout(predicate::str::contains("map\t$/a\t/ws/a2\n"))
            .stdout(predicate::str::contains("update\tws2\tnew\n"));
    }

    #[test]
    fn reconcile_identical_only_updates_properties() {
        let temp = TempDir::new().unwrap();
        let current = write(
            &temp,
            "current.toml",
            &workspace_toml("ws1", "", &[("$/a", "/ws/a")]),
        );
        let desired = write(
            &temp,
            "desired.toml",
            &workspace_toml("ws1", "renamed", &[("$/a", "/ws/a")]),
        );

        tfvc_cache(&temp)
            .args(["reconcile", arg(&current), arg(&desired)])
            .assert()
            .success()
            .stdout(predicate::str::contains("mappings unchanged"))
            .stdout(predicate::str::contains("remove").not());
    }

    #[test]
    fn reconcile_rejects_desired_without_mappings() {
        let temp = TempDir::new().unwrap();
        let current = write(
            &temp,
            "current.toml",
            &workspace_toml("ws1", "", &[("$/a", "/ws/a")]),
        );
        let desired = write(&temp, "desired.toml", &workspace_toml("ws1", "", &[]));

        tfvc_cache(&temp)
            .args(["reconcile", arg(&current), arg(&desired)])
            .assert()
            .failure()
            .stderr(predicate::str::contains("at least one mapping"));
    }

    #[test]
    fn content_evicts_over_limit_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let parent = temp.path().join("content");
        write(
            &temp,
            "config.toml",
            &format!(
                "[content]\nmax_entries = 1\ntemp_parent = \"{}\"\n",
                parent.display()
            ),
        );
        let first = write(&temp, "first.txt", "one");
        let second = write(&temp, "second.txt", "two!");

        tfvc_cache(&temp)
            .args(["content", "--format", "plain", "-r", "7", arg(&first), arg(&second)])
            .assert()
            .success()
            .stdout(predicate::str::contains("evicted\t7\t3\t"))
            .stdout(predicate::str::contains("kept\t7\t4\t"));

        // The cache directory goes away with the process
        assert_eq!(fs::read_dir(&parent).unwrap().count(), 0);
    }

    #[test]
    fn content_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        tfvc_cache(&temp)
            .args(["content", "no-such-file.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("writing content of"));
    }
}
