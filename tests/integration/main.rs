//! Integration tests for buildcache

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn buildcache(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("buildcache");
        cmd.env_remove("BUILDCACHE_CONFIG")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-dir")
            .arg(temp.path().join("cache"));
        cmd
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Pluggable build cache services"));
    }

    #[test]
    fn store_then_load_to_file() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.bin");
        let output = temp.path().join("output.bin");
        std::fs::write(&input, [0x01, 0x02]).unwrap();

        buildcache(&temp)
            .args(["store", "K1"])
            .arg(&input)
            .assert()
            .success();

        buildcache(&temp)
            .args(["load", "K1", "--output"])
            .arg(&output)
            .assert()
            .success();

        assert_eq!(std::fs::read(&output).unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn load_to_stdout() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.txt");
        std::fs::write(&input, "cached stdout").unwrap();

        buildcache(&temp)
            .args(["store", "K2"])
            .arg(&input)
            .assert()
            .success();

        buildcache(&temp)
            .args(["load", "K2"])
            .assert()
            .success()
            .stdout("cached stdout");
    }

    #[test]
    fn load_miss_succeeds() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["load", "absent"])
            .assert()
            .success()
            .stdout("")
            .stderr(predicate::str::contains("Cache miss: absent"));
    }

    #[test]
    fn no_push_discards_store() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.bin");
        std::fs::write(&input, [0x09]).unwrap();

        buildcache(&temp)
            .args(["--no-push", "-vv", "store", "K1"])
            .arg(&input)
            .assert()
            .success()
            .stderr(predicate::str::contains(
                "Not storing cache entry with key K1 because pushing to cache is disabled for the build",
            ));

        buildcache(&temp)
            .args(["load", "K1"])
            .assert()
            .success()
            .stderr(predicate::str::contains("Cache miss: K1"));
    }

    #[test]
    fn no_push_still_loads() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("input.bin");
        std::fs::write(&input, "warm").unwrap();

        buildcache(&temp)
            .args(["store", "K1"])
            .arg(&input)
            .assert()
            .success();

        buildcache(&temp)
            .args(["--no-push", "load", "K1"])
            .assert()
            .success()
            .stdout("warm");
    }

    #[test]
    fn describe_reports_push_state() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .arg("describe")
            .assert()
            .success()
            .stdout(predicate::str::contains("local directory cache at"))
            .stdout(predicate::str::contains("push enabled"));

        buildcache(&temp)
            .args(["--no-push", "describe"])
            .assert()
            .success()
            .stdout(predicate::str::contains("push disabled"));
    }

    #[test]
    fn store_missing_file() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["store", "K1", "does-not-exist.bin"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path not found"));
    }

    #[test]
    fn invalid_key_rejected() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["load", "../escape"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid cache key"));
    }

    #[test]
    fn http_backend_requires_url() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["--backend", "http", "describe"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("requires cache.url"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_init_then_show() {
        let temp = TempDir::new().unwrap();
        buildcache(&temp)
            .args(["config", "init"])
            .assert()
            .success();
        assert!(temp.path().join("config.toml").exists());

        buildcache(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }
}
