//! Integration tests for arcindex

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write a zip archive at `dir/name` and return its path as a string
fn write_archive(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> String {
    let path = dir.join(name);
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (entry, contents) in entries {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(*entry, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
    path.to_string_lossy().into_owned()
}

/// Archives A = {a/B.class, data.txt} and Z = {a/B.class}
fn two_archives(dir: &Path) -> (String, String) {
    let a = write_archive(
        dir,
        "a.jar",
        &[("a/B.class", b"bytes-from-a"), ("data.txt", b"hello")],
    );
    let z = write_archive(dir, "z.jar", &[("a/B.class", b"bytes-from-z")]);
    (a, z)
}

mod library_tests {
    use super::*;
    use arcindex::index::{IndexCache, IndexSource};
    use arcindex::{ArchiveLocation, ErrorKind, Fingerprint, Resolver};
    use std::fs;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    fn locations(a: &str, z: &str) -> Vec<ArchiveLocation> {
        vec![ArchiveLocation::new(a), ArchiveLocation::new(z)]
    }

    #[test]
    fn end_to_end_first_archive_wins() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let cache = IndexCache::at(dir.path().join("class_index.dat"));
        let fingerprint = Fingerprint::new(b"set-1".to_vec());

        let obtained = cache.obtain(&fingerprint, &archives).unwrap();
        let resolver = Resolver::bind(obtained.index, &archives).unwrap();

        assert_eq!(resolver.resolve_component_bytes("a.B").unwrap(), b"bytes-from-a");

        let all: Vec<String> = resolver
            .resolve_all_resource_handles("a/B.class")
            .map(|address| address.archive().to_string())
            .collect();
        assert_eq!(all, vec![a.clone(), z.clone()]);

        let single = resolver.resolve_single_resource_handle("a/B.class").unwrap();
        assert_eq!(single.archive().as_str(), a);
        assert!(single.to_string().starts_with("jar:file:"));
        assert!(single.to_string().ends_with("a.jar!/a/B.class"));
    }

    #[test]
    fn cached_index_matches_fresh_index() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let cache = IndexCache::at(dir.path().join("class_index.dat"));
        let fingerprint = Fingerprint::of_archives(&archives).unwrap();

        let built = cache.obtain(&fingerprint, &archives).unwrap();
        let loaded = cache.obtain(&fingerprint, &archives).unwrap();

        assert_eq!(built.source, IndexSource::Built { persisted: true });
        assert_eq!(loaded.source, IndexSource::Loaded);
        assert_eq!(built.index, loaded.index);
    }

    #[test]
    fn changed_archive_invalidates_cache() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let cache = IndexCache::at(dir.path().join("class_index.dat"));
        cache
            .obtain(&Fingerprint::of_archives(&archives).unwrap(), &archives)
            .unwrap();

        write_archive(dir.path(), "z.jar", &[("c/New.class", b"new")]);
        let fingerprint = Fingerprint::of_archives(&archives).unwrap();
        let obtained = cache.obtain(&fingerprint, &archives).unwrap();

        assert_eq!(obtained.source, IndexSource::Built { persisted: true });
        assert_eq!(obtained.index.component_archives("c/New.class").len(), 1);
        assert_eq!(obtained.index.component_archives("a/B.class").len(), 1);
    }

    #[test]
    fn garbage_cache_file_falls_back_to_rebuild() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let path = dir.path().join("class_index.dat");
        fs::write(&path, [0xffu8; 64]).unwrap();

        let obtained = IndexCache::at(&path)
            .obtain(&Fingerprint::new(vec![0xff; 8]), &archives)
            .unwrap();

        assert_eq!(obtained.source, IndexSource::Built { persisted: true });
        assert_eq!(obtained.index.resource_archives("data.txt").len(), 1);
    }

    #[test]
    fn miss_semantics() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let index = arcindex::index::IndexBuilder::new().build(&archives).unwrap();
        let resolver = Resolver::bind(index, &archives).unwrap();

        let err = resolver.resolve_component_bytes("no.Such").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(resolver.resolve_single_resource_handle("no/such.txt").is_none());
        assert_eq!(resolver.resolve_all_resource_handles("no/such.txt").count(), 0);
    }

    #[test]
    fn concurrent_resolvers_share_one_handle() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let archives = locations(&a, &z);
        let index = arcindex::index::IndexBuilder::new().build(&archives).unwrap();
        let resolver = Arc::new(Resolver::bind(index, &archives).unwrap());
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let workers: Vec<_> = (0..threads)
            .map(|i| {
                let resolver = Arc::clone(&resolver);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        resolver.resolve_component_bytes("a.B").unwrap()
                    } else {
                        let address = resolver.resolve_single_resource_handle("data.txt").unwrap();
                        resolver.open_address(&address).unwrap()
                    }
                })
            })
            .collect();

        for (i, worker) in workers.into_iter().enumerate() {
            let bytes = worker.join().unwrap();
            let expected: &[u8] = if i % 2 == 0 { b"bytes-from-a" } else { b"hello" };
            assert_eq!(bytes, expected);
        }

        let loader = resolver.loader(&a).unwrap();
        assert_eq!(loader.retained_handles(), 1);
        assert!(!resolver.loader(&z).unwrap().is_open());
    }
}

mod cli_tests {
    use super::*;
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache
    fn arcindex(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("arcindex");
        cmd.arg("--config")
            .arg(dir.path().join("config.toml"))
            .arg("--cache-file")
            .arg(dir.path().join("class_index.dat"));
        cmd
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("arcindex")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("name-to-archive index"))
            .stdout(predicate::str::contains("--archive"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("arcindex")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("arcindex"));
    }

    #[test]
    fn index_builds_then_loads() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "index"])
            .assert()
            .success()
            .stdout(predicate::str::contains("built"));

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "index"])
            .assert()
            .success()
            .stdout(predicate::str::contains("loaded from cache"));
    }

    #[test]
    fn index_plain_counts() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "index", "--format", "plain"])
            .assert()
            .success()
            .stdout("1 1 1\n");
    }

    #[test]
    fn index_recovers_from_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        fs::write(dir.path().join("class_index.dat"), b"\x00\x01garbage").unwrap();

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "index", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"source\": \"built\""));
    }

    #[test]
    fn resolve_prints_first_archive_bytes() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "resolve", "a.B"])
            .assert()
            .success()
            .stdout("bytes-from-a");
    }

    #[test]
    fn resolve_to_output_directory() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let out = dir.path().join("out");

        arcindex(&dir)
            .args(["-a", &z, "-a", &a, "resolve", "a.B", "--output"])
            .arg(&out)
            .assert()
            .success();

        assert_eq!(fs::read(out.join("a/B.class")).unwrap(), b"bytes-from-z");
    }

    #[test]
    fn archive_order_decides_winner() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &z, "-a", &a, "resolve", "a.B"])
            .assert()
            .success()
            .stdout("bytes-from-z");

        arcindex(&dir)
            .args(["-a", &a, "resolve", "a.B", "-a", &z])
            .assert()
            .failure();
    }

    #[test]
    fn rooted_entry_names_resolve() {
        let dir = TempDir::new().unwrap();
        let a = write_archive(dir.path(), "a.jar", &[("/lead/X.class", b"lead"), ("/r.txt", b"rooted")]);

        arcindex(&dir)
            .args(["-a", &a, "resolve", "lead.X"])
            .assert()
            .success()
            .stdout("lead");

        arcindex(&dir)
            .args(["-a", &a, "find", "r.txt", "--read"])
            .assert()
            .success()
            .stdout("rooted");
    }

    #[test]
    fn missing_explicit_config_is_reported() {
        let dir = TempDir::new().unwrap();

        arcindex(&dir)
            .args(["-v", "config", "path"])
            .assert()
            .success()
            .stderr(predicate::str::contains("not found, using defaults"));
    }

    #[test]
    fn resolve_missing_fails() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "resolve", "x.Missing"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("No archive provides x.Missing"));
    }

    #[test]
    fn find_all_lists_in_order() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        let output = arcindex(&dir)
            .args(["-a", &a, "-a", &z, "find", "a/B.class", "--all"])
            .output()
            .unwrap();

        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("a.jar!/a/B.class"));
        assert!(lines[1].ends_with("z.jar!/a/B.class"));
    }

    #[test]
    fn find_read_prints_contents() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "find", "data.txt", "--read"])
            .assert()
            .success()
            .stdout("hello");
    }

    #[test]
    fn find_missing_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());

        arcindex(&dir)
            .args(["-a", &a, "-a", &z, "find", "nothing.txt"])
            .assert()
            .success()
            .stderr(predicate::str::contains("No archive provides nothing.txt"));
    }

    #[test]
    fn remote_archive_rejected() {
        let dir = TempDir::new().unwrap();

        arcindex(&dir)
            .args(["-a", "https://repo.example.com/a.jar", "index"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unsupported archive location"));
    }

    #[test]
    fn missing_archives_is_user_error() {
        let dir = TempDir::new().unwrap();

        arcindex(&dir)
            .arg("index")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No archives given"));
    }

    #[test]
    fn cache_path_and_clear() {
        let dir = TempDir::new().unwrap();
        let (a, _) = two_archives(dir.path());

        arcindex(&dir)
            .args(["cache", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("class_index.dat"));

        arcindex(&dir).args(["-a", &a, "index"]).assert().success();
        assert!(dir.path().join("class_index.dat").exists());

        arcindex(&dir)
            .args(["cache", "clear"])
            .assert()
            .success()
            .stdout(predicate::str::contains("removed"));
        assert!(!dir.path().join("class_index.dat").exists());
    }

    #[test]
    fn config_init_and_show() {
        let dir = TempDir::new().unwrap();

        arcindex(&dir).args(["config", "init"]).assert().success();
        assert!(dir.path().join("config.toml").exists());

        arcindex(&dir)
            .args(["config", "set", "scan.parallel", "false"])
            .assert()
            .success();

        arcindex(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("# "))
            .stdout(predicate::str::contains("config.toml"))
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("parallel = false"));
    }

    #[test]
    fn configured_archives_are_used() {
        let dir = TempDir::new().unwrap();
        let (a, z) = two_archives(dir.path());
        let config = format!(
            "[archives]\nlocations = [{:?}, {:?}]\n",
            a.replace('\\', "/"),
            z.replace('\\', "/")
        );
        fs::write(dir.path().join("config.toml"), config).unwrap();

        arcindex(&dir)
            .args(["resolve", "a.B"])
            .assert()
            .success()
            .stdout("bytes-from-a");
    }
}
