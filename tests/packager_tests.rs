//! End-to-end packaging runs with an in-process compiler and tag source.

use flate2::read::GzDecoder;
use release_packager::config::BuildFailurePolicy;
use release_packager::error::{BuildError, GitError, PackagerError};
use release_packager::{
    ArchiveFormat, BuildOutput, BuildRequest, Compiler, PackageEvent, PackagerConfig, Packager,
    ReleaseTag, Result, TagSource,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};

const NAME: &str = "brother-cert";
const DOCS: [&str; 3] = ["README.md", "CHANGELOG.md", "LICENSE.md"];

struct FixedTag(&'static str);

impl TagSource for FixedTag {
    async fn latest_tag(&self) -> Result<ReleaseTag> {
        ReleaseTag::new(self.0)
    }
}

struct NoTag;

impl TagSource for NoTag {
    async fn latest_tag(&self) -> Result<ReleaseTag> {
        Err(GitError::NoTag {
            stderr: "fatal: No names found, cannot describe anything.".to_string(),
        }
        .into())
    }
}

/// Writes a fake binary for every target except those listed in `fail`.
#[derive(Default)]
struct FakeCompiler {
    fail: Vec<&'static str>,
    skip_output: Vec<&'static str>,
    warning: Option<&'static str>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeCompiler {
    fn failing(targets: &[&'static str]) -> Self {
        Self {
            fail: targets.to_vec(),
            ..Default::default()
        }
    }

    /// Handle that keeps recording after the compiler moves into a packager
    fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

impl Compiler for FakeCompiler {
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput> {
        let target = request.target.to_string();
        self.calls.lock().unwrap().push(target.clone());

        if self.fail.contains(&target.as_str()) {
            return Ok(BuildOutput::failure(1, "cmd/brother-cert/main.go:3: syntax error\n"));
        }
        if !self.skip_output.contains(&target.as_str()) {
            std::fs::write(&request.output, format!("binary for {target}")).unwrap();
        }
        Ok(BuildOutput {
            stderr: self.warning.map(str::to_string).unwrap_or_default(),
            ..BuildOutput::success()
        })
    }
}

fn project(targets: &[&str]) -> (tempfile::TempDir, PackagerConfig) {
    let tmp = tempfile::tempdir().unwrap();
    for doc in DOCS {
        std::fs::write(tmp.path().join(doc), format!("contents of {doc}")).unwrap();
    }

    let mut config = PackagerConfig::with_defaults(tmp.path()).unwrap();
    config.targets = targets.iter().map(|t| t.parse().unwrap()).collect();
    config.validate().unwrap();
    (tmp, config)
}

fn tar_modes(path: &Path) -> BTreeMap<String, u32> {
    let mut archive = tar::Archive::new(GzDecoder::new(File::open(path).unwrap()));
    archive
        .entries()
        .unwrap()
        .map(|entry| {
            let entry = entry.unwrap();
            (
                entry.path().unwrap().to_string_lossy().to_string(),
                entry.header().mode().unwrap(),
            )
        })
        .collect()
}

fn zip_names(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

#[tokio::test]
async fn packages_linux_and_windows() {
    let (tmp, config) = project(&["linux_amd64", "windows_amd64"]);
    let packager = Packager::new(config, FixedTag("v1.2.3"), FakeCompiler::default());

    let report = packager.run().await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.tag.as_str(), "v1.2.3");
    assert_eq!(report.artifacts.len(), 2);

    let release = tmp.path().join("_out/_release");
    let tarball = release.join("brother-cert-v1.2.3_linux_amd64.tar.gz");
    let zipfile = release.join("brother-cert-v1.2.3_windows_amd64.zip");

    let modes = tar_modes(&tarball);
    let expected: BTreeMap<String, u32> = [
        ("CHANGELOG.md", 0o644),
        ("LICENSE.md", 0o644),
        ("README.md", 0o644),
        (NAME, 0o755),
    ]
    .into_iter()
    .map(|(n, m)| (n.to_string(), m))
    .collect();
    assert_eq!(modes, expected);

    assert_eq!(
        zip_names(&zipfile),
        vec!["CHANGELOG.md", "LICENSE.md", "README.md", "brother-cert.exe"]
    );

    assert_eq!(report.artifacts[0].format, ArchiveFormat::TarGz);
    assert_eq!(report.artifacts[0].path, tarball);
    assert_eq!(report.artifacts[1].format, ArchiveFormat::Zip);
    assert_eq!(report.artifacts[1].sha256.len(), 64);
    assert_eq!(
        report.artifacts[1].size,
        std::fs::metadata(&zipfile).unwrap().len()
    );
}

#[tokio::test]
async fn output_tree_has_one_dir_per_target_and_no_leftovers() {
    let (tmp, config) = project(&["linux_arm64", "darwin_arm64", "freebsd_amd64"]);
    std::fs::create_dir_all(tmp.path().join("_out/solaris_amd64")).unwrap();
    std::fs::create_dir_all(tmp.path().join("_out/_release")).unwrap();
    std::fs::write(tmp.path().join("_out/_release/old.zip"), b"stale").unwrap();

    let packager = Packager::new(config, FixedTag("v0.4.0"), FakeCompiler::default());
    packager.run().await.unwrap();

    let mut dirs: Vec<String> = std::fs::read_dir(tmp.path().join("_out"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    dirs.sort();
    assert_eq!(dirs, vec!["_release", "darwin_arm64", "freebsd_amd64", "linux_arm64"]);

    let mut archives: Vec<String> = std::fs::read_dir(tmp.path().join("_out/_release"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    archives.sort();
    assert_eq!(
        archives,
        vec![
            "brother-cert-v0.4.0_darwin_arm64.zip",
            "brother-cert-v0.4.0_freebsd_amd64.tar.gz",
            "brother-cert-v0.4.0_linux_arm64.tar.gz",
        ]
    );

    let staged: Vec<String> = {
        let mut names: Vec<String> = std::fs::read_dir(tmp.path().join("_out/linux_arm64"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    };
    assert_eq!(staged, vec!["CHANGELOG.md", "LICENSE.md", "README.md", NAME]);
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let (tmp, config) = project(&["linux_amd64", "windows_amd64"]);
    let packager = Packager::new(config, FixedTag("v1.0.0"), FakeCompiler::default());

    let read_all = |dir: &Path| -> BTreeMap<String, Vec<u8>> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| {
                let e = e.unwrap();
                (
                    e.file_name().to_string_lossy().to_string(),
                    std::fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    };

    packager.run().await.unwrap();
    let first = read_all(&tmp.path().join("_out/_release"));
    packager.run().await.unwrap();
    let second = read_all(&tmp.path().join("_out/_release"));

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_tag_aborts_before_any_build() {
    let (tmp, config) = project(&["linux_amd64"]);
    let compiler = FakeCompiler::default();
    let calls = compiler.call_log();
    let packager = Packager::new(config, NoTag, compiler);

    let err = packager.run().await.unwrap_err();
    assert!(matches!(err, PackagerError::Git(GitError::NoTag { .. })));
    assert!(calls.lock().unwrap().is_empty());
    assert!(tmp.path().join("_out/_release").is_dir());
    assert!(!tmp.path().join("_out/linux_amd64").exists());
}

#[tokio::test]
async fn build_failure_aborts_and_names_target() {
    let (tmp, config) = project(&["linux_amd64", "linux_arm64", "darwin_amd64"]);
    let packager = Packager::new(
        config,
        FixedTag("v1.2.3"),
        FakeCompiler::failing(&["linux_arm64"]),
    );

    let err = packager.run().await.unwrap_err();
    match &err {
        PackagerError::Build(BuildError::Failed { target, code, stderr }) => {
            assert_eq!(target, "linux_arm64");
            assert_eq!(*code, Some(1));
            assert!(stderr.contains("syntax error"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let release = tmp.path().join("_out/_release");
    assert!(release.join("brother-cert-v1.2.3_linux_amd64.tar.gz").is_file());
    assert!(!release.join("brother-cert-v1.2.3_linux_arm64.tar.gz").exists());
    assert!(!tmp.path().join("_out/darwin_amd64").exists());
}

#[tokio::test]
async fn continue_policy_packages_remaining_targets() {
    let (tmp, mut config) = project(&["linux_amd64", "linux_arm64", "darwin_amd64"]);
    config.on_build_failure = BuildFailurePolicy::Continue;
    let packager = Packager::new(
        config,
        FixedTag("v1.2.3"),
        FakeCompiler::failing(&["linux_arm64"]),
    );

    let report = packager.run().await.unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].target.to_string(), "linux_arm64");
    assert_eq!(report.failures[0].error.target(), Some("linux_arm64"));

    let built: Vec<String> = report.artifacts.iter().map(|a| a.target.to_string()).collect();
    assert_eq!(built, vec!["linux_amd64", "darwin_amd64"]);

    let release = tmp.path().join("_out/_release");
    assert!(!release.join("brother-cert-v1.2.3_linux_arm64.tar.gz").exists());
    assert!(release.join("brother-cert-v1.2.3_darwin_amd64.zip").is_file());
}

#[tokio::test]
async fn successful_build_without_binary_is_an_error() {
    let (_tmp, config) = project(&["linux_amd64"]);
    let compiler = FakeCompiler {
        skip_output: vec!["linux_amd64"],
        ..Default::default()
    };
    let packager = Packager::new(config, FixedTag("v1.2.3"), compiler);

    let err = packager.run().await.unwrap_err();
    assert!(matches!(
        err,
        PackagerError::Build(BuildError::MissingBinary { .. })
    ));
}

#[tokio::test]
async fn missing_doc_is_fatal() {
    let (tmp, config) = project(&["linux_amd64"]);
    std::fs::remove_file(tmp.path().join("CHANGELOG.md")).unwrap();
    let packager = Packager::new(config, FixedTag("v1.2.3"), FakeCompiler::default());

    let err = packager.run().await.unwrap_err();
    assert!(matches!(err, PackagerError::MissingFile { ref path } if path.ends_with("CHANGELOG.md")));
}

#[tokio::test]
async fn targets_are_built_in_configured_order() {
    let (_tmp, config) = project(&["windows_amd64", "linux_amd64", "darwin_arm64"]);
    let compiler = FakeCompiler::default();
    let calls = compiler.call_log();
    let packager = Packager::new(config, FixedTag("v1.2.3"), compiler);

    let report = packager.run().await.unwrap();

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["windows_amd64", "linux_amd64", "darwin_arm64"]
    );
    let archived: Vec<String> = report.artifacts.iter().map(|a| a.target.to_string()).collect();
    assert_eq!(archived, vec!["windows_amd64", "linux_amd64", "darwin_arm64"]);
}

#[tokio::test]
async fn plan_does_not_touch_the_output_tree() {
    let (tmp, config) = project(&["linux_amd64", "windows_arm64"]);
    let compiler = FakeCompiler::default();
    let calls = compiler.call_log();
    let packager = Packager::new(config, FixedTag("v3.1.0"), compiler);

    let plan = packager.plan().await.unwrap();

    assert!(!tmp.path().join("_out").exists());
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(plan.tag.as_str(), "v3.1.0");
    assert_eq!(plan.targets.len(), 2);
    assert!(
        plan.targets[1]
            .archive
            .ends_with("_out/_release/brother-cert-v3.1.0_windows_arm64.zip")
    );
    assert!(plan.targets[1].binary.ends_with("_out/windows_arm64/brother-cert.exe"));
}

#[tokio::test]
async fn compiler_warnings_reach_the_observer() {
    let (_tmp, config) = project(&["linux_amd64", "darwin_arm64"]);
    let compiler = FakeCompiler {
        warning: Some("go: warning: ignoring go.work\n"),
        ..Default::default()
    };
    let packager = Packager::new(config, FixedTag("v1.2.3"), compiler);

    let mut seen = Vec::new();
    let report = packager
        .run_observed(|event| {
            if let PackageEvent::CompilerOutput {
                target,
                stdout,
                stderr,
            } = event
            {
                seen.push((target.to_string(), stdout.to_string(), stderr.to_string()));
            }
        })
        .await
        .unwrap();

    assert!(report.is_success());
    assert_eq!(
        seen,
        vec![
            (
                "linux_amd64".to_string(),
                String::new(),
                "go: warning: ignoring go.work".to_string()
            ),
            (
                "darwin_arm64".to_string(),
                String::new(),
                "go: warning: ignoring go.work".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn silent_builds_emit_no_compiler_output() {
    let (_tmp, config) = project(&["linux_amd64"]);
    let packager = Packager::new(config, FixedTag("v1.2.3"), FakeCompiler::default());

    let mut outputs = 0;
    packager
        .run_observed(|event| {
            if matches!(event, PackageEvent::CompilerOutput { .. }) {
                outputs += 1;
            }
        })
        .await
        .unwrap();

    assert_eq!(outputs, 0);
}
