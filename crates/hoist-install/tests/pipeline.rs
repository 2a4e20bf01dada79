use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::GzEncoder;
use hoist_fetch::{Fetcher, ReqwestClient};
use hoist_fs::{Rename, Transplanted};
use hoist_install::{
    HookError, InstallConfig, InstallContext, InstallError, InstallHook, InstallState, Installer,
    LauncherHook,
};
use hoist_platform::{Arch, Os, Platform, UserDirs};
use tempfile::TempDir;

const LINUX_RELEASE: &str = "tool-v1.2.0-x86_64-unknown-linux-musl";
const LINUX_ASSET: &str = "/owner/tool/releases/download/v1.2.0/tool-v1.2.0-x86_64-unknown-linux-musl.tar.gz";
const LATEST: &str = "/repos/owner/tool/releases/latest";

fn release_tar_gz(top: &str) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, mode, content) in [
        ("tool", 0o755, &b"#!/bin/sh\necho new\n"[..]),
        ("share/readme.txt", 0o644, &b"new readme"[..]),
    ] {
        let mut header = tar::Header::new_gnu();
        header.set_mode(mode);
        header.set_size(content.len() as u64);
        builder
            .append_data(&mut header, format!("{top}/{path}"), content)
            .unwrap();
    }
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&builder.into_inner().unwrap()).unwrap();
    encoder.finish().unwrap()
}

fn release_zip(top: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file(format!("{top}/tool.bat"), options).unwrap();
    writer.write_all(b"@echo new").unwrap();
    writer.finish().unwrap().into_inner()
}

struct Fixture {
    server: mockito::ServerGuard,
    temp: TempDir,
}

impl Fixture {
    async fn new() -> Self {
        Self {
            server: mockito::Server::new_async().await,
            temp: tempfile::tempdir().unwrap(),
        }
    }

    fn install_root(&self) -> PathBuf {
        self.temp.path().join("install").join("tool")
    }

    fn scratch_root(&self) -> PathBuf {
        self.temp.path().join("scratch")
    }

    fn home(&self) -> PathBuf {
        self.temp.path().join("home")
    }

    fn config(&self) -> InstallConfig {
        InstallConfig {
            repository: "owner/tool".into(),
            program: "tool".into(),
            release_host: self.server.url(),
            api_host: self.server.url(),
            install_root: Some(self.install_root()),
            scratch_root: Some(self.scratch_root()),
            user_agent: "hoist-tests".into(),
            ..InstallConfig::default()
        }
    }

    fn installer(&self, config: InstallConfig, os: Os) -> Installer<ReqwestClient> {
        let client = ReqwestClient::new(&config.user_agent).unwrap();
        let fetcher = Fetcher::with_options(client, config.fetch_options());
        Installer::new(config, fetcher)
            .platform(Platform::new(os, Arch::normalize("amd64")))
            .user_dirs(UserDirs {
                home: Some(self.home()),
                ..UserDirs::default()
            })
    }

    async fn latest_release(&mut self, tag: &str, hits: usize) -> mockito::Mock {
        self.server
            .mock("GET", LATEST)
            .match_header("accept", "application/vnd.github.v3+json")
            .expect(hits)
            .with_status(200)
            .with_body(format!(r#"{{"tag_name":"{tag}","draft":false}}"#))
            .create_async()
            .await
    }

    async fn asset(&mut self, path: &str, status: usize, body: Vec<u8>) -> mockito::Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_body(body)
            .create_async()
            .await
    }

    fn write_old_install(&self) {
        let root = self.install_root();
        std::fs::create_dir_all(root.join("old")).unwrap();
        std::fs::write(root.join("tool"), "old binary").unwrap();
        std::fs::write(root.join("old/stale.txt"), "stale").unwrap();
    }

    fn scratch_is_empty(&self) -> bool {
        let scratch = self.scratch_root();
        !scratch.exists() || std::fs::read_dir(scratch).unwrap().next().is_none()
    }
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<(String, PathBuf)>>>);

impl InstallHook for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn post_install(&self, ctx: &InstallContext<'_>) -> Result<(), HookError> {
        self.0
            .lock()
            .unwrap()
            .push((ctx.version.to_string(), ctx.install_root.to_path_buf()));
        Ok(())
    }
}

struct Failing;

impl InstallHook for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn post_install(&self, _ctx: &InstallContext<'_>) -> Result<(), HookError> {
        Err(HookError::HookFailed {
            name: self.name().to_string(),
            source: "boom".into(),
        })
    }
}

struct CrossDevice;

impl Rename for CrossDevice {
    fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
        Err(io::Error::other("cross-device link"))
    }
}

#[tokio::test]
async fn installs_latest_release_over_previous_version() {
    let mut fx = Fixture::new().await;
    let latest = fx.latest_release("v1.2.0", 1).await;
    let asset = fx.asset(LINUX_ASSET, 200, release_tar_gz(LINUX_RELEASE)).await;
    fx.write_old_install();

    let recorder = Recorder::default();
    let installer = fx.installer(fx.config(), Os::Linux).hook(recorder.clone());
    let report = installer.run().await.unwrap();

    latest.assert_async().await;
    asset.assert_async().await;
    assert_eq!(installer.state(), InstallState::Done);
    assert_eq!(report.version, "v1.2.0");
    assert_eq!(report.release_name, LINUX_RELEASE);
    assert_eq!(report.install_root, fx.install_root());
    assert_eq!(report.transplanted, Transplanted::Renamed);
    assert_eq!(report.archive.entry_count(), 2);

    let root = fx.install_root();
    assert_eq!(std::fs::read_to_string(root.join("tool")).unwrap(), "#!/bin/sh\necho new\n");
    assert_eq!(std::fs::read_to_string(root.join("share/readme.txt")).unwrap(), "new readme");
    assert!(!root.join("old").exists());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(root.join("tool")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    assert!(fx.scratch_is_empty());
    assert_eq!(
        *recorder.0.lock().unwrap(),
        vec![("v1.2.0".to_string(), fx.install_root())]
    );
}

#[tokio::test]
async fn pinned_version_skips_release_lookup() {
    let mut fx = Fixture::new().await;
    let latest = fx.latest_release("v9.9.9", 0).await;
    let asset = fx.asset(LINUX_ASSET, 200, release_tar_gz(LINUX_RELEASE)).await;

    let config = fx
        .config()
        .with_overrides_from(|key| (key == "PROGRAM_VERSION").then(|| "v1.2.0".to_string()));
    let report = fx.installer(config, Os::Linux).run().await.unwrap();

    latest.assert_async().await;
    asset.assert_async().await;
    assert_eq!(report.version, "v1.2.0");
}

#[tokio::test]
async fn missing_asset_leaves_install_untouched() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 404, b"Not Found".to_vec()).await;
    fx.write_old_install();

    let installer = fx.installer(fx.config(), Os::Linux);
    let err = installer.run().await.unwrap_err();

    assert!(
        matches!(err, InstallError::Download(hoist_fetch::Error::HttpStatus { status: 404, .. })),
        "{err}"
    );
    assert_eq!(err.exit_code(), 3);
    assert_eq!(installer.state(), InstallState::Failed);
    assert_eq!(std::fs::read_to_string(fx.install_root().join("tool")).unwrap(), "old binary");
    assert!(fx.install_root().join("old/stale.txt").exists());
    assert!(fx.scratch_is_empty());
}

#[tokio::test]
async fn unexpected_top_level_directory_is_a_layout_mismatch() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 200, release_tar_gz("tool-nightly")).await;
    fx.write_old_install();

    let err = fx.installer(fx.config(), Os::Linux).run().await.unwrap_err();

    match &err {
        InstallError::LayoutMismatch { expected } => assert_eq!(expected, LINUX_RELEASE),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 5);
    assert_eq!(std::fs::read_to_string(fx.install_root().join("tool")).unwrap(), "old binary");
    assert!(fx.scratch_is_empty());
}

#[tokio::test]
async fn release_lookup_failure_is_version_resolution() {
    let mut fx = Fixture::new().await;
    let _latest = fx
        .server
        .mock("GET", LATEST)
        .with_status(500)
        .create_async()
        .await;

    let err = fx.installer(fx.config(), Os::Linux).run().await.unwrap_err();

    assert!(matches!(err, InstallError::VersionResolution(_)), "{err}");
    assert_eq!(err.exit_code(), 7);
}

#[tokio::test]
async fn release_tag_that_is_not_a_plain_name_is_refused() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("../../x", 1).await;
    fx.write_old_install();

    let err = fx.installer(fx.config(), Os::Linux).run().await.unwrap_err();

    assert!(matches!(err, InstallError::VersionResolution(_)), "{err}");
    assert_eq!(std::fs::read_to_string(fx.install_root().join("tool")).unwrap(), "old binary");
}

#[tokio::test]
async fn dot_program_name_is_a_configuration_error() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 0).await;
    fx.write_old_install();
    let config = InstallConfig {
        program: ".".into(),
        ..fx.config()
    };

    let err = fx.installer(config, Os::Linux).run().await.unwrap_err();

    assert!(matches!(err, InstallError::Configuration(_)), "{err}");
    assert_eq!(err.exit_code(), 2);
    assert!(fx.install_root().join("old/stale.txt").exists());
}

#[tokio::test]
async fn corrupt_archive_is_an_extract_error() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 200, b"not gzip at all".to_vec()).await;

    let err = fx.installer(fx.config(), Os::Linux).run().await.unwrap_err();

    assert!(matches!(err, InstallError::Extract(_)), "{err}");
    assert_eq!(err.exit_code(), 4);
    assert!(!fx.install_root().exists());
    assert!(fx.scratch_is_empty());
}

#[tokio::test]
async fn copy_fallback_when_rename_fails() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 200, release_tar_gz(LINUX_RELEASE)).await;

    let report = fx
        .installer(fx.config(), Os::Linux)
        .renamer(CrossDevice)
        .run()
        .await
        .unwrap();

    assert_eq!(report.transplanted, Transplanted::Copied);
    assert_eq!(
        std::fs::read_to_string(fx.install_root().join("share/readme.txt")).unwrap(),
        "new readme"
    );
    assert!(fx.scratch_is_empty());
}

#[tokio::test]
async fn failing_hook_does_not_fail_the_install() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 200, release_tar_gz(LINUX_RELEASE)).await;

    let recorder = Recorder::default();
    let installer = fx
        .installer(fx.config(), Os::Linux)
        .hook(Failing)
        .hook(recorder.clone());
    installer.run().await.unwrap();

    assert_eq!(installer.state(), InstallState::Done);
    assert_eq!(recorder.0.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn windows_release_uses_zip() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let asset = fx
        .asset(
            "/owner/tool/releases/download/v1.2.0/tool-v1.2.0-x86_64-pc-windows-msvc.zip",
            200,
            release_zip("tool-v1.2.0-x86_64-pc-windows-msvc"),
        )
        .await;

    let report = fx.installer(fx.config(), Os::Windows).run().await.unwrap();

    asset.assert_async().await;
    assert_eq!(report.archive.format, hoist_archive::ArchiveFormat::Zip);
    assert_eq!(
        std::fs::read_to_string(fx.install_root().join("tool.bat")).unwrap(),
        "@echo new"
    );
}

#[tokio::test]
async fn unsupported_platform_fails_before_any_request() {
    let mut fx = Fixture::new().await;
    let latest = fx.latest_release("v1.2.0", 0).await;

    let config = InstallConfig {
        install_root: None,
        ..fx.config()
    };
    let err = fx.installer(config, Os::Macos).run().await.unwrap_err();

    latest.assert_async().await;
    assert!(matches!(err, InstallError::Platform(_)), "{err}");
    assert_eq!(err.exit_code(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn launcher_hook_links_the_binary_into_home() {
    let mut fx = Fixture::new().await;
    let _latest = fx.latest_release("v1.2.0", 1).await;
    let _asset = fx.asset(LINUX_ASSET, 200, release_tar_gz(LINUX_RELEASE)).await;
    std::fs::create_dir_all(fx.home()).unwrap();

    let hook = LauncherHook::new(UserDirs {
        home: Some(fx.home()),
        ..UserDirs::default()
    });
    fx.installer(fx.config(), Os::Linux).hook(hook).run().await.unwrap();

    assert_eq!(
        std::fs::read_link(fx.home().join("tool")).unwrap(),
        fx.install_root().join("tool")
    );
}
