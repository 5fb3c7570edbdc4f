//! End-to-end tests for the `nft-metadata` binary.
//!
//! Each test seeds a scratch working directory and runs the compiled binary
//! inside it, exactly as the script would be run from a project root.

use anyhow::{Result, anyhow};
use assert_cmd::Command;
use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rstest::{fixture, rstest};
use serde_json::Value;

struct Scratch {
    _tempdir: tempfile::TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl Scratch {
    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_nft-metadata"));
        cmd.current_dir(&self.root);
        for var in [
            "NFT_METADATA_CONFIG_PATH",
            "NFT_METADATA_IMAGES_DIR",
            "NFT_METADATA_JSONS_DIR",
            "NFT_METADATA_BASE_URI",
            "NFT_METADATA_IMAGE_EXTENSION",
            "NFT_METADATA_LISTING_ORDER",
            "NFT_METADATA_SKIP_NON_FILES",
            "NFT_METADATA_FAILURE_POLICY",
            "NFT_METADATA_LOG",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("RUST_BACKTRACE", "0");
        cmd
    }

    fn seed_images(&self, names: &[&str]) -> Result<()> {
        self.dir.create_dir_all("images")?;
        for name in names {
            self.dir.write(format!("images/{name}"), b"")?;
        }
        Ok(())
    }

    fn document(&self, file_name: &str) -> Result<Value> {
        let text = self.dir.read_to_string(format!("jsons/{file_name}"))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[fixture]
fn scratch() -> Result<Scratch> {
    let tempdir = tempfile::tempdir()?;
    let root = Utf8PathBuf::from_path_buf(tempdir.path().to_path_buf())
        .map_err(|path| anyhow!("tempdir path is not UTF-8: {}", path.display()))?;
    let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok(Scratch {
        _tempdir: tempdir,
        root,
        dir,
    })
}

#[rstest]
fn default_run_generates_then_updates(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    ws.seed_images(&["loft.jpg", "tower.png"])?;

    let output = ws.command().args(["--base-uri", "ipfs://abc"]).output()?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(
        stdout.lines().collect::<Vec<_>>(),
        [
            "Generated metadata JSON file: jsons/0.json",
            "Generated metadata JSON file: jsons/1.json",
            "Updated image URI in metadata JSON file: jsons/0.json",
            "Updated image URI in metadata JSON file: jsons/1.json",
        ]
    );

    let loft = ws.document("0.json")?;
    assert_eq!(loft["name"], "loft");
    assert_eq!(loft["image"], "ipfs://abc/loft.png");
    let tower = ws.document("1.json")?;
    assert_eq!(tower["name"], "tower");
    assert_eq!(tower["image"], "ipfs://abc/tower.png");
    Ok(())
}

#[rstest]
fn generate_subcommand_leaves_image_empty(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    ws.seed_images(&["loft.jpg"])?;

    ws.command().arg("generate").assert().success();

    assert_eq!(ws.document("0.json")?["image"], "");
    Ok(())
}

#[rstest]
fn update_subcommand_reads_config_file(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    ws.seed_images(&["loft.jpg"])?;
    ws.dir.write(
        "nft-metadata.toml",
        "base_uri = \"ipfs://from-file\"\nimage_extension = \"webp\"\n",
    )?;

    ws.command().arg("generate").assert().success();
    ws.command().arg("update").assert().success();

    assert_eq!(ws.document("0.json")?["image"], "ipfs://from-file/loft.webp");
    Ok(())
}

#[rstest]
fn missing_images_dir_exits_non_zero(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    let output = ws.command().output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("images"));
    Ok(())
}

#[rstest]
fn malformed_document_stops_the_run(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    ws.dir.create_dir_all("jsons")?;
    ws.dir.write("jsons/0.json", "{ broken")?;
    ws.dir.write("jsons/1.json", r#"{"name": "tower", "image": ""}"#)?;

    let output = ws.command().arg("update").output()?;
    assert!(!output.status.success());
    assert_eq!(ws.document("1.json")?["image"], "");
    Ok(())
}

#[rstest]
fn keep_going_finishes_then_fails(scratch: Result<Scratch>) -> Result<()> {
    let ws = scratch?;
    ws.dir.create_dir_all("jsons")?;
    ws.dir.write("jsons/0.json", "{ broken")?;
    ws.dir.write("jsons/1.json", r#"{"name": "tower", "image": ""}"#)?;

    let output = ws
        .command()
        .args(["update", "--keep-going", "--base-uri", "ipfs://abc"])
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("1 of 2"));
    assert_eq!(ws.document("1.json")?["image"], "ipfs://abc/tower.png");
    Ok(())
}
