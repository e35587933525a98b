#![cfg(all(unix, feature = "cli"))]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use oidpuck::transport::{BridgeConfig, BridgeSocket, CommandSink, NotifySource};

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/oidpuck-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn wait_for_path(path: &Path, timeout: Duration) {
    let start = Instant::now();
    while !path.exists() {
        if start.elapsed() >= timeout {
            panic!("{} never appeared", path.display());
        }
        thread::sleep(Duration::from_millis(25));
    }
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn uuids_looks_up_uart_characteristics() {
    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--format", "json", "uuids", "6E400003-B5A3-F393-E0A9-E50E24DCCA9E"])
        .output()
        .expect("uuids should run");

    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(
        payload["schema_id"],
        "https://schemas.oidpuck.dev/cli/v1/gatt-uuids.schema.json"
    );
    assert_eq!(payload["entries"][0]["name"], "Tx Characteristic");
    assert_eq!(payload["entries"][0]["kind"], "characteristic");
}

#[test]
fn uuids_lists_catalogue_and_rejects_unknown() {
    let all = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--format", "json", "uuids"])
        .output()
        .expect("uuids should run");
    assert!(all.status.success());
    let entries = stdout_json(&all)["entries"]
        .as_array()
        .expect("entries should be an array")
        .len();
    assert!(entries > 40);

    let unknown = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["uuids", "00000000-0000-0000-0000-000000000000"])
        .output()
        .expect("uuids should run");
    assert_eq!(unknown.status.code(), Some(60));
}

#[test]
fn filter_from_board_code() {
    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--format", "json", "filter", "a1b2c3"])
        .output()
        .expect("filter should run");

    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["company_identifier"], 0xFFFF);
    assert_eq!(payload["data_prefix"], "A1B2C3");
    assert_eq!(payload["mask"], "A1B2C3");
    assert_eq!(
        payload["optional_services"][3],
        "6e400001-b5a3-f393-e0a9-e50e24dcca9e"
    );
}

#[test]
fn filter_reads_board_code_from_env() {
    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .env("OIDPUCK_PERIPHERAL", "0F0E0D")
        .args(["--format", "json", "filter"])
        .output()
        .expect("filter should run");

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["data_prefix"], "0F0E0D");
}

#[test]
fn filter_rejects_malformed_code() {
    for code in ["a1b2c", "a1b2cz", "a1b2c3d4"] {
        let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
            .args(["filter", code])
            .output()
            .expect("filter should run");
        assert_eq!(output.status.code(), Some(64), "code {code}");
    }
}

#[test]
fn version_reports_package_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .arg("version")
        .output()
        .expect("version should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        format!("oidpuck {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn monitor_decodes_bridge_notifications() {
    let dir = unique_temp_dir("monitor");
    let sock_path = dir.join("app.sock");

    let child = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--log-level", "error", "--format", "json", "monitor"])
        .arg(&sock_path)
        .args(["--count", "2", "--timeout", "5s"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("monitor should start");

    wait_for_path(&sock_path, Duration::from_secs(3));

    let mut bridge = BridgeSocket::unbound(BridgeConfig::default())
        .expect("unbound socket")
        .with_peer(&sock_path);
    let mut product = [0u8; 20];
    product[..5].copy_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x83]);
    let mut status = [0u8; 20];
    status[..5].copy_from_slice(&[0x00, 0x02, 0x05, 0x00, 0x81]);
    bridge.write_command(&[0u8; 7]).expect("short datagram");
    bridge.write_command(&product).expect("product datagram");
    bridge.write_command(&status).expect("status datagram");

    let output = child.wait_with_output().expect("monitor should exit");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["length"], 7);
    assert_eq!(lines[2]["sequence"], 2);
    assert_eq!(lines[2]["reports"][0]["status"]["product_id"], 1);
    assert_eq!(lines[2]["reports"][0]["status"]["battery_raw"], 512);
}

fn spawn_monitor(sock_path: &Path, extra: &[&str]) -> std::process::Child {
    let child = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--log-level", "error", "--format", "json", "monitor"])
        .arg(sock_path)
        .args(["--count", "2", "--timeout", "5s"])
        .args(extra)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("monitor should start");
    wait_for_path(sock_path, Duration::from_secs(3));
    child
}

fn channel_one(slice: [u8; 5]) -> [u8; 20] {
    let mut frame = [0u8; 20];
    frame[..5].copy_from_slice(&slice);
    frame
}

#[test]
fn monitor_keeps_going_after_wrong_sized_datagrams() {
    let dir = unique_temp_dir("sizes");
    let sock_path = dir.join("app.sock");
    let child = spawn_monitor(&sock_path, &[]);

    let mut bridge = BridgeSocket::unbound(BridgeConfig::default())
        .expect("unbound socket")
        .with_peer(&sock_path);
    bridge.write_command(&[0u8; 21]).expect("long datagram");
    bridge.write_command(&[0u8; 600]).expect("oversized datagram");
    bridge.write_command(&[]).expect("empty datagram");
    bridge
        .write_command(&channel_one([0x04, 0x03, 0x02, 0x01, 0x83]))
        .expect("product datagram");
    bridge
        .write_command(&channel_one([0x00, 0x02, 0x05, 0x00, 0x81]))
        .expect("status datagram");

    let output = child.wait_with_output().expect("monitor should exit");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0]["length"], 21);
    assert!(lines[1]["length"].is_null());
    assert_eq!(lines[1]["error"], "transport failure: datagram exceeds 512 bytes");
    assert_eq!(lines[2]["length"], 0);
    assert_eq!(lines[3]["sequence"], 1);
    assert_eq!(lines[4]["sequence"], 2);
    assert_eq!(lines[4]["reports"][0]["status"]["product_id"], 0x0102_0304);
}

#[test]
fn monitor_disconnect_marker_resets_latches() {
    let dir = unique_temp_dir("marker");
    let sock_path = dir.join("app.sock");
    let child = spawn_monitor(&sock_path, &["--disconnect-marker"]);

    let mut bridge = BridgeSocket::unbound(BridgeConfig::default())
        .expect("unbound socket")
        .with_peer(&sock_path);
    bridge
        .write_command(&channel_one([0x04, 0x03, 0x02, 0x01, 0x83]))
        .expect("product datagram");
    bridge.send_disconnect().expect("link-down marker");
    bridge
        .write_command(&channel_one([0x00, 0x02, 0x05, 0x00, 0x81]))
        .expect("status datagram");

    let output = child.wait_with_output().expect("monitor should exit");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(output.status.success());
    let lines: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["sequence"], 1);
    assert!(lines[1]["reports"][0]["status"]["product_id"].is_null());
}

#[test]
fn monitor_times_out_without_traffic() {
    let dir = unique_temp_dir("idle");
    let sock_path = dir.join("app.sock");

    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .arg("monitor")
        .arg(&sock_path)
        .args(["--timeout", "300ms"])
        .output()
        .expect("monitor should run");
    let _ = std::fs::remove_dir_all(&dir);

    assert_eq!(output.status.code(), Some(124));
}

#[test]
fn send_writes_one_frame_to_the_bridge() {
    let dir = unique_temp_dir("send");
    let bridge_path = dir.join("bridge.sock");
    let app_path = dir.join("app.sock");

    let config = BridgeConfig {
        read_timeout: Some(Duration::from_secs(5)),
        ..BridgeConfig::default()
    };
    let mut bridge = BridgeSocket::bind_with_config(&bridge_path, config).expect("bridge bind");

    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .args(["--format", "json", "send"])
        .arg(&app_path)
        .arg("--peer")
        .arg(&bridge_path)
        .args(["--ch1", "info", "--ch3", "audio:5:9"])
        .output()
        .expect("send should run");
    assert!(output.status.success());

    let frame = bridge.recv_notification().expect("bridge should receive");
    assert_eq!(frame.len(), 16);
    assert_eq!(frame[3], 0x60);
    assert_eq!(&frame[8..12], &[0x05, 0x00, 0x09, 0x50]);
    assert_eq!(
        stdout_json(&output)["bytes"],
        "00000060000000000500095000000000"
    );

    // send cleans up its own socket on exit
    assert!(!app_path.exists());
    drop(bridge);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_to_missing_bridge_fails_with_transport_code() {
    let dir = unique_temp_dir("nobridge");
    let output = Command::new(env!("CARGO_BIN_EXE_oidpuck"))
        .arg("send")
        .arg(dir.join("app.sock"))
        .arg("--peer")
        .arg(dir.join("missing.sock"))
        .output()
        .expect("send should run");
    let _ = std::fs::remove_dir_all(&dir);

    assert_eq!(output.status.code(), Some(3));
}
