use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::thread::JoinHandle;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_toyhist"))
}

/// run with an isolated config dir so the user's config never leaks in
fn run_in(config_home: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("HOME", config_home)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .env("NO_PROXY", "127.0.0.1,localhost")
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn write_config(config_home: &Path, url: &str) {
    let dir = config_home.join("toyhist");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), format!("[source]\nurl = \"{url}\"\n")).unwrap();
}

fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 {
            if line == "\r\n" { break; }
            line.clear();
        }
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
    });
    (format!("http://{addr}/toyhisto.json"), handle)
}

const TOY_JSON: &str = r#"{
    "bin_edges": [0, 1, 2, 3],
    "sig": [10, 20, 30], "sig_stat": [1, 2, 3],
    "data": [100, 210, 95], "data_stat": [10, 14.5, 9.7],
    "bkg": [92, 188, 71], "bkg_stat": [4, 6, 3]
}"#;

#[test]
fn missing_outfile_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let out = run_in(home.path(), &[]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OUTFILE"));
}

#[test]
fn help_mentions_outfile() {
    let home = tempfile::tempdir().unwrap();
    let out = run_in(home.path(), &["--help"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("OUTFILE"));
}

#[test]
fn extra_positional_rejected() {
    let home = tempfile::tempdir().unwrap();
    let out = run_in(home.path(), &["a.parquet", "b.parquet"]);
    assert!(!out.status.success());
}

#[cfg(target_os = "linux")]
#[test]
fn server_error_exits_nonzero_without_output() {
    let home = tempfile::tempdir().unwrap();
    let (url, server) = serve_once("503 Service Unavailable", String::new());
    write_config(home.path(), &url);
    let target = home.path().join("data.parquet");
    let out = run_in(home.path(), &[target.to_str().unwrap()]);
    server.join().unwrap();
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("network error"), "{stderr}");
    assert!(!target.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn successful_run_writes_file_and_summary() {
    let home = tempfile::tempdir().unwrap();
    let (url, server) = serve_once("200 OK", TOY_JSON.to_string());
    write_config(home.path(), &url);
    let target = home.path().join("data.parquet");
    let out = run_in(home.path(), &[target.to_str().unwrap()]);
    server.join().unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(target.exists());
    let stdout = String::from_utf8_lossy(&out.stdout);
    for name in ["signal", "data", "bkg"] {
        assert!(stdout.contains(name), "{stdout}");
    }
}
