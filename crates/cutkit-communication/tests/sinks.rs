use cutkit_communication::{ByteSink, FileSink, TcpSink};
use cutkit_core::{ConfigurationError, DeliveryError};
use std::io::Read;
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

const PROGRAM: &str = "IN\nCMD:18,1;\nCMD:35,1,2,0;\nP1;\nU0,0;\nD40,0;\nU0,0;\n@;\n@;";

#[test]
fn test_file_sink_resolves_relative_path() {
    let dir = TempDir::new().unwrap();
    let mut sink = FileSink::new("out/job.hpgl", dir.path()).unwrap();
    assert_eq!(sink.path(), dir.path().join("out/job.hpgl"));

    let receipt = sink.deliver(PROGRAM).unwrap();
    assert_eq!(receipt.bytes_written, PROGRAM.len());
    let written = std::fs::read_to_string(dir.path().join("out/job.hpgl")).unwrap();
    assert_eq!(written, PROGRAM);
}

#[test]
fn test_file_sink_keeps_absolute_path() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("abs.hpgl");
    let sink = FileSink::new(&target, "/somewhere/else").unwrap();
    assert_eq!(sink.path(), target.as_path());
}

#[test]
fn test_file_sink_rejects_empty_path() {
    assert_eq!(
        FileSink::new("", "/tmp").unwrap_err(),
        ConfigurationError::EmptyOutputPath
    );
    assert_eq!(
        FileSink::new("   ", "/tmp").unwrap_err(),
        ConfigurationError::EmptyOutputPath
    );
}

#[test]
fn test_file_sink_write_failure() {
    let dir = TempDir::new().unwrap();
    // a directory cannot be overwritten as a file
    let mut sink = FileSink::new(dir.path(), "/").unwrap();
    assert!(matches!(
        sink.deliver(PROGRAM),
        Err(DeliveryError::Write { .. })
    ));
}

#[test]
fn test_tcp_sink_sends_text_and_newline() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut received = String::new();
        conn.read_to_string(&mut received).unwrap();
        received
    });

    let mut sink = TcpSink::new("127.0.0.1", port, Duration::from_secs(5));
    let receipt = sink.deliver(PROGRAM).unwrap();
    assert_eq!(receipt.bytes_written, PROGRAM.len() + 1);
    assert_eq!(receipt.target, format!("127.0.0.1:{}", port));

    let received = server.join().unwrap();
    assert_eq!(received, format!("{}\n", PROGRAM));
}

#[test]
fn test_tcp_sink_connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut sink = TcpSink::new("127.0.0.1", port, Duration::from_secs(2));
    let err = sink.deliver(PROGRAM).unwrap_err();
    assert!(
        matches!(err, DeliveryError::Connect { .. } | DeliveryError::Timeout { .. }),
        "{err:?}"
    );
}

#[test]
fn test_tcp_sink_write_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (release, hold) = mpsc::channel::<()>();
    let server = thread::spawn(move || {
        // accept but never read, so the socket buffers fill up
        let (conn, _) = listener.accept().unwrap();
        let _ = hold.recv();
        drop(conn);
    });

    // far larger than loopback send and receive buffers combined
    let payload = "D40,0;\n".repeat(8 * 1024 * 1024);
    let mut sink = TcpSink::new("127.0.0.1", port, Duration::from_millis(200));
    let err = sink.deliver(&payload).unwrap_err();
    release.send(()).unwrap();
    server.join().unwrap();

    assert_eq!(
        err,
        DeliveryError::Timeout {
            address: format!("127.0.0.1:{}", port),
            timeout_ms: 200,
        }
    );
}

#[test]
fn test_tcp_sink_unresolvable_host() {
    let mut sink = TcpSink::new("no such host", 8080, Duration::from_secs(1));
    assert!(matches!(
        sink.deliver(PROGRAM),
        Err(DeliveryError::InvalidAddress { .. })
    ));
}
