//! Shared utilities for the integration suite.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Behavior of the mock read backend once it has read a request head.
#[derive(Clone)]
pub enum BlobScript {
    /// Emit the chunks as a chunked body, then terminate cleanly.
    Serve(Vec<&'static [u8]>),
    /// Emit the chunks, then drop the connection without the final chunk.
    ServeThenAbort(Vec<&'static [u8]>),
    /// Respond with the given HTTP status and no body.
    Refuse(u16),
}

/// Start a mock bytestream read backend on an ephemeral port.
///
/// Returns the bound address and a log of the request paths it saw.
pub async fn start_mock_backend(script: BlobScript) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let paths = Arc::new(Mutex::new(Vec::new()));
    let seen = paths.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let script = script.clone();
                    let seen = seen.clone();
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }
                        if let Some(path) = request_path(&head) {
                            seen.lock().unwrap().push(path);
                        }

                        match script {
                            BlobScript::Refuse(status) => {
                                let response = format!(
                                    "HTTP/1.1 {status} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                                );
                                let _ = socket.write_all(response.as_bytes()).await;
                                let _ = socket.shutdown().await;
                            }
                            BlobScript::Serve(chunks) => {
                                serve_chunked(&mut socket, &chunks, true).await;
                            }
                            BlobScript::ServeThenAbort(chunks) => {
                                serve_chunked(&mut socket, &chunks, false).await;
                            }
                        }
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, paths)
}

async fn serve_chunked(socket: &mut TcpStream, chunks: &[&'static [u8]], clean_end: bool) {
    let head = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n";
    if socket.write_all(head).await.is_err() {
        return;
    }
    for chunk in chunks {
        let framed = format!("{:X}\r\n", chunk.len());
        if socket.write_all(framed.as_bytes()).await.is_err()
            || socket.write_all(chunk).await.is_err()
            || socket.write_all(b"\r\n").await.is_err()
        {
            return;
        }
        let _ = socket.flush().await;
        // Let each chunk travel separately.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    if clean_end {
        let _ = socket.write_all(b"0\r\n\r\n").await;
        let _ = socket.flush().await;
    }
    let _ = socket.shutdown().await;
}

fn request_path(head: &[u8]) -> Option<String> {
    let head = std::str::from_utf8(head).ok()?;
    let line = head.lines().next()?;
    line.split_whitespace().nth(1).map(str::to_string)
}
