// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// How a stub answers one connection, given the request it received.
#[derive(Clone)]
pub enum Reply {
    /// Write these bytes, then close.
    Full(Vec<u8>),
    /// Write these bytes, then hold the connection open for the duration.
    PartialThenStall(Vec<u8>, Duration),
    /// Close without writing anything.
    Close,
}

pub struct StubServer {
    pub port: u16,
    pub requests: mpsc::UnboundedReceiver<Vec<u8>>,
    handle: JoinHandle<()>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn start_stub<F>(respond: F) -> StubServer
where
    F: Fn(&[u8]) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let request = read_request(&mut socket).await;
            let reply = respond(&request);
            let _ = tx.send(request);
            answer(&mut socket, reply).await;
        }
    });

    StubServer {
        port,
        requests: rx,
        handle,
    }
}

/// A port on 127.0.0.1 with nothing listening.
pub async fn refused_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match tokio::time::timeout(Duration::from_millis(150), socket.read(&mut chunk)).await {
            Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
            Ok(Ok(n)) => request.extend_from_slice(&chunk[..n]),
        }
    }
    request
}

async fn answer(socket: &mut TcpStream, reply: Reply) {
    match reply {
        Reply::Full(bytes) => {
            let _ = socket.write_all(&bytes).await;
            let _ = socket.shutdown().await;
        }
        Reply::PartialThenStall(bytes, stall) => {
            let _ = socket.write_all(&bytes).await;
            let _ = socket.flush().await;
            tokio::time::sleep(stall).await;
        }
        Reply::Close => {
            let _ = socket.shutdown().await;
        }
    }
}

pub fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}
