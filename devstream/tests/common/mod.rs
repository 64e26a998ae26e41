//! Scripted transport shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use devstream::Transport;
use devstream::error::{ChannelError, Result};

/// Something the session did to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Sent(String),
    Received(String),
    Disconnect,
}

#[derive(Default)]
struct Script {
    exchanges: VecDeque<(String, Vec<Bytes>)>,
    pending: VecDeque<Bytes>,
    events: Vec<Event>,
    hang_up: bool,
}

/// Transport that answers each expected write with canned chunks.
///
/// Reads with nothing queued never complete, like a silent device.
/// Clones share the same script, so a test can keep one to inspect the
/// event log after the session takes ownership of the other.
#[derive(Clone)]
pub struct ScriptedTransport {
    host: String,
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            script: Arc::default(),
        }
    }

    /// Expect `command` to be written next and answer with `reply` chunks.
    pub fn expect(self, command: &str, reply: &[&str]) -> Self {
        self.script.lock().unwrap().exchanges.push_back((
            command.to_string(),
            reply
                .iter()
                .map(|chunk| Bytes::copy_from_slice(chunk.as_bytes()))
                .collect(),
        ));
        self
    }

    /// Report end of stream once the queued chunks are drained.
    pub fn hang_up(self) -> Self {
        self.script.lock().unwrap().hang_up = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.script.lock().unwrap().events.clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Sent(data) => Some(data),
                _ => None,
            })
            .collect()
    }

    /// Whether every expected write happened.
    pub fn is_done(&self) -> bool {
        self.script.lock().unwrap().exchanges.is_empty()
    }
}

impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<()> {
        self.script.lock().unwrap().events.push(Event::Connect);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.script.lock().unwrap().events.push(Event::Disconnect);
        Ok(())
    }

    async fn send(&mut self, data: &str) -> Result<()> {
        let mut script = self.script.lock().unwrap();
        script.events.push(Event::Sent(data.to_string()));

        let (expected, reply) = script
            .exchanges
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected write {data:?}"));
        assert_eq!(expected, data, "write out of order");
        script.pending.extend(reply);
        Ok(())
    }

    async fn read(&mut self) -> Result<Bytes> {
        let next = {
            let mut script = self.script.lock().unwrap();
            match script.pending.pop_front() {
                Some(chunk) => {
                    let text = String::from_utf8_lossy(&chunk).into_owned();
                    script.events.push(Event::Received(text));
                    Some(Ok(chunk))
                }
                None if script.hang_up => Some(Err(ChannelError::Closed.into())),
                None => None,
            }
        };

        match next {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }

    fn host(&self) -> &str {
        &self.host
    }
}
