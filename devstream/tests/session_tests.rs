//! End-to-end session behavior over a scripted device.

mod common;

use std::time::Duration;

use common::{Event, ScriptedTransport};
use devstream::error::{ChannelError, Error, SessionError};
use devstream::session::PromptPattern;
use devstream::{DeviceStreamBuilder, LastLinePrompt, SendOptions, SessionState};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn commands_are_sent_in_order() {
    init_logging();
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\nR1#\nR1#"])
        .expect("show ip\n", &["show ip\nip routing\nR1#"])
        .expect("show run\n", &["show run\n", "hostname R1\nR1#"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device.clone())
        .delimiter("#")
        .prompt_setter(LastLinePrompt)
        .build()
        .unwrap();

    stream.connect().await.unwrap();
    let output = stream
        .send_commands(["show ip", "show run"], &SendOptions::default())
        .await
        .unwrap();

    assert_eq!(output, "ip routinghostname R1");
    assert!(device.is_done());

    // Every reply is fully read before the next write.
    let events = device.events();
    let second = events
        .iter()
        .position(|e| *e == Event::Sent("show run\n".into()))
        .unwrap();
    assert_eq!(
        events[second - 1],
        Event::Received("show ip\nip routing\nR1#".into())
    );
    assert_eq!(
        &events[second + 1..],
        &[
            Event::Received("show run\n".into()),
            Event::Received("hostname R1\nR1#".into()),
        ]
    );
}

#[tokio::test]
async fn learned_prompt_replaces_delimiter_matching() {
    init_logging();
    let device = ScriptedTransport::new("host")
        .expect("\n", &["host#\nhost#\n"])
        .expect("show clock\n", &["show clock\n12:00 # not a prompt\n", "host#"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device.clone())
        .delimiters(&["#"])
        .prompt_setter(LastLinePrompt)
        .build()
        .unwrap();

    stream.connect().await.unwrap();
    assert_eq!(
        stream.prompt_pattern(),
        &PromptPattern::Learned(r"host\#".into())
    );

    // A bare delimiter in the output no longer ends the read.
    let output = stream.send_command("show clock").await.unwrap();
    assert_eq!(output, "12:00 # not a prompt");
}

#[tokio::test]
async fn extra_pattern_ends_read_early() {
    init_logging();
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\nR1#\nR1#"])
        .expect("reload\n", &["reload\nProceed with reload? [confirm]"])
        .expect("\n", &["\nR1#"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device.clone())
        .delimiter("#")
        .prompt_setter(LastLinePrompt)
        .build()
        .unwrap();
    stream.connect().await.unwrap();

    let options = SendOptions::raw().with_patterns(r"\[confirm\]");
    let output = stream.send_commands("reload", &options).await.unwrap();
    assert_eq!(output, "reload\nProceed with reload? [confirm]");

    let output = stream
        .send_commands("\n", &SendOptions::raw())
        .await
        .unwrap();
    assert_eq!(output, "\nR1#");
    assert!(device.is_done());
}

#[tokio::test]
async fn read_timeout_bounds_a_silent_device() {
    init_logging();
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\nR1#\nR1#"])
        .expect("show tech\n", &["show tech\npartial output"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device)
        .delimiter("#")
        .prompt_setter(LastLinePrompt)
        .read_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    stream.connect().await.unwrap();

    let err = stream.send_command("show tech").await.unwrap_err();
    assert!(matches!(err, Error::Channel(ChannelError::PatternTimeout(_))));
}

#[tokio::test]
async fn end_of_stream_is_an_error() {
    init_logging();
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\nR1#\nR1#"])
        .expect("reload\n", &["reload\nConnection closed"])
        .hang_up();

    let mut stream = DeviceStreamBuilder::new()
        .transport(device)
        .delimiter("#")
        .prompt_setter(LastLinePrompt)
        .build()
        .unwrap();
    stream.connect().await.unwrap();

    let err = stream.send_command("reload").await.unwrap_err();
    assert!(matches!(err, Error::Channel(ChannelError::Closed)));
}

#[tokio::test]
async fn ansi_sequences_are_stripped() {
    init_logging();
    let device = ScriptedTransport::new("box")
        .expect("\n", &["\r\n\x1b[1;32mbox$\x1b[0m\r\n\x1b[1;32mbox$\x1b[0m"])
        .expect("ls\n", &["ls\r\n\x1b[0;34mdir\x1b[0m\r\n\x1b[1;32mbox$\x1b[0m"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device)
        .delimiter("$")
        .prompt_setter(LastLinePrompt)
        .strip_ansi(true)
        .build()
        .unwrap();

    stream.connect().await.unwrap();
    assert_eq!(stream.prompt_pattern().as_str(), r"box\$");

    let output = stream.send_command("ls").await.unwrap();
    assert_eq!(output, "dir");
}

#[tokio::test]
async fn nopage_command_runs_after_prompt_is_learned() {
    init_logging();
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\nR1>\nR1>"])
        .expect("terminal length 0\n", &["terminal length 0\nR1>"]);

    let mut stream = DeviceStreamBuilder::new()
        .transport(device.clone())
        .delimiters(&[">", "#"])
        .nopage_command("terminal length 0")
        .prompt_setter(LastLinePrompt)
        .build()
        .unwrap();

    stream.connect().await.unwrap();
    assert_eq!(stream.state(), SessionState::Ready);
    assert_eq!(device.sent(), vec!["\n", "terminal length 0\n"]);

    stream.disconnect().await.unwrap();
    assert_eq!(device.events().last(), Some(&Event::Disconnect));
    let err = stream.send_command("show clock").await.unwrap_err();
    assert!(matches!(err, Error::Session(SessionError::Closed)));
}
