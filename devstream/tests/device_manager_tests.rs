//! Cisco-like CLI mode navigation over a scripted device.

mod common;

use std::time::Duration;

use common::ScriptedTransport;
use devstream::error::{Error, SessionError};
use devstream::platform::vendors::cisco;
use devstream::SendOptions;

const ENTER_CONFIG: &str = "conf t\nEnter configuration commands, one per line.  End with CNTL/Z.\nR1(config)#";

fn connected_device() -> ScriptedTransport {
    ScriptedTransport::new("r1")
        .expect("\n", &["\r\nR1>\r\nR1>"])
        .expect("terminal length 0\n", &["terminal length 0\r\nR1>"])
}

#[tokio::test]
async fn config_set_walks_up_and_back() {
    let _ = env_logger::builder().is_test(true).try_init();
    let device = connected_device()
        // unprivileged_exec -> privileged_exec
        .expect("\n", &["\r\nR1>"])
        .expect("enable\n", &["enable\r\nPassword: "])
        .expect("s3cret\n", &["\r\nR1#"])
        .expect("\n", &["\r\nR1#"])
        // privileged_exec -> config
        .expect("conf t\n", &[ENTER_CONFIG])
        .expect("\n", &["\r\nR1(config)#"])
        .expect("ip domain-name lab.local\n", &["ip domain-name lab.local\r\nR1(config)#"])
        .expect("no ip http server\n", &["no ip http server\r\nR1(config)#"])
        // config -> privileged_exec
        .expect("exit\n", &["exit\r\nR1#"])
        .expect("\n", &["\r\nR1#"])
        .expect("show clock\n", &["show clock\r\n10:00:00.000 UTC\r\nR1#"]);

    let mut manager = cisco::device_manager(device.clone(), "s3cret").unwrap();
    manager.connect().await.unwrap();

    let output = manager
        .send_config_set(["ip domain-name lab.local", "no ip http server"])
        .await
        .unwrap();
    assert!(output.starts_with("enable\nPassword: "));
    assert!(output.contains(ENTER_CONFIG));
    assert!(output.contains("ip domain-name lab.local\nR1(config)#"));
    assert!(output.ends_with("no ip http server\nR1(config)#exit\nR1#"));
    assert_eq!(manager.layers().cached_mode(), Some(cisco::PRIVILEGED_EXEC));

    // Already in privileged mode: no switching.
    let output = manager.send_command("show clock").await.unwrap();
    assert_eq!(output, "10:00:00.000 UTC");
    assert!(device.is_done());
}

#[tokio::test]
async fn switch_down_to_user_exec_uses_disable() {
    let device = ScriptedTransport::new("r1")
        .expect("\n", &["\r\nR1#\r\nR1#"])
        .expect("terminal length 0\n", &["terminal length 0\r\nR1#"])
        .expect("\n", &["\r\nR1#"])
        .expect("disable\n", &["disable\r\nR1>"])
        .expect("\n", &["\r\nR1>"])
        .expect("show users\n", &["show users\r\n*  1 vty 0     idle\r\nR1>"]);

    let mut manager = cisco::device_manager(device.clone(), "s3cret").unwrap();
    manager.connect().await.unwrap();

    let output = manager
        .switch_to_layer(cisco::UNPRIVILEGED_EXEC)
        .await
        .unwrap();
    assert_eq!(output, "disable\nR1>");
    assert_eq!(manager.layers().cached_mode(), Some(cisco::UNPRIVILEGED_EXEC));

    let output = manager
        .send_commands("show users", cisco::UNPRIVILEGED_EXEC, &SendOptions::default())
        .await
        .unwrap();
    assert_eq!(output, "*  1 vty 0     idle");
    assert!(!device.sent().iter().any(|data| data == "exit\n"));
    assert!(device.is_done());
}

#[tokio::test]
async fn operation_timeout() {
    let device = connected_device()
        .expect("\n", &["\r\nR1>"])
        .expect("enable\n", &["enable\r\nPassword: "])
        // The device never answers the password.
        .expect("s3cret\n", &[]);

    let mut manager = cisco::device_manager(device, "s3cret")
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    manager.connect().await.unwrap();

    let err = manager.send_command("show clock").await.unwrap_err();
    match err {
        Error::Session(SessionError::Timeout { host, timeout }) => {
            assert_eq!(host, "r1");
            assert_eq!(timeout, Duration::from_millis(100));
        }
        other => panic!("unexpected error: {other}"),
    }
}
