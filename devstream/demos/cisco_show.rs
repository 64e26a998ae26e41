//! Cisco example: run show commands and push a small config set.
//!
//! Connects to a Cisco-like device over SSH (or Telnet with `--telnet`),
//! enters privileged mode with the enable secret, and runs a few commands.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example cisco_show -- --host 192.168.1.1 --user admin --password secret --secret enable
//! cargo run --example cisco_show -- --host 192.168.1.1 --telnet --secret enable
//! ```

use std::env;
use std::time::Duration;

use devstream::platform::vendors::cisco;
use devstream::{DeviceManager, SshConfig, SshTransport, TelnetConfig, TelnetTransport, Transport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let timeout = Duration::from_secs(args.timeout);

    if args.telnet {
        let config = TelnetConfig::new(&args.host)
            .with_port(args.port.unwrap_or(23))
            .with_timeout(timeout);
        let device = cisco::device_manager(TelnetTransport::new(config), &args.secret)?;
        run(device.with_timeout(timeout)).await?;
    } else {
        let mut config = SshConfig::new(&args.host, &args.user)
            .with_port(args.port.unwrap_or(22))
            .with_timeout(timeout);
        if let Some(password) = &args.password {
            config = config.with_password(password);
        }
        let device = cisco::device_manager(SshTransport::new(config), &args.secret)?;
        run(device.with_timeout(timeout)).await?;
    }

    Ok(())
}

async fn run<T: Transport>(mut device: DeviceManager<T>) -> Result<(), devstream::Error> {
    println!("Connecting to {}...", device.host());
    device.connect().await?;
    println!("Connected!");

    for command in ["show version", "show ip interface brief"] {
        println!("\nExecuting: {command}");
        println!("{}", "-".repeat(50));
        println!("{}", device.send_command(command).await?);
    }

    println!("\nApplying config set");
    println!("{}", "-".repeat(50));
    let output = device
        .send_config_set(["interface Loopback0", "description managed by devstream"])
        .await?;
    println!("{output}");

    println!("\nClosing connection...");
    device.disconnect().await?;
    println!("Done!");
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: Option<u16>,
    user: String,
    password: Option<String>,
    secret: String,
    telnet: bool,
    timeout: u64,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: None,
            user: env::var("USER").unwrap_or_else(|_| "admin".to_string()),
            password: None,
            secret: String::new(),
            telnet: false,
            timeout: 15,
        };

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match args[i].as_str() {
                "--host" | "-h" => parsed.host = value.unwrap_or(parsed.host),
                "--port" | "-p" => parsed.port = value.and_then(|v| v.parse().ok()),
                "--user" | "-u" => parsed.user = value.unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = value,
                "--secret" | "-s" => parsed.secret = value.unwrap_or_default(),
                "--timeout" | "-t" => {
                    parsed.timeout = value.and_then(|v| v.parse().ok()).unwrap_or(15)
                }
                "--telnet" => {
                    parsed.telnet = true;
                    i += 1;
                    continue;
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    i += 1;
                    continue;
                }
            }
            i += 2;
        }

        parsed
    }

    fn print_help() {
        println!(
            r#"devstream cisco_show example

USAGE:
    cargo run --example cisco_show -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target host [default: localhost]
    -p, --port <PORT>        Port [default: 22, or 23 with --telnet]
    -u, --user <USER>        SSH username [default: $USER]
    -P, --password <PASS>    SSH password
    -s, --secret <SECRET>    Enable secret
    -t, --timeout <SECS>     Connect and operation timeout [default: 15]
    --telnet                 Use Telnet instead of SSH
    --help                   Print this help message
"#
        );
    }
}
