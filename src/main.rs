//! OSC bridge binary
//!
//! Binds UDP port 8000 for OSC and TCP port 8080 for WebSocket subscribers
//! (override with `OSC_PORT` / `STREAM_PORT`), prints connection
//! instructions, and relays until Ctrl+C.

use osc_bridge::{local_interfaces, BridgeConfig, OscBridge, Result};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("osc_bridge=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("fatal: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = BridgeConfig::from_env();
    let bridge = OscBridge::bind(config).await?;

    print_banner(&bridge)?;

    bridge
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    println!("\nshut down cleanly");
    Ok(())
}

fn print_banner(bridge: &OscBridge) -> Result<()> {
    let osc_port = bridge.osc_addr()?.port();
    let ws_port = bridge.ws_addr()?.port();

    println!("OSC bridge");
    println!("----------------------------------------");
    println!("OSC listening on UDP port {}", osc_port);
    println!("WebSocket server on port {}", ws_port);
    println!();

    println!("Configure your OSC sender:");
    let ips = local_interfaces();
    if let Some((first, rest)) = ips.split_first() {
        if rest.is_empty() {
            println!("  target IP:   {}", first);
        } else {
            let rest: Vec<String> = rest.iter().map(|ip| ip.to_string()).collect();
            println!("  target IP:   {} (or {})", first, rest.join(", "));
        }
    } else {
        println!("  target IP:   <this-computer-ip>");
    }
    println!("  target port: {}", osc_port);
    println!();

    println!("Connect a subscriber to:");
    println!("  ws://localhost:{}", ws_port);
    println!("----------------------------------------");
    println!("waiting for OSC messages...");

    Ok(())
}
