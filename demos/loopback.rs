//! Client and passive server wired back to back through in-memory
//! transports.
//!
//! Run with `NETWORK_BUS_LOG=trace cargo run --example loopback` to watch
//! dispatch and release decisions.

use std::sync::{Arc, Mutex};

use network_bus::{
    client, server, ClientBus, Delivery, Dto, InMemoryClientTransport, InMemoryServerTransport,
    ServerBus,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Serialize, Deserialize, Dto)]
#[dto(name = "Chat")]
struct Chat {
    from: String,
    text: String,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("NETWORK_BUS_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let server_transport = InMemoryServerTransport::new();
    let mut hub = server::PassiveBus::new(server_transport.clone());

    let mut peers = Vec::new();
    for name in ["alice", "bob"] {
        let transport = InMemoryClientTransport::new();
        let mut bus = client::ActiveBus::new(transport.clone());
        let me = name.to_string();
        bus.meet::<Chat>(Arc::new(move |chat: &Chat| {
            tracing::info!(peer = %me, from = %chat.from, text = %chat.text, "chat received");
        }));
        hub.add_recipient(name);
        peers.push((name, bus, transport));
    }

    hub.meet_signal(
        "Hello",
        Arc::new(|sender: &str| tracing::info!(%sender, "peer said hello")),
    );

    // Handlers can't reach the hub, so relayed lines are collected first.
    let relay = Arc::new(Mutex::new(Vec::new()));
    let inbox = Arc::clone(&relay);
    hub.meet::<Chat>(Arc::new(move |_: &str, chat: &Chat| {
        inbox.lock().unwrap().push(chat.clone());
    }));

    peers[0].1.send_signal("Hello")?;
    peers[0].1.send(&Chat {
        from: "alice".into(),
        text: "hi all".into(),
    })?;
    peers[1].1.send(&Chat {
        from: "bob".into(),
        text: "hey alice".into(),
    })?;

    for (name, _, transport) in &peers {
        for packet in transport.take_sent() {
            hub.receive(name, &packet)?;
        }
    }
    let lines: Vec<Chat> = std::mem::take(&mut *relay.lock().unwrap());
    for chat in &lines {
        hub.send_to_all(chat)?;
    }

    let stats = hub.release()?;
    tracing::info!(sends = stats.sends, packets = stats.packets, "hub released");

    for (name, bus, _) in &peers {
        for delivery in server_transport.deliveries_to(name) {
            let packets = match delivery {
                Delivery::Single { packet, .. } => vec![packet],
                Delivery::Batch { packets, .. } => packets,
            };
            for packet in &packets {
                bus.receive(packet)?;
            }
        }
    }

    Ok(())
}
