//! WebSocket bridge tests against a loopback gateway
//!
//! Run with: cargo test -p integration-tests --test bridge_tests

use futures_util::SinkExt;
use tokio_tungstenite::tungstenite::Message;

use integration_tests::*;
use linkguard_core::entities::ChannelConfig;
use linkguard_core::events::{InboundEvent, OutboundAction};
use linkguard_core::ChannelConfigStore;
use linkguard_gateway::protocol::BridgeMessage;

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();

    let response = reqwest::get(format!("{}/health", server.base_url()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_hello_is_first_frame() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();

    match next_bridge_message(&mut client).await.unwrap() {
        BridgeMessage::Hello(hello) => {
            assert_eq!(hello.bot_channel, BOT);
            assert!(!hello.session_id.is_empty());
        }
        other => panic!("expected hello, got {other:?}"),
    }
}

#[tokio::test]
async fn test_event_to_action_round_trip() {
    let server = TestServer::start().await.unwrap();
    server
        .store
        .upsert(&ChannelConfig::with_defaults("chan"))
        .await
        .unwrap();
    let mut client = server.connect().await.unwrap();
    next_bridge_message(&mut client).await.unwrap();

    send_event(&mut client, InboundEvent::Ready).await.unwrap();
    assert_eq!(next_action(&mut client).await.unwrap(), OutboundAction::join(BOT));

    let message = viewer("chan", "https://spam.com/x");
    let id = id_of(&message).to_string();
    send_event(&mut client, InboundEvent::Message(message))
        .await
        .unwrap();

    assert_eq!(
        next_action(&mut client).await.unwrap(),
        OutboundAction::delete("chan", &id)
    );
    assert_eq!(
        next_action(&mut client).await.unwrap(),
        OutboundAction::send("chan", "@viewer, please ask for permission before posting a link.")
    );
}

#[tokio::test]
async fn test_second_adapter_is_rejected() {
    let server = TestServer::start().await.unwrap();
    let mut first = server.connect().await.unwrap();
    next_bridge_message(&mut first).await.unwrap();

    let mut second = server.connect().await.unwrap();
    match next_message(&mut second).await.unwrap() {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 4005),
        other => panic!("expected close frame, got {other:?}"),
    }

    // The first adapter keeps working
    send_event(&mut first, InboundEvent::Ready).await.unwrap();
    assert_eq!(next_action(&mut first).await.unwrap(), OutboundAction::join(BOT));
}

#[tokio::test]
async fn test_malformed_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();
    next_bridge_message(&mut client).await.unwrap();

    client
        .send(Message::Text("not json".to_string()))
        .await
        .unwrap();
    match next_message(&mut client).await.unwrap() {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 4002),
        other => panic!("expected close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_adapter_can_reconnect() {
    let server = TestServer::start().await.unwrap();
    let mut client = server.connect().await.unwrap();
    next_bridge_message(&mut client).await.unwrap();
    client.close(None).await.unwrap();
    drop(client);

    // The old session may still hold the queue for a moment
    let mut client = loop {
        let mut candidate = server.connect().await.unwrap();
        if let Ok(Message::Text(_)) = next_message(&mut candidate).await {
            break candidate;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    };

    send_event(&mut client, InboundEvent::Ready).await.unwrap();
    assert_eq!(next_action(&mut client).await.unwrap(), OutboundAction::join(BOT));
}
