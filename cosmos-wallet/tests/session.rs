//! End-to-end session tests against an in-memory chain

use std::sync::Mutex;

use async_trait::async_trait;
use cosmos_wallet::transaction::{verify_signature, AccountState};
use cosmos_wallet::{BroadcastMode, ClientConfig, Error, Message, Result, RpcClient, Session, SignedTransaction};
use serde_json::{json, Value};

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Chain stand-in that bumps the sequence on every accepted broadcast
#[derive(Default)]
struct InMemoryChain {
    state: Mutex<AccountState>,
    accepted: Mutex<Vec<SignedTransaction>>,
    offline: bool,
}

#[async_trait]
impl RpcClient for InMemoryChain {
    async fn account_state(&self, _address: &str) -> Result<AccountState> {
        if self.offline {
            return Err(Error::NetworkFailure("connection refused".to_string()));
        }
        Ok(*self.state.lock().unwrap())
    }

    async fn broadcast(&self, transaction: &SignedTransaction) -> Result<Value> {
        if self.offline {
            return Err(Error::NetworkFailure("connection refused".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        let sequence = &transaction.tx.signatures[0].sequence;
        if *sequence != state.sequence.to_string() {
            return Ok(json!({ "code": 4, "raw_log": "signature verification failed" }));
        }

        state.sequence += 1;
        self.accepted.lock().unwrap().push(transaction.clone());
        Ok(json!({ "height": "12", "txhash": format!("TX{}", state.sequence) }))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn chain(account_number: u64, sequence: u64) -> InMemoryChain {
    InMemoryChain {
        state: Mutex::new(AccountState { account_number, sequence }),
        ..InMemoryChain::default()
    }
}

#[tokio::test]
async fn test_consecutive_sends_use_fresh_sequences() {
    init_tracing();
    let session = Session::from_mnemonic(ABANDON, ClientConfig::default(), chain(4, 10))
        .unwrap()
        .with_name("alice")
        .with_logging(true);

    let first = session.send("nameservice/SetName", &json!({ "name": "a" }), BroadcastMode::Block).await.unwrap();
    let second = session.send("nameservice/SetName", &json!({ "name": "b" }), BroadcastMode::Block).await.unwrap();

    assert_eq!(first["txhash"], json!("TX11"));
    assert_eq!(second["txhash"], json!("TX12"));

    let accepted = session.client().accepted.lock().unwrap();
    assert_eq!(accepted[0].tx.signatures[0].sequence, "10");
    assert_eq!(accepted[1].tx.signatures[0].sequence, "11");
    assert!(accepted.iter().all(|tx| verify_signature(tx, "vc-core-chain").unwrap()));
}

#[tokio::test]
async fn test_send_multi_shares_one_sequence() {
    let session = Session::from_mnemonic(ABANDON, ClientConfig::default(), chain(1, 0)).unwrap();
    let messages = vec![
        Message::new("nameservice/SetName", json!({ "name": "a" })),
        Message::new("nameservice/BuyName", json!({ "name": "b", "bid": [{ "denom": "stake", "amount": 3 }] })),
    ];

    session.send_multi(&messages, BroadcastMode::Sync).await.unwrap();

    let accepted = session.client().accepted.lock().unwrap();
    assert_eq!(accepted.len(), 1);

    let sent = &accepted[0];
    assert_eq!(sent.mode(), BroadcastMode::Sync);
    assert_eq!(sent.messages().len(), 2);
    assert_eq!(sent.messages()[1]["value"]["bid"][0]["amount"], json!("3"));
    for message in sent.messages() {
        assert_eq!(message["value"]["authorAddress"], json!(session.address().as_str()));
    }
    assert_eq!(session.client().state.lock().unwrap().sequence, 1);
}

#[tokio::test]
async fn test_rejected_broadcast_returns_node_response() {
    let session = Session::from_mnemonic(ABANDON, ClientConfig::default(), chain(1, 0)).unwrap();
    let signed = session
        .sign_messages(
            vec![Message::new("nameservice/SetName", json!({ "name": "a" }))],
            AccountState { account_number: 1, sequence: 7 },
            BroadcastMode::Block,
        )
        .unwrap();

    let response = session.broadcast(&signed, "stale").await.unwrap();
    assert_eq!(response["code"], json!(4));
}

#[tokio::test]
async fn test_network_failure_is_propagated() {
    let offline = InMemoryChain { offline: true, ..InMemoryChain::default() };
    let session = Session::from_mnemonic(ABANDON, ClientConfig::default(), offline).unwrap();

    let result = session.send("nameservice/SetName", &json!({}), BroadcastMode::Block).await;
    assert!(matches!(result, Err(Error::NetworkFailure(_))));
}

#[tokio::test]
async fn test_keystore_restores_the_same_session() {
    let original = Session::random(ClientConfig::default(), chain(0, 0)).unwrap();
    assert_eq!(original.mnemonic().word_count(), 24);

    let file = original.to_keystore_json("hunter2", false).unwrap();
    let restored = Session::from_keystore_json("hunter2", &file, ClientConfig::default(), chain(0, 0)).unwrap();

    assert_eq!(restored.address(), original.address());
    assert_eq!(restored.address_for_index(5).unwrap(), original.address_for_index(5).unwrap());

    assert!(matches!(
        Session::from_keystore_json("wrong", &file, ClientConfig::default(), chain(0, 0)),
        Err(Error::AuthenticationFailure)
    ));
}

#[test]
fn test_keystore_without_mac_is_malformed() {
    let session = Session::from_mnemonic(ABANDON, ClientConfig::default(), chain(0, 0)).unwrap();
    let mut record: Value = serde_json::from_str(&session.to_keystore_json("pw", true).unwrap()).unwrap();
    record.as_object_mut().unwrap().remove("mac");

    let result = Session::from_keystore_json("pw", &record.to_string(), ClientConfig::default(), chain(0, 0));
    assert!(matches!(result, Err(Error::MalformedKeyStoreRecord(_))));
}

#[test]
fn test_entropy_and_phrase_give_the_same_session() {
    let from_phrase = Session::from_mnemonic(ABANDON, ClientConfig::default(), chain(0, 0)).unwrap();
    let from_entropy = Session::from_entropy(&[0u8; 16], ClientConfig::default(), chain(0, 0)).unwrap();

    assert_eq!(from_phrase.address(), from_entropy.address());
    assert_eq!(from_phrase.mnemonic().phrase(), ABANDON);
}

#[test]
fn test_custom_prefix_and_chain_id() {
    let config = ClientConfig::new("http://node:1317", "test-chain").with_bech32_prefix("vc");
    let session = Session::from_mnemonic(ABANDON, config, chain(0, 0)).unwrap();

    assert!(session.address().as_str().starts_with("vc1"));

    let signed = session
        .sign_messages(vec![Message::new("x/Y", json!({}))], AccountState::default(), BroadcastMode::Block)
        .unwrap();
    assert!(verify_signature(&signed, "test-chain").unwrap());
    assert!(!verify_signature(&signed, "vc-core-chain").unwrap());
}
