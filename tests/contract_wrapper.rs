//! Contract wrapper tests against a recording mock node.

use alloy::consensus::Transaction as _;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;

use nft_console::{ErrorKind, NftError};

mod common;

use common::{connect, decode_call, impatient, test_config, Mining, MockNetwork, CALLER, OTHER};

#[tokio::test]
async fn test_reads_return_values_unchanged() {
    let mock = MockNetwork::new();
    mock.set_read("name", vec![DynSolValue::String("MyNFT".into())]);
    mock.set_read("symbol", vec![DynSolValue::String("NFT".into())]);
    mock.set_read("owner", vec![DynSolValue::Address(CALLER)]);
    mock.set_read("balanceOf", vec![DynSolValue::Uint(U256::from(3), 256)]);
    mock.set_read("ownerOf", vec![DynSolValue::Address(OTHER)]);
    mock.set_read("tokenURI", vec![DynSolValue::String("ipfs://abc".into())]);
    let nft = connect(&mock, &test_config()).await;

    assert_eq!(nft.name().await.unwrap(), "MyNFT");
    assert_eq!(nft.symbol().await.unwrap(), "NFT");
    assert_eq!(nft.owner().await.unwrap(), CALLER);
    assert_eq!(nft.balance_of(&OTHER.to_string()).await.unwrap(), U256::from(3));
    assert_eq!(nft.owner_of("1").await.unwrap(), OTHER);
    assert_eq!(nft.token_uri("1").await.unwrap(), "ipfs://abc");

    assert!(mock.calls().iter().all(|m| *m != "eth_sendRawTransaction"));
}

#[tokio::test]
async fn test_malformed_address_is_input_error() {
    let mock = MockNetwork::new();
    let nft = connect(&mock, &test_config()).await;

    let err = nft.balance_of("0xBAD").await.unwrap_err();
    assert!(matches!(err, NftError::InvalidAddress { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.diagnostic(), "Invalid account address!");
    assert_eq!(mock.position("eth_call"), None);
}

#[tokio::test]
async fn test_nonexistent_token() {
    let mock = MockNetwork::new();
    mock.set_revert("tokenURI", "ERC721: invalid token ID");
    mock.set_revert("ownerOf", "ERC721: invalid token ID");
    let nft = connect(&mock, &test_config()).await;

    let err = nft.token_uri("404").await.unwrap_err();
    assert!(
        matches!(&err, NftError::NonexistentToken { token_id, .. } if *token_id == U256::from(404))
    );
    assert_eq!(err.kind(), ErrorKind::ContractLogic);
    assert_eq!(err.diagnostic(), "Unexistent Token for this ID!");

    let err = nft.owner_of("404").await.unwrap_err();
    assert_eq!(err.diagnostic(), "Unexistent Token for this ID!");

    let err = nft.token_uri("four").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_mint_steps_run_in_order() {
    let mock = MockNetwork::new();
    mock.set_nonce(42);
    mock.set_minted_token_id(7);
    mock.set_mining(Mining::After(2));
    let nft = connect(&mock, &test_config()).await;

    let receipt = nft.mint_nft("ipfs://abc").await.unwrap();

    let nonce = mock.position("eth_getTransactionCount").unwrap();
    let estimate = mock.position("eth_estimateGas").unwrap();
    let broadcast = mock.position("eth_sendRawTransaction").unwrap();
    let receipt_poll = mock.position("eth_getTransactionReceipt").unwrap();
    let lookup = mock.position("eth_getTransactionByHash").unwrap();
    assert!(nonce < estimate);
    assert!(estimate < broadcast);
    assert!(broadcast < receipt_poll);
    assert!(receipt_poll < lookup);

    let polls = mock
        .calls()
        .iter()
        .filter(|m| **m == "eth_getTransactionReceipt")
        .count();
    assert_eq!(polls, 3);

    let sent = mock.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].nonce(), 42);
    assert_eq!(sent[0].chain_id(), Some(common::CHAIN_ID));
    assert_eq!(*sent[0].tx_hash(), receipt.tx_hash);
    assert_eq!(receipt.token_id, Some(U256::from(7)));
}

#[tokio::test]
async fn test_mint_reports_recorded_arguments() {
    let mock = MockNetwork::new();
    let nft = connect(&mock, &test_config()).await;

    let receipt = nft.mint_nft("ipfs://abc").await.unwrap();

    assert_eq!(receipt.recipient(), Some(CALLER));
    assert_eq!(receipt.token_uri(), Some("ipfs://abc"));
    assert_eq!(receipt.arguments.len(), 2);
}

#[tokio::test]
async fn test_mint_without_receipt_wait() {
    let mock = MockNetwork::new();
    let mut config = test_config();
    config.network.wait_for_receipt = false;
    let nft = connect(&mock, &config).await;

    let receipt = nft.mint_nft("ipfs://abc").await.unwrap();

    assert_eq!(receipt.token_id, None);
    assert_eq!(receipt.token_uri(), Some("ipfs://abc"));
    assert_eq!(mock.position("eth_getTransactionReceipt"), None);
}

#[tokio::test]
async fn test_mint_rejects_empty_token_uri() {
    let mock = MockNetwork::new();
    let nft = connect(&mock, &test_config()).await;
    let before = mock.calls().len();

    let err = nft.mint_nft("  ").await.unwrap_err();
    assert!(matches!(err, NftError::EmptyTokenUri));
    assert_eq!(err.diagnostic(), "Set a Token URI first!");
    assert_eq!(mock.calls().len(), before);
}

#[tokio::test]
async fn test_mint_broadcast_failure() {
    let mock = MockNetwork::new();
    mock.fail_broadcast();
    let nft = connect(&mock, &test_config()).await;

    let err = nft.mint_nft("ipfs://abc").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert_eq!(mock.position("eth_getTransactionReceipt"), None);
    assert_eq!(mock.position("eth_getTransactionByHash"), None);
}

#[tokio::test]
async fn test_mint_estimate_revert() {
    let mock = MockNetwork::new();
    mock.set_estimate_revert("Ownable: caller is not the owner");
    let nft = connect(&mock, &test_config()).await;

    let err = nft.mint_nft("ipfs://abc").await.unwrap_err();
    assert!(matches!(err, NftError::Reverted(_)));
    assert!(mock.sent().is_empty());
}

#[tokio::test]
async fn test_mint_times_out() {
    let mock = MockNetwork::new();
    mock.set_mining(Mining::Never);
    let nft = connect(&mock, &impatient(test_config())).await;

    let err = nft.mint_nft("ipfs://abc").await.unwrap_err();
    assert!(matches!(err, NftError::ConfirmationTimeout { .. }));
    assert_eq!(mock.sent().len(), 1);
    assert_eq!(mock.position("eth_getTransactionByHash"), None);
}

#[tokio::test]
async fn test_mint_reverted_receipt() {
    let mock = MockNetwork::new();
    mock.set_mining(Mining::Reverted);
    let nft = connect(&mock, &test_config()).await;

    let err = nft.mint_nft("ipfs://abc").await.unwrap_err();
    assert!(matches!(err, NftError::ReceiptReverted(_)));
    assert_eq!(err.kind(), ErrorKind::ContractLogic);
}

#[tokio::test]
async fn test_mint_without_event() {
    let mock = MockNetwork::new();
    mock.omit_mint_event();
    let nft = connect(&mock, &test_config()).await;

    let err = nft.mint_nft("ipfs://abc").await.unwrap_err();
    assert!(matches!(err, NftError::EventMissing { .. }));
}

#[tokio::test]
async fn test_transfer() {
    let mock = MockNetwork::new();
    let nft = connect(&mock, &test_config()).await;

    let receipt = nft.transfer(&OTHER.to_string(), "5").await.unwrap();
    assert_eq!(receipt.block_number, Some(12));

    let sent = mock.sent();
    let args = decode_call("transferFrom", sent[0].input());
    assert_eq!(
        args,
        vec![
            DynSolValue::Address(CALLER),
            DynSolValue::Address(OTHER),
            DynSolValue::Uint(U256::from(5), 256),
        ]
    );
    assert_eq!(sent[0].value(), U256::ZERO);

    let err = nft.transfer("0xBAD", "5").await.unwrap_err();
    assert_eq!(err.diagnostic(), "Invalid account address!");
    assert_eq!(mock.sent().len(), 1);
}

#[tokio::test]
async fn test_pay_attaches_price() {
    let mock = MockNetwork::new();
    let mut config = test_config();
    config.contract.price_wei = "12345".to_string();
    let nft = connect(&mock, &config).await;

    nft.pay(&OTHER.to_string()).await.unwrap();

    let sent = mock.sent();
    assert_eq!(sent[0].value(), U256::from(12345));
    assert_eq!(
        decode_call("payNft", sent[0].input()),
        vec![DynSolValue::Address(OTHER)]
    );
}
