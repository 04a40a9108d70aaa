//! In-memory provider for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::primitives::{Address, Bytes, B256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use anyhow::{bail, Result};

use crate::infrastructure::ethereum::{EthereumProvider, RawReceipt};

type Responder = Box<dyn Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync>;
type ReceiptFn = Box<dyn Fn(usize) -> RawReceipt + Send + Sync>;

/// Receipt skeleton; the mock fills in the transaction hash
pub(crate) fn receipt_for(status: bool) -> RawReceipt {
    RawReceipt {
        transaction_hash: B256::ZERO,
        block_number: Some(1),
        status,
        gas_used: 21_000,
        contract_address: None,
        logs: Vec::new(),
    }
}

pub(crate) fn account(n: u8) -> Address {
    Address::repeat_byte(n)
}

fn hash_for(index: usize) -> B256 {
    B256::left_padding_from(&(index as u64 + 1).to_be_bytes())
}

#[derive(Default)]
struct MockLog {
    calls: Vec<[u8; 4]>,
    sent: Vec<TransactionRequest>,
    polls: HashMap<B256, usize>,
}

/// Answers `eth_call` by selector and records everything it is sent
pub(crate) struct MockProvider {
    accounts: Vec<Address>,
    listening: bool,
    gas_estimate: u64,
    responders: HashMap<[u8; 4], Responder>,
    receipts: Option<ReceiptFn>,
    pending_polls: usize,
    receipt_error: Option<String>,
    log: Mutex<MockLog>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            accounts: vec![account(0xa0), account(0xa1), account(0xa2)],
            listening: true,
            gas_estimate: 100_000,
            responders: HashMap::new(),
            receipts: None,
            pending_polls: 0,
            receipt_error: None,
            log: Mutex::new(MockLog::default()),
        }
    }

    pub fn with_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn not_listening(mut self) -> Self {
        self.listening = false;
        self
    }

    /// Answer calls of type `C` by decoding them and running `f`
    pub fn on<C, F>(mut self, f: F) -> Self
    where
        C: SolCall + 'static,
        F: Fn(C) -> Vec<u8> + Send + Sync + 'static,
    {
        let responder: Responder = Box::new(move |input| Ok(f(C::abi_decode(input)?)));
        self.responders.insert(C::SELECTOR, responder);
        self
    }

    /// Answer calls of type `C` with a fixed value.
    /// Small integer returns such as `uint8` are passed as a `U256` word.
    pub fn returning<C, V>(self, value: V) -> Self
    where
        C: SolCall + 'static,
        V: SolValue + Send + Sync + 'static,
    {
        self.on::<C, _>(move |_| value.abi_encode())
    }

    /// Mine every sent transaction after `pending_polls` empty polls.
    /// `f` receives the index of the transaction in send order.
    pub fn with_receipts<F>(mut self, f: F, pending_polls: usize) -> Self
    where
        F: Fn(usize) -> RawReceipt + Send + Sync + 'static,
    {
        self.receipts = Some(Box::new(f));
        self.pending_polls = pending_polls;
        self
    }

    pub fn failing_receipts(mut self, message: &str) -> Self {
        self.receipt_error = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<[u8; 4]> {
        self.log.lock().unwrap().calls.clone()
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn receipt_polls(&self, hash: B256) -> usize {
        self.log.lock().unwrap().polls.get(&hash).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl EthereumProvider for MockProvider {
    async fn is_listening(&self) -> Result<bool> {
        Ok(self.listening)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(1)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.accounts.clone())
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        let input = request.input.input().cloned().unwrap_or_default();
        let Some(selector) = input.get(..4).map(|s| [s[0], s[1], s[2], s[3]]) else {
            bail!("call without selector");
        };
        self.log.lock().unwrap().calls.push(selector);
        match self.responders.get(&selector) {
            Some(responder) => Ok(responder(&input[..])?.into()),
            None => bail!("execution reverted: no responder for 0x{}", hex::encode(selector)),
        }
    }

    async fn estimate_gas(&self, _request: TransactionRequest) -> Result<u64> {
        Ok(self.gas_estimate)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256> {
        let mut log = self.log.lock().unwrap();
        log.sent.push(request);
        Ok(hash_for(log.sent.len() - 1))
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<RawReceipt>> {
        let (polls, index) = {
            let mut log = self.log.lock().unwrap();
            let polls = log.polls.entry(hash).or_default();
            *polls += 1;
            let polls = *polls;
            let index = (0..log.sent.len()).find(|i| hash_for(*i) == hash);
            (polls, index)
        };

        if let Some(message) = &self.receipt_error {
            bail!("{message}");
        }
        let (Some(receipts), Some(index)) = (&self.receipts, index) else {
            return Ok(None);
        };
        if polls <= self.pending_polls {
            return Ok(None);
        }
        let mut receipt = receipts(index);
        receipt.transaction_hash = hash;
        Ok(Some(receipt))
    }

    fn endpoint_name(&self) -> String {
        "mock".to_string()
    }
}
