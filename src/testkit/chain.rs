//! Scripted on-chain collaborators: transactions, token and staking contracts.
//!
//! - [`ScriptedTransaction`]: transaction handle whose `wait()` outcome is
//!   fixed up front or resolved later through a [`TransactionControl`].
//! - [`MockToken`]: ERC-20 with settable allowances and scripted approvals.
//! - [`MockStaking`]: staking contract with scripted stakes and timelocks.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::domain::{Address, LevelId, Receipt, Timelock, TxError, TxHash, TxResult, U256};
use crate::port::{StakingContract, TokenContract, Transaction, TransactionHandle};

type Outcome = Option<TxResult<Receipt>>;

/// Deterministic transaction hash for sequence number `n`.
pub fn tx_hash(n: u64) -> TxHash {
    TxHash::from(U256::from(n).to_be_bytes::<32>())
}

/// Receipt of a successfully mined scripted transaction.
pub fn receipt(n: u64) -> Receipt {
    Receipt {
        transaction_hash: tx_hash(n),
        block_number: Some(n),
        gas_used: 21_000,
    }
}

// ---------------------------------------------------------------------------
// ScriptedTransaction
// ---------------------------------------------------------------------------

/// A transaction handle with a scripted `wait()` outcome.
pub struct ScriptedTransaction {
    hash: TxHash,
    gas_price: Option<u128>,
    outcome: Arc<watch::Sender<Outcome>>,
}

impl ScriptedTransaction {
    fn with_outcome(n: u64, outcome: Outcome) -> Self {
        let (tx, _) = watch::channel(outcome);
        Self {
            hash: tx_hash(n),
            gas_price: None,
            outcome: Arc::new(tx),
        }
    }

    /// Mines successfully as soon as it is awaited.
    pub fn confirmed(n: u64) -> Self {
        Self::with_outcome(n, Some(Ok(receipt(n))))
    }

    /// Reverts as soon as it is awaited.
    pub fn reverted(n: u64) -> Self {
        Self::with_outcome(n, Some(Err(TxError::reverted("execution reverted"))))
    }

    /// Stays pending until resolved through the returned control.
    pub fn pending(n: u64) -> (Self, TransactionControl) {
        let transaction = Self::with_outcome(n, None);
        let control = TransactionControl {
            n,
            outcome: Arc::clone(&transaction.outcome),
        };
        (transaction, control)
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = Some(gas_price);
        self
    }

    pub fn into_transaction(self) -> Transaction {
        Transaction::new(self)
    }
}

#[async_trait]
impl TransactionHandle for ScriptedTransaction {
    fn hash(&self) -> TxHash {
        self.hash
    }

    fn gas_price(&self) -> Option<u128> {
        self.gas_price
    }

    async fn wait(&self) -> TxResult<Receipt> {
        let mut rx = self.outcome.subscribe();
        let resolved = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => outcome.clone(),
            Err(_) => None,
        };
        match resolved {
            Some(result) => result,
            None => std::future::pending().await,
        }
    }
}

/// Resolves a [`ScriptedTransaction::pending`] transaction.
#[derive(Clone)]
pub struct TransactionControl {
    n: u64,
    outcome: Arc<watch::Sender<Outcome>>,
}

impl TransactionControl {
    pub fn confirm(&self) {
        self.outcome.send_replace(Some(Ok(receipt(self.n))));
    }

    pub fn fail(&self, error: TxError) {
        self.outcome.send_replace(Some(Err(error)));
    }
}

// ---------------------------------------------------------------------------
// MockToken
// ---------------------------------------------------------------------------

/// ERC-20 token with in-memory allowances and balances.
///
/// Each `approve()` pops the next scripted result; once the script is
/// exhausted approvals succeed with a confirmed transaction.
pub struct MockToken {
    address: Address,
    allowances: Mutex<HashMap<(Address, Address), U256>>,
    balances: Mutex<HashMap<Address, U256>>,
    allowance_failure: Mutex<Option<TxError>>,
    allowance_queries: AtomicUsize,
    approvals: Mutex<VecDeque<TxResult<Transaction>>>,
    approved: Mutex<Vec<(Address, U256)>>,
    wallet_hangs: AtomicBool,
}

impl MockToken {
    pub fn new() -> Self {
        Self::at(Address::repeat_byte(0x70))
    }

    pub fn at(address: Address) -> Self {
        Self {
            address,
            allowances: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
            allowance_failure: Mutex::new(None),
            allowance_queries: AtomicUsize::new(0),
            approvals: Mutex::new(VecDeque::new()),
            approved: Mutex::new(Vec::new()),
            wallet_hangs: AtomicBool::new(false),
        }
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, amount: U256) {
        self.allowances.lock().insert((owner, spender), amount);
    }

    pub fn set_balance(&self, owner: Address, amount: U256) {
        self.balances.lock().insert(owner, amount);
    }

    /// Make allowance queries fail with `error`, or succeed again with `None`.
    pub fn fail_allowance_queries(&self, error: Option<TxError>) {
        *self.allowance_failure.lock() = error;
    }

    pub fn allowance_queries(&self) -> usize {
        self.allowance_queries.load(Ordering::SeqCst)
    }

    /// Queue the result of the next `approve()` call.
    pub fn script_approval(&self, result: TxResult<Transaction>) {
        self.approvals.lock().push_back(result);
    }

    /// While set, `approve()` never returns (the user never answers the wallet).
    pub fn set_wallet_hangs(&self, hangs: bool) {
        self.wallet_hangs.store(hangs, Ordering::SeqCst);
    }

    /// `(spender, amount)` of every approval requested so far.
    pub fn approvals(&self) -> Vec<(Address, U256)> {
        self.approved.lock().clone()
    }
}

impl Default for MockToken {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenContract for MockToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn allowance(&self, owner: Address, spender: Address) -> TxResult<U256> {
        self.allowance_queries.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.allowance_failure.lock().clone() {
            return Err(error);
        }
        Ok(self
            .allowances
            .lock()
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn approve(&self, spender: Address, amount: U256) -> TxResult<Transaction> {
        self.approved.lock().push((spender, amount));
        if self.wallet_hangs.load(Ordering::SeqCst) {
            return std::future::pending().await;
        }
        let scripted = self.approvals.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(ScriptedTransaction::confirmed(1).into_transaction()))
    }

    async fn balance_of(&self, owner: Address) -> TxResult<U256> {
        Ok(self
            .balances
            .lock()
            .get(&owner)
            .copied()
            .unwrap_or(U256::ZERO))
    }
}

// ---------------------------------------------------------------------------
// MockStaking
// ---------------------------------------------------------------------------

/// Staking contract with scripted stake results and in-memory timelocks.
pub struct MockStaking {
    address: Address,
    stakes: Mutex<VecDeque<TxResult<Transaction>>>,
    staked: Mutex<Vec<(U256, Option<LevelId>)>>,
    timelocks: Mutex<HashMap<Address, Vec<Timelock>>>,
    timelock_failure: Mutex<Option<(u64, TxError)>>,
    wallet_hangs: AtomicBool,
}

impl MockStaking {
    pub fn new() -> Self {
        Self::at(Address::repeat_byte(0x5a))
    }

    pub fn at(address: Address) -> Self {
        Self {
            address,
            stakes: Mutex::new(VecDeque::new()),
            staked: Mutex::new(Vec::new()),
            timelocks: Mutex::new(HashMap::new()),
            timelock_failure: Mutex::new(None),
            wallet_hangs: AtomicBool::new(false),
        }
    }

    /// Queue the result of the next `stake()` call.
    pub fn script_stake(&self, result: TxResult<Transaction>) {
        self.stakes.lock().push_back(result);
    }

    pub fn set_wallet_hangs(&self, hangs: bool) {
        self.wallet_hangs.store(hangs, Ordering::SeqCst);
    }

    /// `(amount, level)` of every stake requested so far.
    pub fn stakes(&self) -> Vec<(U256, Option<LevelId>)> {
        self.staked.lock().clone()
    }

    pub fn push_timelock(&self, account: Address, timelock: Timelock) {
        self.timelocks.lock().entry(account).or_default().push(timelock);
    }

    /// Fail reads of timelock `index` (for every account).
    pub fn fail_timelock_at(&self, index: u64, error: TxError) {
        *self.timelock_failure.lock() = Some((index, error));
    }
}

impl Default for MockStaking {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StakingContract for MockStaking {
    fn address(&self) -> Address {
        self.address
    }

    async fn stake(&self, amount: U256, level: Option<LevelId>) -> TxResult<Transaction> {
        self.staked.lock().push((amount, level));
        if self.wallet_hangs.load(Ordering::SeqCst) {
            return std::future::pending().await;
        }
        let scripted = self.stakes.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(ScriptedTransaction::confirmed(2).into_transaction()))
    }

    async fn timelock(&self, account: Address, index: u64) -> TxResult<Option<Timelock>> {
        if let Some((failing, error)) = self.timelock_failure.lock().clone() {
            if failing == index {
                return Err(error);
            }
        }
        let position = usize::try_from(index).unwrap_or(usize::MAX);
        Ok(self
            .timelocks
            .lock()
            .get(&account)
            .and_then(|entries| entries.get(position))
            .copied())
    }
}
