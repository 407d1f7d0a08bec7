//! In-process chain provider for tests and the demo driver.
//!
//! `ChainProvider` wraps a `cw-multi-test` `App` holding the reference
//! treasury contract, and plays the wallet role: it exposes a configurable
//! account list and signs by impersonation. Counters on the two remote
//! paths let tests assert that validation failures never reach the chain.

use crate::session::{Provider, TxOutcome};
use anyhow::{bail, Result as AnyResult};
use cosmwasm_std::{
    coins, to_json_vec, Addr, Binary, Coin, ContractResult, CosmosMsg, Empty, Querier,
    QueryRequest, SystemResult, Timestamp, WasmQuery,
};
use cw_multi_test::{App, ContractWrapper, Executor};
use std::cell::Cell;

pub struct ChainProvider {
    app: App,
    denom: String,
    wallet: Vec<Addr>,
    queries: Cell<u64>,
    txs: u64,
}

impl ChainProvider {
    /// A fresh chain with the given accounts funded in the native denom.
    /// The wallet starts empty; `set_wallet` decides what `request_accounts`
    /// exposes.
    pub fn new(denom: &str, balances: &[(&str, u128)]) -> Self {
        let funded: Vec<(Addr, u128)> = balances
            .iter()
            .map(|(name, amount)| (Addr::unchecked(*name), *amount))
            .collect();
        let app = App::new(|router, _, storage| {
            for (addr, amount) in funded {
                router
                    .bank
                    .init_balance(storage, &addr, coins(amount, denom))
                    .unwrap();
            }
        });
        Self {
            app,
            denom: denom.to_string(),
            wallet: Vec::new(),
            queries: Cell::new(0),
            txs: 0,
        }
    }

    pub fn set_wallet(&mut self, accounts: &[&str]) {
        self.wallet = accounts.iter().map(|name| Addr::unchecked(*name)).collect();
    }

    /// Store and instantiate the reference treasury contract; the owner
    /// becomes the first member.
    pub fn deploy_treasury(&mut self, owner: &str) -> Addr {
        let code = ContractWrapper::new(
            treasury::contract::execute,
            treasury::contract::instantiate,
            treasury::contract::query,
        )
        .with_reply(treasury::contract::reply);
        let code_id = self.app.store_code(Box::new(code));
        self.app
            .instantiate_contract(
                code_id,
                Addr::unchecked(owner),
                &treasury::msg::InstantiateMsg {
                    denom: self.denom.clone(),
                },
                &[],
                "treasury",
                None,
            )
            .unwrap()
    }

    pub fn advance_days(&mut self, days: u64) {
        self.app.update_block(|block| {
            block.height += days;
            block.time = block.time.plus_seconds(days * 86_400);
        });
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Smart queries issued so far (bank queries not included).
    pub fn query_count(&self) -> u64 {
        self.queries.get()
    }

    /// Signed transactions submitted so far.
    pub fn tx_count(&self) -> u64 {
        self.txs
    }
}

impl Provider for ChainProvider {
    fn request_accounts(&mut self) -> AnyResult<Vec<Addr>> {
        if self.wallet.is_empty() {
            bail!("wallet has no accounts to expose");
        }
        Ok(self.wallet.clone())
    }

    fn chain_id(&self) -> String {
        self.app.block_info().chain_id
    }

    fn block_time(&self) -> Timestamp {
        self.app.block_info().time
    }

    fn native_denom(&self) -> String {
        self.denom.clone()
    }

    fn bank_balance(&self, address: &Addr, denom: &str) -> AnyResult<Coin> {
        Ok(self.app.wrap().query_balance(address.to_string(), denom)?)
    }

    fn query_wasm(&self, contract: &Addr, msg: Binary) -> AnyResult<Binary> {
        self.queries.set(self.queries.get() + 1);
        let request = to_json_vec(&QueryRequest::<Empty>::Wasm(WasmQuery::Smart {
            contract_addr: contract.to_string(),
            msg,
        }))?;
        match self.app.raw_query(&request) {
            SystemResult::Ok(ContractResult::Ok(value)) => Ok(value),
            SystemResult::Ok(ContractResult::Err(err)) => bail!("contract query failed: {err}"),
            SystemResult::Err(err) => bail!("query dispatch failed: {err}"),
        }
    }

    fn sign_and_send(&mut self, sender: &Addr, msg: CosmosMsg) -> AnyResult<TxOutcome> {
        self.txs += 1;
        let response = self.app.execute(sender.clone(), msg)?;
        Ok(TxOutcome {
            events: response.events,
        })
    }
}
