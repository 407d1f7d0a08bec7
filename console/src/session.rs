use crate::binding::TreasuryBinding;
use crate::error::ClientError;
use anyhow::Result as AnyResult;
use cosmwasm_std::{Addr, Binary, Coin, CosmosMsg, Event, Timestamp};
use tracing::info;

/// What the provider reports back once a signed transaction has been
/// confirmed.
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub events: Vec<Event>,
}

/// The wallet-style software mediating account access, view calls, and
/// transaction signing. Failures are opaque at this boundary.
pub trait Provider {
    /// Ask the wallet to expose its accounts, prompting the user for
    /// authorization if needed.
    fn request_accounts(&mut self) -> AnyResult<Vec<Addr>>;
    fn chain_id(&self) -> String;
    fn block_time(&self) -> Timestamp;
    fn native_denom(&self) -> String;
    fn bank_balance(&self, address: &Addr, denom: &str) -> AnyResult<Coin>;
    fn query_wasm(&self, contract: &Addr, msg: Binary) -> AnyResult<Binary>;
    fn sign_and_send(&mut self, sender: &Addr, msg: CosmosMsg) -> AnyResult<TxOutcome>;
}

/// Session context: the provider handle, the active account, and the bound
/// contract. Empty at construction, populated by `connect`, cleared by
/// `disconnect` and by the change notifications.
pub struct Session<P> {
    provider: P,
    account: Option<Addr>,
    binding: Option<TreasuryBinding>,
}

impl<P: Provider> Session<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            account: None,
            binding: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn account(&self) -> Option<&Addr> {
        self.account.as_ref()
    }

    pub fn binding(&self) -> Option<&TreasuryBinding> {
        self.binding.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some() && self.binding.is_some()
    }

    /// Authorize an account and bind the contract address. The first account
    /// the wallet exposes becomes the active one.
    pub fn connect(&mut self, contract_address: &str) -> Result<Addr, ClientError> {
        let accounts = self
            .provider
            .request_accounts()
            .map_err(ClientError::Provider)?;
        let account = accounts.into_iter().next().ok_or(ClientError::NoAccount())?;
        let binding = TreasuryBinding::new(contract_address)?;
        info!(account = %account, contract = %binding.address(), "session connected");
        self.account = Some(account.clone());
        self.binding = Some(binding);
        Ok(account)
    }

    pub fn disconnect(&mut self) {
        if self.account.is_some() {
            info!("session disconnected");
        }
        self.account = None;
        self.binding = None;
    }

    /// Wallet notification: the account list changed. Switch to the new
    /// first account, or drop the session when nothing is left.
    pub fn on_accounts_changed(&mut self, accounts: Vec<Addr>) {
        match accounts.into_iter().next() {
            Some(account) => {
                info!(account = %account, "active account changed");
                self.account = Some(account);
            }
            None => self.disconnect(),
        }
    }

    /// Wallet notification: the chain changed. No session state survives a
    /// network switch; the caller starts over from `connect`.
    pub fn on_chain_changed(&mut self, chain_id: &str) {
        info!(chain_id, "network changed, discarding session");
        self.disconnect();
    }

    /// The account/binding pair every write-path action runs against.
    pub fn active(&self) -> Result<(Addr, TreasuryBinding), ClientError> {
        let account = self.account.clone().ok_or(ClientError::NoAccount())?;
        let binding = self.binding.clone().ok_or(ClientError::NotConnected())?;
        Ok((account, binding))
    }
}
