use crate::error::ClientError;
use crate::interface::treasury_interface::events;
use crate::projector::{self, Dashboard};
use crate::render::{self, MICRO_UNITS};
use crate::session::{Provider, Session};
use cosmwasm_std::{coin, Addr, Uint128};
use tracing::warn;

/// Where an action currently stands. Every action path, success or failure,
/// ends back at `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient user-facing notification.
#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// The console controller: session, last projected dashboard, pending
/// notices, and the action phase. All methods are synchronous; a provider
/// call blocks its action until the provider answers.
pub struct Console<P> {
    session: Session<P>,
    dashboard: Option<Dashboard>,
    notices: Vec<Notice>,
    phase: Phase,
}

impl<P: Provider> Console<P> {
    pub fn new(provider: P) -> Self {
        Self {
            session: Session::new(provider),
            dashboard: None,
            notices: Vec::new(),
            phase: Phase::Idle,
        }
    }

    pub fn session(&self) -> &Session<P> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<P> {
        &mut self.session
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Authorize an account, bind the contract, and pull the first
    /// projection.
    pub fn connect(&mut self, contract_address: &str) {
        self.run_action("connect", |console| {
            let account = console.session.connect(contract_address.trim())?;
            console.refresh_projection()?;
            let (_, binding) = console.session.active()?;
            let member = binding
                .is_member(console.session.provider(), &account)?
                .member;
            let role = if member { "member" } else { "not a member" };
            Ok(format!(
                "Connected as {} ({})",
                render::short_address(account.as_str()),
                role
            ))
        });
    }

    pub fn disconnect(&mut self) {
        self.session.disconnect();
        self.dashboard = None;
    }

    /// Wallet notification passthrough: re-synchronize or clear the views.
    pub fn on_accounts_changed(&mut self, accounts: Vec<Addr>) {
        self.session.on_accounts_changed(accounts);
        if self.session.is_connected() {
            self.refresh();
        } else {
            self.dashboard = None;
        }
    }

    /// Wallet notification passthrough: nothing survives a network switch.
    pub fn on_chain_changed(&mut self, chain_id: &str) {
        self.session.on_chain_changed(chain_id);
        self.dashboard = None;
        self.notify(NoticeLevel::Info, "Network changed, session reset");
    }

    /// Deposit funds into the treasury: a bare transfer to the contract
    /// address, not a contract call.
    pub fn deposit(&mut self, amount_input: &str) {
        self.run_action("deposit", |console| {
            let amount = parse_amount(amount_input)?;
            let (account, binding) = console.session.active()?;
            let denom = console.session.provider().native_denom();
            let msg = binding.deposit_msg(coin(amount.u128(), &denom));
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            Ok(format!("Deposited {}", render::format_amount(amount, &denom)))
        });
    }

    pub fn create_proposal(
        &mut self,
        description: &str,
        recipient: &str,
        amount_input: &str,
        duration_input: &str,
    ) {
        self.run_action("create proposal", |console| {
            let description = description.trim();
            let recipient = recipient.trim();
            if description.is_empty() || recipient.is_empty() {
                return Err(ClientError::EmptyField());
            }
            if !crate::binding::plausible_address(recipient) {
                return Err(ClientError::MalformedAddress(recipient.to_string()));
            }
            let amount = parse_amount(amount_input)?;
            let duration_days = parse_days(duration_input)?;
            let (account, binding) = console.session.active()?;
            let msg = binding.create_proposal_msg(description, recipient, amount, duration_days)?;
            let outcome = console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            let id = outcome
                .events
                .iter()
                .find(|event| event.ty == events::PROPOSAL_CREATED)
                .and_then(|event| {
                    event
                        .attributes
                        .iter()
                        .find(|attr| attr.key == "proposal_id")
                })
                .map(|attr| attr.value.clone());
            Ok(match id {
                Some(id) => format!("Proposal #{} created", id),
                None => "Proposal created".to_string(),
            })
        });
    }

    pub fn vote(&mut self, proposal_id: u64, support: bool) {
        self.run_action("vote", |console| {
            let (account, binding) = console.session.active()?;
            let msg = binding.vote_msg(proposal_id, support)?;
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            let direction = if support { "for" } else { "against" };
            Ok(format!("Voted {} proposal #{}", direction, proposal_id))
        });
    }

    pub fn execute_proposal(&mut self, proposal_id: u64) {
        self.run_action("execute", |console| {
            let (account, binding) = console.session.active()?;
            let msg = binding.execute_proposal_msg(proposal_id)?;
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            Ok(format!("Proposal #{} executed", proposal_id))
        });
    }

    pub fn add_member(&mut self, member: &str) {
        self.run_action("add member", |console| {
            let member = member.trim();
            if !crate::binding::plausible_address(member) {
                return Err(ClientError::MalformedAddress(member.to_string()));
            }
            let (account, binding) = console.session.active()?;
            let msg = binding.add_member_msg(member)?;
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            Ok(format!("Added member {}", render::short_address(member)))
        });
    }

    pub fn remove_member(&mut self, member: &str) {
        self.run_action("remove member", |console| {
            let member = member.trim();
            if !crate::binding::plausible_address(member) {
                return Err(ClientError::MalformedAddress(member.to_string()));
            }
            let (account, binding) = console.session.active()?;
            let msg = binding.remove_member_msg(member)?;
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            Ok(format!("Removed member {}", render::short_address(member)))
        });
    }

    pub fn transfer_ownership(&mut self, new_owner: &str) {
        self.run_action("transfer ownership", |console| {
            let new_owner = new_owner.trim();
            if !crate::binding::plausible_address(new_owner) {
                return Err(ClientError::MalformedAddress(new_owner.to_string()));
            }
            let (account, binding) = console.session.active()?;
            let msg = binding.transfer_ownership_msg(new_owner)?;
            console
                .session
                .provider_mut()
                .sign_and_send(&account, msg)
                .map_err(ClientError::Remote)?;
            console.refresh_projection()?;
            Ok(format!(
                "Ownership transferred to {}",
                render::short_address(new_owner)
            ))
        });
    }

    /// Manual re-projection, outside any action.
    pub fn refresh(&mut self) {
        if let Err(err) = self.refresh_projection() {
            warn!(error = %err, "refresh failed");
            self.notify(NoticeLevel::Error, "refresh failed");
        }
        self.phase = Phase::Idle;
    }

    pub fn render(&self) -> String {
        match (&self.dashboard, self.session.account()) {
            (Some(dashboard), account) => render::render_dashboard(dashboard, account),
            (None, _) => "not connected\n".to_string(),
        }
    }

    fn run_action(
        &mut self,
        action: &'static str,
        f: impl FnOnce(&mut Self) -> Result<String, ClientError>,
    ) {
        self.phase = Phase::Submitting;
        match f(self) {
            Ok(message) => self.notify(NoticeLevel::Success, message),
            Err(err) => {
                warn!(action, error = %err, "action failed");
                let message = match err {
                    // Remote causes stay in the log; the notice is generic.
                    ClientError::Remote(_) => format!("{} failed", action),
                    other => other.to_string(),
                };
                self.notify(NoticeLevel::Error, message);
            }
        }
        self.phase = Phase::Idle;
    }

    /// The full read path, run exactly once after every confirmed action.
    fn refresh_projection(&mut self) -> Result<(), ClientError> {
        self.phase = Phase::Refreshing;
        let (account, binding) = self.session.active()?;
        let dashboard = projector::project(self.session.provider(), &binding, Some(&account))?;
        self.dashboard = Some(dashboard);
        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }
}

/// Parse a display-unit decimal amount ("2.5") into base units. Anything
/// non-positive or non-numeric is rejected before a remote call is made.
fn parse_amount(input: &str) -> Result<Uint128, ClientError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClientError::EmptyField());
    }
    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if whole.len() + frac.len() == 0
        || frac.len() > 6
        || !whole.bytes().all(|b| b.is_ascii_digit())
        || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ClientError::InvalidAmount());
    }
    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ClientError::InvalidAmount())?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let parsed: u128 = frac.parse().map_err(|_| ClientError::InvalidAmount())?;
        parsed * 10u128.pow((6 - frac.len()) as u32)
    };
    let total = whole_units
        .checked_mul(MICRO_UNITS)
        .and_then(|units| units.checked_add(frac_units))
        .ok_or(ClientError::InvalidAmount())?;
    if total == 0 {
        return Err(ClientError::InvalidAmount());
    }
    Ok(Uint128::new(total))
}

fn parse_days(input: &str) -> Result<u64, ClientError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClientError::EmptyField());
    }
    let days: u64 = trimmed
        .parse()
        .map_err(|_| ClientError::InvalidDuration())?;
    if days == 0 {
        return Err(ClientError::InvalidDuration());
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::ChainProvider;
    use crate::projector::ProposalStatus;

    const DENOM: &str = "uclub";

    fn connected_console() -> (Console<ChainProvider>, Addr) {
        let mut provider = ChainProvider::new(
            DENOM,
            &[("alice", 10_000_000), ("bob", 10_000_000)],
        );
        let contract = provider.deploy_treasury("alice");
        provider.set_wallet(&["alice"]);
        let mut console = Console::new(provider);
        console.connect(contract.as_str());
        assert!(console.session().is_connected());
        (console, contract)
    }

    fn last_notice(console: &Console<ChainProvider>) -> Notice {
        console.notices().last().cloned().unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1").unwrap(), Uint128::new(1_000_000));
        assert_eq!(parse_amount("2.5").unwrap(), Uint128::new(2_500_000));
        assert_eq!(parse_amount(".5").unwrap(), Uint128::new(500_000));
        assert_eq!(parse_amount("0.000001").unwrap(), Uint128::new(1));
        assert_eq!(parse_amount(" 3 ").unwrap(), Uint128::new(3_000_000));

        assert!(matches!(parse_amount(""), Err(ClientError::EmptyField())));
        assert!(matches!(
            parse_amount("   "),
            Err(ClientError::EmptyField())
        ));
        for bad in ["0", "0.0", "-1", "abc", "1.2.3", "1e6", "0.0000001", "."] {
            assert!(
                matches!(parse_amount(bad), Err(ClientError::InvalidAmount())),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("7").unwrap(), 7);
        assert!(matches!(parse_days(""), Err(ClientError::EmptyField())));
        for bad in ["0", "-1", "week", "1.5"] {
            assert!(
                matches!(parse_days(bad), Err(ClientError::InvalidDuration())),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_connect_reports_membership() {
        let (console, _) = connected_console();
        let notice = last_notice(&console);
        assert_eq!(notice.level, NoticeLevel::Success);
        assert!(notice.message.contains("member"));
        assert!(console.dashboard().is_some());
        assert_eq!(console.phase(), Phase::Idle);
    }

    #[test]
    fn test_connect_failures_leave_the_console_idle() {
        // Wallet with nothing to authorize.
        let provider = ChainProvider::new(DENOM, &[]);
        let mut console = Console::new(provider);
        console.connect("contract0");
        assert_eq!(last_notice(&console).level, NoticeLevel::Error);
        assert!(!console.session().is_connected());
        assert_eq!(console.phase(), Phase::Idle);

        // Malformed contract address: rejected before any call.
        let mut provider = ChainProvider::new(DENOM, &[("alice", 1_000_000)]);
        provider.set_wallet(&["alice"]);
        let mut console = Console::new(provider);
        console.connect("NOT AN ADDRESS");
        assert_eq!(last_notice(&console).level, NoticeLevel::Error);
        assert!(!console.session().is_connected());
        assert_eq!(console.session().provider().query_count(), 0);
    }

    #[test]
    fn test_deposit_validation_issues_no_remote_call() {
        let (mut console, _) = connected_console();
        let baseline = console.session().provider().tx_count();

        for bad in ["", "   ", "0", "0.0", "-5", "abc"] {
            console.deposit(bad);
            assert_eq!(
                console.session().provider().tx_count(),
                baseline,
                "input {:?} reached the provider",
                bad
            );
            assert_eq!(last_notice(&console).level, NoticeLevel::Error);
            assert_eq!(console.phase(), Phase::Idle);
        }
    }

    #[test]
    fn test_proposal_validation_issues_no_remote_call() {
        let (mut console, _) = connected_console();
        let baseline = console.session().provider().tx_count();

        // Syntactically invalid recipients.
        for bad in ["BADADDR", "0xDEADBEEF", "has space", "ab"] {
            console.create_proposal("pay dana", bad, "1", "7");
            assert_eq!(console.session().provider().tx_count(), baseline);
            assert_eq!(last_notice(&console).level, NoticeLevel::Error);
        }
        // Empty fields and bad numbers.
        console.create_proposal("", "dana", "1", "7");
        assert_eq!(console.session().provider().tx_count(), baseline);
        console.create_proposal("pay dana", "dana", "0", "7");
        assert_eq!(console.session().provider().tx_count(), baseline);
        console.create_proposal("pay dana", "dana", "1", "0");
        assert_eq!(console.session().provider().tx_count(), baseline);
    }

    #[test]
    fn test_actions_without_a_session_are_rejected_locally() {
        let provider = ChainProvider::new(DENOM, &[("alice", 1_000_000)]);
        let mut console = Console::new(provider);
        console.deposit("5");
        assert_eq!(console.session().provider().tx_count(), 0);
        assert_eq!(last_notice(&console).level, NoticeLevel::Error);
    }

    #[test]
    fn test_successful_action_refreshes_exactly_once() {
        let (mut console, _) = connected_console();
        let tx_baseline = console.session().provider().tx_count();
        let query_baseline = console.session().provider().query_count();

        console.deposit("2.5");

        // One signed transaction, then one full projection: balance, member
        // count, roster, proposal count (no proposals exist yet).
        assert_eq!(console.session().provider().tx_count() - tx_baseline, 1);
        assert_eq!(
            console.session().provider().query_count() - query_baseline,
            4
        );
        assert_eq!(console.phase(), Phase::Idle);
        assert_eq!(last_notice(&console).level, NoticeLevel::Success);
        assert_eq!(
            console.dashboard().unwrap().balance.amount.u128(),
            2_500_000
        );
    }

    #[test]
    fn test_full_proposal_lifecycle() {
        let (mut console, contract) = connected_console();

        console.add_member("bob");
        assert_eq!(last_notice(&console).level, NoticeLevel::Success);
        console.deposit("5");
        console.create_proposal("fund dana", "dana", "1", "1");
        let notice = last_notice(&console);
        assert_eq!(notice.level, NoticeLevel::Success);
        assert_eq!(notice.message, "Proposal #1 created");

        let card = &console.dashboard().unwrap().proposals[0];
        assert_eq!(card.status, ProposalStatus::Voting);
        assert!(card.can_vote());

        console.vote(1, true);
        assert_eq!(last_notice(&console).message, "Voted for proposal #1");
        let card = &console.dashboard().unwrap().proposals[0];
        assert_eq!(card.votes_for, 1);
        assert!((card.support_pct - 100.0).abs() < f64::EPSILON);

        // Too early to execute: the contract refuses, the console reports a
        // generic failure and returns to idle.
        console.execute_proposal(1);
        let notice = last_notice(&console);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "execute failed");
        assert_eq!(console.phase(), Phase::Idle);

        console.session_mut().provider_mut().advance_days(2);
        console.refresh();
        let card = &console.dashboard().unwrap().proposals[0];
        assert_eq!(card.status, ProposalStatus::Expired);
        assert!(card.can_execute());

        console.execute_proposal(1);
        assert_eq!(last_notice(&console).message, "Proposal #1 executed");
        let dashboard = console.dashboard().unwrap();
        assert_eq!(dashboard.balance.amount.u128(), 4_000_000);
        assert_eq!(dashboard.proposals[0].status, ProposalStatus::Executed);

        // The payout reached the recipient.
        let dana = console
            .session()
            .provider()
            .app()
            .wrap()
            .query_balance("dana", DENOM)
            .unwrap();
        assert_eq!(dana.amount.u128(), 1_000_000);
    }

    #[test]
    fn test_failed_remote_action_surfaces_generic_notice() {
        let (mut console, _) = connected_console();
        console.deposit("5");
        console.create_proposal("fund dana", "dana", "1", "7");
        console.vote(1, true);

        // Second vote violates the write-once rule remotely.
        let tx_baseline = console.session().provider().tx_count();
        console.vote(1, false);
        let notice = last_notice(&console);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, "vote failed");
        assert_eq!(console.phase(), Phase::Idle);
        // The call was issued; the failure came back from the contract.
        assert_eq!(console.session().provider().tx_count() - tx_baseline, 1);

        // The console keeps working afterwards.
        console.deposit("1");
        assert_eq!(last_notice(&console).level, NoticeLevel::Success);
    }

    #[test]
    fn test_account_and_chain_change_notifications() {
        let (mut console, _) = connected_console();
        assert!(console.dashboard().is_some());

        console.on_accounts_changed(vec![]);
        assert!(!console.session().is_connected());
        assert!(console.dashboard().is_none());
        assert_eq!(console.render(), "not connected\n");

        let (mut console, _) = connected_console();
        console.on_chain_changed("somewhere-else");
        assert!(!console.session().is_connected());
        assert!(console.dashboard().is_none());
        assert_eq!(last_notice(&console).level, NoticeLevel::Info);
    }
}
