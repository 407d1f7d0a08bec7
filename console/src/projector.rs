use crate::binding::TreasuryBinding;
use crate::error::ClientError;
use crate::interface::treasury_interface::ProposalResponse;
use crate::session::Provider;
use cosmwasm_std::{Addr, Coin, Timestamp, Uint128};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Not executed, deadline not reached: votes are open.
    Voting,
    /// Not executed, deadline reached: eligible for execution.
    Expired,
    Executed,
}

/// One proposal record plus the fields the views derive from it.
#[derive(Debug, Clone)]
pub struct ProposalCard {
    pub id: u64,
    pub description: String,
    pub recipient: Addr,
    pub amount: Uint128,
    pub deadline: Timestamp,
    pub votes_for: u64,
    pub votes_against: u64,
    pub creator: Addr,
    pub created_at: Timestamp,
    pub status: ProposalStatus,
    /// For-votes over total votes, in percent. Zero when nobody voted.
    pub support_pct: f64,
}

impl ProposalCard {
    pub fn can_vote(&self) -> bool {
        self.status == ProposalStatus::Voting
    }

    pub fn can_execute(&self) -> bool {
        self.status == ProposalStatus::Expired
    }

    fn derive(record: ProposalResponse, now: Timestamp) -> Self {
        let status = if record.executed {
            ProposalStatus::Executed
        } else if now >= record.deadline {
            ProposalStatus::Expired
        } else {
            ProposalStatus::Voting
        };
        let total = record.votes_for + record.votes_against;
        let support_pct = if total == 0 {
            0.0
        } else {
            record.votes_for as f64 * 100.0 / total as f64
        };
        Self {
            id: record.id,
            description: record.description,
            recipient: record.recipient,
            amount: record.amount,
            deadline: record.deadline,
            votes_for: record.votes_for,
            votes_against: record.votes_against,
            creator: record.creator,
            created_at: record.created_at,
            status,
            support_pct,
        }
    }
}

/// Snapshot of everything the console displays.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub balance: Coin,
    pub member_count: u64,
    pub members: Vec<Addr>,
    pub proposals: Vec<ProposalCard>,
    /// Wallet balance of the viewing account, when one is connected.
    pub account_balance: Option<Coin>,
}

/// Pull the full remote state: balance, member count, roster, then every
/// proposal from 1 through the reported count, one call each, in order.
/// Sequential on purpose; proposal counts are assumed small.
pub fn project(
    provider: &impl Provider,
    binding: &TreasuryBinding,
    viewer: Option<&Addr>,
) -> Result<Dashboard, ClientError> {
    let now = provider.block_time();
    let balance = binding.balance(provider)?;
    let member_count = binding.member_count(provider)?.count;
    let members = binding.members(provider)?.members;
    let total = binding.proposal_count(provider)?.count;

    let mut proposals = Vec::with_capacity(total as usize);
    for id in 1..=total {
        let record = binding.proposal(provider, id)?;
        proposals.push(ProposalCard::derive(record, now));
    }

    let account_balance = match viewer {
        Some(account) => Some(
            provider
                .bank_balance(account, &balance.denom)
                .map_err(ClientError::Remote)?,
        ),
        None => None,
    };

    debug!(
        proposals = proposals.len(),
        members = members.len(),
        "projected treasury state"
    );
    Ok(Dashboard {
        balance: Coin {
            denom: balance.denom,
            amount: balance.amount,
        },
        member_count,
        members,
        proposals,
        account_balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::ChainProvider;
    use crate::interface::treasury_interface::events;
    use cosmwasm_std::coin;

    const DENOM: &str = "uclub";

    fn setup() -> (ChainProvider, TreasuryBinding) {
        let mut provider = ChainProvider::new(
            DENOM,
            &[("alice", 10_000_000), ("bob", 10_000_000)],
        );
        let contract = provider.deploy_treasury("alice");
        let binding = TreasuryBinding::new(contract.as_str()).unwrap();
        (provider, binding)
    }

    fn send(provider: &mut ChainProvider, sender: &str, msg: cosmwasm_std::CosmosMsg) {
        provider
            .sign_and_send(&Addr::unchecked(sender), msg)
            .unwrap();
    }

    #[test]
    fn test_projection_reflects_remote_state_in_order() {
        let (mut provider, binding) = setup();
        let alice = Addr::unchecked("alice");

        send(
            &mut provider,
            "alice",
            binding.add_member_msg("bob").unwrap(),
        );
        send(
            &mut provider,
            "alice",
            binding.deposit_msg(coin(5_000_000, DENOM)),
        );
        send(
            &mut provider,
            "alice",
            binding
                .create_proposal_msg("first", "dana", Uint128::new(100), 7)
                .unwrap(),
        );
        send(
            &mut provider,
            "bob",
            binding
                .create_proposal_msg("second", "dana", Uint128::new(200), 3)
                .unwrap(),
        );

        let dashboard = project(&provider, &binding, Some(&alice)).unwrap();
        assert_eq!(dashboard.balance, coin(5_000_000, DENOM));
        assert_eq!(dashboard.member_count, 2);
        assert_eq!(
            dashboard.members,
            vec![Addr::unchecked("alice"), Addr::unchecked("bob")]
        );
        assert_eq!(dashboard.account_balance, Some(coin(5_000_000, DENOM)));

        let ids: Vec<u64> = dashboard.proposals.iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(dashboard.proposals[0].description, "first");
        assert_eq!(dashboard.proposals[1].description, "second");
        assert_eq!(dashboard.proposals[0].creator, Addr::unchecked("alice"));
    }

    #[test]
    fn test_card_actions_follow_deadline_and_execution() {
        let (mut provider, binding) = setup();

        send(
            &mut provider,
            "alice",
            binding.deposit_msg(coin(5_000_000, DENOM)),
        );
        send(
            &mut provider,
            "alice",
            binding
                .create_proposal_msg("pay dana", "dana", Uint128::new(100), 2)
                .unwrap(),
        );
        let outcome = provider
            .sign_and_send(&Addr::unchecked("alice"), binding.vote_msg(1, true).unwrap())
            .unwrap();
        assert!(outcome.events.iter().any(|e| e.ty == events::VOTE_CAST));

        // Open for voting: vote offered, execute not.
        let card = project(&provider, &binding, None).unwrap().proposals[0].clone();
        assert_eq!(card.status, ProposalStatus::Voting);
        assert!(card.can_vote());
        assert!(!card.can_execute());

        // Past the deadline and still unexecuted: execute offered, vote not.
        provider.advance_days(3);
        let card = project(&provider, &binding, None).unwrap().proposals[0].clone();
        assert_eq!(card.status, ProposalStatus::Expired);
        assert!(!card.can_vote());
        assert!(card.can_execute());

        // Executed: neither.
        let outcome = provider
            .sign_and_send(
                &Addr::unchecked("bob"),
                binding.execute_proposal_msg(1).unwrap(),
            )
            .unwrap();
        assert!(outcome
            .events
            .iter()
            .any(|e| e.ty == events::PROPOSAL_EXECUTED));
        let card = project(&provider, &binding, None).unwrap().proposals[0].clone();
        assert_eq!(card.status, ProposalStatus::Executed);
        assert!(!card.can_vote());
        assert!(!card.can_execute());
    }

    #[test]
    fn test_support_percentage_never_divides_by_zero() {
        let (mut provider, binding) = setup();
        send(
            &mut provider,
            "alice",
            binding.add_member_msg("bob").unwrap(),
        );
        send(
            &mut provider,
            "alice",
            binding
                .create_proposal_msg("quiet one", "dana", Uint128::new(100), 7)
                .unwrap(),
        );

        let card = project(&provider, &binding, None).unwrap().proposals[0].clone();
        assert_eq!(card.support_pct, 0.0);
        assert!(card.support_pct.is_finite());

        send(&mut provider, "alice", binding.vote_msg(1, true).unwrap());
        send(&mut provider, "bob", binding.vote_msg(1, false).unwrap());
        let card = project(&provider, &binding, None).unwrap().proposals[0].clone();
        assert!((card.support_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_vote_flags_and_acceptance_views() {
        let (mut provider, binding) = setup();
        let alice = Addr::unchecked("alice");
        send(
            &mut provider,
            "alice",
            binding
                .create_proposal_msg("check views", "dana", Uint128::new(100), 7)
                .unwrap(),
        );

        assert_eq!(binding.has_voted(&provider, 1, &alice).unwrap().vote, None);
        assert!(!binding.accepted(&provider, 1).unwrap().accepted);
        assert!(binding.is_member(&provider, &alice).unwrap().member);
        assert_eq!(binding.owner(&provider).unwrap().owner, alice);

        send(&mut provider, "alice", binding.vote_msg(1, true).unwrap());
        assert_eq!(
            binding.has_voted(&provider, 1, &alice).unwrap().vote,
            Some(true)
        );
        assert!(binding.accepted(&provider, 1).unwrap().accepted);
    }

    #[test]
    fn test_calls_against_a_wrong_address_surface_as_remote_errors() {
        let (provider, _) = setup();
        let binding = TreasuryBinding::new("plausiblebutwrong").unwrap();
        let err = project(&provider, &binding, None).unwrap_err();
        assert!(matches!(err, ClientError::Remote(_)));
    }
}
