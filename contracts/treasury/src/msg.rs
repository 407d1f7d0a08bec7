use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    pub denom: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    Deposit {},
    AddMember {
        member: String,
    },
    RemoveMember {
        member: String,
    },
    TransferOwnership {
        new_owner: String,
    },
    CreateProposal {
        description: String,
        recipient: String,
        amount: Uint128,
        duration_days: u64,
    },
    Vote {
        proposal_id: u64,
        support: bool,
    },
    ExecuteProposal {
        proposal_id: u64,
    },
}

#[cw_serde]
pub struct BalanceResponse {
    pub amount: Uint128,
    pub denom: String,
}

#[cw_serde]
pub struct OwnerResponse {
    pub owner: Addr,
}

#[cw_serde]
pub struct MembersResponse {
    pub members: Vec<Addr>,
}

#[cw_serde]
pub struct MemberCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct IsMemberResponse {
    pub member: bool,
}

#[cw_serde]
pub struct ProposalCountResponse {
    pub count: u64,
}

pub type ProposalResponse = crate::state::Proposal;

#[cw_serde]
pub struct HasVotedResponse {
    pub vote: Option<bool>,
}

#[cw_serde]
pub struct AcceptedResponse {
    pub accepted: bool,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(BalanceResponse)]
    Balance {},
    #[returns(OwnerResponse)]
    Owner {},
    #[returns(MembersResponse)]
    Members {},
    #[returns(MemberCountResponse)]
    MemberCount {},
    #[returns(IsMemberResponse)]
    IsMember { address: String },
    #[returns(ProposalCountResponse)]
    ProposalCount {},
    #[returns(ProposalResponse)]
    Proposal { proposal_id: u64 },
    #[returns(HasVotedResponse)]
    HasVoted { proposal_id: u64, voter: String },
    #[returns(AcceptedResponse)]
    Accepted { proposal_id: u64 },
}

pub const PAYOUT_REPLY_ID: u64 = 1;
