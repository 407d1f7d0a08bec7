/// Statically known surface of the deployed treasury contract. The contract
/// itself is not part of this crate; these shapes are the interface
/// description every call is encoded against.
pub mod treasury_interface {
    use cosmwasm_schema::{cw_serde, QueryResponses};
    use cosmwasm_std::{Addr, Timestamp, Uint128};

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

    #[cw_serde]
    pub struct ProposalResponse {
        pub id: u64,
        pub description: String,
        pub recipient: Addr,
        pub amount: Uint128,
        pub deadline: Timestamp,
        pub votes_for: u64,
        pub votes_against: u64,
        pub executed: bool,
        pub creator: Addr,
        pub created_at: Timestamp,
    }

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

    /// Event types the contract emits, as they appear in transaction
    /// results.
    pub mod events {
        pub const FUNDS_RECEIVED: &str = "wasm-funds-received";
        pub const MEMBER_ADDED: &str = "wasm-member-added";
        pub const MEMBER_REMOVED: &str = "wasm-member-removed";
        pub const OWNERSHIP_TRANSFERRED: &str = "wasm-ownership-transferred";
        pub const PROPOSAL_CREATED: &str = "wasm-proposal-created";
        pub const PROPOSAL_EXECUTED: &str = "wasm-proposal-executed";
        pub const VOTE_CAST: &str = "wasm-vote-cast";
    }
}
