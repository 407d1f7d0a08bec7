use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

#[cw_serde]
pub struct MemberData {
    pub joined_at: Timestamp,
}

#[cw_serde]
pub struct Proposal {
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

pub const OWNER: Item<Addr> = Item::new("owner");
pub const DENOM: Item<String> = Item::new("denom");
pub const MEMBERS: Map<&Addr, MemberData> = Map::new("members");
pub const MEMBER_COUNT: Item<u64> = Item::new("member_count");
pub const PROPOSALS: Map<u64, Proposal> = Map::new("proposals");
pub const PROPOSAL_COUNT: Item<u64> = Item::new("proposal_count");
pub const VOTES: Map<(u64, &Addr), bool> = Map::new("votes");
