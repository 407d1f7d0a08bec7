use crate::{error::ContractError, msg::*, state::*};
use cosmwasm_std::{
    coins, to_json_binary, BankMsg, Binary, Deps, DepsMut, Env, Event, MessageInfo, Order, Reply,
    Response, StdError, StdResult, SubMsg, SubMsgResult,
};

pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> StdResult<Response> {
    OWNER.save(deps.storage, &info.sender)?;
    DENOM.save(deps.storage, &msg.denom)?;
    // The instantiator is the first member.
    MEMBERS.save(
        deps.storage,
        &info.sender,
        &MemberData {
            joined_at: env.block.time,
        },
    )?;
    MEMBER_COUNT.save(deps.storage, &1)?;
    PROPOSAL_COUNT.save(deps.storage, &0)?;
    Ok(Response::new())
}

pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    use ExecuteMsg::*;
    match msg {
        Deposit {} => execute::deposit(deps, info),
        AddMember { member } => execute::add_member(deps, env, info, member),
        RemoveMember { member } => execute::remove_member(deps, info, member),
        TransferOwnership { new_owner } => execute::transfer_ownership(deps, info, new_owner),
        CreateProposal {
            description,
            recipient,
            amount,
            duration_days,
        } => execute::create_proposal(deps, env, info, description, recipient, amount, duration_days),
        Vote {
            proposal_id,
            support,
        } => execute::vote(deps, env, info, proposal_id, support),
        ExecuteProposal { proposal_id } => execute::execute_proposal(deps, env, proposal_id),
    }
}

mod execute {
    use super::*;
    use cosmwasm_std::Uint128;

    // Deadlines beyond this are treated as nonsense input.
    const MAX_DURATION_DAYS: u64 = 3650;

    fn ensure_owner(deps: &DepsMut, info: &MessageInfo) -> Result<(), ContractError> {
        if OWNER.load(deps.storage)? != info.sender {
            return Err(ContractError::NotOwner());
        }
        Ok(())
    }

    pub fn deposit(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
        let denom = DENOM.load(deps.storage)?;
        let amount = cw_utils::must_pay(&info, &denom)?;
        let resp = Response::new().add_event(
            Event::new("funds-received")
                .add_attribute("from", info.sender)
                .add_attribute("amount", amount.to_string()),
        );
        Ok(resp)
    }

    pub fn add_member(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        member: String,
    ) -> Result<Response, ContractError> {
        ensure_owner(&deps, &info)?;
        let member_addr = deps
            .api
            .addr_validate(&member)
            .map_err(|_| ContractError::InvalidAddress())?;
        if MEMBERS.has(deps.storage, &member_addr) {
            return Err(ContractError::AlreadyAMember());
        }
        MEMBERS.save(
            deps.storage,
            &member_addr,
            &MemberData {
                joined_at: env.block.time,
            },
        )?;
        MEMBER_COUNT.update(deps.storage, |count| -> Result<u64, ContractError> {
            Ok(count + 1)
        })?;
        Ok(Response::new().add_event(Event::new("member-added").add_attribute("member", member)))
    }

    pub fn remove_member(
        deps: DepsMut,
        info: MessageInfo,
        member: String,
    ) -> Result<Response, ContractError> {
        ensure_owner(&deps, &info)?;
        let member_addr = deps
            .api
            .addr_validate(&member)
            .map_err(|_| ContractError::InvalidAddress())?;
        if !MEMBERS.has(deps.storage, &member_addr) {
            return Err(ContractError::NotAMember());
        }
        MEMBERS.remove(deps.storage, &member_addr);
        MEMBER_COUNT.update(deps.storage, |count| -> Result<u64, ContractError> {
            Ok(count - 1)
        })?;
        Ok(Response::new().add_event(Event::new("member-removed").add_attribute("member", member)))
    }

    pub fn transfer_ownership(
        deps: DepsMut,
        info: MessageInfo,
        new_owner: String,
    ) -> Result<Response, ContractError> {
        ensure_owner(&deps, &info)?;
        let new_owner_addr = deps
            .api
            .addr_validate(&new_owner)
            .map_err(|_| ContractError::InvalidAddress())?;
        OWNER.save(deps.storage, &new_owner_addr)?;
        Ok(Response::new().add_event(
            Event::new("ownership-transferred")
                .add_attribute("previous_owner", info.sender)
                .add_attribute("new_owner", new_owner),
        ))
    }

    pub fn create_proposal(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        description: String,
        recipient: String,
        amount: Uint128,
        duration_days: u64,
    ) -> Result<Response, ContractError> {
        if !MEMBERS.has(deps.storage, &info.sender) {
            return Err(ContractError::NotAMember());
        }
        let recipient = deps
            .api
            .addr_validate(&recipient)
            .map_err(|_| ContractError::InvalidAddress())?;
        if amount.is_zero() {
            return Err(ContractError::InvalidAmount());
        }
        if duration_days == 0 || duration_days > MAX_DURATION_DAYS {
            return Err(ContractError::InvalidDeadline());
        }

        let id = PROPOSAL_COUNT.load(deps.storage)? + 1;
        let proposal = Proposal {
            id,
            description,
            recipient: recipient.clone(),
            amount,
            deadline: env.block.time.plus_seconds(duration_days * 86_400),
            votes_for: 0,
            votes_against: 0,
            executed: false,
            creator: info.sender.clone(),
            created_at: env.block.time,
        };
        PROPOSALS.save(deps.storage, id, &proposal)?;
        PROPOSAL_COUNT.save(deps.storage, &id)?;

        Ok(Response::new().add_event(
            Event::new("proposal-created")
                .add_attribute("proposal_id", id.to_string())
                .add_attribute("creator", info.sender)
                .add_attribute("recipient", recipient)
                .add_attribute("amount", amount.to_string())
                .add_attribute("deadline", proposal.deadline.seconds().to_string()),
        ))
    }

    pub fn vote(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        proposal_id: u64,
        support: bool,
    ) -> Result<Response, ContractError> {
        if !MEMBERS.has(deps.storage, &info.sender) {
            return Err(ContractError::NotAMember());
        }
        let mut proposal = PROPOSALS
            .may_load(deps.storage, proposal_id)?
            .ok_or(ContractError::ProposalDoesNotExist())?;
        if proposal.executed {
            return Err(ContractError::ProposalAlreadyExecuted());
        }
        if env.block.time >= proposal.deadline {
            return Err(ContractError::DeadlinePassed());
        }
        if let Some(previous) = VOTES.may_load(deps.storage, (proposal_id, &info.sender))? {
            return Err(ContractError::AlreadyVoted(previous));
        }

        if support {
            proposal.votes_for += 1;
        } else {
            proposal.votes_against += 1;
        }
        VOTES.save(deps.storage, (proposal_id, &info.sender), &support)?;
        PROPOSALS.save(deps.storage, proposal_id, &proposal)?;

        Ok(Response::new().add_event(
            Event::new("vote-cast")
                .add_attribute("proposal_id", proposal_id.to_string())
                .add_attribute("voter", info.sender)
                .add_attribute("support", support.to_string()),
        ))
    }

    pub fn execute_proposal(
        deps: DepsMut,
        env: Env,
        proposal_id: u64,
    ) -> Result<Response, ContractError> {
        let mut proposal = PROPOSALS
            .may_load(deps.storage, proposal_id)?
            .ok_or(ContractError::ProposalDoesNotExist())?;
        if proposal.executed {
            return Err(ContractError::ProposalAlreadyExecuted());
        }
        if env.block.time < proposal.deadline {
            return Err(ContractError::DeadlineNotPassed());
        }
        if !query::is_accepted(&proposal) {
            return Err(ContractError::ProposalNotAccepted());
        }

        let denom = DENOM.load(deps.storage)?;
        let balance = deps
            .querier
            .query_balance(env.contract.address, &denom)?
            .amount;
        if balance < proposal.amount {
            return Err(ContractError::InsufficientFunds());
        }

        proposal.executed = true;
        PROPOSALS.save(deps.storage, proposal_id, &proposal)?;

        let payout = SubMsg::reply_on_error(
            BankMsg::Send {
                to_address: proposal.recipient.to_string(),
                amount: coins(proposal.amount.u128(), denom),
            },
            PAYOUT_REPLY_ID,
        );
        Ok(Response::new().add_submessage(payout).add_event(
            Event::new("proposal-executed")
                .add_attribute("proposal_id", proposal_id.to_string())
                .add_attribute("recipient", proposal.recipient)
                .add_attribute("amount", proposal.amount.to_string()),
        ))
    }
}

pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    use QueryMsg::*;
    match msg {
        Balance {} => to_json_binary(&query::balance(deps, &env)?),
        Owner {} => to_json_binary(&OwnerResponse {
            owner: OWNER.load(deps.storage)?,
        }),
        Members {} => to_json_binary(&query::members(deps)?),
        MemberCount {} => to_json_binary(&MemberCountResponse {
            count: MEMBER_COUNT.load(deps.storage)?,
        }),
        IsMember { address } => to_json_binary(&query::is_member(deps, &address)?),
        ProposalCount {} => to_json_binary(&ProposalCountResponse {
            count: PROPOSAL_COUNT.load(deps.storage)?,
        }),
        Proposal { proposal_id } => to_json_binary(&PROPOSALS.load(deps.storage, proposal_id)?),
        HasVoted { proposal_id, voter } => {
            to_json_binary(&query::has_voted(deps, proposal_id, &voter)?)
        }
        Accepted { proposal_id } => to_json_binary(&AcceptedResponse {
            accepted: query::is_accepted(&PROPOSALS.load(deps.storage, proposal_id)?),
        }),
    }
}

mod query {
    use super::*;

    pub fn is_accepted(proposal: &Proposal) -> bool {
        proposal.votes_for > proposal.votes_against
    }

    pub fn balance(deps: Deps, env: &Env) -> StdResult<BalanceResponse> {
        let denom = DENOM.load(deps.storage)?;
        let coin = deps
            .querier
            .query_balance(env.contract.address.clone(), &denom)?;
        Ok(BalanceResponse {
            amount: coin.amount,
            denom,
        })
    }

    pub fn members(deps: Deps) -> StdResult<MembersResponse> {
        let members = MEMBERS
            .keys(deps.storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?;
        Ok(MembersResponse { members })
    }

    pub fn is_member(deps: Deps, address: &str) -> StdResult<IsMemberResponse> {
        let addr = deps.api.addr_validate(address)?;
        Ok(IsMemberResponse {
            member: MEMBERS.has(deps.storage, &addr),
        })
    }

    pub fn has_voted(deps: Deps, proposal_id: u64, voter: &str) -> StdResult<HasVotedResponse> {
        let voter = deps.api.addr_validate(voter)?;
        Ok(HasVotedResponse {
            vote: VOTES.may_load(deps.storage, (proposal_id, &voter))?,
        })
    }
}

pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        PAYOUT_REPLY_ID => match msg.result {
            // Only dispatched on error; failing here rolls the execution back.
            SubMsgResult::Err(_) => Err(ContractError::TransferFailed()),
            SubMsgResult::Ok(_) => Ok(Response::new()),
        },
        id => Err(ContractError::from(StdError::generic_err(format!(
            "Unknown reply id: {}",
            id
        )))),
    }
}
