use crate::error::ClientError;
use crate::interface::treasury_interface as iface;
use crate::session::Provider;
use cosmwasm_std::{from_json, to_json_binary, wasm_execute, Addr, BankMsg, Coin, CosmosMsg, Uint128};
use serde::de::DeserializeOwned;

/// Syntactic plausibility only: lowercase bech32-style characters within
/// sane length bounds. A wrong-but-plausible address is accepted here and
/// fails later at call time.
pub fn plausible_address(input: &str) -> bool {
    (3..=90).contains(&input.len())
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

/// Typed handle to the deployed treasury contract: one method per view
/// call, one message builder per mutating call.
#[derive(Debug, Clone)]
pub struct TreasuryBinding {
    address: Addr,
}

impl TreasuryBinding {
    pub fn new(address: &str) -> Result<Self, ClientError> {
        if !plausible_address(address) {
            return Err(ClientError::MalformedAddress(address.to_string()));
        }
        Ok(Self {
            address: Addr::unchecked(address),
        })
    }

    pub fn address(&self) -> &Addr {
        &self.address
    }

    fn smart<R: DeserializeOwned>(
        &self,
        provider: &impl Provider,
        msg: &iface::QueryMsg,
    ) -> Result<R, ClientError> {
        let request = to_json_binary(msg)?;
        let raw = provider
            .query_wasm(&self.address, request)
            .map_err(ClientError::Remote)?;
        Ok(from_json(&raw)?)
    }

    pub fn balance(&self, provider: &impl Provider) -> Result<iface::BalanceResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::Balance {})
    }

    pub fn owner(&self, provider: &impl Provider) -> Result<iface::OwnerResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::Owner {})
    }

    pub fn members(&self, provider: &impl Provider) -> Result<iface::MembersResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::Members {})
    }

    pub fn member_count(
        &self,
        provider: &impl Provider,
    ) -> Result<iface::MemberCountResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::MemberCount {})
    }

    pub fn is_member(
        &self,
        provider: &impl Provider,
        address: &Addr,
    ) -> Result<iface::IsMemberResponse, ClientError> {
        self.smart(
            provider,
            &iface::QueryMsg::IsMember {
                address: address.to_string(),
            },
        )
    }

    pub fn proposal_count(
        &self,
        provider: &impl Provider,
    ) -> Result<iface::ProposalCountResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::ProposalCount {})
    }

    pub fn proposal(
        &self,
        provider: &impl Provider,
        proposal_id: u64,
    ) -> Result<iface::ProposalResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::Proposal { proposal_id })
    }

    pub fn has_voted(
        &self,
        provider: &impl Provider,
        proposal_id: u64,
        voter: &Addr,
    ) -> Result<iface::HasVotedResponse, ClientError> {
        self.smart(
            provider,
            &iface::QueryMsg::HasVoted {
                proposal_id,
                voter: voter.to_string(),
            },
        )
    }

    pub fn accepted(
        &self,
        provider: &impl Provider,
        proposal_id: u64,
    ) -> Result<iface::AcceptedResponse, ClientError> {
        self.smart(provider, &iface::QueryMsg::Accepted { proposal_id })
    }

    fn execute_msg(&self, msg: &iface::ExecuteMsg) -> Result<CosmosMsg, ClientError> {
        Ok(wasm_execute(self.address.clone(), msg, vec![])?.into())
    }

    /// Deposits are a bare transfer to the treasury address, not a contract
    /// call.
    pub fn deposit_msg(&self, amount: Coin) -> CosmosMsg {
        BankMsg::Send {
            to_address: self.address.to_string(),
            amount: vec![amount],
        }
        .into()
    }

    pub fn create_proposal_msg(
        &self,
        description: &str,
        recipient: &str,
        amount: Uint128,
        duration_days: u64,
    ) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::CreateProposal {
            description: description.to_string(),
            recipient: recipient.to_string(),
            amount,
            duration_days,
        })
    }

    pub fn vote_msg(&self, proposal_id: u64, support: bool) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::Vote {
            proposal_id,
            support,
        })
    }

    pub fn execute_proposal_msg(&self, proposal_id: u64) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::ExecuteProposal { proposal_id })
    }

    pub fn add_member_msg(&self, member: &str) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::AddMember {
            member: member.to_string(),
        })
    }

    pub fn remove_member_msg(&self, member: &str) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::RemoveMember {
            member: member.to_string(),
        })
    }

    pub fn transfer_ownership_msg(&self, new_owner: &str) -> Result<CosmosMsg, ClientError> {
        self.execute_msg(&iface::ExecuteMsg::TransferOwnership {
            new_owner: new_owner.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plausible_address() {
        assert!(plausible_address("contract0"));
        assert!(plausible_address("wasm1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu"));
        assert!(plausible_address("bob"));

        assert!(!plausible_address(""));
        assert!(!plausible_address("ab"));
        assert!(!plausible_address("UPPER"));
        assert!(!plausible_address("has space"));
        assert!(!plausible_address("0xDEADbeef"));
        assert!(!plausible_address(&"a".repeat(91)));
    }

    #[test]
    fn test_binding_rejects_malformed_addresses() {
        let err = TreasuryBinding::new("Not An Address").unwrap_err();
        assert!(matches!(err, ClientError::MalformedAddress(_)));

        let binding = TreasuryBinding::new("contract0").unwrap();
        assert_eq!(binding.address(), &Addr::unchecked("contract0"));
    }

    #[test]
    fn test_deposit_is_a_bank_send() {
        let binding = TreasuryBinding::new("contract0").unwrap();
        let msg = binding.deposit_msg(cosmwasm_std::coin(42, "uclub"));
        match msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, "contract0");
                assert_eq!(amount, cosmwasm_std::coins(42, "uclub"));
            }
            other => panic!("expected a bank send, got {:?}", other),
        }
    }

    #[test]
    fn test_mutating_calls_target_the_bound_contract() {
        let binding = TreasuryBinding::new("contract0").unwrap();
        let msg = binding.vote_msg(3, true).unwrap();
        match msg {
            CosmosMsg::Wasm(cosmwasm_std::WasmMsg::Execute {
                contract_addr,
                msg,
                funds,
            }) => {
                assert_eq!(contract_addr, "contract0");
                assert!(funds.is_empty());
                let decoded: iface::ExecuteMsg = from_json(&msg).unwrap();
                assert_eq!(
                    decoded,
                    iface::ExecuteMsg::Vote {
                        proposal_id: 3,
                        support: true
                    }
                );
            }
            other => panic!("expected a wasm execute, got {:?}", other),
        }
    }
}
