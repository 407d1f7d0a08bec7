use cosmwasm_std::StdError;
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    StdError(#[from] StdError),
    #[error("Payment error: {0}")]
    PaymentError(#[from] PaymentError),
    #[error("Only the owner may do this")]
    NotOwner(),
    #[error("Already a member")]
    AlreadyAMember(),
    #[error("Not a member")]
    NotAMember(),
    #[error("Invalid address")]
    InvalidAddress(),
    #[error("Invalid amount")]
    InvalidAmount(),
    #[error("Invalid deadline")]
    InvalidDeadline(),
    #[error("Proposal does not exist")]
    ProposalDoesNotExist(),
    #[error("Proposal has already been executed")]
    ProposalAlreadyExecuted(),
    #[error("Proposal was not accepted")]
    ProposalNotAccepted(),
    #[error("You have already voted {0}")]
    AlreadyVoted(bool),
    #[error("Voting deadline has passed")]
    DeadlinePassed(),
    #[error("Voting deadline has not passed yet")]
    DeadlineNotPassed(),
    #[error("Insufficient funds in the treasury")]
    InsufficientFunds(),
    #[error("Payout transfer failed")]
    TransferFailed(),
}
