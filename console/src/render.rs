use crate::projector::{Dashboard, ProposalCard, ProposalStatus};
use cosmwasm_std::{Addr, Timestamp, Uint128};

/// Base units per display unit of the native denomination (six decimals).
pub const MICRO_UNITS: u128 = 1_000_000;

/// First 6 and last 4 characters joined by an ellipsis. Addresses short
/// enough to show whole are left alone.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        address.to_string()
    } else {
        format!("{}…{}", &address[..6], &address[address.len() - 4..])
    }
}

pub fn format_amount(amount: Uint128, denom: &str) -> String {
    let units = amount.u128();
    format!(
        "{}.{:06} {}",
        units / MICRO_UNITS,
        units % MICRO_UNITS,
        display_denom(denom)
    )
}

fn display_denom(denom: &str) -> String {
    denom.strip_prefix('u').unwrap_or(denom).to_uppercase()
}

pub fn format_timestamp(timestamp: Timestamp) -> String {
    match chrono::DateTime::from_timestamp(timestamp.seconds() as i64, 0) {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => format!("{}s", timestamp.seconds()),
    }
}

fn status_badge(status: ProposalStatus) -> &'static str {
    match status {
        ProposalStatus::Voting => "voting",
        ProposalStatus::Expired => "expired",
        ProposalStatus::Executed => "executed",
    }
}

pub fn render_card(card: &ProposalCard, denom: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "#{} [{}] {}\n",
        card.id,
        status_badge(card.status),
        card.description
    ));
    out.push_str(&format!(
        "  amount:   {} to {}\n",
        format_amount(card.amount, denom),
        short_address(card.recipient.as_str())
    ));
    out.push_str(&format!(
        "  deadline: {}\n",
        format_timestamp(card.deadline)
    ));
    out.push_str(&format!(
        "  votes:    {} for / {} against ({:.1}% in favour)\n",
        card.votes_for, card.votes_against, card.support_pct
    ));
    let actions = if card.can_vote() {
        "vote yes | vote no"
    } else if card.can_execute() {
        "execute"
    } else {
        "none"
    };
    out.push_str(&format!("  actions:  {}\n", actions));
    out
}

pub fn render_dashboard(dashboard: &Dashboard, viewer: Option<&Addr>) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "treasury balance: {}\n",
        format_amount(dashboard.balance.amount, &dashboard.balance.denom)
    ));
    if let Some(balance) = &dashboard.account_balance {
        out.push_str(&format!(
            "wallet balance:   {}\n",
            format_amount(balance.amount, &balance.denom)
        ));
    }
    out.push_str(&format!("members ({}):\n", dashboard.member_count));
    for member in &dashboard.members {
        let marker = match viewer {
            Some(account) if account == member => " (you)",
            _ => "",
        };
        out.push_str(&format!(
            "  {}{}\n",
            short_address(member.as_str()),
            marker
        ));
    }
    if dashboard.proposals.is_empty() {
        out.push_str("no proposals yet\n");
    } else {
        out.push_str(&format!("proposals ({}):\n", dashboard.proposals.len()));
        for card in &dashboard.proposals {
            out.push_str(&render_card(card, &dashboard.balance.denom));
        }
    }
    out
}
