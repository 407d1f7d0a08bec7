//! Demo driver: an in-process chain with funded accounts, the reference
//! treasury contract deployed, and the real console driven by line commands.

use anyhow::{bail, Context, Result};
use clap::Parser;
use cosmwasm_std::Addr;
use std::io::{self, BufRead, Write};
use treasury_console::harness::ChainProvider;
use treasury_console::{Console, NoticeLevel};

#[derive(Parser)]
#[command(name = "treasury-console", about = "Member treasury console demo")]
struct Flags {
    /// Native denomination the treasury holds.
    #[arg(long, default_value = "uclub")]
    denom: String,
    /// Wallet accounts, comma separated. The first one deploys the contract
    /// and becomes owner.
    #[arg(long, value_delimiter = ',', default_value = "alice,bob,carol")]
    accounts: Vec<String>,
    /// Starting balance per account, in base units.
    #[arg(long, default_value_t = 100_000_000)]
    funds: u128,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let flags = Flags::parse();
    let owner = flags
        .accounts
        .first()
        .cloned()
        .context("at least one account is required")?;

    let balances: Vec<(&str, u128)> = flags
        .accounts
        .iter()
        .map(|name| (name.as_str(), flags.funds))
        .collect();
    let mut provider = ChainProvider::new(&flags.denom, &balances);
    let contract = provider.deploy_treasury(&owner);
    let wallet: Vec<&str> = flags.accounts.iter().map(String::as_str).collect();
    provider.set_wallet(&wallet);

    let mut console = Console::new(provider);
    println!("treasury deployed at {contract} (owner: {owner})");
    println!("accounts: {}", flags.accounts.join(", "));
    println!("type `connect {contract}` to begin, `help` for commands");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match dispatch(&mut console, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => println!("usage error: {err}"),
        }
        for notice in console.take_notices() {
            let tag = match notice.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Success => "ok",
                NoticeLevel::Error => "error",
            };
            println!("[{tag}] {}", notice.message);
        }
    }
    Ok(())
}

/// One command per line. Returns false when the session should end.
fn dispatch(console: &mut Console<ChainProvider>, line: &str) -> Result<bool> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(true);
    };
    let rest: Vec<&str> = words.collect();

    match command {
        "help" => print_help(),
        "quit" | "exit" => return Ok(false),
        "connect" => {
            let [address] = rest[..] else {
                bail!("connect <contract-address>");
            };
            console.connect(address);
        }
        "disconnect" => console.disconnect(),
        "dashboard" | "show" => print!("{}", console.render()),
        "refresh" => console.refresh(),
        "deposit" => {
            let [amount] = rest[..] else {
                bail!("deposit <amount>");
            };
            console.deposit(amount);
        }
        "propose" => {
            let [recipient, amount, days, description @ ..] = &rest[..] else {
                bail!("propose <recipient> <amount> <days> <description...>");
            };
            if description.is_empty() {
                bail!("propose <recipient> <amount> <days> <description...>");
            }
            console.create_proposal(&description.join(" "), recipient, amount, days);
        }
        "vote" => {
            let [id, choice] = rest[..] else {
                bail!("vote <proposal-id> <yes|no>");
            };
            let support = match choice {
                "yes" | "for" => true,
                "no" | "against" => false,
                other => bail!("unknown vote {other:?}, expected yes or no"),
            };
            console.vote(id.parse().context("proposal id must be a number")?, support);
        }
        "execute" => {
            let [id] = rest[..] else {
                bail!("execute <proposal-id>");
            };
            console.execute_proposal(id.parse().context("proposal id must be a number")?);
        }
        "add-member" => {
            let [member] = rest[..] else {
                bail!("add-member <address>");
            };
            console.add_member(member);
        }
        "remove-member" => {
            let [member] = rest[..] else {
                bail!("remove-member <address>");
            };
            console.remove_member(member);
        }
        "transfer-ownership" => {
            let [new_owner] = rest[..] else {
                bail!("transfer-ownership <address>");
            };
            console.transfer_ownership(new_owner);
        }
        "account" => {
            // Simulates the wallet switching its active account.
            let [name] = rest[..] else {
                bail!("account <name>");
            };
            console.on_accounts_changed(vec![Addr::unchecked(name)]);
            println!("active account is now {name}");
        }
        "advance" => {
            // Time travel, so deadlines can be crossed without waiting.
            let [days] = rest[..] else {
                bail!("advance <days>");
            };
            let days: u64 = days.parse().context("days must be a number")?;
            console.session_mut().provider_mut().advance_days(days);
            console.refresh();
            println!("advanced {days} day(s)");
        }
        other => println!("unknown command {other:?}, try `help`"),
    }
    Ok(true)
}

fn print_help() {
    println!(
        "\
commands:
  connect <address>                          authorize and bind the contract
  disconnect                                 drop the session
  dashboard                                  render the current projection
  refresh                                    re-pull all remote state
  deposit <amount>                           send funds to the treasury
  propose <recipient> <amount> <days> <description...>
  vote <id> <yes|no>                         cast a vote
  execute <id>                               execute an expired proposal
  add-member <address>                       owner only
  remove-member <address>                    owner only
  transfer-ownership <address>               owner only
  account <name>                             switch the wallet account
  advance <days>                             move chain time forward
  quit"
    );
}
