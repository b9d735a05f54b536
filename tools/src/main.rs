//! hustle-cli: line-oriented runner for the economy engine.
//!
//! Stands in for the chat transport: parses text lines into typed
//! commands, renders typed replies, and drives the engine's poll loop
//! for deferred settlements.
//!
//! Usage:
//!   hustle-cli --db hustle.db --seed 42
//!   hustle-cli --db :memory: --json
//!
//! REPL extras (not engine commands):
//!   su <id> [name]   switch the acting user
//!   sudo             toggle the admin flag on the acting user
//!   help             list commands
//!   exit             quit without shutting the engine down

use anyhow::Result;
use hustle_core::catalog::{AssetClass, Catalog};
use hustle_core::clock::SystemClock;
use hustle_core::command::{Caller, Command, Reply};
use hustle_core::engine::EconomyEngine;
use hustle_core::store::EconStore;
use std::env;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use std::sync::Arc;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let seed = flag_value(&args, "--seed").and_then(|s| s.parse::<u64>().ok());
    let catalog = match flag_value(&args, "--catalog") {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin(),
    };
    let json_mode = args.iter().any(|a| a == "--json");

    let store = if db == ":memory:" {
        EconStore::in_memory()?
    } else {
        EconStore::open(db)?
    };
    store.migrate()?;
    let mut engine = EconomyEngine::new(store, catalog, Arc::new(SystemClock), seed)?;

    println!("hustle-cli — db: {db}, seed: {}", seed.map_or("entropy".into(), |s| s.to_string()));
    println!("type 'help' for commands, 'exit' to quit");

    let mut caller = Caller::new("alice", "Alice");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        deliver(&mut engine, json_mode)?;
        print!("{}> ", caller.id);
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        match words[0].to_ascii_lowercase().as_str() {
            "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "su" => {
                if let Some(id) = words.get(1) {
                    let name = words.get(2).unwrap_or(id);
                    let admin = caller.admin;
                    caller = Caller::new(*id, *name);
                    caller.admin = admin;
                } else {
                    println!("usage: su <id> [name]");
                }
                continue;
            }
            "sudo" => {
                caller.admin = !caller.admin;
                println!("admin: {}", caller.admin);
                continue;
            }
            _ => {}
        }

        let command = match parse(&words) {
            Ok(c) => c,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match engine.handle(&caller, command) {
            Ok(reply) => {
                let done = matches!(reply, Reply::ShutdownComplete { .. });
                render(&reply, json_mode)?;
                if done {
                    drop(engine);
                    log::info!("store closed");
                    return Ok(());
                }
            }
            Err(e) => println!("error: {e}"),
        }

        // Let an in-flight roulette spin land before the next prompt.
        for _ in 0..20 {
            if engine.pending_settlements() == 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
            deliver(&mut engine, json_mode)?;
        }
    }

    Ok(())
}

/// Run one poll pass and print whatever settled.
fn deliver(engine: &mut EconomyEngine, json_mode: bool) -> Result<()> {
    for (user, reply) in engine.poll()? {
        println!("[{user}]");
        render(&reply, json_mode)?;
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse(words: &[&str]) -> Result<Command, String> {
    let arg = |i: usize, what: &str| -> Result<String, String> {
        words
            .get(i)
            .map(|s| s.to_string())
            .ok_or_else(|| format!("missing {what}"))
    };
    let num = |i: usize, what: &str| -> Result<i64, String> {
        arg(i, what)?
            .parse::<i64>()
            .map_err(|_| format!("{what} must be a number"))
    };

    match words[0].to_ascii_lowercase().as_str() {
        "work" => Ok(Command::Work),
        "jobs" => Ok(Command::Jobs),
        "getjob" | "get-job" => Ok(Command::GetJob {
            name: words[1..].join(" "),
        }),
        "quitjob" | "quit-job" => Ok(Command::QuitJob),
        "promote" => Ok(Command::Promote),
        "view" => Ok(Command::View {
            target: words.get(1).map(|s| s.to_string()),
        }),
        "leaderboard" | "lb" => Ok(Command::Leaderboard {
            count: words.get(1).and_then(|s| s.parse().ok()),
        }),
        "give" => Ok(Command::Give {
            to: arg(1, "user")?,
            amount: num(2, "amount")?,
        }),
        "passive" => Ok(Command::Passive),
        "houseshop" | "house-shop" => Ok(Command::HouseShop),
        "businessshop" | "business-shop" => Ok(Command::BusinessShop),
        "illegalbusinessshop" | "illegal-business-shop" => Ok(Command::IllegalBusinessShop),
        "buy" => Ok(Command::BuyAsset {
            class: AssetClass::from_str(&arg(1, "asset class")?)?,
            index: num(2, "index")? as usize,
        }),
        "blackjack" | "bj" => Ok(Command::Blackjack {
            bet: arg(1, "bet")?.parse()?,
        }),
        "hit" => Ok(Command::Hit),
        "stand" => Ok(Command::Stand),
        "coinflip" | "cf" => Ok(Command::Coinflip {
            bet: arg(1, "bet")?.parse()?,
        }),
        "heads" | "tails" => Ok(Command::CallCoin {
            face: words[0].parse()?,
        }),
        "higherorlower" | "hl" => Ok(Command::HigherOrLower {
            bet: arg(1, "bet")?.parse()?,
        }),
        "higher" | "lower" => Ok(Command::Guess {
            guess: words[0].parse()?,
        }),
        "roulette" => Ok(Command::Roulette {
            bet: arg(1, "bet")?.parse()?,
            choice: arg(2, "choice")?.parse()?,
        }),
        "slots" => Ok(Command::Slots {
            bet: num(1, "bet")?,
        }),
        "use" => Ok(Command::Use {
            item: words[1..].join(" "),
        }),
        "loan" => Ok(Command::OfferLoan {
            borrower: arg(1, "user")?,
            amount: num(2, "amount")?,
            interest: arg(3, "interest")?
                .parse::<f64>()
                .map_err(|_| "interest must be a number".to_string())?,
            days: num(4, "days")?,
        }),
        "accept" => Ok(Command::AcceptLoan),
        "decline" => Ok(Command::DeclineLoan),
        "repay" => Ok(Command::Repay {
            loan_id: num(1, "loan id")?,
        }),
        "myloans" | "my-loans" => Ok(Command::MyLoans),
        "mydebts" | "my-debts" => Ok(Command::MyDebts),
        "admingive" | "admin-give" => Ok(Command::AdminGive {
            to: arg(1, "user")?,
            amount: num(2, "amount")?,
        }),
        "adminremove" | "admin-remove" => Ok(Command::AdminRemove {
            from: arg(1, "user")?,
            amount: num(2, "amount")?,
        }),
        "adminremoveasset" | "admin-remove-asset" => Ok(Command::AdminRemoveAsset {
            from: arg(1, "user")?,
            class: AssetClass::from_str(&arg(2, "asset class")?)?,
            index: num(3, "index")? as usize,
        }),
        "shutdown" => Ok(Command::Shutdown),
        other => Err(format!("unknown command '{other}' — try 'help'")),
    }
}

fn render(reply: &Reply, json_mode: bool) -> Result<()> {
    if json_mode {
        println!("{}", serde_json::to_string(reply)?);
        return Ok(());
    }
    match reply {
        Reply::Worked {
            title,
            hours,
            payout,
        } => println!("worked {hours}h as {title}, earned ${payout}"),
        Reply::JobBoard { tiers } => {
            for tier in tiers {
                let ladder: Vec<String> = tier
                    .titles
                    .iter()
                    .zip(&tier.hourly_pay)
                    .map(|(t, p)| format!("{t} (${p}/hr)"))
                    .collect();
                println!("{}", ladder.join(" -> "));
            }
        }
        Reply::JobTaken { title } => println!("you are now a {title}"),
        Reply::JobQuit => println!("you quit your job"),
        Reply::Promoted { title } => println!("promoted to {title}"),
        Reply::PromotionProgress { remaining } => {
            println!("{remaining} more shifts until your promotion")
        }
        Reply::TopRank => println!("you are already at the top of your ladder"),
        Reply::Profile(p) => {
            println!("{} — ${}", p.name, p.balance);
            println!("  job: {} | passive: ${}/hr", p.job_title, p.passive_rate);
            println!("  houses: {}", join_or_none(&p.houses));
            println!("  businesses: {}", join_or_none(&p.businesses));
            println!("  illegal: {}", join_or_none(&p.illegal_businesses));
            let inv: Vec<String> = p
                .inventory
                .iter()
                .map(|i| format!("{} x{}", i.item, i.quantity))
                .collect();
            println!("  inventory: {}", join_or_none(&inv));
        }
        Reply::Leaderboard { entries } => {
            for (i, e) in entries.iter().enumerate() {
                println!("{}. {} — ${}", i + 1, e.name, e.balance);
            }
        }
        Reply::Transferred { to_name, amount } => println!("gave ${amount} to {to_name}"),
        Reply::BalanceAdjusted { user, new_balance } => {
            println!("{user} now has ${new_balance}")
        }
        Reply::Shop { class, entries } => {
            println!("{} shop:", class.label());
            for e in entries {
                let extra = match (&e.hourly_income, &e.produces) {
                    (Some(income), _) => format!(" (${income}/hr)"),
                    (_, Some(drug)) => format!(" (produces {drug})"),
                    _ => String::new(),
                };
                println!("  [{}] {} — ${}{extra}", e.index, e.name, e.price);
            }
        }
        Reply::Bought { name, price, .. } => println!("bought {name} for ${price}"),
        Reply::AssetRemoved { user, name, .. } => println!("removed {name} from {user}"),
        Reply::PassiveCollected {
            hours,
            income,
            drugs,
        } => {
            println!("collected ${income} for {hours}h of passive income");
            if !drugs.is_empty() {
                println!("  also received: {}", drugs.join(", "));
            }
        }
        Reply::ItemUsed { item, .. } => println!("used {item}, effect active"),
        Reply::GameStarted { kind, wager, view } => {
            println!("{} started, ${wager} on the line", kind.label());
            render_view(view);
        }
        Reply::GameProgress { view } => render_view(view),
        Reply::Spinning {
            wager, choice, ..
        } => println!("roulette spinning — ${wager} on {choice}..."),
        Reply::Settled {
            kind,
            wager,
            settlement,
            balance,
        } => {
            use hustle_core::games::Outcome;
            let verdict = match settlement.outcome {
                Outcome::Win => format!("won ${}", settlement.payout),
                Outcome::Loss => format!("lost ${wager}"),
                Outcome::Push => format!("push, ${wager} returned"),
            };
            println!("{}: {verdict} — balance ${balance}", kind.label());
            render_detail(&settlement.detail);
        }
        Reply::LoanOffered {
            borrower_name,
            amount,
            interest,
            days,
        } => println!("offered {borrower_name} ${amount} at {interest}% due in {days} days"),
        Reply::LoanAccepted {
            loan_id,
            lender_name,
            amount,
        } => println!("loan #{loan_id} accepted: ${amount} from {lender_name}"),
        Reply::LoanDeclined { lender_name } => {
            println!("declined the loan offer from {lender_name}")
        }
        Reply::LoanRepaid {
            loan_id,
            total,
            lender_name,
        } => println!("loan #{loan_id} repaid: ${total} to {lender_name}"),
        Reply::Loans { loans, .. } => {
            if loans.is_empty() {
                println!("none");
            }
            for l in loans {
                let due = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(l.due_ms)
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| l.due_ms.to_string());
                println!(
                    "#{} {} -> {} | ${} at {}% | due {} | {}",
                    l.id,
                    l.lender_name,
                    l.borrower_name,
                    l.principal,
                    l.interest,
                    due,
                    if l.paid { "paid" } else { "open" }
                );
            }
        }
        Reply::ShutdownComplete {
            cancelled_settlements,
        } => println!("shutting down ({cancelled_settlements} pending settlements cancelled)"),
    }
    Ok(())
}

fn render_view(view: &hustle_core::command::GameView) {
    use hustle_core::command::GameView;
    match view {
        GameView::Blackjack { player, dealer } => {
            println!("  your total: {player} | dealer shows: {dealer} (hit/stand)")
        }
        GameView::Coinflip { .. } => println!("  call it: heads or tails"),
        GameView::HigherLower { reference, .. } => {
            println!("  first number: {reference} (higher/lower)")
        }
    }
}

fn render_detail(detail: &hustle_core::games::SettlementDetail) {
    use hustle_core::games::SettlementDetail;
    match detail {
        SettlementDetail::Blackjack { player, dealer } => {
            println!("  you: {player} | dealer: {dealer}")
        }
        SettlementDetail::Coinflip { landed } => println!("  the coin landed {}", landed.label()),
        SettlementDetail::HigherLower { reference, drawn } => {
            println!("  numbers: {reference} then {drawn}")
        }
        SettlementDetail::Roulette { number } => println!("  the ball landed on {number}"),
        SettlementDetail::Slots { reels } => println!("  {}", reels.join(" | ")),
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn print_help() {
    println!(
        "jobs: work | jobs | getjob <name> | quitjob | promote
economy: view [id] | leaderboard [n] | give <id> <amt> | passive
shops: houseshop | businessshop | illegalbusinessshop | buy <class> <idx>
casino: blackjack <bet|all> (hit/stand) | coinflip <bet|all> (heads/tails)
        hl <bet|all> (higher/lower) | roulette <bet|all> <choice> | slots <bet>
items: use <item>
loans: loan <id> <amt> <interest%> <days> | accept | decline | repay <id> | myloans | mydebts
admin: admingive | adminremove | adminremoveasset | shutdown
repl: su <id> [name] | sudo | help | exit"
    );
}
