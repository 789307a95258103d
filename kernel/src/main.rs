use clap::{value_parser, Arg, ArgAction, Command};
use npa_core::{ActorIdentity, ProposalRecord, SignOffParty, UserRole};
use npa_kernel::{
    run_simulator, ActionRequest, InboxProjector, MemoryStore, ProposalStore, SimulatorConfig,
    TransitionLog, WorkItemView, WorkflowAction, WorkflowEngine,
};
use std::sync::Arc;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Command::new("npa-kernel")
        .version("0.1.0")
        .about("NPA sign-off workflow kernel")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("simulate")
                .about("Run the scenario simulator")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of operations to simulate"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("proposals")
                        .long("proposals")
                        .default_value("25")
                        .value_parser(value_parser!(usize))
                        .help("Number of seeded proposals"),
                )
                .arg(
                    Arg::new("stop-on-violation")
                        .long("stop-on-violation")
                        .action(ArgAction::SetTrue)
                        .help("Stop simulation on first invariant violation"),
                ),
        )
        .subcommand(
            Command::new("demo")
                .about("Walk one proposal through submission, a rework loop and final approval"),
        )
        .subcommand(
            Command::new("verify-log")
                .about("Run an end-to-end scenario and verify audit chain integrity"),
        );

    match cli.get_matches().subcommand() {
        Some(("simulate", args)) => {
            let config = SimulatorConfig {
                seed: *args.get_one::<u64>("seed").unwrap(),
                total_operations: *args.get_one::<u64>("operations").unwrap(),
                proposals: *args.get_one::<usize>("proposals").unwrap(),
                stop_on_first_violation: args.get_flag("stop-on-violation"),
                ..Default::default()
            };

            println!("Running workflow simulator...");
            println!("Operations: {}", config.total_operations);
            println!("Seed: {}", config.seed);
            println!();

            let report = run_simulator(config);
            println!("{}", report.generate_text());
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("demo", _)) => {
            if let Err(err) = run_demo() {
                eprintln!("demo failed: {err}");
                std::process::exit(1);
            }
        }
        Some(("verify-log", _)) => {
            let (_, log) = scripted_scenario().unwrap_or_else(|err| {
                eprintln!("scenario failed: {err}");
                std::process::exit(1);
            });
            match log.verify_integrity() {
                Ok(events) => println!("Audit chain VALID ({events} events checked)"),
                Err(err) => {
                    println!("Audit chain INVALID: {err}");
                    std::process::exit(1);
                }
            }
        }
        _ => {}
    }
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let (store, log) = scripted_scenario()?;

    println!("Final proposal states:");
    for record in store.list() {
        println!("  {} [{}] v{}", record.title, record.stage(), record.version());
        for (party, decision) in record.matrix().iter() {
            println!(
                "    {:<20} {:<22} loop-backs: {}",
                party.label(),
                decision.status.to_string(),
                decision.loop_back_count
            );
        }
    }

    println!();
    println!("Audit trail:");
    for event in log.events() {
        println!(
            "  {} {:<30} {:<15} {} -> {}",
            event.timestamp.format("%H:%M:%S%.3f"),
            event.action.to_string(),
            event.actor_role.to_string(),
            event.from_stage,
            event.to_stage
        );
    }
    Ok(())
}

/// Happy path plus one rework loop, returning the populated store and log
fn scripted_scenario(
) -> Result<(Arc<MemoryStore>, Arc<TransitionLog>), Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let log = Arc::new(TransitionLog::new());
    let engine = WorkflowEngine::new(store.clone(), log.clone());

    let maker = ActorIdentity::new("u1", "Sarah Jenkins");
    let record = ProposalRecord::new(
        "FX Put Option GBP/USD - Product Variation",
        "New FX structure for Acme Corp, cross-border booking in London entity",
        maker.clone(),
        vec![SignOffParty::RmgCredit, SignOffParty::LegalCompliance],
    );
    let id = record.id;
    store.insert(record)?;

    let checker = ActorIdentity::new("u2", "Rajiv Kumar");
    let risk = ActorIdentity::new("u3", "David Lee");
    let legal = ActorIdentity::new("u5b", "James Tan");
    let coo = ActorIdentity::new("u7", "Vikramaditya");

    engine.apply(ActionRequest::new(id, UserRole::Maker, maker.clone(), WorkflowAction::Submit))?;
    engine.apply(ActionRequest::new(
        id,
        UserRole::Checker,
        checker,
        WorkflowAction::CheckerApprove,
    ))?;
    engine.apply(ActionRequest::new(
        id,
        UserRole::ApproverRisk,
        risk,
        WorkflowAction::FunctionalApprove,
    ))?;
    engine.apply(
        ActionRequest::new(id, UserRole::ApproverLegal, legal.clone(), WorkflowAction::FunctionalRework)
            .with_comment("Fix clause 3 of the ISDA schedule"),
    )?;
    engine.apply(ActionRequest::new(id, UserRole::Maker, maker, WorkflowAction::Submit))?;
    engine.apply(ActionRequest::new(
        id,
        UserRole::ApproverLegal,
        legal,
        WorkflowAction::FunctionalApprove,
    ))?;
    engine.apply(
        ActionRequest::new(id, UserRole::Coo, coo, WorkflowAction::FinalApprove)
            .with_comment("Cleared for launch"),
    )?;

    let projector = InboxProjector::new(store.clone());
    let remaining = projector.project(UserRole::Coo, "u7", WorkItemView::Inbox);
    tracing::debug!(remaining = remaining.len(), "COO inbox after final approval");

    Ok((store, log))
}
