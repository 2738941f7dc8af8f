use clap::Parser;
use lastmile_admin::config::session_config::{OnStepError, SessionStep};
use lastmile_admin::utils::error::ErrorSeverity;
use lastmile_admin::utils::{logger, validation::Validate};
use lastmile_admin::{Fixtures, InMemoryStore, LocalStorage, SessionReplay, SessionScript};

#[derive(Parser)]
#[command(name = "session-replay")]
#[command(about = "Replay a TOML session script of zone, order and rider operations")]
struct Args {
    /// Path to TOML session script
    #[arg(short, long, default_value = "session.toml")]
    script: String,

    /// JSON fixture file; the built-in Riyadh data set is used when absent
    #[arg(long)]
    fixtures: Option<String>,

    /// Write the resulting data set as JSON fixtures
    #[arg(long)]
    snapshot: Option<String>,

    /// Operator recorded in status logs
    #[arg(long, default_value = "admin-001")]
    actor: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the script's error handling with on_step_error = "continue"
    #[arg(long)]
    keep_going: bool,

    /// Dry run - show the steps without executing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting session replay");
    tracing::info!("📁 Loading session script from: {}", args.script);

    // 載入操作腳本
    let mut script = match SessionScript::from_file(&args.script) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("❌ Failed to load session script '{}': {}", args.script, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if args.keep_going {
        script.error_handling.on_step_error = OnStepError::Continue;
        tracing::info!("🔧 Error handling overridden to: continue");
    }

    // 驗證腳本
    if let Err(e) = script.validate() {
        tracing::error!("❌ Session script validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_script_summary(&script, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No step will be executed");
        perform_dry_run(&script);
        return Ok(());
    }

    let storage = LocalStorage::new(".");
    let fixtures = match &args.fixtures {
        Some(path) => match Fixtures::load(&storage, path).await {
            Ok(fixtures) => fixtures,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 建議: {}", e.recovery_suggestion());
                std::process::exit(3);
            }
        },
        None => Fixtures::builtin(),
    };

    let mut store = InMemoryStore::from_fixtures(fixtures);
    let report = SessionReplay::new(&mut store, args.actor.clone()).run(&script);

    for step in &report.steps {
        let mark = if step.ok { "✅" } else { "❌" };
        println!("{} [{}] {}: {}", mark, step.index, step.action, step.message);
    }
    if let Some(zone_id) = &report.discarded_edit {
        println!("⚠️ Unfinished edit of {} was discarded", zone_id);
    }
    println!(
        "📊 {} ok, {} failed{}",
        report.succeeded(),
        report.failed(),
        if report.aborted { " (aborted)" } else { "" }
    );

    if let Some(path) = &args.snapshot {
        if let Err(e) = store.snapshot().save(&storage, path).await {
            tracing::error!(
                "❌ Snapshot failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
        println!("📁 Snapshot saved to: {}", path);
    }

    if report.aborted {
        std::process::exit(1);
    }

    Ok(())
}

fn display_script_summary(script: &SessionScript, args: &Args) {
    println!("📋 Session Summary:");
    println!("  Session: {}", script.session.name);
    if let Some(description) = &script.session.description {
        println!("  Description: {}", description);
    }
    println!("  Steps: {}", script.steps.len());
    println!("  On step error: {:?}", script.error_handling.on_step_error);
    println!(
        "  Fixtures: {}",
        args.fixtures.as_deref().unwrap_or("built-in (Riyadh)")
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(script: &SessionScript) {
    println!("🔍 Dry Run Analysis:");
    println!();

    let mut editing = false;
    for (index, step) in script.steps.iter().enumerate() {
        let note = match step {
            SessionStep::BeginEdit { .. } if editing => " ⚠️ another edit is already open",
            SessionStep::BeginEdit { .. } => {
                editing = true;
                ""
            }
            SessionStep::MoveVertex { .. }
            | SessionStep::InsertVertex { .. }
            | SessionStep::RemoveVertex { .. }
                if !editing =>
            {
                " ⚠️ no edit is open"
            }
            SessionStep::CommitEdit | SessionStep::CancelEdit => {
                let note = if editing { "" } else { " ⚠️ no edit is open" };
                editing = false;
                note
            }
            _ => "",
        };
        println!("  {:>3}. {}{}", index, step.action(), note);
    }

    if editing {
        println!();
        println!("  ⚠️ The last edit is never committed and will be discarded");
    }
}
