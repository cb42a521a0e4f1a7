use std::time::Duration;

use anyhow::{bail, Result};
use clap::Subcommand;
use comfy_table::Cell;
use tokio::time::MissedTickBehavior;

use hivemon_client::editor::RuleDraft;
use hivemon_client::registry::{AlertRegistry, DEFAULT_REFRESH_INTERVAL};
use hivemon_client::ApiClient;
use hivemon_common::codec;
use hivemon_common::rule::{AlertRecord, HiveRecord};

use super::{editor, helpers};
use crate::output::{
    build_table, confirm, print_error, print_json, print_success, spinner, status_cell, theme,
    OutputMode,
};

#[derive(Subcommand)]
pub enum AlertsCmd {
    List,
    Get(GetArgs),
    Create(CreateArgs),
    Edit(EditArgs),
    Delete(DeleteArgs),
    Reset(ResetArgs),
    Watch(WatchArgs),
}

#[derive(clap::Args)]
pub struct GetArgs {
    #[arg(help = "Alert rule ID")]
    id: String,
}

#[derive(clap::Args)]
pub struct CreateArgs {
    #[arg(long, help = "Rule name")]
    name: Option<String>,

    #[arg(long, help = "Owning hive ID")]
    hive: Option<String>,

    #[arg(
        long = "condition",
        help = "Condition like 'temperature>38' (repeat up to 4 times)"
    )]
    conditions: Vec<String>,

    #[arg(short, long, help = "Prompt for fields interactively")]
    interactive: bool,
}

#[derive(clap::Args)]
pub struct EditArgs {
    #[arg(help = "Alert rule ID")]
    id: String,

    #[arg(long, help = "New rule name")]
    name: Option<String>,

    #[arg(
        long = "condition",
        help = "Replacement condition (repeat up to 4 times)"
    )]
    conditions: Vec<String>,

    #[arg(short, long, help = "Prompt for fields interactively")]
    interactive: bool,
}

#[derive(clap::Args)]
pub struct DeleteArgs {
    #[arg(help = "Alert rule ID")]
    id: String,

    #[arg(long, help = "Skip confirmation prompt")]
    yes: bool,
}

#[derive(clap::Args)]
pub struct ResetArgs {
    #[arg(help = "Alert rule ID")]
    id: String,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    #[arg(long, default_value_t = DEFAULT_REFRESH_INTERVAL.as_secs(), help = "Refresh interval in seconds")]
    interval: u64,
}

pub async fn execute(
    cmd: AlertsCmd,
    mode: OutputMode,
    server: Option<String>,
    config_path: Option<String>,
) -> Result<()> {
    let api = helpers::build_client(server.as_deref(), config_path.as_deref())?;

    match cmd {
        AlertsCmd::List => list(&api, mode).await,
        AlertsCmd::Get(args) => get(&api, args, mode).await,
        AlertsCmd::Create(args) => create(&api, args, mode).await,
        AlertsCmd::Edit(args) => edit(&api, args, mode).await,
        AlertsCmd::Delete(args) => delete(api, args, mode).await,
        AlertsCmd::Reset(args) => reset(api, args, mode).await,
        AlertsCmd::Watch(args) => watch(api, args, mode).await,
    }
}

async fn list(api: &ApiClient, mode: OutputMode) -> Result<()> {
    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Fetching alert rules...")),
        OutputMode::Json => None,
    };

    let rules = api.list_alerts().await?;

    if let Some(sp) = sp {
        spinner::finish_clear(&sp);
    }

    render_rules(&rules, mode)
}

async fn get(api: &ApiClient, args: GetArgs, mode: OutputMode) -> Result<()> {
    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Fetching alert rule...")),
        OutputMode::Json => None,
    };

    let record = api.get_alert(&args.id).await?;

    if let Some(sp) = sp {
        spinner::finish_clear(&sp);
    }

    match mode {
        OutputMode::Json => print_json(&record)?,
        OutputMode::Human => {
            theme::print_header("Alert Rule");
            theme::print_kv("ID", &record.id);
            theme::print_kv("Name", &record.name);
            theme::print_kv("Hive", &record.hive_name);
            theme::print_kv(
                "Conditions",
                &codec::format(record.trigger_conditions.as_deref()),
            );
            theme::print_kv_status("Status", record.status());
            theme::print_kv("Created", &record.created_at);
            println!();
        }
    }

    Ok(())
}

async fn create(api: &ApiClient, args: CreateArgs, mode: OutputMode) -> Result<()> {
    let mut draft = RuleDraft::for_create();
    if let Some(name) = &args.name {
        draft.set_name(name);
    }
    if let Some(hive) = &args.hive {
        draft.set_hive(hive);
    }
    if !args.conditions.is_empty() {
        draft.replace_conditions(helpers::parse_condition_set(&args.conditions)?);
    }

    if args.interactive {
        let hives = fetch_hives(api, mode).await?;
        if hives.is_empty() {
            bail!("no hives available: register a hive before adding alert rules");
        }
        interactive_submit(draft, &hives, api, mode).await
    } else {
        submit_once(draft, api, mode).await
    }
}

async fn edit(api: &ApiClient, args: EditArgs, mode: OutputMode) -> Result<()> {
    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Loading alert rule...")),
        OutputMode::Json => None,
    };

    let record = api.get_alert(&args.id).await?;

    if let Some(sp) = sp {
        spinner::finish_clear(&sp);
    }

    let mut draft = RuleDraft::for_edit(&record);
    if let Some(name) = &args.name {
        draft.set_name(name);
    }
    if !args.conditions.is_empty() {
        draft.replace_conditions(helpers::parse_condition_set(&args.conditions)?);
    }

    if args.interactive {
        // the hive binding is fixed after creation, so no selector data is needed
        interactive_submit(draft, &[], api, mode).await
    } else {
        if args.name.is_none() && args.conditions.is_empty() {
            bail!("nothing to change: pass --name or --condition, or use --interactive");
        }
        submit_once(draft, api, mode).await
    }
}

async fn delete(api: ApiClient, args: DeleteArgs, mode: OutputMode) -> Result<()> {
    if mode == OutputMode::Human && !args.yes {
        let msg = format!("Delete alert rule '{}'?", args.id);
        if !confirm::confirm_action(&msg) {
            theme::print_dim("Cancelled.");
            return Ok(());
        }
    }

    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Deleting alert rule...")),
        OutputMode::Json => None,
    };

    let mut registry = AlertRegistry::new(api);
    if let Err(e) = registry.remove(&args.id).await {
        tracing::debug!(error = %e, "delete request failed");
        bail!("Failed to delete alert rule");
    }

    match mode {
        OutputMode::Json => {
            print_json(&serde_json::json!({"deleted": true, "id": args.id}))?;
        }
        OutputMode::Human => {
            if let Some(sp) = sp {
                spinner::finish_ok(&sp, &format!("Alert rule '{}' deleted", args.id));
            }
            render_rules(registry.rules(), mode)?;
        }
    }

    Ok(())
}

async fn reset(api: ApiClient, args: ResetArgs, mode: OutputMode) -> Result<()> {
    let mut registry = AlertRegistry::new(api);
    if let Err(e) = registry.reset(&args.id).await {
        tracing::debug!(error = %e, "reset request failed");
        bail!("Failed to reset alert rule");
    }

    // the refreshed list carries the authoritative status
    let record = registry.rules().iter().find(|r| r.id == args.id);
    match mode {
        OutputMode::Json => match record {
            Some(r) => print_json(r)?,
            None => print_json(&serde_json::json!({"reset": true, "id": args.id}))?,
        },
        OutputMode::Human => match record {
            Some(r) => {
                print_success(&format!("Reset requested for '{}'", r.name));
                theme::print_kv_status("Status", r.status());
            }
            None => print_success("Reset requested"),
        },
    }

    Ok(())
}

async fn watch(api: ApiClient, args: WatchArgs, mode: OutputMode) -> Result<()> {
    let mut registry = AlertRegistry::new(api);
    registry.refresh().await;
    render_rules(registry.rules(), mode)?;

    let secs = args.interval.max(1);
    if mode == OutputMode::Human {
        theme::print_dim(&format!("Refreshing every {secs}s (press Ctrl-C to stop)"));
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // the immediate first tick

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if mode == OutputMode::Human {
                    theme::print_dim("Stopped.");
                }
                break;
            }
            _ = ticker.tick() => {
                registry.refresh().await;
                render_rules(registry.rules(), mode)?;
            }
        }
    }

    Ok(())
}

async fn fetch_hives(api: &ApiClient, mode: OutputMode) -> Result<Vec<HiveRecord>> {
    let sp = match mode {
        OutputMode::Human => Some(spinner::create("Fetching hives...")),
        OutputMode::Json => None,
    };

    let hives = api.list_hives().await?;

    if let Some(sp) = sp {
        spinner::finish_clear(&sp);
    }

    Ok(hives)
}

async fn submit_once(mut draft: RuleDraft, api: &ApiClient, mode: OutputMode) -> Result<()> {
    match draft.submit(api).await {
        Ok(record) => announce_saved(&record, api, mode).await,
        Err(e) => bail!("{e}"),
    }
}

/// Keeps the operator in the form until the rule saves or they give up; the
/// draft survives each failed attempt with everything still filled in.
async fn interactive_submit(
    mut draft: RuleDraft,
    hives: &[HiveRecord],
    api: &ApiClient,
    mode: OutputMode,
) -> Result<()> {
    loop {
        if !editor::fill_draft(&mut draft, hives) {
            theme::print_dim("Cancelled.");
            return Ok(());
        }
        match draft.submit(api).await {
            Ok(record) => return announce_saved(&record, api, mode).await,
            Err(e) => {
                print_error(&e.to_string());
                if !confirm::confirm_action("Keep editing this draft?") {
                    return Ok(());
                }
            }
        }
    }
}

async fn announce_saved(record: &AlertRecord, api: &ApiClient, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(record),
        OutputMode::Human => {
            print_success(&format!(
                "Alert rule '{}' saved (id {})",
                record.name, record.id
            ));
            // back to the list view, as after a saved form
            let rules = api.list_alerts().await?;
            render_rules(&rules, mode)
        }
    }
}

fn render_rules(rules: &[AlertRecord], mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(&rules)?,
        OutputMode::Human => {
            if rules.is_empty() {
                print_success("No alert rules defined");
                return Ok(());
            }
            theme::print_header("Alert Rules");
            let mut table =
                build_table(&["ID", "Name", "Hive", "Conditions", "Status", "Created"]);
            for r in rules {
                table.add_row(vec![
                    Cell::new(&r.id),
                    Cell::new(&r.name),
                    Cell::new(&r.hive_name),
                    Cell::new(codec::format(r.trigger_conditions.as_deref())),
                    status_cell(r.status()),
                    Cell::new(&r.created_at),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
