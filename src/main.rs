use clap::Parser;
use lastmile_admin::adapters::report::{self, OutputFormat, Table};
use lastmile_admin::config::{Command, OrdersCommand, RidersCommand, WarehousesCommand, ZonesCommand};
use lastmile_admin::core::dashboard;
use lastmile_admin::domain::model::{NewOrder, OrderFilters, Point, Position, RiderFilters};
use lastmile_admin::utils::error::ErrorSeverity;
use lastmile_admin::utils::{logger, validation::Validate};
use lastmile_admin::{
    AdminError, AppConfig, CliConfig, Fixtures, InMemoryStore, LocalStorage, OrderService,
    RiderService, SessionReplay, SessionScript, WarehouseService, ZoneService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    // 初始化日誌
    if config.logging.json {
        let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
        logger::init_json_logger(level);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let outcome = match load_store(&cli, &config).await {
        Ok(mut store) => run(&cli, &config, &mut store).await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
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
    }

    Ok(())
}

async fn load_store(cli: &CliConfig, config: &AppConfig) -> lastmile_admin::Result<InMemoryStore> {
    let path = cli.fixtures.as_deref().or(config.fixtures_path());
    let fixtures = match path {
        Some(path) => Fixtures::load(&LocalStorage::new("."), path).await?,
        None => {
            tracing::debug!("Using built-in Riyadh fixtures");
            Fixtures::builtin()
        }
    };
    Ok(InMemoryStore::from_fixtures(fixtures))
}

async fn run(
    cli: &CliConfig,
    config: &AppConfig,
    store: &mut InMemoryStore,
) -> lastmile_admin::Result<String> {
    let format = cli.format;
    match &cli.command {
        Command::Zones(cmd) => run_zones(cmd, format, store),
        Command::Orders(cmd) => run_orders(cmd, format, config, store),
        Command::Riders(RidersCommand::List { zone, active_only }) => {
            let riders = RiderService::new(store);
            let filters = RiderFilters {
                zone_id: zone.clone(),
                active_only: *active_only,
            };
            report::riders_table(&riders.list_riders(&filters)).render(format)
        }
        Command::Warehouses(WarehousesCommand::List) => {
            let warehouses = WarehouseService::new(store);
            report::warehouses_table(warehouses.list_warehouses()).render(format)
        }
        Command::Dashboard { warehouse, zone } => {
            let summary = dashboard::summarize(&*store, warehouse.as_deref(), zone.as_deref());
            if format == OutputFormat::Json {
                return report::to_json(&summary);
            }
            let mut table = Table::new(&["metric", "value"]);
            for (metric, value) in [
                ("total_orders", summary.total_orders),
                ("delivered", summary.delivered),
                ("failed", summary.failed),
                ("pending", summary.pending),
                ("return_pickups", summary.return_pickups),
            ] {
                table.push(vec![metric.to_string(), value.to_string()]);
            }
            table.push(vec![
                "visible_zones".to_string(),
                summary.visible_zone_ids.join(","),
            ]);
            table.render(format)
        }
        Command::Replay { script, snapshot } => {
            let script = SessionScript::from_file(script)?;
            script.validate()?;

            let replay_report = SessionReplay::new(&mut *store, config.actor_id()).run(&script);

            if let Some(path) = snapshot {
                store.snapshot().save(&LocalStorage::new("."), path).await?;
            }

            let output = if format == OutputFormat::Json {
                report::to_json(&replay_report)?
            } else {
                let mut table = Table::new(&["step", "action", "ok", "message"]);
                for step in &replay_report.steps {
                    table.push(vec![
                        step.index.to_string(),
                        step.action.to_string(),
                        step.ok.to_string(),
                        step.message.clone(),
                    ]);
                }
                table.render(format)?
            };
            println!("{}", output);

            if let Some(zone_id) = &replay_report.discarded_edit {
                eprintln!("⚠️ Unfinished edit of {} was discarded", zone_id);
            }
            if replay_report.aborted {
                return Err(AdminError::session_state(format!(
                    "session '{}' aborted after {} step(s)",
                    replay_report.session,
                    replay_report.steps.len()
                )));
            }
            Ok(String::new())
        }
    }
}

fn run_zones(
    cmd: &ZonesCommand,
    format: OutputFormat,
    store: &mut InMemoryStore,
) -> lastmile_admin::Result<String> {
    let mut zones = ZoneService::new(store);
    match cmd {
        ZonesCommand::List => report::zones_table(zones.list_zones()).render(format),
        ZonesCommand::Show { id } => {
            let zone = zones.get_zone(id)?;
            let center = zones.zone_center(id)?;
            let riders: Vec<String> = zones
                .assigned_riders(id)?
                .into_iter()
                .map(|r| r.id.clone())
                .collect();
            if format == OutputFormat::Json {
                return report::to_json(&serde_json::json!({
                    "zone": zone,
                    "center": center,
                    "riders": riders,
                }));
            }
            let mut table = Table::new(&["field", "value"]);
            table.push(vec!["id".to_string(), zone.id.clone()]);
            table.push(vec!["name".to_string(), zone.name.clone()]);
            table.push(vec!["warehouses".to_string(), zone.warehouse_ids.join(",")]);
            table.push(vec![
                "center".to_string(),
                format!("{:.5}, {:.5}", center.lng, center.lat),
            ]);
            table.push(vec![
                "vertices".to_string(),
                zone.polygon.outer_ring().len().saturating_sub(1).to_string(),
            ]);
            table.push(vec!["riders".to_string(), riders.join(",")]);
            table.render(format)
        }
        ZonesCommand::Locate { lng, lat, all } => {
            let point = Point::new(*lng, *lat);
            let found: Vec<_> = if *all {
                zones.zones_at(&point)?.into_iter().cloned().collect()
            } else {
                zones.locate(&point)?.into_iter().cloned().collect()
            };
            if found.is_empty() && format == OutputFormat::Table {
                return Ok("No zone found for this location".to_string());
            }
            report::zones_table(&found).render(format)
        }
        ZonesCommand::Overlaps => {
            let mut table = Table::new(&["zone_a", "zone_b"]);
            for (a, b) in zones.overlaps() {
                table.push(vec![a.id.clone(), b.id.clone()]);
            }
            table.render(format)
        }
        ZonesCommand::Rename { id, name } => {
            let zone = zones.rename_zone(id, name)?;
            report::zones_table(&[zone]).render(format)
        }
        ZonesCommand::SetBoundary { id, ring } => {
            let raw: Vec<Position> = serde_json::from_str(ring)?;
            let zone = zones.replace_boundary(id, &raw)?;
            report::zones_table(&[zone]).render(format)
        }
    }
}

fn run_orders(
    cmd: &OrdersCommand,
    format: OutputFormat,
    config: &AppConfig,
    store: &mut InMemoryStore,
) -> lastmile_admin::Result<String> {
    let mut orders = OrderService::new(store, config.actor_id());
    match cmd {
        OrdersCommand::List {
            status,
            order_type,
            zone,
            warehouse,
            search,
            from,
            to,
            page,
        } => {
            let filters = OrderFilters {
                statuses: status.clone(),
                types: order_type.clone(),
                zone_id: zone.clone(),
                warehouse_id: warehouse.clone(),
                search: search.clone(),
                date_from: *from,
                date_to: *to,
            };
            let matched = orders.list_orders(&filters);
            let per_page = config.items_per_page();
            let rows = report::paginate(&matched, *page, per_page)?;
            let mut output = report::orders_table(rows).render(format)?;
            if format == OutputFormat::Table {
                output.push_str(&format!(
                    "\n\nPage {} of {} ({} orders)",
                    page,
                    report::page_count(matched.len(), per_page).max(1),
                    matched.len()
                ));
            }
            Ok(output)
        }
        OrdersCommand::Show { id } => {
            let order = orders.get_order(id)?;
            let logs = orders.order_logs(id);
            let proof = orders.order_proof(id);
            if format == OutputFormat::Json {
                return report::to_json(&serde_json::json!({
                    "order": order,
                    "status_logs": logs,
                    "proof": proof,
                }));
            }
            let mut output = report::orders_table(&[order]).render(format)?;
            let mut history = Table::new(&["status", "note", "changed_by", "at"]);
            for log in &logs {
                history.push(vec![
                    log.status.label().to_string(),
                    log.note.clone().unwrap_or_default(),
                    log.changed_by.clone(),
                    log.created_at.to_rfc3339(),
                ]);
            }
            output.push_str("\n\n");
            output.push_str(&history.render(format)?);
            Ok(output)
        }
        OrdersCommand::Create {
            order_type,
            warehouse,
            customer,
            phone,
            lng,
            lat,
            address,
            pod,
            notes,
        } => {
            let created = orders.create_order(NewOrder {
                order_type: *order_type,
                warehouse_id: warehouse.clone(),
                customer_name: customer.clone(),
                customer_phone: phone.clone(),
                short_national_address: address.clone(),
                location: Point::new(*lng, *lat),
                pod_required: *pod,
                notes: notes.clone(),
                parent_order_id: None,
                source_ref: None,
            })?;
            if created.zone_id.is_none() {
                eprintln!("⚠️ No zone found for this location; the order is unassigned");
            }
            report::orders_table(&[&created]).render(format)
        }
        OrdersCommand::Cancel { id } => {
            let order = orders.cancel_order(id)?;
            report::orders_table(&[&order]).render(format)
        }
        OrdersCommand::Reassign { id, rider } => {
            let order = orders.reassign_order(id, rider)?;
            report::orders_table(&[&order]).render(format)
        }
    }
}
