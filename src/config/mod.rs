pub mod session_config;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, OrdersCommand, RidersCommand, WarehousesCommand, ZonesCommand};

#[cfg(feature = "cli")]
mod cli {
    use crate::adapters::report::OutputFormat;
    use crate::domain::model::{OrderStatus, OrderType};
    use chrono::NaiveDate;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "lastmile-admin")]
    #[command(about = "Back-office tooling for last-mile delivery zones, orders and riders")]
    pub struct CliConfig {
        /// Path to TOML configuration file
        #[arg(short, long, global = true)]
        pub config: Option<String>,

        /// JSON fixture file, overrides [fixtures] path
        #[arg(long, global = true)]
        pub fixtures: Option<String>,

        /// Output format: table, csv or json
        #[arg(long, global = true, default_value = "table")]
        pub format: OutputFormat,

        #[arg(short, long, global = true, help = "Enable verbose output")]
        pub verbose: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Delivery zones and their boundaries
        #[command(subcommand)]
        Zones(ZonesCommand),
        #[command(subcommand)]
        Orders(OrdersCommand),
        #[command(subcommand)]
        Riders(RidersCommand),
        #[command(subcommand)]
        Warehouses(WarehousesCommand),
        /// Order counters and visible zones
        Dashboard {
            #[arg(long)]
            warehouse: Option<String>,
            #[arg(long)]
            zone: Option<String>,
        },
        /// Replay a TOML session script against the loaded data
        Replay {
            script: String,
            /// Write the resulting data set as JSON fixtures
            #[arg(long)]
            snapshot: Option<String>,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum ZonesCommand {
        List,
        Show {
            id: String,
        },
        /// Find the zone containing a point
        #[command(allow_negative_numbers = true)]
        Locate {
            lng: f64,
            lat: f64,
            /// List every containing zone instead of the first match
            #[arg(long)]
            all: bool,
        },
        /// Pairs of zones whose interiors overlap
        Overlaps,
        Rename {
            id: String,
            name: String,
        },
        /// Replace a boundary with a JSON ring, e.g. '[[46.6,24.8],[46.7,24.8],[46.7,24.7]]'
        SetBoundary {
            id: String,
            ring: String,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum OrdersCommand {
        List {
            #[arg(long, value_delimiter = ',')]
            status: Vec<OrderStatus>,
            #[arg(long = "type", value_delimiter = ',')]
            order_type: Vec<OrderType>,
            #[arg(long)]
            zone: Option<String>,
            #[arg(long)]
            warehouse: Option<String>,
            /// Matches id, customer name, phone or address
            #[arg(long)]
            search: Option<String>,
            #[arg(long)]
            from: Option<NaiveDate>,
            #[arg(long)]
            to: Option<NaiveDate>,
            #[arg(long, default_value = "1")]
            page: usize,
        },
        Show {
            id: String,
        },
        #[command(allow_negative_numbers = true)]
        Create {
            #[arg(long = "type", default_value = "delivery")]
            order_type: OrderType,
            #[arg(long)]
            warehouse: String,
            #[arg(long)]
            customer: String,
            #[arg(long)]
            phone: String,
            #[arg(long)]
            lng: f64,
            #[arg(long)]
            lat: f64,
            #[arg(long, default_value = "")]
            address: String,
            #[arg(long)]
            pod: bool,
            #[arg(long)]
            notes: Option<String>,
        },
        Cancel {
            id: String,
        },
        Reassign {
            id: String,
            rider: String,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum RidersCommand {
        List {
            #[arg(long)]
            zone: Option<String>,
            #[arg(long)]
            active_only: bool,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum WarehousesCommand {
        List,
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_orders_list() {
            let cli = CliConfig::try_parse_from([
                "lastmile-admin",
                "orders",
                "list",
                "--status",
                "pending,delivered",
                "--from",
                "2024-03-10",
                "--format",
                "csv",
            ])
            .unwrap();
            assert_eq!(cli.format, OutputFormat::Csv);
            match cli.command {
                Command::Orders(OrdersCommand::List { status, from, page, .. }) => {
                    assert_eq!(status, vec![OrderStatus::Pending, OrderStatus::Delivered]);
                    assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 10));
                    assert_eq!(page, 1);
                }
                other => panic!("unexpected command {:?}", other),
            }
        }

        #[test]
        fn test_parse_locate() {
            let cli =
                CliConfig::try_parse_from(["lastmile-admin", "zones", "locate", "46.68", "24.79"])
                    .unwrap();
            assert!(matches!(
                cli.command,
                Command::Zones(ZonesCommand::Locate { all: false, .. })
            ));
        }

        #[test]
        fn test_unknown_status_rejected() {
            let parsed = CliConfig::try_parse_from([
                "lastmile-admin",
                "orders",
                "list",
                "--status",
                "lost",
            ]);
            assert!(parsed.is_err());
        }
    }
}
