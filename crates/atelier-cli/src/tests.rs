use chrono::NaiveDate;
use rust_decimal::Decimal;

use atelier_core::{OrderStatus, ShippingType};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["atelier-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_orders_list_with_status_filter() {
    let cli = Cli::try_parse_from(["atelier-cli", "orders", "list", "--status", "order-ready"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Orders {
            command: OrdersCommands::List {
                status: Some(OrderStatus::OrderReady),
                overdue: false,
                limit: 50
            }
        })
    ));
}

#[test]
fn parses_set_status_with_gate_inputs() {
    let cli = Cli::try_parse_from([
        "atelier-cli",
        "orders",
        "set-status",
        "#1120",
        "fulfilled",
        "--cost",
        "85.50",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Orders {
            command:
                OrdersCommands::SetStatus {
                    reference,
                    status,
                    cost,
                    date,
                    reason,
                },
        }) => {
            assert_eq!(reference, "#1120");
            assert_eq!(status, OrderStatus::Fulfilled);
            assert_eq!(cost, Some(Decimal::new(8550, 2)));
            assert!(date.is_none());
            assert!(reason.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_unknown_status() {
    let result = Cli::try_parse_from(["atelier-cli", "orders", "set-status", "1120", "lost"]);
    assert!(result.is_err());
}

#[test]
fn parses_set_due_date() {
    let cli = Cli::try_parse_from(["atelier-cli", "orders", "set-due-date", "1120", "2024-03-04"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Orders {
            command: OrdersCommands::SetDueDate { date, .. }
        }) if date == NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    ));
}

#[test]
fn parses_shipping_import_picks() {
    let cli = Cli::try_parse_from([
        "atelier-cli",
        "shipping",
        "import",
        "--file",
        "costs.txt",
        "--pick",
        "1121=5503",
        "--pick",
        "#1122 = 5510",
        "--dry-run",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Shipping {
            command:
                ShippingCommands::Import {
                    file,
                    picks,
                    dry_run,
                },
        }) => {
            assert_eq!(file, Some(PathBuf::from("costs.txt")));
            assert_eq!(
                picks,
                vec![("1121".to_string(), 5503), ("#1122".to_string(), 5510)]
            );
            assert!(dry_run);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_malformed_pick() {
    let result = Cli::try_parse_from(["atelier-cli", "shipping", "import", "--pick", "1121"]);
    assert!(result.is_err());
}

#[test]
fn parses_shipping_add_kind() {
    let cli = Cli::try_parse_from([
        "atelier-cli",
        "shipping",
        "add",
        "1120",
        "--kind",
        "Uber",
        "--charged",
        "70",
        "--actual",
        "85",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Shipping {
            command: ShippingCommands::Add {
                kind: ShippingType::Uber,
                date: None,
                ..
            }
        })
    ));
}

#[test]
fn parses_payout_flags() {
    let cli = Cli::try_parse_from([
        "atelier-cli",
        "payout",
        "--expenses",
        "2500",
        "--from",
        "2024-05-01",
        "--remote-config",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Payout {
            revenue,
            expenses,
            shipping,
            from,
            to,
            remote_config,
        }) => {
            assert!(revenue.is_none());
            assert_eq!(expenses, Decimal::from(2500));
            assert!(shipping.is_none());
            assert_eq!(from, NaiveDate::from_ymd_opt(2024, 5, 1));
            assert!(to.is_none());
            assert!(remote_config);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_whatsapp_link_default_template() {
    let cli = Cli::try_parse_from(["atelier-cli", "whatsapp", "link", "#1120"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Whatsapp {
            command: WhatsappCommands::Link { ref template, .. }
        }) if template == "order_shipped"
    ));
}

#[test]
fn parses_upload_paid() {
    let cli = Cli::try_parse_from(["atelier-cli", "upload-paid", "paid.xlsx"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::UploadPaid { ref file }) if file == &PathBuf::from("paid.xlsx")
    ));
}

#[test]
fn build_change_carries_flags() {
    let change = orders::build_change(
        OrderStatus::Cancelled,
        None,
        None,
        Some("customer changed mind".to_string()),
    );
    assert_eq!(change.target, OrderStatus::Cancelled);
    assert!(change.shipping_cost.is_none());
    assert_eq!(
        change.cancellation_reason.as_deref(),
        Some("customer changed mind")
    );
}

#[test]
fn truncate_marks_cut() {
    assert_eq!(orders::truncate("abcdef", 3), "abc...");
    assert_eq!(orders::truncate("abc", 3), "abc");
}

#[test]
fn parse_pick_reports_bad_id() {
    let err = shipping::parse_pick("1121=abc").unwrap_err();
    assert!(err.contains("invalid order id"), "got: {err}");
}

#[test]
fn parse_shipping_type_is_case_insensitive() {
    assert_eq!(
        shipping::parse_shipping_type(" Company ").unwrap(),
        ShippingType::Company
    );
    assert!(shipping::parse_shipping_type("bicycle").is_err());
}
