//! WhatsApp command handlers for the CLI.
//!
//! Links are printed for the operator to open; nothing here sends a message
//! except `order-ready`, which asks the backend to do it.

use atelier_client::AtelierClient;
use atelier_core::{normalize_phone, wa_me_link, OrderBoard};
use clap::Subcommand;

use crate::orders::truncate;

/// Sub-commands available under `whatsapp`.
#[derive(Debug, Subcommand)]
pub enum WhatsappCommands {
    /// List message templates
    Templates,
    /// Render a template for an order and print a wa.me link
    Link {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
        /// Template key
        #[arg(long, default_value = "order_shipped")]
        template: String,
    },
    /// Ask the backend to send the order-ready message
    OrderReady {
        /// Order number (#1120 or 1120) or backend id
        reference: String,
    },
}

/// Dispatch a `whatsapp` subcommand.
///
/// # Errors
///
/// Returns an error if the backend call fails, the reference does not
/// resolve to one order, or the order has no usable phone number.
pub(crate) async fn run(command: WhatsappCommands, client: &AtelierClient) -> anyhow::Result<()> {
    match command {
        WhatsappCommands::Templates => {
            let templates = client.list_templates().await?;
            if templates.is_empty() {
                println!("no templates configured");
                return Ok(());
            }
            println!("{:<24}{:<24}BODY", "KEY", "NAME");
            for template in &templates {
                println!(
                    "{:<24}{:<24}{}",
                    template.key,
                    template.name,
                    truncate(&template.body.replace('\n', " "), 50)
                );
            }
        }
        WhatsappCommands::Link {
            reference,
            template,
        } => {
            let board = OrderBoard::new(client.list_orders().await?);
            let order = board.find(&reference)?;
            let template = client.template_by_key(&template).await?;
            let message = template.render_for(order);

            println!("{message}");
            println!();
            match order.phone().and_then(|phone| wa_me_link(phone, &message)) {
                Some(link) => println!("{link}"),
                None => anyhow::bail!("order {} has no usable phone number", order.name),
            }
        }
        WhatsappCommands::OrderReady { reference } => {
            let board = OrderBoard::new(client.list_orders().await?);
            let order = board.find(&reference)?;
            let phone = order
                .phone()
                .and_then(normalize_phone)
                .ok_or_else(|| anyhow::anyhow!("order {} has no usable phone number", order.name))?;
            client.send_order_ready(&phone, &order.name).await?;
            println!("order-ready message sent to {phone} for {}", order.name);
        }
    }
    Ok(())
}
