//! Console worker: loads the client list, follows the change stream and
//! re-fetches whenever another session modifies the clients.
//!
//! `watch_clients --export` writes the current list to a timestamped CSV and
//! `watch_clients --template` writes the import template, both then exit.

use std::fs::File;

use dotenvy::dotenv;
use futures::StreamExt;

use crud_clients::console::export::{DEFAULT_EXPORT_PREFIX, export_filename, write_clients};
use crud_clients::console::http::HttpClientsApi;
use crud_clients::console::import::write_template;
use crud_clients::console::push::{ChangeNotification, EventStreamDecoder};
use crud_clients::console::session::{ACCESS_TOKEN_KEY, FileSessionStore, SessionStore};
use crud_clients::console::store::PagePlacement;
use crud_clients::console::sync::ClientListController;
use crud_clients::console::{FixedConfirm, LogNotifier};
use crud_clients::models::config::{ConsoleConfig, load};
use crud_clients::sheet::TEMPLATE_FILE_NAME;

type Controller = ClientListController<HttpClientsApi, FileSessionStore>;

fn log_page(controller: &Controller) {
    let page = controller.store().page();
    log::info!(
        "{} clients, page {}/{}",
        controller.store().total(),
        page.page_index + 1,
        page.page_count.max(1)
    );
    for client in &page.items {
        log::info!(
            "  #{} {} <{}> [{}] {}",
            client.id,
            client.display_name,
            client.email,
            client.country_code().unwrap_or("??"),
            client.status_label()
        );
    }
}

fn export(controller: &Controller) -> Result<String, Box<dyn std::error::Error>> {
    let name = export_filename(DEFAULT_EXPORT_PREFIX, &chrono::Local::now().naive_local());
    write_clients(File::create(&name)?, controller.store().clients())?;
    Ok(name)
}

async fn follow(controller: &mut Controller) -> Result<(), Box<dyn std::error::Error>> {
    let response = controller.api().open_events().await?;
    let mut stream = response.bytes_stream();
    let mut decoder = EventStreamDecoder::new();

    log::info!("Listening on {}", controller.api().events_url());
    while let Some(chunk) = stream.next().await {
        for frame in decoder.feed(&chunk?) {
            if let Some(notification) = ChangeNotification::parse(&frame) {
                controller.handle_notification(&notification).await;
                log_page(controller);
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let console_config = match load::<ConsoleConfig>() {
        Ok(console_config) => console_config,
        Err(err) => {
            log::error!("Error loading console config: {err}");
            std::process::exit(1);
        }
    };

    let command = std::env::args().nth(1);
    if command.as_deref() == Some("--template") {
        match File::create(TEMPLATE_FILE_NAME).map_err(csv::Error::from).and_then(write_template) {
            Ok(()) => log::info!("Wrote {TEMPLATE_FILE_NAME}"),
            Err(err) => {
                log::error!("Failed to write template: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    let session = match FileSessionStore::open(&console_config.state_file) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Failed to open {}: {err}", console_config.state_file);
            std::process::exit(1);
        }
    };

    let api = HttpClientsApi::new(&console_config.api_url).with_token(session.get(ACCESS_TOKEN_KEY));
    let mut controller = ClientListController::new(
        api,
        session,
        Box::new(LogNotifier),
        Box::new(FixedConfirm(false)),
        console_config.page_size,
    );

    if controller.reload(PagePlacement::First).await.is_err() {
        std::process::exit(1);
    }
    log_page(&controller);

    if command.as_deref() == Some("--export") {
        match export(&controller) {
            Ok(name) => log::info!("Exported clients to {name}"),
            Err(err) => {
                log::error!("Export failed: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    match follow(&mut controller).await {
        Ok(()) => log::info!("Change stream closed"),
        Err(err) => {
            log::error!("Change stream failed: {err}");
            std::process::exit(1);
        }
    }
}
