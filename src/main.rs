use anyhow::Result;
use clap::Parser;
use auction_sniper::{
    auction::AuctionHouse,
    config,
    service::{self, AuctionSniper, ChatAuctionHouse, LoggingFailureReporter},
};
use tracing::info;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let opts = config::Opts::parse();
    info!(sniper_id = %opts.sniper_id, items = opts.items.len(), "starting");

    let auction_house = ChatAuctionHouse::new(
        opts.sniper_id.clone(),
        opts.queue_capacity,
        opts.poll_timeout(),
        LoggingFailureReporter::new_shared(),
    );
    let status_board = service::StatusBoard::new();

    let svc_ctr = service::ServiceControl::new();

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            info!("Stopping all services...");
            svc_ctr.stop_all();
        }
    })?;

    let mut handles = vec![];
    for item in &opts.items {
        status_board.track(item);

        let sniper = AuctionSniper::new(
            item.clone(),
            auction_house.auction_for(item),
            Box::new(
                service::SniperListeners::new()
                    .with(service::SniperStateDisplayer)
                    .with(status_board.clone()),
            ),
        );
        sniper.join();
        handles.push(svc_ctr.spawn_loop(auction_house.receiver_for(item, Box::new(sniper))));
    }

    handles.push(svc_ctr.spawn_loop(service::ConsoleAuctionFeed::new(
        opts.items
            .iter()
            .map(|item| auction_house.server_end(&item.id))
            .collect(),
        opts.queue_capacity,
        opts.poll_timeout(),
    )));

    if let Some(addr) = opts.status_addr {
        handles.push(svc_ctr.spawn_loop(service::Ui::new(addr, status_board.clone())?));
    }

    for handle in handles {
        handle.join()?
    }

    Ok(())
}
