use actix_web::{web, App, HttpServer};
use clap::Parser;
use tracing::info;

use chatfront::server::config_routes;
use chatfront::util::{self, AppState};

/// Command-line options. Every flag can also come from the environment.
#[derive(Debug, Parser)]
#[command(
    name = "chatfront",
    version,
    about = "OpenAI Chat Completions surface for pluggable text-generation backends"
)]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8088")]
    bind: String,

    /// Number of server workers (defaults to the number of logical CPUs).
    #[arg(long, env = "CHATFRONT_WORKERS")]
    workers: Option<usize>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    util::init_tracing();
    let args = Args::parse();

    info!(
        bind = %args.bind,
        backend = %util::backend_base_url(),
        "starting chatfront"
    );

    // One backend handle shared across workers.
    let state = web::Data::new(AppState::default());

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(util::cors_config_from_env())
            .app_data(state.clone())
            .configure(config_routes)
    })
    .bind(&args.bind)?;

    if let Some(workers) = args.workers {
        server = server.workers(workers);
    }

    server.run().await?;
    Ok(())
}
