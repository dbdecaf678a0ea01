use clap::Parser;
use convo_mock_backend::MockBackend;

#[derive(Parser, Debug)]
#[clap(name = "convo-mock-backend", about = "In-memory convo chat backend")]
struct Cli {
    #[clap(long, default_value = "127.0.0.1:5000")]
    bind_addr: String,

    #[clap(long, default_value = convo_mock_backend::handlers::AUTH_HEADER)]
    auth_header: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    MockBackend::new()
        .with_auth_header(&cli.auth_header)
        .serve(&cli.bind_addr)
        .await
}
