// This main function is the entry point when running `cargo run -p web-server`.
// It loads the settings, installs logging and hands over to the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = configuration::load_config()?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(&settings).await
}
