mod config;
mod driver;
mod error;
mod logging;
mod notifier;
mod scanners;
mod tagger_core;
mod utils;

#[cfg(test)]
mod test_support;

use driver::InvocationContext;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::enable_error_backtraces();
    logging::init_logging()?;

    let ok = driver::handle(serde_json::Value::Null, InvocationContext::from_env()).await;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
