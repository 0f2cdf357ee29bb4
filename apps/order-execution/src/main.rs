//! Order Execution Binary
//!
//! Runs one order through the engine against the configured exchange:
//! risk check, registration, signed submission with retry, then a
//! reconciliation pass if the order is still open.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin order-execution -- [config.yaml]
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `BINANCE_API_KEY`: exchange API key
//! - `BINANCE_SECRET_KEY`: exchange API secret
//!
//! ## Optional
//! - `BINANCE_REST_URL`: REST base URL (default: <https://api.binance.com>)
//! - `ORDER_EXECUTION_CONFIG`: YAML config path (overridden by the first argument)
//! - `ORDER_MAX_POSITION`: per-symbol position limit (default: 100)
//! - `TEST_SYMBOL`: symbol to trade (default: BTCUSDT)
//! - `TEST_SIDE`: BUY | SELL (default: BUY)
//! - `TEST_QUANTITY`: order quantity (default: 0.001)
//! - `TEST_PRICE`: limit price (default: 0)
//! - `RUST_LOG`: log filter (default: order_execution=info)

use std::sync::Arc;

use anyhow::{Context, bail};
use rust_decimal::Decimal;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use order_execution::config::{CONFIG_PATH_ENV, Config, load_config};
use order_execution::observability::init_tracing;
use order_execution::{
    BinanceClient, ExecuteOrderUseCase, InMemoryOrderManager, OrderIntent, OrderSide, Portfolio,
    PositionLimitValidator, ReconcileOrderUseCase,
};

const DEFAULT_SYMBOL: &str = "BTCUSDT";
const DEFAULT_QUANTITY: &str = "0.001";
const DEFAULT_PRICE: &str = "0";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = load_app_config()?;
    if let Err(e) = init_tracing(&config.observability.logging) {
        eprintln!("tracing disabled: {e}");
    }

    tracing::info!(
        base_url = %config.exchange.base_url,
        max_position = %config.risk.max_position,
        max_attempts = config.retry.max_attempts,
        "starting order execution"
    );

    let exchange = Arc::new(
        BinanceClient::new(&config.binance()).context("failed to create exchange client")?,
    );
    let registry = Arc::new(InMemoryOrderManager::new());
    let portfolio = Arc::new(Portfolio::new());
    let validator = PositionLimitValidator::new(config.risk.max_position);

    let executor = ExecuteOrderUseCase::new(
        Arc::clone(&exchange),
        Arc::clone(&registry),
        Arc::clone(&portfolio),
        validator,
    );
    let reconciler = ReconcileOrderUseCase::new(exchange, Arc::clone(&registry), Arc::clone(&portfolio));

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown_signal(cancel.clone()));

    let intent = demo_intent()?;
    let report = executor
        .execute(&cancel, intent)
        .await
        .context("order execution failed")?;

    tracing::info!(
        order_id = %report.order.id(),
        exchange_order_id = %report.exchange_order_id,
        exchange_status = %report.exchange_status,
        status = %report.order.status(),
        filled = %report.order.filled_quantity(),
        "order executed"
    );

    if !report.order.is_terminal() {
        match reconciler.reconcile(&cancel, report.order.id()).await {
            Ok(order) => tracing::info!(
                order_id = %order.id(),
                status = %order.status(),
                filled = %order.filled_quantity(),
                "order reconciled"
            ),
            Err(e) => tracing::warn!(order_id = %report.order.id(), error = %e, "reconciliation failed"),
        }
    }

    for (symbol, position) in portfolio.positions() {
        tracing::info!(symbol = %symbol, position = %position, "position");
    }

    Ok(())
}

/// Load config from the first argument or `ORDER_EXECUTION_CONFIG`, falling
/// back to environment variables.
fn load_app_config() -> anyhow::Result<Config> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|p| !p.is_empty()));

    load_config(path.as_deref()).context("failed to load configuration")
}

fn demo_intent() -> anyhow::Result<OrderIntent> {
    let symbol = env_or("TEST_SYMBOL", DEFAULT_SYMBOL);
    let side = match env_or("TEST_SIDE", "BUY").to_ascii_uppercase().as_str() {
        "BUY" => OrderSide::Buy,
        "SELL" => OrderSide::Sell,
        other => bail!("TEST_SIDE must be BUY or SELL, got {other}"),
    };
    let quantity: Decimal = env_or("TEST_QUANTITY", DEFAULT_QUANTITY)
        .parse()
        .context("TEST_QUANTITY is not a decimal")?;
    let price: Decimal = env_or("TEST_PRICE", DEFAULT_PRICE)
        .parse()
        .context("TEST_PRICE is not a decimal")?;

    Ok(OrderIntent::new(symbol, side, quantity, price))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Cancel in-flight exchange calls on SIGINT or SIGTERM.
async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, cancelling"),
        () = terminate => tracing::info!("received SIGTERM, cancelling"),
    }

    cancel.cancel();
}
