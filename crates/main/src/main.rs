//! 主应用程序入口
//!
//! 启动 Social Stream 消息接入网关，事件写入日志，Ctrl-C 后优雅停止。

use std::sync::Arc;

use application::{ForwardingSink, LogSink};
use config::GatewayConfig;
use tracing_subscriber::EnvFilter;
use web_api::spawn_gateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::load()?;
    tracing::info!(
        address = %config.server.bind_address(),
        max_body_bytes = config.ingest.max_body_bytes,
        body_read_timeout_secs = config.ingest.body_read_timeout_secs,
        "加载网关配置"
    );

    let sink: Arc<dyn ForwardingSink> = Arc::new(LogSink);
    let Some(mut server) = spawn_gateway(&config, Some(sink)).await else {
        anyhow::bail!("Social Stream HTTP server could not be started");
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("收到停止信号，正在关闭网关");

    server.stop(config.server.shutdown_grace()).await?;
    Ok(())
}
