use anyhow::Context;
use catalog::infrastructure::{config::Config, logger::Logger};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("加载配置失败")?;
    let _log_guard = Logger::init(&config.logging)?;

    info!("启动商品目录服务...");
    info!("Connecting to database: {}", config.database.url);

    let app = catalog::build_app(&config).await?;

    let listener = TcpListener::bind(config.http.socket_address())
        .await
        .with_context(|| format!("无法绑定到 {}", config.http.socket_address()))?;
    let addr = listener.local_addr()?;

    info!("🚀 Catalog server running on http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET    /health           - 健康检查");
    info!("   GET    /products         - 获取所有产品");
    info!("   POST   /products         - 创建产品");
    info!("   GET    /products/:id     - 获取特定产品");
    info!("   DELETE /products/:id     - 删除产品");
    info!("   GET    /categories       - 获取所有分类");
    info!("   POST   /categories       - 创建分类");
    info!("   GET    /categories/:id   - 获取特定分类");
    info!("   DELETE /categories/:id   - 删除分类");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已停止");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("收到停止信号，正在关闭...");
    }
}
