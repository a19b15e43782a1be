// Third party imports
use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Khởi tạo tracing cho toàn bộ process
///
/// Mức log lấy từ biến môi trường `RUST_LOG` nếu có, nếu không dùng
/// `default_level`. Gọi nhiều lần sẽ trả về lỗi thay vì panic.
pub fn init_logging(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|err| anyhow::anyhow!("Không thể khởi tạo tracing: {}", err))?;

    Ok(())
}
