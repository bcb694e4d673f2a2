use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    oid_cli::main_entry().await
}
