#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pdfinsight_server::start().await
}
