#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chat_relay_server::run().await
}
