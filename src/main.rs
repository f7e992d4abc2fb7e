#[tokio::main]
async fn main() {
    // Run the CLI
    pagetoc::cli::run().await;
}
