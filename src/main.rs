#[tokio::main]
async fn main() {
    if let Err(error) = xivpov_lib::run().await {
        eprintln!("xivpov failed: {error}");
        std::process::exit(1);
    }
}
