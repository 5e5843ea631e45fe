#[tokio::main]
async fn main() {
    wikimasters::start_server().await;
}
