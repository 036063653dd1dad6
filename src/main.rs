#[tokio::main]
async fn main() {
    portal_backend::start_server().await;
}
