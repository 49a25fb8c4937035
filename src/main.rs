use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    moderated_chat_lib::run().await
}
