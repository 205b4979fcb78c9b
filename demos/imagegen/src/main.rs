//! Minimal end-to-end demo: submit a text-to-image job and wait for it.
//!
//! Credentials come from the environment (`STRATO_KEY`, or the
//! `STRATO_KEY_ID`/`STRATO_KEY_SECRET` pair).

use strato_client::{Client, ClientConfig, Payload, QueueUpdate, SubscribeOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagegen=info,strato_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "acme/text-to-image".to_string());
    let prompt = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "a cat wearing a space helmet".to_string());

    let client = Client::new(ClientConfig::default());
    let input = Payload::from(serde_json::json!({ "prompt": prompt }));

    let options = SubscribeOptions {
        include_logs: true,
        on_update: Some(Box::new(|update: &QueueUpdate| match update {
            QueueUpdate::InQueue { queue_position } => match queue_position {
                Some(position) => println!("in queue, {position} job(s) ahead"),
                None => println!("in queue"),
            },
            QueueUpdate::InProgress { logs } => {
                for log in logs {
                    println!("  {}", log.message);
                }
            }
            QueueUpdate::Completed { .. } => println!("completed"),
        })),
        ..Default::default()
    };

    match client.subscribe(&app_id, Some(input), options).await {
        Ok(result) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result.to_json())
                    .expect("result payload serializes")
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Subscribe failed");
            std::process::exit(1);
        }
    }
}
