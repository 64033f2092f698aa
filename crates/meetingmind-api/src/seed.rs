//! `meetingmind seed`: submit the demo meetings to a running server.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

use meetingmind_types::meeting::{MeetingInput, MeetingReceipt};

const DEMO_MEETINGS: &str = include_str!("../demo/meetings.json");

pub fn demo_meetings() -> anyhow::Result<Vec<MeetingInput>> {
    serde_json::from_str(DEMO_MEETINGS).context("demo meeting data is malformed")
}

#[derive(Debug, Deserialize)]
struct SeededCommitment {
    direction: String,
    description: String,
}

pub async fn run(base_url: &str, wait: Duration) -> anyhow::Result<()> {
    let base_url = base_url.trim_end_matches('/');
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let health: Value = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .with_context(|| format!("server not reachable at {base_url}; start it with `meetingmind serve`"))?
        .json()
        .await?;
    println!("Server is up: {health}");

    for meeting in demo_meetings()? {
        println!("Submitting: {}...", meeting.title);
        let receipt: MeetingReceipt = client
            .post(format!("{base_url}/api/meetings"))
            .json(&meeting)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        println!(
            "  -> meeting_id={}, status={}",
            receipt.meeting_id, receipt.status
        );
    }

    println!("\nWaiting {}s for meeting processing...", wait.as_secs());
    tokio::time::sleep(wait).await;

    let meetings: Vec<Value> = client
        .get(format!("{base_url}/api/meetings"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("\nMeetings: {} total", meetings.len());

    let commitments: Vec<SeededCommitment> = client
        .get(format!("{base_url}/api/commitments"))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    println!("Commitments: {} extracted", commitments.len());
    for c in &commitments {
        println!("  - [{}] {}", c.direction, c.description);
    }

    println!("\nDemo data seeded.");
    Ok(())
}
