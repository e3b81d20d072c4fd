//! Manual injection path.
//!
//! An interactive stdin loop that synthesizes a radar datagram line from
//! operator input and feeds it through the identical handling chain as
//! network packets. The only extra checks here are input prompts;
//! nothing downstream is special-cased.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use vasd_proto::Reading;

use crate::pipeline::{Pipeline, receipt_timestamp};

/// Run the interactive loop until stdin closes or the operator types
/// `exit`.
///
/// # Errors
///
/// Propagates terminal I/O failures; pipeline faults are contained in
/// the handling chain and never surface here.
pub async fn run(pipeline: Arc<Pipeline>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    out.write_all(b"Manual input mode. Type 'exit' to quit.\n").await?;

    loop {
        out.write_all(b"lane: ").await?;
        out.flush().await?;
        let Some(lane) = lines.next_line().await? else { break };
        let lane = lane.trim().to_string();
        if lane.is_empty() {
            continue;
        }
        if lane.eq_ignore_ascii_case("exit") {
            break;
        }
        if !pipeline.registry().contains(&lane) {
            out.write_all(b"unknown lane\n").await?;
            continue;
        }

        out.write_all(b"speed (km/h): ").await?;
        out.flush().await?;
        let Some(speed_line) = lines.next_line().await? else { break };
        let Ok(speed) = speed_line.trim().parse::<u32>() else {
            out.write_all(b"speed must be a non-negative integer\n").await?;
            continue;
        };

        let line = Reading::synthesize_line(&lane, speed, &receipt_timestamp());
        pipeline.handle_line(&line, None).await;
        out.write_all(format!("injected: lane {lane}, {speed} km/h\n").as_bytes()).await?;
    }

    Ok(())
}
